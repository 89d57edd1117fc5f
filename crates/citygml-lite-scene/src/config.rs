// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene configuration

use citygml_lite_geometry::TessellationOptions;
use serde::{Deserialize, Serialize};

/// Scene-wide regeneration settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Ring cleaning and plane fitting tolerances
    pub tessellation: TessellationOptions,
    /// Regenerate objects on the rayon thread pool
    pub parallel: bool,
    /// Rebuild edge buffers in `regenerate_all`; when off they are emptied
    pub emit_edges: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tessellation: TessellationOptions::default(),
            parallel: true,
            emit_edges: true,
        }
    }
}

impl SceneConfig {
    /// Set tessellation tolerances
    pub fn with_tessellation(mut self, tessellation: TessellationOptions) -> Self {
        self.tessellation = tessellation;
        self
    }

    /// Enable or disable parallel regeneration
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable or disable edge buffers in `regenerate_all`
    pub fn with_edges(mut self, emit_edges: bool) -> Self {
        self.emit_edges = emit_edges;
        self
    }
}
