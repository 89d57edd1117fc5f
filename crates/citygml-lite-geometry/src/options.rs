// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tessellation tolerances

use serde::{Deserialize, Serialize};

/// Numeric tolerances for ring cleaning and plane fitting
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationOptions {
    /// Consecutive points closer than this are merged
    pub merge_tolerance: f64,
    /// A ring is collinear when its second covariance eigenvalue is below
    /// this fraction of the largest one
    pub collinear_tolerance: f64,
    /// Projected vertices closer than this fraction of the polygon extent
    /// to another vertex or boundary segment are snapped onto it
    pub snap_tolerance: f64,
}

impl Default for TessellationOptions {
    fn default() -> Self {
        Self {
            merge_tolerance: 1e-9,
            collinear_tolerance: 1e-12,
            snap_tolerance: 1e-8,
        }
    }
}

impl TessellationOptions {
    /// Set the point merge tolerance
    pub fn with_merge_tolerance(mut self, tolerance: f64) -> Self {
        self.merge_tolerance = tolerance;
        self
    }

    /// Set the collinearity tolerance
    pub fn with_collinear_tolerance(mut self, tolerance: f64) -> Self {
        self.collinear_tolerance = tolerance;
        self
    }

    /// Set the relative snapping tolerance in plane coordinates
    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }
}
