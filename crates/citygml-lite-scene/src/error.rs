// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for scene operations

use citygml_lite_model::ModelError;
use thiserror::Error;

/// Scene result type
pub type Result<T> = std::result::Result<T, SceneError>;

/// Scene operation errors
///
/// Geometry defects never show up here; they are counted in
/// [`RegenerationReport`](crate::RegenerationReport) instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No object at this index
    #[error("Object not found: {0}")]
    ObjectNotFound(usize),

    /// Feature source failed
    #[error(transparent)]
    Model(#[from] ModelError),
}
