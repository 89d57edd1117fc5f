// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for geometry processing
//!
//! Every error here is local to one ring or polygon. Callers count it and
//! move on to the next sibling.

use thiserror::Error;

/// Geometry processing result type
pub type Result<T> = std::result::Result<T, Error>;

/// Geometry processing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Fewer than 3 usable points after degenerate-point removal
    #[error("Invalid ring: {points} usable points")]
    InvalidRing { points: usize },

    /// A ring point with a NaN or infinite coordinate
    #[error("Invalid ring: non-finite coordinate at point {index}")]
    NonFiniteCoordinate { index: usize },

    /// No unique best-fit plane
    #[error("Degenerate plane: {0}")]
    DegeneratePlane(String),

    /// Triangulation could not be built
    #[error("Triangulation error: {0}")]
    Triangulation(String),

    /// Faces reached with conflicting inside/outside tags
    #[error("Ambiguous classification of {faces} faces")]
    ClassificationAmbiguous { faces: usize },
}

/// Failure categories used for counting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    InvalidRing,
    DegeneratePlane,
    TriangulationFailure,
    ClassificationAmbiguous,
}

impl Error {
    /// Create an invalid ring error
    pub fn invalid_ring(points: usize) -> Self {
        Error::InvalidRing { points }
    }

    /// Create a degenerate plane error
    pub fn degenerate_plane(msg: impl Into<String>) -> Self {
        Error::DegeneratePlane(msg.into())
    }

    /// Create a triangulation error
    pub fn triangulation(msg: impl Into<String>) -> Self {
        Error::Triangulation(msg.into())
    }

    /// Failure category of this error
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::InvalidRing { .. } | Error::NonFiniteCoordinate { .. } => {
                FailureKind::InvalidRing
            }
            Error::DegeneratePlane(_) => FailureKind::DegeneratePlane,
            Error::Triangulation(_) => FailureKind::TriangulationFailure,
            Error::ClassificationAmbiguous { .. } => FailureKind::ClassificationAmbiguous,
        }
    }
}
