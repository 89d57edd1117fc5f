// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for feature decoding

use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while turning front-end data into model types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A coordinate token is not a number
    #[error("Invalid number at token {position}: {token:?}")]
    InvalidNumber { position: usize, token: String },

    /// Coordinate count is not a multiple of three
    #[error("Wrong number of coordinates: {count} is not divisible by 3")]
    IncompleteCoordinates { count: usize },

    /// Numeric object type code outside the known range
    #[error("Unknown object type code: {0}")]
    UnknownObjectType(u32),

    /// Error reported by a feature source
    #[error("Feature source error: {0}")]
    Source(String),
}

impl ModelError {
    /// Create an invalid number error
    pub fn invalid_number(position: usize, token: impl Into<String>) -> Self {
        ModelError::InvalidNumber {
            position,
            token: token.into(),
        }
    }

    /// Create a feature source error
    pub fn source(msg: impl Into<String>) -> Self {
        ModelError::Source(msg.into())
    }
}
