// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CityGML-Lite Model - Shared types for CityGML geometry processing
//!
//! This crate holds the data that flows between a CityGML front end and the
//! geometry pipeline. It knows nothing about XML tags: a front end walks the
//! markup and hands over typed records through the [`FeatureSource`] trait.
//!
//! # Architecture
//!
//! - [`Ring`] / [`Polygon`] - Closed 3D boundaries and holed surfaces
//! - [`ObjectType`] / [`SurfaceType`] - Top-level feature class and per-surface classification
//! - [`FeatureRecord`] - One top-level feature with its classified polygons
//! - [`FeatureSource`] - Pull-based producer of feature records
//! - [`decode_pos_list`] - `gml:posList` text to points
//!
//! # Example
//!
//! ```ignore
//! use citygml_lite_model::{FeatureSource, VecFeatureSource};
//!
//! let mut source = VecFeatureSource::new(records);
//! while let Some(record) = source.next_feature() {
//!     let record = record?;
//!     println!("{} {}: {} polygons", record.object_type, record.id, record.polygon_count());
//! }
//! ```

pub mod coordinates;
pub mod error;
pub mod geometry;
pub mod traits;
pub mod types;

pub use nalgebra::Point3;

// Re-export all public types
pub use coordinates::*;
pub use error::*;
pub use geometry::*;
pub use traits::*;
pub use types::*;
