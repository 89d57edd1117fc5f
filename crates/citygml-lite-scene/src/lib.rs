// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityGML-Lite Scene
//!
//! Owns city objects and keeps their render buffers in sync with their
//! source polygons.
//!
//! A [`Scene`] holds [`CityObject`]s in insertion order together with the
//! running [`Bounds3`] of every point it has seen. Each object keeps its
//! polygons grouped by surface type, one triangle buffer per surface type
//! and one edge buffer. Regeneration always rebuilds buffers from scratch
//! and reports what it produced and skipped in a [`RegenerationReport`].
//!
//! ```rust,ignore
//! use citygml_lite_model::{FeatureRecord, ObjectType, Polygon, Ring, SurfaceType};
//! use citygml_lite_scene::Scene;
//!
//! let mut scene = Scene::new();
//! scene.add_record(
//!     FeatureRecord::new("bldg-1", ObjectType::Building).with_polygon(
//!         SurfaceType::ROOF,
//!         Polygon::new(Ring::from_coords(&[[0.0, 0.0, 3.0], [4.0, 0.0, 3.0], [4.0, 4.0, 3.0]])),
//!     ),
//! );
//! let report = scene.regenerate_all();
//! println!("{report}");
//! ```

pub mod config;
pub mod error;
pub mod object;
pub mod report;
pub mod scene;

pub use citygml_lite_geometry::Bounds3;
pub use config::SceneConfig;
pub use error::{Result, SceneError};
pub use object::CityObject;
pub use report::RegenerationReport;
pub use scene::Scene;
