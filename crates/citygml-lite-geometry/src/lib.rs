// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityGML-Lite Geometry Processing
//!
//! Turns CityGML polygons into renderable triangle and edge buffers.
//!
//! ## Overview
//!
//! Each polygon runs through the same pipeline:
//!
//! - **Plane fitting**: least-squares plane through the exterior ring ([`PlaneFrame::fit`])
//! - **Projection**: all rings into the plane's (u, v) frame and back ([`PlaneFrame::project`])
//! - **Triangulation**: constrained Delaunay triangulation with holes, faces
//!   classified by flood fill over an arena face table ([`ConstrainedTriangulator`])
//! - **Mesh assembly**: material faces back to 3D, winding matched to the
//!   exterior ring, appended per surface type ([`append_polygon`])
//!
//! Independently, [`append_polygon_edges`] emits wireframe segments and
//! [`Bounds3`] tracks the extent of every point seen.
//!
//! Failures are local: a bad ring or polygon yields an [`Error`] that the
//! caller counts before moving on to the next one.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use citygml_lite_geometry::{append_polygon, TessellationOptions, TriangleBuffers};
//! use citygml_lite_model::{Polygon, Ring, SurfaceType};
//!
//! let polygon = Polygon::new(Ring::from_coords(&[
//!     [0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 4.0, 0.0], [0.0, 4.0, 0.0],
//! ]));
//!
//! let mut buffers = TriangleBuffers::new();
//! let stats = append_polygon(&mut buffers, SurfaceType::ROOF, &polygon, &TessellationOptions::default())?;
//! println!("Generated {} triangles", stats.triangles);
//! ```

pub mod bounds;
pub mod edges;
pub mod error;
pub mod mesh;
pub mod options;
pub mod plane;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

// Re-export main types
pub use bounds::Bounds3;
pub use edges::{append_polygon_edges, append_ring_edges, segment_count, FLOATS_PER_SEGMENT};
pub use error::{Error, FailureKind, Result};
pub use mesh::{
    append_polygon, buffer_area, tessellate_polygon, triangle_count, PolygonTessellation,
    TriangleBuffers, FLOATS_PER_TRIANGLE,
};
pub use options::TessellationOptions;
pub use plane::{clean_ring, newell_normal, signed_area_2d, PlaneFrame};
pub use triangulation::{
    triangulate_polygon_with_holes, triangulate_with_snap_tolerance, ConstrainedTriangulation,
    ConstrainedTriangulator, FaceTable, FaceTag, RingKind, DEFAULT_SNAP_TOLERANCE,
};
