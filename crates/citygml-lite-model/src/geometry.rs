// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rings, polygons and feature records

use crate::{ObjectType, SurfaceType};
use nalgebra::Point3;

/// Closed boundary of 3D points
///
/// The last point implicitly connects back to the first. CityGML rings
/// usually repeat their first point at the end; both forms are accepted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ring {
    pub points: Vec<Point3<f64>>,
}

impl Ring {
    /// Create a ring from points
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    /// Create a ring from `[x, y, z]` triples
    pub fn from_coords(coords: &[[f64; 3]]) -> Self {
        Self {
            points: coords
                .iter()
                .map(|c| Point3::new(c[0], c[1], c[2]))
                .collect(),
        }
    }

    /// Number of points as stored
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the ring has no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check if the ring has enough points to enclose an area
    #[inline]
    pub fn is_closed_shape(&self) -> bool {
        self.points.len() >= 3
    }

    /// Iterate over boundary segments, including the closing one
    ///
    /// Yields nothing for rings with fewer than 3 points.
    pub fn segments(&self) -> impl Iterator<Item = (&Point3<f64>, &Point3<f64>)> + '_ {
        let n = if self.is_closed_shape() {
            self.points.len()
        } else {
            0
        };
        (0..n).map(move |i| (&self.points[i], &self.points[(i + 1) % n]))
    }
}

impl From<Vec<Point3<f64>>> for Ring {
    fn from(points: Vec<Point3<f64>>) -> Self {
        Self::new(points)
    }
}

/// Planar surface with optional holes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    /// Outer boundary
    pub exterior: Ring,
    /// Holes
    pub interiors: Vec<Ring>,
}

impl Polygon {
    /// Create a polygon without holes
    pub fn new(exterior: Ring) -> Self {
        Self {
            exterior,
            interiors: Vec::new(),
        }
    }

    /// Create a polygon with holes
    pub fn with_holes(exterior: Ring, interiors: Vec<Ring>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Add a hole
    pub fn add_interior(&mut self, ring: Ring) {
        self.interiors.push(ring);
    }

    /// Iterate over all rings, exterior first
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    /// Iterate over all points of all rings
    pub fn points(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.rings().flat_map(|r| r.points.iter())
    }
}

/// One top-level feature as delivered by a front end
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureRecord {
    /// Feature identifier (`gml:id`), may be empty
    pub id: String,
    /// Feature class
    pub object_type: ObjectType,
    /// Polygons tagged with their surface classification
    pub polygons: Vec<(SurfaceType, Polygon)>,
    /// Rings that only contribute wireframe edges
    pub edge_rings: Vec<Ring>,
}

impl FeatureRecord {
    /// Create an empty record
    pub fn new(id: impl Into<String>, object_type: ObjectType) -> Self {
        Self {
            id: id.into(),
            object_type,
            polygons: Vec::new(),
            edge_rings: Vec::new(),
        }
    }

    /// Builder-style polygon append
    pub fn with_polygon(mut self, surface_type: SurfaceType, polygon: Polygon) -> Self {
        self.polygons.push((surface_type, polygon));
        self
    }

    /// Builder-style edge ring append
    pub fn with_edge_ring(mut self, ring: Ring) -> Self {
        self.edge_rings.push(ring);
        self
    }

    /// Number of polygons across all surface types
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }
}
