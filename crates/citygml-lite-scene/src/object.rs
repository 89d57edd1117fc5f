// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! City objects and their derived render buffers

use crate::RegenerationReport;
use citygml_lite_geometry::{
    append_polygon, append_ring_edges, segment_count, triangle_count, Error,
    TessellationOptions, TriangleBuffers,
};
use citygml_lite_model::{FeatureRecord, ObjectType, Point3, Polygon, Ring, SurfaceType};
use std::collections::BTreeMap;

/// One city object: source polygons plus the buffers derived from them
///
/// Buffers are only ever rebuilt from scratch by the `regenerate_*`
/// methods, never patched.
#[derive(Clone, Debug, PartialEq)]
pub struct CityObject {
    id: String,
    object_type: ObjectType,
    polygons: BTreeMap<SurfaceType, Vec<Polygon>>,
    edge_rings: Vec<Ring>,
    triangles: TriangleBuffers,
    edges: Vec<f32>,
}

impl CityObject {
    /// Create an object without geometry
    pub fn new(id: impl Into<String>, object_type: ObjectType) -> Self {
        Self {
            id: id.into(),
            object_type,
            polygons: BTreeMap::new(),
            edge_rings: Vec::new(),
            triangles: TriangleBuffers::new(),
            edges: Vec::new(),
        }
    }

    /// Builder: append a polygon
    pub fn with_polygon(mut self, surface_type: SurfaceType, polygon: Polygon) -> Self {
        self.push_polygon(surface_type, polygon);
        self
    }

    /// Builder: append an edge-only ring
    pub fn with_edge_ring(mut self, ring: Ring) -> Self {
        self.push_edge_ring(ring);
        self
    }

    pub(crate) fn push_polygon(&mut self, surface_type: SurfaceType, polygon: Polygon) {
        self.polygons.entry(surface_type).or_default().push(polygon);
    }

    pub(crate) fn push_edge_ring(&mut self, ring: Ring) {
        self.edge_rings.push(ring);
    }

    /// Object identifier (`gml:id`, possibly empty)
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Feature class
    #[inline]
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Source polygons grouped by surface type
    #[inline]
    pub fn polygons(&self) -> &BTreeMap<SurfaceType, Vec<Polygon>> {
        &self.polygons
    }

    /// Edge-only rings
    #[inline]
    pub fn edge_rings(&self) -> &[Ring] {
        &self.edge_rings
    }

    /// Number of source polygons across all surface types
    pub fn polygon_count(&self) -> usize {
        self.polygons.values().map(Vec::len).sum()
    }

    /// Every source point, polygons first, then edge-only rings
    pub fn points(&self) -> impl Iterator<Item = &Point3<f64>> + '_ {
        self.polygons
            .values()
            .flatten()
            .flat_map(Polygon::points)
            .chain(self.edge_rings.iter().flat_map(|r| r.points.iter()))
    }

    /// Triangle buffers keyed by surface type
    #[inline]
    pub fn triangles(&self) -> &TriangleBuffers {
        &self.triangles
    }

    /// Triangle buffer of one surface type (empty if none was built)
    pub fn triangles_of(&self, surface_type: SurfaceType) -> &[f32] {
        self.triangles
            .get(&surface_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Edge buffer covering every ring of the object
    #[inline]
    pub fn edges(&self) -> &[f32] {
        &self.edges
    }

    /// Triangles across all surface types
    pub fn triangle_count(&self) -> usize {
        self.triangles.values().map(|b| triangle_count(b)).sum()
    }

    /// Edge segments
    pub fn segment_count(&self) -> usize {
        segment_count(&self.edges)
    }

    /// Clear and rebuild the triangle buffers from the current polygons
    ///
    /// A polygon that fails is logged and counted; its siblings are still
    /// tessellated.
    pub fn regenerate_triangles(&mut self, options: &TessellationOptions) -> RegenerationReport {
        let mut report = RegenerationReport {
            objects: 1,
            ..Default::default()
        };
        self.triangles.clear();

        for (&surface_type, polygons) in &self.polygons {
            for (i, polygon) in polygons.iter().enumerate() {
                match append_polygon(&mut self.triangles, surface_type, polygon, options) {
                    Ok(stats) => {
                        if stats.ambiguous_faces > 0 {
                            log::debug!(
                                "Object '{}' ({}), polygon {}: {}",
                                self.id,
                                surface_type,
                                i,
                                Error::ClassificationAmbiguous {
                                    faces: stats.ambiguous_faces
                                }
                            );
                        }
                        if stats.skipped_constraints > 0 {
                            log::debug!(
                                "Object '{}' ({}), polygon {}: {} boundary segments not enforced",
                                self.id,
                                surface_type,
                                i,
                                stats.skipped_constraints
                            );
                        }
                        report.record_polygon(&stats);
                    }
                    Err(e) => {
                        log::warn!(
                            "Object '{}' ({}), polygon {}: {}",
                            self.id,
                            surface_type,
                            i,
                            e
                        );
                        report.record_failure(e.kind());
                    }
                }
            }
        }

        report
    }

    /// Clear and rebuild the edge buffer from every ring of the object
    pub fn regenerate_edges(&mut self) -> RegenerationReport {
        let mut report = RegenerationReport {
            objects: 1,
            ..Default::default()
        };
        self.edges.clear();

        let rings = self
            .polygons
            .values()
            .flatten()
            .flat_map(Polygon::rings)
            .chain(self.edge_rings.iter());
        for ring in rings {
            let segments = append_ring_edges(ring, &mut self.edges);
            if segments == 0 {
                log::warn!(
                    "Object '{}': ring with {} points has no edges",
                    self.id,
                    ring.len()
                );
                report.skipped_edge_rings += 1;
            }
            report.segments += segments;
        }

        report
    }

    /// Rebuild triangles, and edges if requested, as one report
    ///
    /// Without edges the edge buffer is emptied, so it never describes
    /// older geometry than the triangles.
    pub fn regenerate(&mut self, options: &TessellationOptions, edges: bool) -> RegenerationReport {
        let mut report = self.regenerate_triangles(options);
        if edges {
            let edge_report = self.regenerate_edges();
            report.segments += edge_report.segments;
            report.skipped_edge_rings += edge_report.skipped_edge_rings;
        } else {
            self.edges.clear();
        }
        report
    }
}

impl From<FeatureRecord> for CityObject {
    fn from(record: FeatureRecord) -> Self {
        let mut object = CityObject::new(record.id, record.object_type);
        for (surface_type, polygon) in record.polygons {
            object.push_polygon(surface_type, polygon);
        }
        for ring in record.edge_rings {
            object.push_edge_ring(ring);
        }
        object
    }
}
