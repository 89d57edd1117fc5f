// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Constrained triangulation of holed polygons
//!
//! Boundary and hole edges go into a constrained Delaunay triangulation
//! (spade) as constraint edges. The resulting faces are copied into an
//! arena-indexed [`FaceTable`] and classified by a breadth-first flood fill
//! that starts at the unbounded outer face:
//!
//! - crossing an ordinary edge keeps the current tag
//! - crossing a constraint edge toggles `inside_exterior` for every exterior
//!   ring covering it and `inside_hole` for every hole covering it
//!
//! A face is material when it is inside the exterior and not inside a hole.
//! This is even/odd ray parity carried over triangulation adjacency, so
//! nested holes and holes touching the boundary need no special cases.
//!
//! Rings come from a projection and are rarely exact: a hole vertex that
//! lies on the exterior in 3D lands a rounding error off it in 2D. Before
//! insertion, near-coincident vertices are merged and vertices lying on
//! another ring's segment are inserted into it, all within a tolerance
//! relative to the boundary extent.

use crate::{Error, Point2, Result};
use rustc_hash::FxHashMap;
use spade::handles::FixedVertexHandle;
use spade::{ConstrainedDelaunayTriangulation, Triangulation as _};
use std::collections::VecDeque;

/// Role of a boundary ring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingKind {
    Exterior,
    Hole,
}

/// Which ring kinds a constraint edge belongs to, modulo 2
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Crossing {
    pub exterior: bool,
    pub hole: bool,
}

impl Crossing {
    /// Crossing of an unconstrained edge
    pub const NONE: Crossing = Crossing {
        exterior: false,
        hole: false,
    };

    /// Add one more ring of `kind` covering the edge
    #[inline]
    pub fn toggled(self, kind: RingKind) -> Self {
        match kind {
            RingKind::Exterior => Self {
                exterior: !self.exterior,
                ..self
            },
            RingKind::Hole => Self {
                hole: !self.hole,
                ..self
            },
        }
    }
}

/// Inside/outside state of a face
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceTag {
    pub inside_exterior: bool,
    pub inside_hole: bool,
}

impl FaceTag {
    /// Tag of the unbounded outer face
    pub const OUTSIDE: FaceTag = FaceTag {
        inside_exterior: false,
        inside_hole: false,
    };

    /// Tag after crossing an edge
    #[inline]
    pub fn crossed(self, crossing: Crossing) -> Self {
        Self {
            inside_exterior: self.inside_exterior ^ crossing.exterior,
            inside_hole: self.inside_hole ^ crossing.hole,
        }
    }

    /// Check if the face belongs to the polygon's surface
    #[inline]
    pub fn is_material(self) -> bool {
        self.inside_exterior && !self.inside_hole
    }
}

/// Adjacency link in the face table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceLink {
    /// Neighbouring face index
    pub face: usize,
    /// Tag change when crossing into that face
    pub crossing: Crossing,
}

/// Face table entry
#[derive(Clone, Debug, Default)]
pub struct FaceEntry {
    /// Triangle corners, `None` for the outer face
    pub corners: Option<[Point2<f64>; 3]>,
    pub links: Vec<FaceLink>,
}

/// Arena of triangulation faces with annotated adjacency
#[derive(Clone, Debug, Default)]
pub struct FaceTable {
    faces: Vec<FaceEntry>,
    outer: usize,
}

/// Result of flood-fill classification
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    /// Tag per face, `None` for faces unreachable from the outer face
    pub tags: Vec<Option<FaceTag>>,
    /// Adjacent face pairs whose tags disagree with their shared edge
    pub conflicts: usize,
}

impl FaceTable {
    /// Create a table with `face_count` empty entries
    pub fn with_faces(face_count: usize, outer: usize) -> Self {
        Self {
            faces: vec![FaceEntry::default(); face_count],
            outer,
        }
    }

    /// Number of faces, outer face included
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Check if the table has no faces
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Index of the unbounded outer face
    pub fn outer(&self) -> usize {
        self.outer
    }

    /// Face entry by index
    pub fn face(&self, index: usize) -> Option<&FaceEntry> {
        self.faces.get(index)
    }

    /// Set triangle corners of a bounded face
    pub fn set_corners(&mut self, face: usize, corners: [Point2<f64>; 3]) {
        self.faces[face].corners = Some(corners);
    }

    /// Add a directed adjacency link
    pub fn link(&mut self, from: usize, to: usize, crossing: Crossing) {
        self.faces[from].links.push(FaceLink { face: to, crossing });
    }

    /// Flood-fill tags from the outer face
    ///
    /// Uses a FIFO work list; every face is enqueued at most once. When a
    /// face is reachable under two different tags the first one wins and
    /// the disagreement is counted.
    pub fn classify(&self) -> Classification {
        let mut tags: Vec<Option<FaceTag>> = vec![None; self.faces.len()];
        let mut conflicts = 0;

        if self.faces.is_empty() {
            return Classification { tags, conflicts };
        }

        let mut queue = VecDeque::with_capacity(self.faces.len());
        tags[self.outer] = Some(FaceTag::OUTSIDE);
        queue.push_back(self.outer);

        while let Some(current) = queue.pop_front() {
            let Some(tag) = tags[current] else {
                continue;
            };
            for link in &self.faces[current].links {
                let expected = tag.crossed(link.crossing);
                match tags[link.face] {
                    None => {
                        tags[link.face] = Some(expected);
                        queue.push_back(link.face);
                    }
                    // Each disagreeing pair is seen from both sides
                    Some(existing) if existing != expected && current < link.face => {
                        conflicts += 1;
                    }
                    Some(_) => {}
                }
            }
        }

        Classification { tags, conflicts }
    }

    /// Corners of all material faces, in face index order
    pub fn material_triangles(&self, classification: &Classification) -> Vec<[Point2<f64>; 3]> {
        self.faces
            .iter()
            .zip(&classification.tags)
            .filter_map(|(face, tag)| match (face.corners, tag) {
                (Some(corners), Some(tag)) if tag.is_material() => Some(corners),
                _ => None,
            })
            .collect()
    }
}

/// Material faces of a constrained triangulation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstrainedTriangulation {
    /// Material triangles in plane coordinates
    pub triangles: Vec<[Point2<f64>; 3]>,
    /// Bounded faces in the triangulation (material or not)
    pub face_count: usize,
    /// Tag conflicts plus constraint edges with unknown ring membership
    pub ambiguous_faces: usize,
    /// Boundary segments not inserted because they cross another constraint
    pub skipped_constraints: usize,
}

/// Default snapping tolerance, relative to the boundary extent
pub const DEFAULT_SNAP_TOLERANCE: f64 = 1e-8;

struct BoundaryRing {
    kind: RingKind,
    points: Vec<Point2<f64>>,
}

#[inline]
fn edge_key(a: FixedVertexHandle, b: FixedVertexHandle) -> (usize, usize) {
    let (a, b) = (a.index(), b.index());
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Parameter of `p` along the open segment `a`-`b` if `p` lies within
/// `tolerance` of its interior
fn interior_parameter(
    a: &Point2<f64>,
    b: &Point2<f64>,
    p: &Point2<f64>,
    tolerance: f64,
) -> Option<f64> {
    if p == a || p == b {
        return None;
    }
    let d = b - a;
    let length_squared = d.norm_squared();
    if length_squared == 0.0 {
        return None;
    }
    let t = (p - a).dot(&d) / length_squared;
    if t <= 0.0 || t >= 1.0 {
        return None;
    }
    ((*p - (*a + d * t)).norm() <= tolerance).then_some(t)
}

/// Make near-coincident boundary geometry exactly coincident
///
/// Vertices within `tolerance` of an earlier vertex take its coordinates.
/// A vertex within `tolerance` of a segment's interior is then inserted
/// into that segment, so touching rings share vertices and edges instead of
/// crossing by a rounding error.
fn snap_rings(rings: &mut [BoundaryRing], tolerance: f64) {
    let mut vertices: Vec<Point2<f64>> = Vec::new();
    for ring in rings.iter_mut() {
        for p in ring.points.iter_mut() {
            match vertices.iter().copied().find(|v| (*v - *p).norm() <= tolerance) {
                Some(v) => *p = v,
                None => vertices.push(*p),
            }
        }
        ring.points.dedup();
        while ring.points.len() > 1 && ring.points.first() == ring.points.last() {
            ring.points.pop();
        }
    }

    for ring in rings.iter_mut() {
        let n = ring.points.len();
        if n < 2 {
            continue;
        }
        let mut refined = Vec::with_capacity(n);
        for i in 0..n {
            let (a, b) = (ring.points[i], ring.points[(i + 1) % n]);
            refined.push(a);
            let mut inner: Vec<(f64, Point2<f64>)> = vertices
                .iter()
                .filter_map(|v| interior_parameter(&a, &b, v, tolerance).map(|t| (t, *v)))
                .collect();
            inner.sort_by(|x, y| x.0.total_cmp(&y.0));
            refined.extend(inner.into_iter().map(|(_, v)| v));
        }
        ring.points = refined;
    }
}

/// Incremental builder for a constrained triangulation with holes
///
/// Rings are collected first. [`finish`](Self::finish) snaps them against
/// each other, inserts every vertex and only then the constraint edges, so
/// later vertices never split earlier constraints.
pub struct ConstrainedTriangulator {
    rings: Vec<BoundaryRing>,
    extent: f64,
    snap_tolerance: f64,
}

impl Default for ConstrainedTriangulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstrainedTriangulator {
    /// Create an empty triangulator
    pub fn new() -> Self {
        Self {
            rings: Vec::new(),
            extent: 0.0,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
        }
    }

    /// Set the snapping tolerance as a fraction of the boundary extent
    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }

    /// Add one closed boundary
    ///
    /// # Errors
    /// `Triangulation` if a coordinate is not finite
    pub fn add_ring(&mut self, points: &[Point2<f64>], kind: RingKind) -> Result<()> {
        if let Some(i) = points.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(Error::triangulation(format!(
                "non-finite coordinate at ring point {}",
                i
            )));
        }
        for p in points {
            self.extent = self.extent.max(p.x.abs()).max(p.y.abs());
        }
        self.rings.push(BoundaryRing {
            kind,
            points: points.to_vec(),
        });
        Ok(())
    }

    /// Snap the rings, insert vertices and constraints, build the face
    /// table and classify it
    ///
    /// # Errors
    /// `Triangulation` if a vertex cannot be inserted or the vertices span
    /// no bounded face
    pub fn finish(mut self) -> Result<ConstrainedTriangulation> {
        let tolerance = self.extent.max(1.0) * self.snap_tolerance;
        snap_rings(&mut self.rings, tolerance);

        let mut cdt: ConstrainedDelaunayTriangulation<spade::Point2<f64>> =
            ConstrainedDelaunayTriangulation::new();
        let mut ring_handles: Vec<Vec<FixedVertexHandle>> = Vec::with_capacity(self.rings.len());
        for ring in &self.rings {
            let mut handles = Vec::with_capacity(ring.points.len());
            for p in &ring.points {
                let handle = cdt
                    .insert(spade::Point2::new(p.x, p.y))
                    .map_err(|e| Error::triangulation(format!("{:?}", e)))?;
                handles.push(handle);
            }
            ring_handles.push(handles);
        }

        if cdt.num_inner_faces() == 0 {
            return Err(Error::triangulation("boundary spans no faces"));
        }

        // Ring membership of each boundary segment, keyed by its end
        // vertices. Segments that could not be inserted are left out.
        let mut coverage: FxHashMap<(usize, usize), Crossing> = FxHashMap::default();
        let mut skipped_constraints = 0;
        for (ring, handles) in self.rings.iter().zip(&ring_handles) {
            let n = handles.len();
            for i in 0..n {
                let (a, b) = (handles[i], handles[(i + 1) % n]);
                if a == b {
                    continue;
                }
                let inserted = cdt.get_edge_from_neighbors(a, b).is_some_and(|e| {
                    cdt.is_constraint_edge(e.as_undirected().fix())
                });
                if !inserted {
                    if !cdt.can_add_constraint(a, b) {
                        skipped_constraints += 1;
                        continue;
                    }
                    cdt.add_constraint(a, b);
                }
                let entry = coverage.entry(edge_key(a, b)).or_default();
                *entry = entry.toggled(ring.kind);
            }
        }

        if skipped_constraints > 0 {
            log::debug!(
                "Skipped {} self-intersecting boundary segments",
                skipped_constraints
            );
        }

        let mut unresolved = 0usize;
        let mut table =
            FaceTable::with_faces(cdt.num_all_faces(), cdt.outer_face().fix().index());
        let outer = table.outer();

        for face in cdt.inner_faces() {
            let index = face.fix().index();
            table.set_corners(
                index,
                face.vertices().map(|v| {
                    let p = v.position();
                    Point2::new(p.x, p.y)
                }),
            );

            for edge in face.adjacent_edges() {
                let neighbour = edge.rev().face().fix().index();
                let mut crossing = Crossing::NONE;

                if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                    match coverage.get(&edge_key(edge.from().fix(), edge.to().fix())) {
                        Some(c) => crossing = *c,
                        None => unresolved += 1,
                    }
                }

                table.link(index, neighbour, crossing);
                if neighbour == outer {
                    table.link(outer, index, crossing);
                }
            }
        }

        let classification = table.classify();
        // Unresolved edges are seen from both adjacent faces
        let ambiguous_faces = classification.conflicts + unresolved.div_ceil(2);
        if ambiguous_faces > 0 {
            log::debug!("Ambiguous classification on {} faces", ambiguous_faces);
        }

        Ok(ConstrainedTriangulation {
            triangles: table.material_triangles(&classification),
            face_count: cdt.num_inner_faces(),
            ambiguous_faces,
            skipped_constraints,
        })
    }
}

/// Triangulate an exterior boundary with holes
///
/// Returns the material triangles (inside the exterior, outside every hole)
/// as corner triples in the same 2D frame as the input.
///
/// # Errors
/// - `InvalidRing` if the exterior has fewer than 3 points
/// - `Triangulation` if the triangulation cannot be built
#[inline]
pub fn triangulate_polygon_with_holes(
    exterior: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<ConstrainedTriangulation> {
    triangulate_with_snap_tolerance(exterior, holes, DEFAULT_SNAP_TOLERANCE)
}

/// [`triangulate_polygon_with_holes`] with an explicit relative snapping
/// tolerance
pub fn triangulate_with_snap_tolerance(
    exterior: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
    snap_tolerance: f64,
) -> Result<ConstrainedTriangulation> {
    if exterior.len() < 3 {
        return Err(Error::invalid_ring(exterior.len()));
    }

    let mut triangulator = ConstrainedTriangulator::new().with_snap_tolerance(snap_tolerance);
    triangulator.add_ring(exterior, RingKind::Exterior)?;
    for hole in holes.iter().filter(|h| h.len() >= 3) {
        triangulator.add_ring(hole, RingKind::Hole)?;
    }
    triangulator.finish()
}

/// Signed area of a triangle (positive when counter-clockwise)
#[inline]
pub fn triangle_area_2d(corners: &[Point2<f64>; 3]) -> f64 {
    let [a, b, c] = corners;
    0.5 * ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x))
}
