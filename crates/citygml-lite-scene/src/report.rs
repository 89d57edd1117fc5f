// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Regeneration outcome counters

use citygml_lite_geometry::{FailureKind, PolygonTessellation};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// What a regeneration pass produced and what it had to skip
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegenerationReport {
    /// Objects regenerated
    pub objects: usize,
    /// Polygons that produced triangles
    pub polygons: usize,
    /// Triangles emitted
    pub triangles: usize,
    /// Edge segments emitted
    pub segments: usize,
    /// Polygons dropped because their exterior ring was unusable
    pub invalid_rings: usize,
    /// Polygons dropped because no plane could be fitted
    pub degenerate_planes: usize,
    /// Polygons dropped because the triangulation failed
    pub triangulation_failures: usize,
    /// Faces tagged by best effort
    pub ambiguous_faces: usize,
    /// Boundary segments left out of triangulations
    pub skipped_constraints: usize,
    /// Holes dropped from otherwise valid polygons
    pub skipped_holes: usize,
    /// Rings too short to emit any edge segment
    pub skipped_edge_rings: usize,
    /// Triangles whose vertex order was reversed to follow the exterior ring
    pub flipped_triangles: usize,
}

impl RegenerationReport {
    /// Count one failed polygon
    pub fn record_failure(&mut self, kind: FailureKind) {
        match kind {
            FailureKind::InvalidRing => self.invalid_rings += 1,
            FailureKind::DegeneratePlane => self.degenerate_planes += 1,
            FailureKind::TriangulationFailure => self.triangulation_failures += 1,
            FailureKind::ClassificationAmbiguous => self.ambiguous_faces += 1,
        }
    }

    /// Count one tessellated polygon
    pub fn record_polygon(&mut self, stats: &PolygonTessellation) {
        self.polygons += 1;
        self.triangles += stats.triangles;
        self.ambiguous_faces += stats.ambiguous_faces;
        self.skipped_constraints += stats.skipped_constraints;
        self.skipped_holes += stats.skipped_holes;
        self.flipped_triangles += stats.flipped;
    }

    /// Polygons that produced no triangles
    pub fn failed_polygons(&self) -> usize {
        self.invalid_rings + self.degenerate_planes + self.triangulation_failures
    }

    /// True if nothing was skipped or guessed
    pub fn is_clean(&self) -> bool {
        self.failed_polygons() == 0
            && self.ambiguous_faces == 0
            && self.skipped_constraints == 0
            && self.skipped_holes == 0
            && self.skipped_edge_rings == 0
    }
}

impl AddAssign for RegenerationReport {
    fn add_assign(&mut self, other: Self) {
        self.objects += other.objects;
        self.polygons += other.polygons;
        self.triangles += other.triangles;
        self.segments += other.segments;
        self.invalid_rings += other.invalid_rings;
        self.degenerate_planes += other.degenerate_planes;
        self.triangulation_failures += other.triangulation_failures;
        self.ambiguous_faces += other.ambiguous_faces;
        self.skipped_constraints += other.skipped_constraints;
        self.skipped_holes += other.skipped_holes;
        self.skipped_edge_rings += other.skipped_edge_rings;
        self.flipped_triangles += other.flipped_triangles;
    }
}

impl Add for RegenerationReport {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Sum for RegenerationReport {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl fmt::Display for RegenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} objects, {} polygons, {} triangles, {} segments, {} failed polygons",
            self.objects,
            self.polygons,
            self.triangles,
            self.segments,
            self.failed_polygons()
        )
    }
}
