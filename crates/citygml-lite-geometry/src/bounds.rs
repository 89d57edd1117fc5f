// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Running axis-aligned bounds

use crate::{Point3, Vector3};

/// Component-wise min/max over every point ingested
///
/// Starts at +inf/-inf sentinels and only grows until [`reset`](Self::reset).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Default for Bounds3 {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds3 {
    /// Create empty bounds
    pub const fn new() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    /// Check if no point has been ingested
    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    /// Ingest one point; non-finite points are ignored
    #[inline]
    pub fn include(&mut self, point: &Point3<f64>) {
        if !point.coords.iter().all(|c| c.is_finite()) {
            return;
        }
        for i in 0..3 {
            self.min[i] = self.min[i].min(point[i]);
            self.max[i] = self.max[i].max(point[i]);
        }
    }

    /// Ingest many points
    pub fn include_all<'a>(&mut self, points: impl IntoIterator<Item = &'a Point3<f64>>) {
        for p in points {
            self.include(p);
        }
    }

    /// Grow to cover another bounds
    pub fn merge(&mut self, other: &Bounds3) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(other.min[i]);
            self.max[i] = self.max[i].max(other.max[i]);
        }
    }

    /// Back to the empty sentinels
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Center point, `None` when empty
    pub fn center(&self) -> Option<Point3<f64>> {
        if self.is_empty() {
            return None;
        }
        Some(Point3::new(
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ))
    }

    /// Extent along each axis, zero when empty
    pub fn size(&self) -> Vector3<f64> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        Vector3::new(
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        )
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }
}
