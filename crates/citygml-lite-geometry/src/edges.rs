// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wireframe edge extraction
//!
//! Every ring contributes one segment per point, closing segment included,
//! as 6 floats `[x0,y0,z0, x1,y1,z1]`. Shared edges between neighbouring
//! polygons are not merged.

use citygml_lite_model::{Polygon, Ring};

/// Floats per segment in an edge buffer
pub const FLOATS_PER_SEGMENT: usize = 6;

/// Append the boundary segments of a ring
///
/// Rings with fewer than 3 points contribute nothing.
///
/// # Returns
/// Number of segments appended
pub fn append_ring_edges(ring: &Ring, edges: &mut Vec<f32>) -> usize {
    let start = edges.len();
    edges.reserve(ring.len() * FLOATS_PER_SEGMENT);
    for (a, b) in ring.segments() {
        edges.extend_from_slice(&[
            a.x as f32, a.y as f32, a.z as f32, b.x as f32, b.y as f32, b.z as f32,
        ]);
    }
    (edges.len() - start) / FLOATS_PER_SEGMENT
}

/// Append the segments of every ring of a polygon, exterior first
pub fn append_polygon_edges(polygon: &Polygon, edges: &mut Vec<f32>) -> usize {
    polygon
        .rings()
        .map(|ring| append_ring_edges(ring, edges))
        .sum()
}

/// Number of segments in a flat buffer
#[inline]
pub fn segment_count(edges: &[f32]) -> usize {
    edges.len() / FLOATS_PER_SEGMENT
}
