// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon tessellation into flat triangle buffers
//!
//! Buffers are render-ready `f32` arrays, 9 floats per triangle
//! (`[x0,y0,z0, x1,y1,z1, x2,y2,z2, ...]`), one per surface type.

use crate::plane::{clean_ring, signed_area_2d, PlaneFrame};
use crate::triangulation::{triangle_area_2d, triangulate_with_snap_tolerance};
use crate::{Error, Point2, Point3, Result, TessellationOptions};
use citygml_lite_model::{Polygon, SurfaceType};
use std::collections::BTreeMap;

/// Floats per triangle in a triangle buffer
pub const FLOATS_PER_TRIANGLE: usize = 9;

/// Triangle buffers keyed by surface type
pub type TriangleBuffers = BTreeMap<SurfaceType, Vec<f32>>;

/// Outcome of tessellating one polygon
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolygonTessellation {
    /// Triangles emitted
    pub triangles: usize,
    /// Holes dropped because they had fewer than 3 usable points
    pub skipped_holes: usize,
    /// Ambiguously classified faces
    pub ambiguous_faces: usize,
    /// Boundary segments left out of the triangulation
    pub skipped_constraints: usize,
    /// Triangles whose vertex order was reversed to match the exterior ring
    pub flipped: usize,
}

/// Tessellate a polygon into a fresh triangle buffer
///
/// The exterior ring defines the plane; holes are projected into it. All
/// emitted triangles wind like the exterior ring.
///
/// # Errors
/// - `InvalidRing` if the exterior has fewer than 3 usable points or no area
/// - `DegeneratePlane` if the exterior is collinear
/// - `Triangulation` if the triangulation cannot be built
pub fn tessellate_polygon(
    polygon: &Polygon,
    options: &TessellationOptions,
) -> Result<(Vec<f32>, PolygonTessellation)> {
    let exterior = clean_ring(&polygon.exterior.points, options.merge_tolerance)?;
    let frame = PlaneFrame::fit(&exterior, options)?;
    let exterior_2d = frame.project_all(&exterior);

    let ring_area = signed_area_2d(&exterior_2d);
    let scale = exterior_2d
        .iter()
        .fold(0.0f64, |m, p| m.max(p.x.abs()).max(p.y.abs()));
    if !(ring_area.abs() > f64::EPSILON * scale * scale) {
        return Err(Error::invalid_ring(exterior.len()));
    }

    let mut stats = PolygonTessellation::default();
    let mut holes_2d: Vec<Vec<Point2<f64>>> = Vec::with_capacity(polygon.interiors.len());
    for hole in &polygon.interiors {
        match clean_ring(&hole.points, options.merge_tolerance) {
            Ok(points) => holes_2d.push(frame.project_all(&points)),
            Err(e) => {
                log::warn!("Skipping hole: {}", e);
                stats.skipped_holes += 1;
            }
        }
    }

    let triangulation =
        triangulate_with_snap_tolerance(&exterior_2d, &holes_2d, options.snap_tolerance)?;
    stats.ambiguous_faces = triangulation.ambiguous_faces;
    stats.skipped_constraints = triangulation.skipped_constraints;

    let counter_clockwise = ring_area > 0.0;
    let mut buffer = Vec::with_capacity(triangulation.triangles.len() * FLOATS_PER_TRIANGLE);
    for corners in &triangulation.triangles {
        let [a, mut b, mut c] = *corners;
        if (triangle_area_2d(corners) > 0.0) != counter_clockwise {
            std::mem::swap(&mut b, &mut c);
            stats.flipped += 1;
        }
        for corner in [a, b, c] {
            push_point(&mut buffer, &frame.unproject(&corner));
        }
    }
    stats.triangles = triangulation.triangles.len();

    Ok((buffer, stats))
}

/// Tessellate a polygon and append its triangles to the buffer of its
/// surface type
///
/// The buffer is created on first use. Triangles of one polygon are
/// appended contiguously; on error nothing is appended.
pub fn append_polygon(
    buffers: &mut TriangleBuffers,
    surface_type: SurfaceType,
    polygon: &Polygon,
    options: &TessellationOptions,
) -> Result<PolygonTessellation> {
    let (triangles, stats) = tessellate_polygon(polygon, options)?;
    if !triangles.is_empty() {
        buffers
            .entry(surface_type)
            .or_default()
            .extend_from_slice(&triangles);
    }
    Ok(stats)
}

#[inline]
fn push_point(buffer: &mut Vec<f32>, p: &Point3<f64>) {
    buffer.push(p.x as f32);
    buffer.push(p.y as f32);
    buffer.push(p.z as f32);
}

/// Number of triangles in a flat buffer
#[inline]
pub fn triangle_count(buffer: &[f32]) -> usize {
    buffer.len() / FLOATS_PER_TRIANGLE
}

/// Total surface area of a flat triangle buffer
pub fn buffer_area(buffer: &[f32]) -> f64 {
    buffer
        .chunks_exact(FLOATS_PER_TRIANGLE)
        .map(|t| {
            let p = |i: usize| Point3::new(t[i] as f64, t[i + 1] as f64, t[i + 2] as f64);
            let (a, b, c) = (p(0), p(3), p(6));
            (b - a).cross(&(c - a)).norm() * 0.5
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector3;
    use approx::assert_relative_eq;
    use nalgebra::Rotation3;
    use citygml_lite_model::Ring;

    fn options() -> TessellationOptions {
        TessellationOptions::default()
    }

    fn square_ring(size: f64, offset: f64) -> Ring {
        Ring::from_coords(&[
            [offset, offset, 0.0],
            [offset + size, offset, 0.0],
            [offset + size, offset + size, 0.0],
            [offset, offset + size, 0.0],
        ])
    }

    fn triangle_normals(buffer: &[f32]) -> Vec<Vector3<f64>> {
        buffer
            .chunks_exact(9)
            .map(|t| {
                let p = |i: usize| Vector3::new(t[i] as f64, t[i + 1] as f64, t[i + 2] as f64);
                (p(3) - p(0)).cross(&(p(6) - p(0))).normalize()
            })
            .collect()
    }

    #[test]
    fn test_convex_area_matches() {
        // Regular hexagon with circumradius 2
        let points: Vec<[f64; 3]> = (0..6)
            .map(|i| {
                let angle = std::f64::consts::PI / 3.0 * i as f64;
                [2.0 * angle.cos(), 2.0 * angle.sin(), 1.0]
            })
            .collect();
        let polygon = Polygon::new(Ring::from_coords(&points));
        let (buffer, stats) = tessellate_polygon(&polygon, &options()).unwrap();

        assert_eq!(stats.triangles, 4);
        assert_eq!(buffer.len() % 9, 0);
        let expected = 3.0 * 3.0f64.sqrt() / 2.0 * 4.0;
        assert_relative_eq!(buffer_area(&buffer), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_square_with_hole_area() {
        let polygon = Polygon::with_holes(square_ring(4.0, 0.0), vec![square_ring(2.0, 1.0)]);
        let (buffer, stats) = tessellate_polygon(&polygon, &options()).unwrap();
        assert_relative_eq!(buffer_area(&buffer), 12.0, epsilon = 1e-5);
        assert_eq!(stats.skipped_holes, 0);
    }

    #[test]
    fn test_winding_follows_exterior() {
        let ccw = Polygon::new(square_ring(4.0, 0.0));
        let (buffer, stats) = tessellate_polygon(&ccw, &options()).unwrap();
        for n in triangle_normals(&buffer) {
            assert_relative_eq!(n, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        }
        // The fitted frame already follows the ring, so nothing is reversed
        assert_eq!(stats.flipped, 0);

        let mut cw = ccw.clone();
        cw.exterior.points.reverse();
        let (buffer, stats) = tessellate_polygon(&cw, &options()).unwrap();
        assert_eq!(stats.flipped, 0);
        for n in triangle_normals(&buffer) {
            assert_relative_eq!(n, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_tilted_polygon_stays_on_plane() {
        // Roof plane z = 0.5 * x, with a closing point repeated
        let polygon = Polygon::new(Ring::from_coords(&[
            [0.0, 0.0, 0.0],
            [4.0, 0.0, 2.0],
            [4.0, 3.0, 2.0],
            [0.0, 3.0, 0.0],
            [0.0, 0.0, 0.0],
        ]));
        let (buffer, _) = tessellate_polygon(&polygon, &options()).unwrap();

        let expected = 3.0 * (16.0f64 + 4.0).sqrt();
        assert_relative_eq!(buffer_area(&buffer), expected, epsilon = 1e-5);
        for v in buffer.chunks_exact(3) {
            assert_relative_eq!(v[2] as f64, 0.5 * v[0] as f64, epsilon = 1e-5);
        }
    }

    /// Rotate a plan-view ring about x by 1.1 rad and z by 0.3 rad, then shift it
    fn tilted(coords: &[[f64; 3]], base: Vector3<f64>) -> Ring {
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), 0.3)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), 1.1);
        Ring::new(
            coords
                .iter()
                .map(|c| rotation * Point3::new(c[0], c[1], c[2]) + base)
                .collect(),
        )
    }

    #[test]
    fn test_tilted_hole_sharing_boundary_edge() {
        let exterior = [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 4.0, 0.0], [0.0, 4.0, 0.0]];
        let hole = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 2.0, 0.0], [0.0, 2.0, 0.0]];

        let at_origin = Polygon::with_holes(
            tilted(&exterior, Vector3::zeros()),
            vec![tilted(&hole, Vector3::zeros())],
        );
        let (buffer, stats) = tessellate_polygon(&at_origin, &options()).unwrap();
        assert_eq!(stats.skipped_constraints, 0);
        assert_eq!(stats.ambiguous_faces, 0);
        assert_relative_eq!(buffer_area(&buffer), 12.0, epsilon = 1e-4);

        // Projected CRS magnitudes: f32 output is too coarse for an area
        // check, so compare the topology instead
        let base = Vector3::new(85_123.4, 446_789.1, 12.5);
        let far = Polygon::with_holes(tilted(&exterior, base), vec![tilted(&hole, base)]);
        let (_, far_stats) = tessellate_polygon(&far, &options()).unwrap();
        assert_eq!(far_stats.skipped_constraints, 0);
        assert_eq!(far_stats.ambiguous_faces, 0);
        assert_eq!(far_stats.triangles, stats.triangles);
    }

    #[test]
    fn test_tilted_hole_touching_boundary_vertex() {
        let exterior = [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 4.0, 0.0], [0.0, 4.0, 0.0]];
        // (2,0) lies on the exterior edge (0,0)-(4,0)
        let hole = [[2.0, 0.0, 0.0], [3.0, 1.0, 0.0], [1.0, 1.0, 0.0]];
        let polygon = Polygon::with_holes(
            tilted(&exterior, Vector3::zeros()),
            vec![tilted(&hole, Vector3::zeros())],
        );
        let (buffer, stats) = tessellate_polygon(&polygon, &options()).unwrap();

        assert_eq!(stats.skipped_constraints, 0);
        assert_eq!(stats.ambiguous_faces, 0);
        assert_relative_eq!(buffer_area(&buffer), 15.0, epsilon = 1e-4);
    }

    #[test]
    fn test_invalid_exterior_appends_nothing() {
        let mut buffers = TriangleBuffers::new();
        let polygon = Polygon::new(Ring::from_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]));
        let result = append_polygon(&mut buffers, SurfaceType::ROOF, &polygon, &options());

        assert_eq!(result, Err(Error::invalid_ring(2)));
        assert!(buffers.is_empty());
    }

    #[test]
    fn test_invalid_hole_is_skipped() {
        let polygon = Polygon::with_holes(
            square_ring(4.0, 0.0),
            vec![Ring::from_coords(&[[1.0, 1.0, 0.0], [2.0, 1.0, 0.0]])],
        );
        let (buffer, stats) = tessellate_polygon(&polygon, &options()).unwrap();
        assert_eq!(stats.skipped_holes, 1);
        assert_relative_eq!(buffer_area(&buffer), 16.0, epsilon = 1e-5);
    }

    #[test]
    fn test_buffers_created_lazily_per_surface() {
        let mut buffers = TriangleBuffers::new();
        let polygon = Polygon::new(square_ring(1.0, 0.0));
        append_polygon(&mut buffers, SurfaceType::ROOF, &polygon, &options()).unwrap();
        append_polygon(&mut buffers, SurfaceType::ROOF, &polygon, &options()).unwrap();

        assert_eq!(buffers.len(), 1);
        assert_eq!(triangle_count(&buffers[&SurfaceType::ROOF]), 4);
        // Second polygon's triangles follow the first's
        assert_eq!(
            buffers[&SurfaceType::ROOF][..18],
            buffers[&SurfaceType::ROOF][18..]
        );
    }
}
