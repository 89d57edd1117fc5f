// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Best-fit planes and 3D/2D projection
//!
//! A polygon's exterior ring gets a least-squares plane: the centroid is the
//! origin and the covariance eigenvector with the smallest eigenvalue is the
//! normal. All rings of the polygon are then projected into that plane's
//! (u, v) frame for triangulation and mapped back afterwards.

use crate::{Error, Point2, Point3, Result, TessellationOptions, Vector3};
use nalgebra::{Matrix3, SymmetricEigen};

/// Remove degenerate points from a ring
///
/// Drops consecutive duplicates and a closing point equal to the first one.
///
/// # Errors
/// - `NonFiniteCoordinate` if a coordinate is NaN or infinite
/// - `InvalidRing` if fewer than 3 points remain
pub fn clean_ring(points: &[Point3<f64>], tolerance: f64) -> Result<Vec<Point3<f64>>> {
    if let Some(index) = points
        .iter()
        .position(|p| !p.coords.iter().all(|c| c.is_finite()))
    {
        return Err(Error::NonFiniteCoordinate { index });
    }

    let mut cleaned: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        match cleaned.last() {
            Some(last) if (p - last).norm() <= tolerance => {}
            _ => cleaned.push(*p),
        }
    }

    while cleaned.len() > 1 && (cleaned[cleaned.len() - 1] - cleaned[0]).norm() <= tolerance {
        cleaned.pop();
    }

    if cleaned.len() < 3 {
        return Err(Error::invalid_ring(cleaned.len()));
    }

    Ok(cleaned)
}

/// Newell normal of a closed polygon (not normalized)
///
/// Its direction follows the ring's winding by the right-hand rule; its
/// length is twice the polygon area.
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut normal = Vector3::<f64>::zeros();

    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    normal
}

/// Plane with an orthonormal in-plane frame
///
/// `u`, `v` and `normal` form a right-handed basis (`u × v = normal`).
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneFrame {
    origin: Point3<f64>,
    u_axis: Vector3<f64>,
    v_axis: Vector3<f64>,
    normal: Vector3<f64>,
}

impl PlaneFrame {
    /// Fit a least-squares plane through cleaned ring points
    ///
    /// The normal is oriented along the ring's Newell normal so the ring
    /// winds counter-clockwise in (u, v) whenever that is well defined.
    ///
    /// # Errors
    /// - `InvalidRing` for fewer than 3 points
    /// - `DegeneratePlane` if the points coincide or are collinear
    pub fn fit(points: &[Point3<f64>], options: &TessellationOptions) -> Result<Self> {
        let n = points.len();
        if n < 3 {
            return Err(Error::invalid_ring(n));
        }

        let centroid = points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / n as f64;

        let mut covariance = Matrix3::<f64>::zeros();
        for p in points {
            let d = p.coords - centroid;
            covariance += d * d.transpose();
        }

        let eigen = SymmetricEigen::new(covariance);
        let values = eigen.eigenvalues;
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        let [smallest, middle, largest] = order;

        if !(values[largest] > 0.0) {
            return Err(Error::degenerate_plane("all points coincide"));
        }
        if values[middle] <= options.collinear_tolerance * values[largest] {
            return Err(Error::degenerate_plane("points are collinear"));
        }

        let mut normal = eigen.eigenvectors.column(smallest).into_owned().normalize();
        if newell_normal(points).dot(&normal) < 0.0 {
            normal = -normal;
        }

        let major = eigen.eigenvectors.column(largest).into_owned();
        let u_axis = (major - normal * normal.dot(&major)).normalize();
        let v_axis = normal.cross(&u_axis);

        if !(u_axis.iter().chain(v_axis.iter()).all(|c| c.is_finite())) {
            return Err(Error::degenerate_plane("no stable in-plane axis"));
        }

        Ok(Self {
            origin: Point3::from(centroid),
            u_axis,
            v_axis,
            normal,
        })
    }

    /// Plane origin (centroid of the fitted points)
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Unit normal
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// First in-plane axis
    #[inline]
    pub fn u_axis(&self) -> Vector3<f64> {
        self.u_axis
    }

    /// Second in-plane axis
    #[inline]
    pub fn v_axis(&self) -> Vector3<f64> {
        self.v_axis
    }

    /// Signed distance of a point from the plane
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.origin).dot(&self.normal)
    }

    /// Project a point into plane coordinates, dropping its normal offset
    #[inline]
    pub fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        let v = point - self.origin;
        Point2::new(v.dot(&self.u_axis), v.dot(&self.v_axis))
    }

    /// Map plane coordinates back to the on-plane 3D point
    #[inline]
    pub fn unproject(&self, point: &Point2<f64>) -> Point3<f64> {
        self.origin + self.u_axis * point.x + self.v_axis * point.y
    }

    /// Project a whole ring
    pub fn project_all(&self, points: &[Point3<f64>]) -> Vec<Point2<f64>> {
        points.iter().map(|p| self.project(p)).collect()
    }
}

/// Signed area of a closed 2D ring (positive when counter-clockwise)
pub fn signed_area_2d(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        twice_area += a.x * b.y - b.x * a.y;
    }
    twice_area * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;
    use approx::assert_relative_eq;

    fn options() -> TessellationOptions {
        TessellationOptions::default()
    }

    #[test]
    fn test_clean_ring_drops_closing_and_duplicates() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let cleaned = clean_ring(&points, 1e-9).unwrap();
        assert_eq!(cleaned.len(), 3);
    }

    #[test]
    fn test_clean_ring_too_short() {
        let points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert_eq!(clean_ring(&points, 1e-9), Err(Error::invalid_ring(2)));
    }

    #[test]
    fn test_clean_ring_rejects_nan() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(f64::NAN, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let error = clean_ring(&points, 1e-9).unwrap_err();
        assert_eq!(error, Error::NonFiniteCoordinate { index: 1 });
        assert_eq!(error.kind(), FailureKind::InvalidRing);
        assert_eq!(
            error.to_string(),
            "Invalid ring: non-finite coordinate at point 1"
        );
    }

    #[test]
    fn test_fit_horizontal_square() {
        let points = vec![
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(4.0, 0.0, 2.0),
            Point3::new(4.0, 4.0, 2.0),
            Point3::new(0.0, 4.0, 2.0),
        ];
        let frame = PlaneFrame::fit(&points, &options()).unwrap();

        assert_relative_eq!(frame.normal(), Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(frame.origin(), Point3::new(2.0, 2.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(frame.u_axis().dot(&frame.v_axis()), 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            frame.u_axis().cross(&frame.v_axis()),
            frame.normal(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_fit_follows_ring_orientation() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
            Point3::new(4.0, 4.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
        ];
        let frame = PlaneFrame::fit(&points, &options()).unwrap();
        assert_relative_eq!(frame.normal(), Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
        assert!(signed_area_2d(&frame.project_all(&points)) > 0.0);
    }

    #[test]
    fn test_fit_collinear_is_degenerate() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
            Point3::new(3.0, 3.0, 3.0),
        ];
        assert!(matches!(
            PlaneFrame::fit(&points, &options()),
            Err(Error::DegeneratePlane(_))
        ));
    }

    #[test]
    fn test_project_unproject_on_plane() {
        let points = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let frame = PlaneFrame::fit(&points, &options()).unwrap();

        let on_plane = Point3::new(0.25, 0.25, 0.5);
        assert_relative_eq!(frame.signed_distance(&on_plane), 0.0, epsilon = 1e-12);
        let back = frame.unproject(&frame.project(&on_plane));
        assert_relative_eq!(back, on_plane, epsilon = 1e-12);
    }

    #[test]
    fn test_project_drops_normal_offset() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let frame = PlaneFrame::fit(&points, &options()).unwrap();

        let above = Point3::new(0.3, 0.7, 5.0);
        let back = frame.unproject(&frame.project(&above));
        assert_relative_eq!(back, Point3::new(0.3, 0.7, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_fit_large_coordinates() {
        // Typical projected CRS magnitudes
        let base = Vector3::new(85_000.0, 446_000.0, 10.0);
        let points: Vec<_> = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [10.0, 0.0, 6.0], [0.0, 0.0, 6.0]]
            .iter()
            .map(|c| Point3::new(c[0], c[1], c[2]) + base)
            .collect();
        let frame = PlaneFrame::fit(&points, &options()).unwrap();
        assert_relative_eq!(frame.normal().y.abs(), 1.0, epsilon = 1e-9);
        for p in &points {
            assert_relative_eq!(frame.unproject(&frame.project(p)), *p, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_newell_normal_area() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 3.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        ];
        assert_relative_eq!(newell_normal(&points), Vector3::new(0.0, 0.0, 12.0));
    }
}
