//! Joint angle calculation using the dot product.
//!
//! The angle at a vertex is measured between the rays vertex→p1 and
//! vertex→p3: cos(θ) = (a · b) / (|a| × |b|).

use serde::{Deserialize, Serialize};

/// Rays shorter than this are treated as zero length.
const MIN_RAY_LENGTH: f64 = 1e-9;

/// A 2D position in normalized image space (0..1 per axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Angle at `vertex` in degrees, in `[0, 180]`.
///
/// Returns `None` when any point is absent or non-finite, or when the vertex
/// coincides with one of the reference points. Callers record nothing for the
/// frame in that case; `None` is never a 0° reading.
pub fn angle_at(p1: Option<Point>, vertex: Option<Point>, p3: Option<Point>) -> Option<f64> {
    let (p1, vertex, p3) = (p1?, vertex?, p3?);
    if !(p1.is_finite() && vertex.is_finite() && p3.is_finite()) {
        return None;
    }

    let a = (p1.x - vertex.x, p1.y - vertex.y);
    let b = (p3.x - vertex.x, p3.y - vertex.y);

    let mag_a = a.0.hypot(a.1);
    let mag_b = b.0.hypot(b.1);
    if mag_a < MIN_RAY_LENGTH || mag_b < MIN_RAY_LENGTH {
        return None;
    }

    let dot = a.0 * b.0 + a.1 * b.1;
    let cos_angle = (dot / (mag_a * mag_b)).clamp(-1.0, 1.0);
    let degrees = cos_angle.acos().to_degrees();

    degrees.is_finite().then_some(degrees)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Option<Point> {
        Some(Point::new(x, y))
    }

    #[test]
    fn straight_line_is_180() {
        let angle = angle_at(p(0.0, 0.0), p(0.5, 0.0), p(1.0, 0.0)).unwrap();
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn right_angle_is_90() {
        let angle = angle_at(p(0.0, 0.0), p(0.5, 0.0), p(0.5, 0.5)).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_rays_are_zero() {
        let angle = angle_at(p(0.9, 0.5), p(0.5, 0.5), p(0.7, 0.5)).unwrap();
        assert!(angle.abs() < 1e-9);
    }

    #[test]
    fn symmetric_in_outer_points() {
        let triples = [
            ((0.1, 0.2), (0.4, 0.4), (0.9, 0.1)),
            ((0.3, 0.8), (0.5, 0.5), (0.2, 0.1)),
            ((0.0, 1.0), (0.6, 0.3), (0.61, 0.95)),
        ];
        for (a, v, c) in triples {
            let forward = angle_at(p(a.0, a.1), p(v.0, v.1), p(c.0, c.1)).unwrap();
            let backward = angle_at(p(c.0, c.1), p(v.0, v.1), p(a.0, a.1)).unwrap();
            assert_eq!(forward, backward);
            assert!((0.0..=180.0).contains(&forward));
        }
    }

    #[test]
    fn missing_point_is_undefined() {
        assert_eq!(angle_at(None, p(0.5, 0.5), p(1.0, 0.0)), None);
        assert_eq!(angle_at(p(0.0, 0.0), None, p(1.0, 0.0)), None);
        assert_eq!(angle_at(p(0.0, 0.0), p(0.5, 0.5), None), None);
    }

    #[test]
    fn degenerate_triple_is_undefined() {
        assert_eq!(angle_at(p(0.5, 0.5), p(0.5, 0.5), p(1.0, 0.0)), None);
        assert_eq!(angle_at(p(0.0, 0.0), p(0.5, 0.5), p(0.5, 0.5)), None);
    }

    #[test]
    fn non_finite_coordinates_are_undefined() {
        assert_eq!(angle_at(p(f64::NAN, 0.0), p(0.5, 0.5), p(1.0, 0.0)), None);
        assert_eq!(
            angle_at(p(0.0, 0.0), p(f64::INFINITY, 0.5), p(1.0, 0.0)),
            None
        );
    }
}
