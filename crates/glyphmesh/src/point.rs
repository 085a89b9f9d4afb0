//! Point primitive shared by every stage of the pipeline.
//!
//! - `Point` is a plain `nalgebra::Vector3<f64>`; contours live in the z = 0
//!   plane, extrusion moves back faces along z.
//! - Equality is exact (`==`), never eps-based: dedup relies on the curve
//!   evaluator reproducing endpoints bit-for-bit.

use nalgebra::{Vector2, Vector3};

/// 3D point with f64 coordinates.
pub type Point = Vector3<f64>;

/// Point in the z = 0 plane.
#[inline]
pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y, 0.0)
}

/// Lift a 2D outline coordinate into the z = 0 plane.
#[inline]
pub fn lift(p: Vector2<f64>) -> Point {
    Point::new(p.x, p.y, 0.0)
}

/// First-order interpolation `(1 - t) a + t b`.
///
/// Exact at both ends for finite inputs: `t = 0` returns `a`, `t = 1` returns `b`.
#[inline]
pub fn lerp(a: Point, b: Point, t: f64) -> Point {
    a * (1.0 - t) + b * t
}

#[inline]
pub fn midpoint(a: Point, b: Point) -> Point {
    (a + b) * 0.5
}

/// z-component of `a × b` for the xy-projections.
#[inline]
pub fn cross2(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Shoelace signed area of a closed loop (xy-projection).
/// Positive for counter-clockwise loops in a y-up frame.
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        twice += cross2(points[i], points[(i + 1) % n]);
    }
    0.5 * twice
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints_exactly() {
        let a = point(0.1, -7.3);
        let b = point(1e6 / 3.0, 2.2);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
    }

    #[test]
    fn signed_area_orientation() {
        let ccw = [point(0.0, 0.0), point(2.0, 0.0), point(2.0, 1.0), point(0.0, 1.0)];
        assert!((signed_area(&ccw) - 2.0).abs() < 1e-12);
        let cw: Vec<Point> = ccw.iter().rev().copied().collect();
        assert!((signed_area(&cw) + 2.0).abs() < 1e-12);
        assert_eq!(signed_area(&ccw[..2]), 0.0);
    }
}
