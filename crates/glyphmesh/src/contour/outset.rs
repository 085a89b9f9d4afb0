//! Offset loops for extrusion rims.
//!
//! Each vertex B (predecessor A, successor C) moves along the bisector of the
//! two incident edge normals so that both offset edges sit at the requested
//! perpendicular distance. With unit right-hand normals `n1`, `n2` and
//! `m = n1 + n2`, the shift is `m * 2d / |m|²`, i.e. `d / sin(θ/2)` along the
//! bisector where θ is the angle at B between the edges.

use nalgebra::Vector2;

use crate::point::Point;

/// Below this `|n1 + n2|²` the edges fold back onto each other (spike).
const MIN_BISECTOR_NORM_SQ: f64 = 1e-12;

/// Unit right-hand normal `(dy, -dx) / |d|`, or `None` for a zero-length edge.
#[inline]
fn unit_normal(from: Point, to: Point) -> Option<Vector2<f64>> {
    let d = Vector2::new(to.x - from.x, to.y - from.y);
    let len = d.norm();
    if !len.is_finite() || len <= 0.0 {
        return None;
    }
    Some(Vector2::new(d.y, -d.x) / len)
}

/// Offset `b` by signed `distance` to the right of travel `a → b → c`.
pub(super) fn outset_point(a: Point, b: Point, c: Point, distance: f64) -> Point {
    let shift = match (unit_normal(a, b), unit_normal(b, c)) {
        (Some(n1), Some(n2)) => {
            let m = n1 + n2;
            let m2 = m.norm_squared();
            if m2 <= MIN_BISECTOR_NORM_SQ {
                n1 * distance
            } else {
                m * (2.0 * distance / m2)
            }
        }
        (Some(n), None) | (None, Some(n)) => n * distance,
        (None, None) => Vector2::zeros(),
    };
    Point::new(b.x + shift.x, b.y + shift.y, b.z)
}

/// Offset every vertex of a closed loop. Empty for `distance == 0` or < 2 points.
pub(super) fn outset_loop(points: &[Point], distance: f64) -> Vec<Point> {
    let n = points.len();
    if distance == 0.0 || n < 2 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            outset_point(prev, points[i], next, distance)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::point;

    #[test]
    fn right_angle_corner_moves_diagonally() {
        // Travel east then north (left turn): right side is outside the corner.
        let p = outset_point(point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0), 1.0);
        assert!((p.x - 11.0).abs() < 1e-12);
        assert!((p.y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_edges_shift_perpendicular() {
        let p = outset_point(point(0.0, 0.0), point(5.0, 0.0), point(10.0, 0.0), 2.0);
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!((p.y + 2.0).abs() < 1e-12);
    }

    #[test]
    fn spike_falls_back_to_incoming_edge() {
        let p = outset_point(point(0.0, 0.0), point(5.0, 0.0), point(0.0, 0.0), 1.0);
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!((p.y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_length_edge_uses_other_edge() {
        let p = outset_point(point(5.0, 0.0), point(5.0, 0.0), point(5.0, 10.0), 1.0);
        assert!((p.x - 6.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
        let q = outset_point(point(1.0, 1.0), point(1.0, 1.0), point(1.0, 1.0), 1.0);
        assert_eq!(q, point(1.0, 1.0));
    }

    #[test]
    fn offset_edges_keep_requested_distance() {
        // Acute corner: the offset edge lines stay exactly `d` away from the originals.
        let (a, b, c) = (point(0.0, 0.0), point(10.0, 0.0), point(2.0, 6.0));
        let d = 0.75;
        let o = outset_point(a, b, c, d);
        let n1 = unit_normal(a, b).unwrap();
        let n2 = unit_normal(b, c).unwrap();
        let rel = Vector2::new(o.x - b.x, o.y - b.y);
        assert!((rel.dot(&n1) - d).abs() < 1e-9);
        assert!((rel.dot(&n2) - d).abs() < 1e-9);
    }

    #[test]
    fn zero_distance_is_empty() {
        let pts = [point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0)];
        assert!(outset_loop(&pts, 0.0).is_empty());
        assert!(outset_loop(&pts[..1], 3.0).is_empty());
        assert_eq!(outset_loop(&pts, 0.5).len(), 3);
    }
}
