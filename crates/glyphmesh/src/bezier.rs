//! Fixed-step Bézier sampling (de Casteljau).
//!
//! Every segment is sampled at `t = i * BEZIER_STEP` for `i = 0..=5`, so both
//! endpoints are always emitted and reproduced exactly. The samples are a pure
//! function of the control points.

use crate::point::{lerp, Point};

/// Parameter step between two samples.
pub const BEZIER_STEP: f64 = 0.2;

/// Samples per segment, endpoints included.
pub const SAMPLES_PER_SEGMENT: usize = 6;

#[inline]
fn step(i: usize) -> f64 {
    i as f64 * BEZIER_STEP
}

/// Quadratic (conic) segment `a → c` with control `b`.
pub fn quadratic(a: Point, b: Point, c: Point) -> [Point; SAMPLES_PER_SEGMENT] {
    std::array::from_fn(|i| {
        let t = step(i);
        let ab = lerp(a, b, t);
        let bc = lerp(b, c, t);
        lerp(ab, bc, t)
    })
}

/// Cubic segment `a → d` with controls `b`, `c`.
pub fn cubic(a: Point, b: Point, c: Point, d: Point) -> [Point; SAMPLES_PER_SEGMENT] {
    std::array::from_fn(|i| {
        let t = step(i);
        let ab = lerp(a, b, t);
        let bc = lerp(b, c, t);
        let cd = lerp(c, d, t);
        let abc = lerp(ab, bc, t);
        let bcd = lerp(bc, cd, t);
        lerp(abc, bcd, t)
    })
}
