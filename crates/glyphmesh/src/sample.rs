//! Random glyph-like outlines (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic test and benchmark input: star-shaped outer contours with
//!   a mix of on-curve and conic points, optionally with a hole.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, walk them clockwise (TrueType outer winding). Each vertex
//!   after the first becomes a conic control with probability `conic_fraction`.
//! - The hole is the same construction at a quarter of the radius, counter-clockwise.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::outline::{FillRule, PointTag, RawOutline, RawPoint};

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radial jitter (relative amplitude). Radii = `base_radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub base_radius: f64,
    /// Probability that a vertex (other than the first) is a conic control point.
    pub conic_fraction: f64,
    /// Add an inner contour of opposite winding.
    pub hole: bool,
    /// Random global phase in [0, 2π)?
    pub random_phase: bool,
}
impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(12),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 100.0,
            conic_fraction: 0.5,
            hole: true,
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random outline: one clockwise outer contour, plus a counter-clockwise
/// hole when `cfg.hole` is set. The first point of every contour is on-curve.
pub fn draw_outline_radial(cfg: RadialCfg, tok: ReplayToken) -> RawOutline {
    let mut rng = tok.to_std_rng();
    let r0 = cfg.base_radius.max(1e-9);
    let mut contours = vec![draw_contour(&cfg, r0, &mut rng)];
    if cfg.hole {
        // Radial jitter is clamped to 1/3, which keeps a quarter-radius loop inside
        // the outer one for the default vertex counts.
        let mut inner = draw_contour(&cfg, 0.25 * r0, &mut rng);
        inner[1..].reverse();
        contours.push(inner);
    }
    RawOutline::from_contours(contours, FillRule::NonZero)
}

fn draw_contour<R: Rng>(cfg: &RadialCfg, r0: f64, rng: &mut R) -> Vec<RawPoint> {
    let n = cfg.vertex_count.sample(rng).max(3);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.33);
    let conic = cfg.conic_fraction.clamp(0.0, 1.0);
    let delta = 2.0 * std::f64::consts::PI / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * 2.0 * std::f64::consts::PI
    } else {
        0.0
    };
    // Descending angles: clockwise in a y-up frame.
    (0..n)
        .map(|k| {
            let base = phase - (k as f64) * delta;
            let th = base + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let r = (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj) * r0;
            let tag = if k > 0 && rng.gen_bool(conic) {
                PointTag::Conic
            } else {
                PointTag::On
            };
            RawPoint::new(th.cos() * r, th.sin() * r, tag)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::Contour;
    use crate::mesh::MeshCfg;
    use crate::vectoriser::Vectoriser;

    #[test]
    fn reproducible_draw() {
        let cfg = RadialCfg::default();
        let tok = ReplayToken { seed: 42, index: 7 };
        assert_eq!(draw_outline_radial(cfg, tok), draw_outline_radial(cfg, tok));
        let other = ReplayToken { seed: 42, index: 8 };
        assert_ne!(draw_outline_radial(cfg, tok), draw_outline_radial(cfg, other));
    }

    #[test]
    fn outer_is_clockwise_and_hole_is_not() {
        let cfg = RadialCfg {
            vertex_count: VertexCount::Uniform { min: 5, max: 20 },
            ..RadialCfg::default()
        };
        for index in 0..16 {
            let outline = draw_outline_radial(cfg, ReplayToken { seed: 3, index });
            assert_eq!(outline.contour_count(), 2);
            let contours: Vec<Contour> = outline.contours().map(Contour::from_raw).collect();
            assert!(contours[0].is_clockwise());
            assert!(!contours[1].is_clockwise());
            for c in outline.contours() {
                assert_eq!(c[0].tag, PointTag::On);
            }
        }
    }

    #[test]
    fn sampled_outlines_mesh_cleanly() {
        let cfg = RadialCfg::default();
        for index in 0..8 {
            let outline = draw_outline_radial(cfg, ReplayToken { seed: 11, index });
            let mut v = Vectoriser::with_outsets(&outline, 2.0, 2.0);
            assert!(v.contours()[1].is_hole());
            let mesh = v.make_mesh(MeshCfg::default());
            assert!(mesh.error().is_none(), "{:?}", mesh.error());
            assert!(mesh.area() > 0.0);
        }
    }
}
