//! Outline → contours → mesh, for one glyph.
//!
//! Purpose
//! - Own the flattened `Contour`s of one `RawOutline` (one per raw contour,
//!   in order) and the mesh built from them.
//! - Resolve each contour's nesting parity before outsets are built, so that
//!   outsets grow the ink regardless of the font's winding convention.
//!
//! Invariants
//! - `contours.len() == outline.contour_count()`, in outline order. Outlines
//!   hold no empty contours (`RawOutline::new` rejects them and
//!   `RawOutline::from_contours` skips them), so contour `i` here is raw
//!   contour `i`.
//! - A mesh is only handed to the engine with >= 1 contour and >= 3 points;
//!   otherwise the stored mesh is empty and carries `DegenerateGeometry`.

use crate::contour::{Contour, OutsetDirection};
use crate::error::GeometryError;
use crate::mesh::{tesselate, Mesh, MeshCfg};
use crate::outline::{FillRule, RawOutline};
use crate::point::Point;

#[derive(Clone, Debug, Default)]
pub struct Vectoriser {
    contours: Vec<Contour>,
    fill_rule: FillRule,
    mesh: Option<Mesh>,
}

impl Vectoriser {
    /// Flatten every contour without outsets.
    pub fn new(outline: &RawOutline) -> Self {
        Self::with_outsets(outline, 0.0, 0.0)
    }

    /// Flatten every contour, resolve parities, then build both outset loops.
    /// A zero distance leaves that loop empty.
    pub fn with_outsets(outline: &RawOutline, front: f64, back: f64) -> Self {
        let mut contours: Vec<Contour> = outline.contours().map(Contour::from_raw).collect();
        let parities: Vec<usize> = (0..contours.len())
            .map(|i| nesting_parity(&contours, i))
            .collect();
        for (contour, parity) in contours.iter_mut().zip(parities) {
            contour.set_parity(parity);
            contour.build_outset(OutsetDirection::Front, front);
            contour.build_outset(OutsetDirection::Back, back);
        }
        Self {
            contours,
            fill_rule: outline.fill_rule(),
            mesh: None,
        }
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn contour(&self, index: usize) -> Option<&Contour> {
        self.contours.get(index)
    }

    #[inline]
    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    /// Flattened points over all contours.
    pub fn point_count(&self) -> usize {
        self.contours.iter().map(Contour::point_count).sum()
    }

    #[inline]
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Tesselate the contours into a fresh mesh (replacing any previous one).
    ///
    /// Never fails outright: problems are reported through `Mesh::error`.
    pub fn make_mesh(&mut self, cfg: MeshCfg) -> &Mesh {
        let (contours, points) = (self.contour_count(), self.point_count());
        let mesh = if contours < 1 || points < 3 {
            Mesh::failed(GeometryError::DegenerateGeometry { contours, points })
        } else {
            let rule = cfg.fill_rule.unwrap_or(self.fill_rule);
            tesselate(&self.contours, rule, cfg.z_normal, cfg.outset)
        };
        tracing::debug!(
            contours,
            points,
            batches = mesh.tesselation_count(),
            combined = mesh.combined().len(),
            "mesh built"
        );
        self.mesh.insert(mesh)
    }

    /// Mesh from the last `make_mesh`, if any.
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn take_mesh(&mut self) -> Option<Mesh> {
        self.mesh.take()
    }
}

/// Number of times a ray cast left from contour `index`'s leftmost point
/// crosses the other contours. Odd means the contour bounds a hole.
fn nesting_parity(contours: &[Contour], index: usize) -> usize {
    let Some(p) = contours[index].leftmost() else {
        return 0;
    };
    contours
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != index)
        .map(|(_, other)| ray_crossings(other.points(), p))
        .sum()
}

/// Edges of the closed loop crossing the horizontal ray from `p` toward -x.
///
/// Half-open in y, so a vertex exactly at the ray's height counts once.
fn ray_crossings(points: &[Point], p: Point) -> usize {
    let n = points.len();
    if n < 2 {
        return 0;
    }
    (0..n)
        .filter(|&i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            if (a.y < p.y) == (b.y < p.y) {
                return false;
            }
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            x < p.x
        })
        .count()
}
