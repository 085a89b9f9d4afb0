//! Polygon meshes: tagged primitive batches plus synthesized vertices.
//!
//! Purpose
//! - `Tesselation`: one primitive batch (triangle list, fan, strip or line
//!   loop). Filled while open, read-only once handed out.
//! - `Mesh`: the batches of one tesselation run, the `combined` points the
//!   engine invented at edge crossings, and the first error it reported.
//!
//! Code cross-refs: `accumulator::MeshAccumulator` (event sink that fills a
//! mesh), `tessellator::tesselate` (drives the sweep-line engine).

mod accumulator;
mod tessellator;

pub use accumulator::{MeshAccumulator, VertexRef};
pub use tessellator::{tesselate, MeshCfg, OutsetSelector, ZNormal};

use nalgebra::Vector2;

use crate::error::GeometryError;
use crate::point::{cross2, Point};

/// Primitive kind of a batch, as a renderer draws it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Triangles,
    TriangleFan,
    TriangleStrip,
    LineLoop,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tesselation {
    kind: PrimitiveKind,
    points: Vec<Point>,
}

impl Tesselation {
    pub(crate) fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            points: Vec::with_capacity(128),
        }
    }

    pub(crate) fn from_points(kind: PrimitiveKind, points: Vec<Point>) -> Self {
        Self { kind, points }
    }

    #[inline]
    pub(crate) fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    #[inline]
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Expand the batch into independent triangles (empty for line loops).
    ///
    /// Strips alternate winding so every triangle keeps the strip's orientation.
    pub fn triangles(&self) -> Vec<[Point; 3]> {
        let p = &self.points;
        match self.kind {
            PrimitiveKind::Triangles => p.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect(),
            PrimitiveKind::TriangleFan => (1..p.len().saturating_sub(1))
                .map(|k| [p[0], p[k], p[k + 1]])
                .collect(),
            PrimitiveKind::TriangleStrip => (0..p.len().saturating_sub(2))
                .map(|k| {
                    if k % 2 == 0 {
                        [p[k], p[k + 1], p[k + 2]]
                    } else {
                        [p[k + 1], p[k], p[k + 2]]
                    }
                })
                .collect(),
            PrimitiveKind::LineLoop => Vec::new(),
        }
    }

    /// Texture coordinates from raw coordinates divided by per-axis scales.
    pub fn tex_coords(&self, h_scale: f64, v_scale: f64) -> Vec<Vector2<f64>> {
        self.points
            .iter()
            .map(|p| Vector2::new(p.x / h_scale, p.y / v_scale))
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    tesselations: Vec<Tesselation>,
    combined: Vec<Point>,
    error: Option<GeometryError>,
}

impl Mesh {
    /// Empty mesh carrying an error.
    pub(crate) fn failed(err: GeometryError) -> Self {
        Self {
            error: Some(err),
            ..Self::default()
        }
    }

    pub fn tesselations(&self) -> &[Tesselation] {
        &self.tesselations
    }

    #[inline]
    pub fn tesselation_count(&self) -> usize {
        self.tesselations.len()
    }

    pub fn tesselation(&self, index: usize) -> Option<&Tesselation> {
        self.tesselations.get(index)
    }

    /// Points synthesized at edge crossings.
    pub fn combined(&self) -> &[Point] {
        &self.combined
    }

    /// First error reported while building this mesh.
    pub fn error(&self) -> Option<&GeometryError> {
        self.error.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.tesselations.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.tesselations.iter().map(Tesselation::point_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.tesselations.iter().map(|t| t.triangles().len()).sum()
    }

    /// Total unsigned triangle area (xy-projection).
    pub fn area(&self) -> f64 {
        self.tesselations
            .iter()
            .flat_map(|t| t.triangles())
            .map(|[a, b, c]| 0.5 * cross2(b - a, c - a).abs())
            .sum()
    }

    /// Move every point (batches and combined) to depth `z`.
    pub(crate) fn set_depth(&mut self, z: f64) {
        let batches = self.tesselations.iter_mut().flat_map(|t| t.points.iter_mut());
        for p in batches.chain(self.combined.iter_mut()) {
            p.z = z;
        }
    }

    pub(crate) fn record_error(&mut self, err: GeometryError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}
