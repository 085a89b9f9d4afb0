//! Event sink for a tesselation run.
//!
//! The engine reports its output as a small protocol: `begin(kind)`, any
//! number of `vertex(v)`, `end()`; `combine(p)` whenever it invents a vertex
//! at an edge crossing; `error(e)` on faults. The accumulator owns the mesh
//! under construction and resolves vertex identities back to the exact stored
//! points of the input loops.

use super::tessellator::ZNormal;
use super::{Mesh, PrimitiveKind, Tesselation};
use crate::error::GeometryError;
use crate::point::Point;

/// Identity of a vertex handed to the engine or created by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexRef {
    /// `index`-th point of the `contour`-th input loop.
    Source { contour: usize, index: usize },
    /// Entry of the mesh's combined-point list.
    Combined(usize),
}

pub struct MeshAccumulator<'a> {
    loops: Vec<&'a [Point]>,
    reversed: bool,
    mesh: Mesh,
    current: Option<Tesselation>,
}

impl<'a> MeshAccumulator<'a> {
    /// `loops` are the boundaries fed to the engine, in feeding order.
    /// Back-facing runs store every batch in reverse vertex order.
    pub fn new(loops: Vec<&'a [Point]>, z_normal: ZNormal) -> Self {
        Self {
            loops,
            reversed: z_normal == ZNormal::Back,
            mesh: Mesh::default(),
            current: None,
        }
    }

    /// Stored point behind a vertex identity.
    pub fn position(&self, v: VertexRef) -> Option<Point> {
        match v {
            VertexRef::Source { contour, index } => {
                self.loops.get(contour).and_then(|l| l.get(index)).copied()
            }
            VertexRef::Combined(i) => self.mesh.combined.get(i).copied(),
        }
    }

    /// Open a new batch. A batch still open is closed first.
    pub fn begin(&mut self, kind: PrimitiveKind) {
        if self.current.is_some() {
            self.end();
        }
        self.current = Some(Tesselation::new(kind));
    }

    pub fn vertex(&mut self, v: VertexRef) {
        let Some(p) = self.position(v) else {
            self.error(GeometryError::Tesselation(format!("unknown vertex {v:?}")));
            return;
        };
        match self.current.as_mut() {
            Some(batch) => batch.push(p),
            None => self.error(GeometryError::Tesselation(
                "vertex outside of a batch".to_string(),
            )),
        }
    }

    /// Store a synthesized point; the returned identity stays valid for the run.
    pub fn combine(&mut self, p: Point) -> VertexRef {
        self.mesh.combined.push(p);
        VertexRef::Combined(self.mesh.combined.len() - 1)
    }

    /// Close the open batch and append it to the mesh. Empty batches are dropped.
    pub fn end(&mut self) {
        if let Some(mut batch) = self.current.take().filter(|b| b.point_count() > 0) {
            if self.reversed {
                batch.points.reverse();
            }
            self.mesh.tesselations.push(batch);
        }
    }

    /// Drop the open batch without keeping it.
    pub fn abort(&mut self) {
        self.current = None;
    }

    /// Keep the first error; later ones are ignored.
    pub fn error(&mut self, err: GeometryError) {
        self.mesh.record_error(err);
    }

    /// Finished mesh. A batch that was never closed is discarded.
    pub fn finish(self) -> Mesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::point;

    #[test]
    fn events_build_batches() {
        let a = [point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0)];
        let mut acc = MeshAccumulator::new(vec![&a[..]], ZNormal::Front);
        acc.begin(PrimitiveKind::Triangles);
        for index in 0..3 {
            acc.vertex(VertexRef::Source { contour: 0, index });
        }
        acc.end();
        let mesh = acc.finish();
        assert_eq!(mesh.tesselation_count(), 1);
        assert_eq!(mesh.tesselations()[0].points(), &a);
        assert!(mesh.error().is_none());
    }

    #[test]
    fn combined_points_are_addressable() {
        let a = [point(0.0, 0.0)];
        let mut acc = MeshAccumulator::new(vec![&a[..]], ZNormal::Back);
        let c = acc.combine(point(2.0, 3.0));
        assert_eq!(c, VertexRef::Combined(0));
        acc.begin(PrimitiveKind::TriangleFan);
        acc.vertex(VertexRef::Source { contour: 0, index: 0 });
        acc.vertex(c);
        acc.end();
        let mesh = acc.finish();
        assert_eq!(mesh.combined(), &[point(2.0, 3.0)]);
        // Back-facing batches come out reversed.
        assert_eq!(
            mesh.tesselations()[0].points(),
            &[point(2.0, 3.0), point(0.0, 0.0)]
        );
    }

    #[test]
    fn empty_batches_are_not_kept() {
        let a = [point(0.0, 0.0)];
        let mut acc = MeshAccumulator::new(vec![&a[..]], ZNormal::Front);
        acc.begin(PrimitiveKind::Triangles);
        acc.end();
        acc.begin(PrimitiveKind::Triangles);
        acc.begin(PrimitiveKind::TriangleFan);
        acc.vertex(VertexRef::Source { contour: 0, index: 0 });
        acc.end();
        let mesh = acc.finish();
        assert_eq!(mesh.tesselation_count(), 1);
        assert_eq!(mesh.tesselations()[0].kind(), PrimitiveKind::TriangleFan);
    }

    #[test]
    fn first_error_wins_and_open_batch_is_dropped() {
        let a = [point(0.0, 0.0)];
        let mut acc = MeshAccumulator::new(vec![&a[..]], ZNormal::Front);
        acc.vertex(VertexRef::Source { contour: 0, index: 0 });
        acc.begin(PrimitiveKind::Triangles);
        acc.vertex(VertexRef::Source { contour: 3, index: 0 });
        acc.error(GeometryError::Tesselation("late".into()));
        let mesh = acc.finish();
        assert!(mesh.is_empty());
        assert_eq!(
            mesh.error(),
            Some(&GeometryError::Tesselation("vertex outside of a batch".into()))
        );
    }
}
