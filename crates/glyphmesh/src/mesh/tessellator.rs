//! Fill tesselation of closed contour loops.
//!
//! Model
//! - Every selected loop is fed as a closed polyline boundary to lyon's
//!   sweep-line `FillTessellator` with the requested winding rule. Only straight
//!   edges are fed, so no curve tolerance applies and the boundary is kept as is.
//! - Engine output is forwarded to a `MeshAccumulator` through the
//!   `FillGeometryBuilder` adapter below: a vertex that sits on an input
//!   endpoint resolves to that exact stored `Point` (f64, with z); a vertex at an
//!   edge crossing goes through `combine`.
//! - Front-facing triangles are emitted counter-clockwise; back-facing batches
//!   are the same batches in reverse order (see `MeshAccumulator`).
//!
//! The engine and adapter are created per call and never shared.

use lyon_tessellation::math::point as lyon_point;
use lyon_tessellation::path::Path;
use lyon_tessellation::{
    FillGeometryBuilder, FillOptions, FillRule as LyonFillRule, FillTessellator, FillVertex,
    GeometryBuilder, GeometryBuilderError, VertexId, VertexSource,
};

use super::accumulator::{MeshAccumulator, VertexRef};
use super::{Mesh, PrimitiveKind};
use crate::contour::Contour;
use crate::error::GeometryError;
use crate::outline::FillRule;
use crate::point::{cross2, lerp, Point};

/// Facing of the generated geometry (`+1` front, `-1` back along z).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ZNormal {
    #[default]
    Front,
    Back,
}

impl ZNormal {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            ZNormal::Front => 1.0,
            ZNormal::Back => -1.0,
        }
    }
}

/// Which loop of each contour to tesselate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutsetSelector {
    #[default]
    Base,
    Front,
    Back,
}

/// Per-build mesh options.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshCfg {
    pub z_normal: ZNormal,
    pub outset: OutsetSelector,
    /// Overrides the outline's own fill rule when set.
    pub fill_rule: Option<FillRule>,
}

impl Contour {
    /// Loop used for `selector`; outset loops fall back to the base loop when empty.
    pub fn loop_for(&self, selector: OutsetSelector) -> &[Point] {
        let outset = match selector {
            OutsetSelector::Base => return self.points(),
            OutsetSelector::Front => self.front_points(),
            OutsetSelector::Back => self.back_points(),
        };
        if outset.is_empty() {
            self.points()
        } else {
            outset
        }
    }
}

/// Tesselate the selected loops of `contours` into a new mesh.
///
/// No contours yields an empty mesh without error. Engine faults are recorded
/// in `Mesh::error`; whatever the engine completed before the fault is kept.
pub fn tesselate(
    contours: &[Contour],
    fill_rule: FillRule,
    z_normal: ZNormal,
    outset: OutsetSelector,
) -> Mesh {
    let loops: Vec<&[Point]> = contours.iter().map(|c| c.loop_for(outset)).collect();
    if loops.iter().all(|l| l.is_empty()) {
        return Mesh::default();
    }
    if let Some((contour, index)) = first_unrepresentable(&loops) {
        return Mesh::failed(GeometryError::Tesselation(format!(
            "point {index} of contour {contour} is not a finite f32 coordinate"
        )));
    }

    let mut builder = Path::builder();
    let mut endpoints: Vec<Option<VertexRef>> = Vec::new();
    for (contour, pts) in loops.iter().enumerate() {
        for (index, p) in pts.iter().enumerate() {
            let at = lyon_point(p.x as f32, p.y as f32);
            let id = if index == 0 {
                builder.begin(at)
            } else {
                builder.line_to(at)
            };
            let slot = id.to_usize();
            if endpoints.len() <= slot {
                endpoints.resize(slot + 1, None);
            }
            endpoints[slot] = Some(VertexRef::Source { contour, index });
        }
        if !pts.is_empty() {
            builder.end(true);
        }
    }
    let path = builder.build();

    let options = FillOptions::default().with_fill_rule(match fill_rule {
        FillRule::NonZero => LyonFillRule::NonZero,
        FillRule::EvenOdd => LyonFillRule::EvenOdd,
    });

    let mut acc = MeshAccumulator::new(loops, z_normal);
    let mut sink = EngineSink {
        acc: &mut acc,
        endpoints: &endpoints,
        vertices: Vec::new(),
    };
    // Feed the builder's endpoint ids so vertex sources map back to `endpoints`.
    let result =
        FillTessellator::new().tessellate_with_ids(path.id_iter(), &path, None, &options, &mut sink);
    if let Err(e) = result {
        tracing::debug!(error = ?e, "fill tessellator aborted");
        acc.error(GeometryError::Tesselation(format!("{e:?}")));
    }
    acc.finish()
}

/// First `(contour, index)` whose coordinates do not survive narrowing to f32.
fn first_unrepresentable(loops: &[&[Point]]) -> Option<(usize, usize)> {
    loops.iter().enumerate().find_map(|(c, pts)| {
        pts.iter()
            .position(|p| !(p.x as f32).is_finite() || !(p.y as f32).is_finite())
            .map(|i| (c, i))
    })
}

/// Adapter from lyon's geometry builder callbacks to accumulator events.
struct EngineSink<'s, 'a> {
    acc: &'s mut MeshAccumulator<'a>,
    endpoints: &'s [Option<VertexRef>],
    /// Engine vertex id → our identity.
    vertices: Vec<VertexRef>,
}

impl EngineSink<'_, '_> {
    fn endpoint(&self, id: lyon_tessellation::path::EndpointId) -> Option<VertexRef> {
        self.endpoints.get(id.to_usize()).copied().flatten()
    }

    /// Position of a vertex created at an edge crossing.
    fn crossing_point(&self, vertex: &FillVertex) -> Point {
        let on_edge = vertex.sources().find_map(|src| match src {
            VertexSource::Edge { from, to, t } => Some((from, to, t)),
            VertexSource::Endpoint { .. } => None,
        });
        if let Some((from, to, t)) = on_edge {
            let a = self.endpoint(from).and_then(|v| self.acc.position(v));
            let b = self.endpoint(to).and_then(|v| self.acc.position(v));
            if let (Some(a), Some(b)) = (a, b) {
                return lerp(a, b, t as f64);
            }
        }
        let p = vertex.position();
        Point::new(p.x as f64, p.y as f64, 0.0)
    }
}

impl GeometryBuilder for EngineSink<'_, '_> {
    fn begin_geometry(&mut self) {
        self.acc.begin(PrimitiveKind::Triangles);
    }

    fn end_geometry(&mut self) {
        self.acc.end();
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        let refs = [a, b, c].map(|id| self.vertices.get(id.0 as usize).copied());
        let [Some(a), Some(b), Some(c)] = refs else {
            self.acc
                .error(GeometryError::Tesselation("triangle references unknown vertex".into()));
            return;
        };
        let (pa, pb, pc) = match (self.acc.position(a), self.acc.position(b), self.acc.position(c)) {
            (Some(pa), Some(pb), Some(pc)) => (pa, pb, pc),
            _ => return,
        };
        let (b, c) = if cross2(pb - pa, pc - pa) < 0.0 { (c, b) } else { (b, c) };
        self.acc.vertex(a);
        self.acc.vertex(b);
        self.acc.vertex(c);
    }

    fn abort_geometry(&mut self) {
        self.acc.abort();
    }
}

impl FillGeometryBuilder for EngineSink<'_, '_> {
    fn add_fill_vertex(&mut self, vertex: FillVertex) -> Result<VertexId, GeometryBuilderError> {
        let source = vertex.sources().find_map(|src| match src {
            VertexSource::Endpoint { id } => self.endpoint(id),
            VertexSource::Edge { .. } => None,
        });
        let v = match source {
            Some(v) => v,
            None => {
                let p = self.crossing_point(&vertex);
                self.acc.combine(p)
            }
        };
        let id = u32::try_from(self.vertices.len())
            .map_err(|_| GeometryBuilderError::TooManyVertices)?;
        self.vertices.push(v);
        Ok(VertexId(id))
    }
}
