//! Glyph-geometry façade: load a glyph outline and turn it into renderable geometry.
//!
//! Purpose
//! - `GlyphSource` is the injected outline provider (a font rasterizer or a
//!   table of prepared outlines); nothing here holds global state.
//! - `GeometryKind` selects what to build: line loops, a flat polygon, or an
//!   extruded solid with side walls.
//!
//! Invariants
//! - Every build owns its vectoriser and meshes; a failing glyph never
//!   affects another (`build_all` collects one `Result` per glyph).
//! - Extruded solids: front face at z = 0 facing +z, back face at
//!   z = -depth facing -z, side walls facing away from the ink.

use std::collections::BTreeMap;

use nalgebra::Vector2;

use crate::contour::Contour;
use crate::error::GeometryError;
use crate::mesh::{Mesh, MeshCfg, OutsetSelector, PrimitiveKind, Tesselation, ZNormal};
use crate::outline::{FillRule, RawOutline};
use crate::point::Point;
use crate::vectoriser::Vectoriser;

/// How the source stores a glyph. Only outlines can be vectorised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GlyphFormat {
    #[default]
    Outline,
    Bitmap,
    Composite,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphSlot {
    pub format: GlyphFormat,
    pub outline: RawOutline,
    pub advance: Vector2<f64>,
}

impl GlyphSlot {
    pub fn outline(outline: RawOutline, advance: Vector2<f64>) -> Self {
        Self {
            format: GlyphFormat::Outline,
            outline,
            advance,
        }
    }
}

pub trait GlyphSource {
    fn load_glyph(&self, glyph: u32) -> Result<GlyphSlot, GeometryError>;
}

/// Prepared outlines keyed by glyph index.
impl GlyphSource for BTreeMap<u32, GlyphSlot> {
    fn load_glyph(&self, glyph: u32) -> Result<GlyphSlot, GeometryError> {
        self.get(&glyph)
            .cloned()
            .ok_or(GeometryError::MissingGlyph(glyph))
    }
}

/// Extrusion parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtrudeCfg {
    /// Distance between the front (z = 0) and back (z = -depth) faces.
    pub depth: f64,
    pub front_outset: f64,
    pub back_outset: f64,
}

impl Default for ExtrudeCfg {
    fn default() -> Self {
        Self {
            depth: 1.0,
            front_outset: 0.0,
            back_outset: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GeometryKind {
    Outline,
    Polygon { outset: f64 },
    Extrude(ExtrudeCfg),
}

impl Default for GeometryKind {
    fn default() -> Self {
        GeometryKind::Polygon { outset: 0.0 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderableGeometry {
    /// One `LineLoop` batch per non-empty contour.
    Outline { loops: Vec<Tesselation> },
    Polygon { mesh: Mesh },
    Extrude {
        front: Mesh,
        back: Mesh,
        /// One `TriangleStrip` per contour with at least two points.
        sides: Vec<Tesselation>,
    },
}

impl GeometryKind {
    /// Build geometry for `outline`; `fill_rule` overrides the outline's own rule.
    pub fn build(
        &self,
        outline: &RawOutline,
        fill_rule: Option<FillRule>,
    ) -> Result<RenderableGeometry, GeometryError> {
        let (front_outset, back_outset) = match *self {
            GeometryKind::Outline => (0.0, 0.0),
            GeometryKind::Polygon { outset } => (outset, 0.0),
            GeometryKind::Extrude(cfg) => (cfg.front_outset, cfg.back_outset),
        };
        let mut vectoriser = Vectoriser::with_outsets(outline, front_outset, back_outset);
        let (contours, points) = (vectoriser.contour_count(), vectoriser.point_count());
        if contours < 1 || points < 3 {
            return Err(GeometryError::DegenerateGeometry { contours, points });
        }

        match *self {
            GeometryKind::Outline => {
                let loops = vectoriser
                    .contours()
                    .iter()
                    .filter(|c| c.point_count() > 0)
                    .map(|c| Tesselation::from_points(PrimitiveKind::LineLoop, c.points().to_vec()))
                    .collect();
                Ok(RenderableGeometry::Outline { loops })
            }
            GeometryKind::Polygon { .. } => {
                let mesh = mesh_for(&mut vectoriser, ZNormal::Front, OutsetSelector::Front, fill_rule)?;
                Ok(RenderableGeometry::Polygon { mesh })
            }
            GeometryKind::Extrude(cfg) => {
                let front = mesh_for(&mut vectoriser, ZNormal::Front, OutsetSelector::Front, fill_rule)?;
                let mut back = mesh_for(&mut vectoriser, ZNormal::Back, OutsetSelector::Back, fill_rule)?;
                back.set_depth(-cfg.depth);
                let sides = vectoriser
                    .contours()
                    .iter()
                    .filter(|c| c.point_count() >= 2)
                    .map(|c| side_wall(c, cfg.depth))
                    .collect();
                Ok(RenderableGeometry::Extrude { front, back, sides })
            }
        }
    }
}

fn mesh_for(
    vectoriser: &mut Vectoriser,
    z_normal: ZNormal,
    outset: OutsetSelector,
    fill_rule: Option<FillRule>,
) -> Result<Mesh, GeometryError> {
    let cfg = MeshCfg {
        z_normal,
        outset,
        fill_rule,
    };
    vectoriser.make_mesh(cfg);
    let mesh = vectoriser.take_mesh().unwrap_or_default();
    match mesh.error() {
        Some(err) => Err(err.clone()),
        None => Ok(mesh),
    }
}

/// Strip joining the front loop (z = 0) to the back loop (z = -depth).
///
/// Pairs are ordered so the strip's faces point to the ink-outward side.
fn side_wall(contour: &Contour, depth: f64) -> Tesselation {
    let n = contour.point_count();
    let front_first = contour.outward_sign() > 0.0;
    let mut points = Vec::with_capacity(2 * (n + 1));
    for j in 0..=n {
        let i = j % n;
        let mut f = contour.front_point(i);
        let mut b = contour.back_point(i);
        f.z = 0.0;
        b.z = -depth;
        if front_first {
            points.extend([f, b]);
        } else {
            points.extend([b, f]);
        }
    }
    Tesselation::from_points(PrimitiveKind::TriangleStrip, points)
}

impl RenderableGeometry {
    /// All batches, front to back.
    pub fn batches(&self) -> Vec<&Tesselation> {
        match self {
            RenderableGeometry::Outline { loops } => loops.iter().collect(),
            RenderableGeometry::Polygon { mesh } => mesh.tesselations().iter().collect(),
            RenderableGeometry::Extrude { front, back, sides } => front
                .tesselations()
                .iter()
                .chain(back.tesselations())
                .chain(sides)
                .collect(),
        }
    }

    pub fn point_count(&self) -> usize {
        self.batches().iter().map(|t| t.point_count()).sum()
    }

    /// Axis-aligned `(min, max)` over every emitted point.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        self.batches()
            .into_iter()
            .flat_map(|t| t.points().iter().copied())
            .fold(None, |acc, p| match acc {
                None => Some((p, p)),
                Some((lo, hi)) => Some((lo.inf(&p), hi.sup(&p))),
            })
    }
}

/// Renderable geometry of one glyph plus its advance.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphGeometry {
    pub glyph: u32,
    pub advance: Vector2<f64>,
    pub geometry: RenderableGeometry,
}

impl GlyphGeometry {
    pub fn build<S: GlyphSource + ?Sized>(
        source: &S,
        glyph: u32,
        kind: &GeometryKind,
        fill_rule: Option<FillRule>,
    ) -> Result<Self, GeometryError> {
        let result = Self::try_build(source, glyph, kind, fill_rule);
        if let Err(err) = &result {
            tracing::warn!(glyph, kind = ?kind, error = %err, "glyph has no renderable geometry");
        }
        result
    }

    fn try_build<S: GlyphSource + ?Sized>(
        source: &S,
        glyph: u32,
        kind: &GeometryKind,
        fill_rule: Option<FillRule>,
    ) -> Result<Self, GeometryError> {
        let slot = source.load_glyph(glyph)?;
        if slot.format != GlyphFormat::Outline {
            return Err(GeometryError::InvalidOutlineFormat);
        }
        let geometry = kind.build(&slot.outline, fill_rule)?;
        tracing::debug!(
            glyph,
            contours = slot.outline.contour_count(),
            raw_points = slot.outline.point_count(),
            points = geometry.point_count(),
            "glyph geometry built"
        );
        Ok(Self {
            glyph,
            advance: slot.advance,
            geometry,
        })
    }
}

/// Build every glyph independently; one failure never stops the rest.
pub fn build_all<S: GlyphSource + ?Sized>(
    source: &S,
    glyphs: &[u32],
    kind: &GeometryKind,
    fill_rule: Option<FillRule>,
) -> Vec<Result<GlyphGeometry, GeometryError>> {
    glyphs
        .iter()
        .map(|&g| GlyphGeometry::build(source, g, kind, fill_rule))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::RawPoint;

    fn square(x0: f64, y0: f64, side: f64, clockwise: bool) -> Vec<RawPoint> {
        let mut pts = vec![
            RawPoint::on(x0, y0),
            RawPoint::on(x0 + side, y0),
            RawPoint::on(x0 + side, y0 + side),
            RawPoint::on(x0, y0 + side),
        ];
        if clockwise {
            pts.reverse();
        }
        pts
    }

    fn ring() -> RawOutline {
        RawOutline::from_contours(
            vec![square(0.0, 0.0, 10.0, true), square(3.0, 3.0, 4.0, false)],
            FillRule::NonZero,
        )
    }

    fn font() -> BTreeMap<u32, GlyphSlot> {
        let mut map = BTreeMap::new();
        map.insert(1, GlyphSlot::outline(ring(), Vector2::new(12.0, 0.0)));
        map.insert(
            2,
            GlyphSlot {
                format: GlyphFormat::Bitmap,
                ..GlyphSlot::default()
            },
        );
        map.insert(3, GlyphSlot::outline(RawOutline::default(), Vector2::zeros()));
        map
    }

    #[test]
    fn outline_kind_emits_line_loops() {
        let g = GeometryKind::Outline.build(&ring(), None).unwrap();
        let RenderableGeometry::Outline { loops } = &g else {
            panic!("expected outline geometry, got {g:?}");
        };
        assert_eq!(loops.len(), 2);
        assert!(loops.iter().all(|l| l.kind() == PrimitiveKind::LineLoop));
        assert_eq!(g.point_count(), 8);
    }

    #[test]
    fn polygon_outset_grows_the_face() {
        let g = GeometryKind::Polygon { outset: 1.0 }.build(&ring(), None).unwrap();
        let RenderableGeometry::Polygon { mesh } = &g else {
            panic!("expected polygon geometry, got {g:?}");
        };
        // 12x12 outer minus 2x2 hole.
        assert!((mesh.area() - 140.0).abs() < 1e-6);
        let (lo, hi) = g.bounds().unwrap();
        assert!((lo.x + 1.0).abs() < 1e-9 && (hi.y - 11.0).abs() < 1e-9);
    }

    #[test]
    fn extruded_solid_faces_point_outward() {
        let cfg = ExtrudeCfg {
            depth: 2.0,
            ..ExtrudeCfg::default()
        };
        let g = GeometryKind::Extrude(cfg).build(&ring(), None).unwrap();
        let RenderableGeometry::Extrude { front, back, sides } = &g else {
            panic!("expected extruded geometry, got {g:?}");
        };
        assert!((front.area() - 84.0).abs() < 1e-9);
        assert!((back.area() - 84.0).abs() < 1e-9);
        assert!(back.tesselations().iter().flat_map(|t| t.points()).all(|p| p.z == -2.0));

        let facing = |m: &Mesh| {
            m.tesselations()
                .iter()
                .flat_map(|t| t.triangles())
                .map(|[a, b, c]| (b - a).cross(&(c - a)).z)
                .collect::<Vec<_>>()
        };
        assert!(facing(front).iter().all(|&z| z > 0.0));
        assert!(facing(back).iter().all(|&z| z < 0.0));

        assert_eq!(sides.len(), 2);
        let center = Point::new(5.0, 5.0, 0.0);
        for (wall, outward) in sides.iter().zip([1.0, -1.0]) {
            assert_eq!(wall.kind(), PrimitiveKind::TriangleStrip);
            assert_eq!(wall.point_count(), 10);
            for [a, b, c] in wall.triangles() {
                let n = (b - a).cross(&(c - a));
                let mid = (a + b + c) / 3.0 - center;
                assert!(outward * (n.x * mid.x + n.y * mid.y) > 0.0);
            }
        }
        let (lo, hi) = g.bounds().unwrap();
        assert_eq!((lo.z, hi.z), (-2.0, 0.0));
    }

    #[test]
    fn extrude_outsets_shape_each_rim() {
        let cfg = ExtrudeCfg {
            depth: 1.0,
            front_outset: 1.0,
            back_outset: 0.5,
        };
        let g = GeometryKind::Extrude(cfg).build(&ring(), None).unwrap();
        let RenderableGeometry::Extrude { front, back, .. } = &g else {
            panic!("expected extruded geometry, got {g:?}");
        };
        assert!((front.area() - 140.0).abs() < 1e-6);
        // Back rim shrinks the ink: 9x9 outer, 5x5 hole.
        assert!((back.area() - 56.0).abs() < 1e-6);
    }

    #[test]
    fn facade_checks_format_and_isolates_glyphs() {
        let font = font();
        let kind = GeometryKind::default();
        let ok = GlyphGeometry::build(&font, 1, &kind, None).unwrap();
        assert_eq!(ok.glyph, 1);
        assert_eq!(ok.advance, Vector2::new(12.0, 0.0));

        let all = build_all(&font, &[2, 1, 3, 9], &kind, None);
        assert_eq!(all[0], Err(GeometryError::InvalidOutlineFormat));
        assert!(all[1].is_ok());
        assert_eq!(
            all[2],
            Err(GeometryError::DegenerateGeometry {
                contours: 0,
                points: 0
            })
        );
        assert_eq!(all[3], Err(GeometryError::MissingGlyph(9)));
    }
}
