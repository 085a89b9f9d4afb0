//! JSON records read and written by the CLI.
//!
//! Input: `{"glyphs": [{"id": 65, "advance": [600, 0], "fill_rule": "nonzero",
//! "contours": [[{"x": 0, "y": 0, "tag": "on"}, ...]]}]}`.
//! Output: per glyph the emitted batches (primitive + xyz points) or the error.

use anyhow::{Context, Result};
use clap::ValueEnum;
use glyphmesh::prelude::*;
use glyphmesh::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Advance as a plain `[x, y]` pair.
pub type Advance = [f64; 2];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagRecord {
    #[default]
    On,
    Conic,
    Cubic,
}

impl From<TagRecord> for PointTag {
    fn from(t: TagRecord) -> Self {
        match t {
            TagRecord::On => PointTag::On,
            TagRecord::Conic => PointTag::Conic,
            TagRecord::Cubic => PointTag::Cubic,
        }
    }
}

impl From<PointTag> for TagRecord {
    fn from(t: PointTag) -> Self {
        match t {
            PointTag::On => TagRecord::On,
            PointTag::Conic => TagRecord::Conic,
            PointTag::Cubic => TagRecord::Cubic,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lower")]
pub enum FillRuleRecord {
    #[default]
    NonZero,
    EvenOdd,
}

impl From<FillRuleRecord> for FillRule {
    fn from(r: FillRuleRecord) -> Self {
        match r {
            FillRuleRecord::NonZero => FillRule::NonZero,
            FillRuleRecord::EvenOdd => FillRule::EvenOdd,
        }
    }
}

impl From<FillRule> for FillRuleRecord {
    fn from(r: FillRule) -> Self {
        match r {
            FillRule::NonZero => FillRuleRecord::NonZero,
            FillRule::EvenOdd => FillRuleRecord::EvenOdd,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub tag: TagRecord,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlyphRecord {
    pub id: u32,
    #[serde(default)]
    pub advance: Advance,
    #[serde(default)]
    pub fill_rule: FillRuleRecord,
    pub contours: Vec<Vec<PointRecord>>,
}

impl GlyphRecord {
    pub fn from_outline(id: u32, outline: &RawOutline, advance: Advance) -> Self {
        let contours = outline
            .contours()
            .map(|c| {
                c.iter()
                    .map(|p| PointRecord {
                        x: p.pos.x,
                        y: p.pos.y,
                        tag: p.tag.into(),
                    })
                    .collect()
            })
            .collect();
        Self {
            id,
            advance,
            fill_rule: outline.fill_rule().into(),
            contours,
        }
    }

    pub fn to_outline(&self) -> RawOutline {
        let contours = self
            .contours
            .iter()
            .map(|c| {
                c.iter()
                    .map(|p| RawPoint::new(p.x, p.y, p.tag.into()))
                    .collect()
            })
            .collect();
        RawOutline::from_contours(contours, self.fill_rule.into())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphFile {
    pub glyphs: Vec<GlyphRecord>,
}

impl GlyphFile {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }

    /// Glyph table usable as a `GlyphSource`; a repeated id keeps the last record.
    pub fn to_source(&self) -> BTreeMap<u32, GlyphSlot> {
        self.glyphs
            .iter()
            .map(|g| {
                let [x, y] = g.advance;
                (g.id, GlyphSlot::outline(g.to_outline(), Vec2::new(x, y)))
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub primitive: String,
    pub points: Vec<[f64; 3]>,
}

impl BatchRecord {
    fn from_tesselation(t: &Tesselation) -> Self {
        let primitive = match t.kind() {
            PrimitiveKind::Triangles => "triangles",
            PrimitiveKind::TriangleFan => "triangle_fan",
            PrimitiveKind::TriangleStrip => "triangle_strip",
            PrimitiveKind::LineLoop => "line_loop",
        };
        Self {
            primitive: primitive.to_string(),
            points: t.points().iter().map(|p| [p.x, p.y, p.z]).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlyphMeshRecord {
    pub id: u32,
    pub advance: Advance,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub batches: Vec<BatchRecord>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bounds: Option<[[f64; 3]; 2]>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshFile {
    pub kind: String,
    pub glyphs: Vec<GlyphMeshRecord>,
}

impl MeshFile {
    pub fn from_results(
        kind: &str,
        ids: &[u32],
        results: &[Result<GlyphGeometry, GeometryError>],
    ) -> Self {
        let glyphs = ids
            .iter()
            .zip(results)
            .map(|(&id, result)| match result {
                Ok(g) => GlyphMeshRecord {
                    id,
                    advance: [g.advance.x, g.advance.y],
                    batches: g
                        .geometry
                        .batches()
                        .into_iter()
                        .map(BatchRecord::from_tesselation)
                        .collect(),
                    bounds: g
                        .geometry
                        .bounds()
                        .map(|(lo, hi)| [[lo.x, lo.y, lo.z], [hi.x, hi.y, hi.z]]),
                    error: None,
                },
                Err(err) => GlyphMeshRecord {
                    id,
                    advance: [0.0, 0.0],
                    batches: Vec::new(),
                    bounds: None,
                    error: Some(err.to_string()),
                },
            })
            .collect();
        Self {
            kind: kind.to_string(),
            glyphs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_glyph_file() {
        let text = r#"{"glyphs": [{"id": 7, "contours": [[
            {"x": 0, "y": 0}, {"x": 10, "y": 0, "tag": "conic"}, {"x": 10, "y": 10}
        ]]}]}"#;
        let file: GlyphFile = serde_json::from_str(text).unwrap();
        assert_eq!(file.glyphs[0].fill_rule, FillRuleRecord::NonZero);
        let source = file.to_source();
        let slot = &source[&7];
        assert_eq!(slot.outline.point_count(), 3);
        assert_eq!(slot.outline.points()[1].tag, PointTag::Conic);
    }

    #[test]
    fn outline_records_convert_both_ways() {
        let outline = draw_outline_radial(RadialCfg::default(), ReplayToken { seed: 1, index: 2 });
        let record = GlyphRecord::from_outline(3, &outline, [500.0, 0.0]);
        assert_eq!(record.to_outline(), outline);
    }

    #[test]
    fn failed_glyphs_keep_their_error() {
        let results = vec![Err(GeometryError::MissingGlyph(4))];
        let file = MeshFile::from_results("polygon", &[4], &results);
        assert_eq!(file.glyphs[0].error.as_deref(), Some("glyph 4 not found"));
        let text = serde_json::to_string(&file).unwrap();
        assert!(!text.contains("batches"));
    }
}
