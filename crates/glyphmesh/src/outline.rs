//! Raw glyph outline as handed over by the rasterizer.
//!
//! Layout mirrors the usual outline decomposition format: one flat point array
//! with per-point tags, plus the inclusive end index of every contour. Each
//! contour is a closed loop; the last point connects back to the first.

use nalgebra::Vector2;

use crate::error::GeometryError;

/// Role of a raw outline point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointTag {
    /// The outline passes through this point.
    On,
    /// Quadratic (conic) control point.
    Conic,
    /// Cubic control point; always comes in pairs.
    Cubic,
}

/// Outline coordinate plus its tag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawPoint {
    pub pos: Vector2<f64>,
    pub tag: PointTag,
}

impl RawPoint {
    #[inline]
    pub fn new(x: f64, y: f64, tag: PointTag) -> Self {
        Self {
            pos: Vector2::new(x, y),
            tag,
        }
    }
    #[inline]
    pub fn on(x: f64, y: f64) -> Self {
        Self::new(x, y, PointTag::On)
    }
    #[inline]
    pub fn conic(x: f64, y: f64) -> Self {
        Self::new(x, y, PointTag::Conic)
    }
    #[inline]
    pub fn cubic(x: f64, y: f64) -> Self {
        Self::new(x, y, PointTag::Cubic)
    }
}

/// Winding rule deciding which regions of overlapping contours are filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// One glyph's outline: contours as closed loops of tagged points.
///
/// Invariants (checked by `validate`, which `new` runs):
/// - `contour_ends` is strictly increasing and every end is `< points.len()`.
/// - The last end equals `points.len() - 1` (no trailing orphan points).
/// - Every coordinate is finite.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawOutline {
    points: Vec<RawPoint>,
    contour_ends: Vec<usize>,
    fill_rule: FillRule,
}

impl RawOutline {
    pub fn new(
        points: Vec<RawPoint>,
        contour_ends: Vec<usize>,
        fill_rule: FillRule,
    ) -> Result<Self, GeometryError> {
        let outline = Self {
            points,
            contour_ends,
            fill_rule,
        };
        outline.validate()?;
        Ok(outline)
    }

    /// Check the layout invariants listed on the type.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let n = self.points.len();
        let mut start = 0usize;
        for (c, &end) in self.contour_ends.iter().enumerate() {
            if end < start || end >= n {
                return Err(GeometryError::MalformedOutline(format!(
                    "contour {c} ends at {end}, expected {start}..{n}"
                )));
            }
            start = end + 1;
        }
        if start != n {
            return Err(GeometryError::MalformedOutline(format!(
                "{} points after the last contour",
                n - start
            )));
        }
        if let Some(i) = self
            .points
            .iter()
            .position(|p| !(p.pos.x.is_finite() && p.pos.y.is_finite()))
        {
            return Err(GeometryError::MalformedOutline(format!(
                "point {i} has a non-finite coordinate"
            )));
        }
        Ok(())
    }

    /// Build from the rasterizer's parallel coordinate/tag arrays.
    pub fn from_parallel(
        coords: &[Vector2<f64>],
        tags: &[PointTag],
        contour_ends: Vec<usize>,
        fill_rule: FillRule,
    ) -> Result<Self, GeometryError> {
        if coords.len() != tags.len() {
            return Err(GeometryError::MalformedOutline(format!(
                "{} coordinates but {} tags",
                coords.len(),
                tags.len()
            )));
        }
        let points = coords
            .iter()
            .zip(tags)
            .map(|(&pos, &tag)| RawPoint { pos, tag })
            .collect();
        Self::new(points, contour_ends, fill_rule)
    }

    /// Convenience for callers that already hold one `Vec` per contour.
    ///
    /// Empty contours are skipped, so contour indices count only non-empty
    /// loops. Coordinates are not checked; call `validate` when they come from
    /// untrusted input.
    pub fn from_contours(contours: Vec<Vec<RawPoint>>, fill_rule: FillRule) -> Self {
        let mut points = Vec::with_capacity(contours.iter().map(Vec::len).sum());
        let mut contour_ends = Vec::with_capacity(contours.len());
        for contour in contours {
            if contour.is_empty() {
                continue;
            }
            points.extend(contour);
            contour_ends.push(points.len() - 1);
        }
        Self {
            points,
            contour_ends,
            fill_rule,
        }
    }

    #[inline]
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Same outline with a different winding rule.
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    #[inline]
    pub fn contour_count(&self) -> usize {
        self.contour_ends.len()
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[RawPoint] {
        &self.points
    }

    /// Contours in order, each as a slice of the flat point array.
    pub fn contours(&self) -> impl Iterator<Item = &[RawPoint]> + '_ {
        let mut start = 0;
        self.contour_ends.iter().map(move |&end| {
            let slice = &self.points[start..=end];
            start = end + 1;
            slice
        })
    }
}
