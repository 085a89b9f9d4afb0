//! Contours: one closed loop of on-curve points per raw outline contour.
//!
//! Purpose
//! - Hold the flattened loop (`points`) produced from tagged raw points.
//! - Optionally hold front/back outset loops used for extrusion side walls
//!   and outset polygon faces.
//!
//! Invariants
//! - No two cyclically-consecutive entries of `points` are equal (exact
//!   comparison; duplicates are collapsed at insertion and across the wrap).
//! - `front`/`back` are either empty or exactly `points.len()` long. Empty
//!   means "no outset": `front_point`/`back_point` fall back to `point`.
//!
//! Code cross-refs: `flatten` (raw walk), `outset` (offset math),
//! `crate::vectoriser::Vectoriser` (parity pass, mesh building).

mod flatten;
mod outset;

use crate::outline::RawPoint;
use crate::point::{signed_area, Point};

/// Which outset loop to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutsetDirection {
    /// Offset by `+distance` along the ink-outward direction.
    Front,
    /// Offset by `-distance` along the ink-outward direction.
    Back,
}

impl OutsetDirection {
    #[inline]
    fn sign(self) -> f64 {
        match self {
            OutsetDirection::Front => 1.0,
            OutsetDirection::Back => -1.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
    front: Vec<Point>,
    back: Vec<Point>,
    clockwise: bool,
    /// Number of other contours enclosing this one.
    parity: usize,
}

impl Contour {
    /// Flatten one raw contour (see `flatten` for the walk rules).
    pub fn from_raw(raw: &[RawPoint]) -> Self {
        let mut contour = Contour::default();
        contour.flatten(raw);
        contour.close_loop();
        contour.clockwise = signed_area(&contour.points) < 0.0;
        contour
    }

    /// Contour from an already-flat loop; consecutive duplicates are collapsed.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        let mut contour = Contour::default();
        for p in points {
            contour.push_point(p);
        }
        contour.close_loop();
        contour.clockwise = signed_area(&contour.points) < 0.0;
        contour
    }

    #[inline]
    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    /// Front outset point, or the base point when no front outset exists.
    #[inline]
    pub fn front_point(&self, index: usize) -> Point {
        self.front.get(index).copied().unwrap_or(self.points[index])
    }

    /// Back outset point, or the base point when no back outset exists.
    #[inline]
    pub fn back_point(&self, index: usize) -> Point {
        self.back.get(index).copied().unwrap_or(self.points[index])
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn front_points(&self) -> &[Point] {
        &self.front
    }

    pub fn back_points(&self) -> &[Point] {
        &self.back
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }
    #[inline]
    pub fn front_point_count(&self) -> usize {
        self.front.len()
    }
    #[inline]
    pub fn back_point_count(&self) -> usize {
        self.back.len()
    }

    /// Orientation of the flattened loop in a y-up frame.
    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.clockwise
    }

    /// Nesting depth recorded by `set_parity`; 0 until then.
    #[inline]
    pub fn parity(&self) -> usize {
        self.parity
    }

    /// Odd nesting depth: the loop bounds a hole of the filled region.
    #[inline]
    pub fn is_hole(&self) -> bool {
        self.parity % 2 == 1
    }

    /// Record the nesting parity (number of other contours enclosing this one).
    ///
    /// Must be set before `build_outset`: it decides which side grows the ink.
    pub fn set_parity(&mut self, parity: usize) {
        self.parity = parity;
    }

    /// +1 when the ink-outward side is the right-hand side of travel, else -1.
    ///
    /// Outer loops grow away from their own interior, holes shrink toward theirs.
    pub(crate) fn outward_sign(&self) -> f64 {
        let orientation = if self.clockwise { -1.0 } else { 1.0 };
        let nesting = if self.is_hole() { -1.0 } else { 1.0 };
        orientation * nesting
    }

    /// Build (or rebuild) the front or back outset loop.
    ///
    /// `distance == 0` leaves the list empty so lookups fall back to the base loop.
    pub fn build_outset(&mut self, direction: OutsetDirection, distance: f64) {
        let signed = self.outward_sign() * direction.sign() * distance;
        let list = outset::outset_loop(&self.points, signed);
        match direction {
            OutsetDirection::Front => self.front = list,
            OutsetDirection::Back => self.back = list,
        }
    }

    /// Leftmost point (smallest x, first wins on ties).
    pub(crate) fn leftmost(&self) -> Option<Point> {
        self.points
            .iter()
            .copied()
            .reduce(|best, p| if p.x < best.x { p } else { best })
    }

    #[inline]
    fn push_point(&mut self, p: Point) {
        if self.points.last() != Some(&p) {
            self.points.push(p);
        }
    }

    fn push_samples<const N: usize>(&mut self, samples: [Point; N]) {
        for p in samples {
            self.push_point(p);
        }
    }

    /// Drop trailing points that repeat the first one (the loop closes implicitly).
    fn close_loop(&mut self) {
        while self.points.len() > 1 && self.points.last() == self.points.first() {
            self.points.pop();
        }
    }
}
