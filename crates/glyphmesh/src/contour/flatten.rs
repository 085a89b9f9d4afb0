//! Walk a raw tagged contour and flatten its curve segments.
//!
//! Rules
//! - Two or fewer raw points: copied verbatim (tags ignored).
//! - `On`: appended as is.
//! - `Conic`: quadratic from the previous endpoint; consecutive conics imply an
//!   on-curve midpoint between them, evaluated one control at a time.
//! - `Cubic`: consumes this and the next control; endpoint is the point after.
//!   A cubic control whose successor is not a cubic control is read as a
//!   conic control.
//! - Indices wrap: the predecessor of 0 is the last point and vice versa.

use super::Contour;
use crate::bezier::{cubic, quadratic};
use crate::outline::{PointTag, RawPoint};
use crate::point::{lift, midpoint, Point};

impl Contour {
    pub(super) fn flatten(&mut self, raw: &[RawPoint]) {
        let n = raw.len();
        if n <= 2 {
            for p in raw {
                self.push_point(lift(p.pos));
            }
            return;
        }
        let mut i = 0;
        while i < n {
            match raw[i].tag {
                PointTag::On => self.push_point(lift(raw[i].pos)),
                PointTag::Cubic if raw[(i + 1) % n].tag == PointTag::Cubic => {
                    i = self.push_cubic(raw, i)
                }
                PointTag::Conic | PointTag::Cubic => i = self.push_conic_run(raw, i),
            }
            i += 1;
        }
    }

    /// Endpoint the curve starting at `i` leaves from.
    fn previous_endpoint(&self, raw: &[RawPoint], i: usize) -> Point {
        if let Some(&last) = self.points.last() {
            return last;
        }
        let n = raw.len();
        let prev = raw[(i + n - 1) % n];
        if prev.tag == PointTag::Conic && raw[i].tag == PointTag::Conic {
            // Contour opens on a conic run that wraps from the end.
            midpoint(lift(prev.pos), lift(raw[i].pos))
        } else {
            lift(prev.pos)
        }
    }

    /// Flatten the conic run starting at `start`; returns the last index consumed.
    fn push_conic_run(&mut self, raw: &[RawPoint], start: usize) -> usize {
        let n = raw.len();
        let mut i = start;
        let mut prev = self.previous_endpoint(raw, i);
        let mut control = lift(raw[i].pos);
        loop {
            let next = raw[(i + 1) % n];
            let next_pos = lift(next.pos);
            if next.tag != PointTag::Conic {
                self.push_samples(quadratic(prev, control, next_pos));
                return i;
            }
            let implied = midpoint(control, next_pos);
            self.push_samples(quadratic(prev, control, implied));
            if i + 1 == n {
                // The run continues at index 0, which already started from `implied`.
                return i;
            }
            i += 1;
            prev = implied;
            control = next_pos;
        }
    }

    /// Flatten the cubic at `i`, `i + 1`; returns the index of the second control.
    fn push_cubic(&mut self, raw: &[RawPoint], i: usize) -> usize {
        let n = raw.len();
        let prev = self.previous_endpoint(raw, i);
        let c1 = lift(raw[i].pos);
        let c2 = lift(raw[(i + 1) % n].pos);
        let end = lift(raw[(i + 2) % n].pos);
        self.push_samples(cubic(prev, c1, c2, end));
        i + 1
    }
}
