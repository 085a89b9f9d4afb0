//! Error kinds surfaced by glyph geometry builds.
//!
//! None of these are fatal to a caller rendering a string: a failed glyph has
//! no renderable geometry, but its advance (owned by the font layer) is still
//! usable. Geometry is deterministic, so there is no retry.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// The glyph source is not a scalable outline (bitmap, unresolved composite).
    #[error("glyph is not a scalable outline")]
    InvalidOutlineFormat,

    /// Fewer than one contour or three points in total.
    #[error("degenerate outline: {contours} contours, {points} points")]
    DegenerateGeometry { contours: usize, points: usize },

    /// Raw outline arrays are inconsistent (tag count, contour end indices).
    #[error("malformed outline: {0}")]
    MalformedOutline(String),

    /// The glyph source has no entry for this glyph id.
    #[error("glyph {0} not found")]
    MissingGlyph(u32),

    /// The polygon tesselator reported a fault.
    #[error("tesselation failed: {0}")]
    Tesselation(String),
}
