//! Glyph outline vectorisation and polygon meshing.
//!
//! Pipeline: `RawOutline` (tagged points per contour) → `Contour`s (flattened
//! closed loops with optional outsets) → `Mesh` (tagged primitive batches) →
//! `RenderableGeometry` for one glyph.
//!
//! API Policy
//! - Coordinates are f64 throughout; points carry a z for extrusion.
//! - Library calls report problems as `GeometryError` values, never by
//!   panicking on malformed outlines.

pub mod bezier;
pub mod contour;
pub mod error;
pub mod glyph;
pub mod mesh;
pub mod outline;
pub mod point;
pub mod sample;
pub mod vectoriser;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::GeometryError;
pub use nalgebra::Vector2 as Vec2;
pub use point::Point;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::contour::{Contour, OutsetDirection};
    pub use crate::error::GeometryError;
    pub use crate::glyph::{
        build_all, ExtrudeCfg, GeometryKind, GlyphFormat, GlyphGeometry, GlyphSlot, GlyphSource,
        RenderableGeometry,
    };
    pub use crate::mesh::{
        tesselate, Mesh, MeshCfg, OutsetSelector, PrimitiveKind, Tesselation, ZNormal,
    };
    pub use crate::outline::{FillRule, PointTag, RawOutline, RawPoint};
    pub use crate::point::{point, Point};
    pub use crate::sample::{draw_outline_radial, RadialCfg, ReplayToken, VertexCount};
    pub use crate::vectoriser::Vectoriser;
}
