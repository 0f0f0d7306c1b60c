//! # clipkit-card
//!
//! Quote-card layout and compositing for the clipkit engine.
//!
//! A quote card places a desaturated, framed avatar next to a text panel
//! holding the author name and the quoted text, on a dark backdrop, encoded
//! as PNG. Text rasterization sits behind the [`TextRasterizer`] trait so
//! the layout algorithms are independent of any particular font stack; the
//! production implementation is [`FontFileRasterizer`] (`ab_glyph` +
//! `imageproc`).

pub mod compose;
pub mod text;

// ---- Re-exports for convenience ----

pub use compose::{quote, text_card};
pub use text::{FontFileRasterizer, TextRasterizer, TextStyle};
