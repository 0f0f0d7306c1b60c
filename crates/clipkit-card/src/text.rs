//! Text rasterization behind a trait seam.
//!
//! The compositing code only needs "styled text in, RGBA layer out"; the
//! trait keeps layout independent of the font stack and lets tests supply a
//! deterministic fake with no font assets.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use clipkit_core::{Error, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

/// Line height as a multiple of the font pixel size.
const LINE_SPACING: f32 = 1.25;

/// Styling for one rasterized text layer.
pub struct TextStyle<'a> {
    /// Path to the font file to render with.
    pub font: &'a Path,
    /// Font size in pixels.
    pub size_px: f32,
    /// Text color.
    pub color: Rgba<u8>,
    /// Maximum layer width; text wraps at word boundaries to fit.
    pub wrap_width: u32,
}

/// Rasterizes styled text into an RGBA layer.
pub trait TextRasterizer: Send + Sync {
    /// Render `text` according to `style`.
    ///
    /// The returned image is tightly sized to the wrapped text on a
    /// transparent background.
    fn render(&self, text: &str, style: &TextStyle<'_>) -> Result<RgbaImage>;
}

/// Production rasterizer loading the font file per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontFileRasterizer;

fn measured_width(font: &FontVec, scale: PxScale, text: &str) -> u32 {
    let (w, _) = text_size(scale, font, text);
    w
}

impl TextRasterizer for FontFileRasterizer {
    fn render(&self, text: &str, style: &TextStyle<'_>) -> Result<RgbaImage> {
        let bytes = std::fs::read(style.font)
            .map_err(|e| Error::resource(style.font.display().to_string(), e.to_string()))?;
        let font = FontVec::try_from_vec(bytes).map_err(|_| {
            Error::Decode(format!("unsupported font file: {}", style.font.display()))
        })?;

        let scale = PxScale::from(style.size_px);
        let lines = wrap_lines(
            |s| measured_width(&font, scale, s),
            text,
            style.wrap_width,
        );

        let line_height = (style.size_px * LINE_SPACING).ceil() as u32;
        let width = lines
            .iter()
            .map(|l| measured_width(&font, scale, l))
            .max()
            .unwrap_or(0)
            .max(1);
        let height = (line_height * lines.len() as u32).max(1);

        let mut layer = RgbaImage::new(width, height);
        for (i, line) in lines.iter().enumerate() {
            draw_text_mut(
                &mut layer,
                style.color,
                0,
                (i as u32 * line_height) as i32,
                scale,
                &font,
                line,
            );
        }
        Ok(layer)
    }
}

/// Greedy word wrap using the supplied measuring function.
///
/// Explicit newlines are honored; a word wider than `max_width` gets its own
/// line rather than being broken mid-word.
pub fn wrap_lines(measure: impl Fn(&str) -> u32, text: &str, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && measure(&candidate) > max_width {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}
