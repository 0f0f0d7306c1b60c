//! Quote-card composition.
//!
//! Layout mirrors the classic "quote this message" card: the avatar is
//! desaturated, bounded to a square target, framed, and placed beside a
//! panel holding the author name over the quoted text, all on a dark
//! backdrop. The cancellation flag is consulted before each major
//! compositing stage.

use std::io::Cursor;
use std::path::Path;

use clipkit_core::{ArgBag, CancelFlag, Encoded, Error, Result};
use image::{imageops, DynamicImage, ImageFormat, Pixel, Rgba, RgbaImage};

use crate::text::{TextRasterizer, TextStyle};

/// Square bound for the avatar; the longer dimension never exceeds it.
const AVATAR_TARGET: u32 = 320;
/// Border width of the avatar frame.
const FRAME_PADDING: u32 = 24;
/// Padding inside the text panel.
const INNER_PADDING: u32 = 60;
/// Padding around the final composition.
const OUTER_PADDING: u32 = 80;
/// Gap between the framed avatar and the text panel.
const COLUMN_SPACING: u32 = 80;
/// Wrap width for both text layers.
const TEXT_WRAP_WIDTH: u32 = 720;

const NAME_SIZE: f32 = 58.0;
const QUOTE_SIZE: f32 = 46.0;

const NAME_COLOR: Rgba<u8> = Rgba([0xf5, 0xf5, 0xf5, 0xff]);
const QUOTE_COLOR: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
const FRAME_COLOR: Rgba<u8> = Rgba([32, 32, 32, 255]);
const PANEL_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const BACKDROP_COLOR: Rgba<u8> = Rgba([18, 18, 18, 255]);

/// Compose a quote card from an avatar buffer plus `text`, `username`, and
/// `font` (font file path) parameters. Output is PNG.
pub fn quote(
    rasterizer: &dyn TextRasterizer,
    args: &ArgBag,
    cancel: &CancelFlag,
    avatar: &[u8],
) -> Result<Encoded> {
    let text = require_str(args, "text")?;
    let username = require_str(args, "username")?;
    let font = require_str(args, "font")?;

    cancel.checkpoint()?;
    let decoded = image::load_from_memory(avatar)
        .map_err(|e| Error::Decode(format!("avatar decode failed: {e}")))?
        .to_rgba8();
    let framed = framed_avatar(decoded);

    cancel.checkpoint()?;
    let panel = text_panel(rasterizer, Path::new(&font), &username, &text)?;

    cancel.checkpoint()?;
    let composed = side_by_side(&framed, &panel);

    cancel.checkpoint()?;
    encode_png(&composed)
}

/// Compose just the text panel (name over quote) with no avatar, from
/// `text`, `username`, and `font` parameters. Output is PNG.
pub fn text_card(
    rasterizer: &dyn TextRasterizer,
    args: &ArgBag,
    cancel: &CancelFlag,
) -> Result<Encoded> {
    let text = require_str(args, "text")?;
    let username = require_str(args, "username")?;
    let font = require_str(args, "font")?;

    cancel.checkpoint()?;
    let panel = text_panel(rasterizer, Path::new(&font), &username, &text)?;

    cancel.checkpoint()?;
    encode_png(&panel)
}

fn require_str(args: &ArgBag, key: &str) -> Result<String> {
    match args.str(key) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::validation(format!("missing required argument: {key}"))),
    }
}

/// Desaturate in place, preserving the alpha channel.
pub(crate) fn desaturate(img: &mut RgbaImage) {
    for pixel in img.pixels_mut() {
        let luma = pixel.to_luma()[0];
        *pixel = Rgba([luma, luma, luma, pixel[3]]);
    }
}

/// Uniformly scale so the longer dimension fits [`AVATAR_TARGET`].
///
/// The factor is the minimum of the width and height ratios, floored at 1.0
/// if the computed value is non-positive, so the result never exceeds the
/// target footprint.
pub(crate) fn scale_to_target(img: &RgbaImage) -> RgbaImage {
    let (w, h) = img.dimensions();
    let mut scale = f64::min(
        AVATAR_TARGET as f64 / w as f64,
        AVATAR_TARGET as f64 / h as f64,
    );
    if scale <= 0.0 {
        scale = 1.0;
    }
    let new_w = ((w as f64 * scale).round() as u32).max(1);
    let new_h = ((h as f64 * scale).round() as u32).max(1);
    imageops::resize(img, new_w, new_h, imageops::FilterType::Lanczos3)
}

/// Desaturate, scale, center on a padded transparent canvas, and frame.
pub(crate) fn framed_avatar(mut avatar: RgbaImage) -> RgbaImage {
    desaturate(&mut avatar);
    let scaled = scale_to_target(&avatar);

    let canvas_w = AVATAR_TARGET.max(scaled.width());
    let canvas_h = AVATAR_TARGET.max(scaled.height());
    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba([0, 0, 0, 0]));
    let offset_x = (canvas_w - scaled.width()) / 2;
    let offset_y = (canvas_h - scaled.height()) / 2;
    imageops::overlay(&mut canvas, &scaled, offset_x as i64, offset_y as i64);

    let mut frame = RgbaImage::from_pixel(
        canvas_w + FRAME_PADDING * 2,
        canvas_h + FRAME_PADDING * 2,
        FRAME_COLOR,
    );
    imageops::overlay(&mut frame, &canvas, FRAME_PADDING as i64, FRAME_PADDING as i64);
    frame
}

/// Rasterize name and quote layers and stack them on a black panel.
fn text_panel(
    rasterizer: &dyn TextRasterizer,
    font: &Path,
    username: &str,
    text: &str,
) -> Result<RgbaImage> {
    let name_layer = rasterizer.render(
        username,
        &TextStyle {
            font,
            size_px: NAME_SIZE,
            color: NAME_COLOR,
            wrap_width: TEXT_WRAP_WIDTH,
        },
    )?;
    let quote_layer = rasterizer.render(
        text,
        &TextStyle {
            font,
            size_px: QUOTE_SIZE,
            color: QUOTE_COLOR,
            wrap_width: TEXT_WRAP_WIDTH,
        },
    )?;

    let panel_w = name_layer.width().max(quote_layer.width()) + INNER_PADDING * 2;
    let panel_h = name_layer.height() + quote_layer.height() + INNER_PADDING * 3;
    let mut panel = RgbaImage::from_pixel(panel_w, panel_h, PANEL_COLOR);
    imageops::overlay(
        &mut panel,
        &name_layer,
        INNER_PADDING as i64,
        INNER_PADDING as i64,
    );
    imageops::overlay(
        &mut panel,
        &quote_layer,
        INNER_PADDING as i64,
        (INNER_PADDING * 2 + name_layer.height()) as i64,
    );
    Ok(panel)
}

/// Lay the framed avatar and the text panel side by side, vertically
/// centered, on the dark backdrop.
fn side_by_side(avatar: &RgbaImage, panel: &RgbaImage) -> RgbaImage {
    let content_h = avatar.height().max(panel.height());
    let width = OUTER_PADDING * 2 + avatar.width() + COLUMN_SPACING + panel.width();
    let height = OUTER_PADDING * 2 + content_h;

    let mut backdrop = RgbaImage::from_pixel(width, height, BACKDROP_COLOR);
    let avatar_y = OUTER_PADDING + (content_h - avatar.height()) / 2;
    let panel_x = OUTER_PADDING + avatar.width() + COLUMN_SPACING;
    let panel_y = OUTER_PADDING + (content_h - panel.height()) / 2;

    imageops::overlay(&mut backdrop, avatar, OUTER_PADDING as i64, avatar_y as i64);
    imageops::overlay(&mut backdrop, panel, panel_x as i64, panel_y as i64);

    tracing::debug!("composed quote card {}x{}", width, height);
    backdrop
}

fn encode_png(img: &RgbaImage) -> Result<Encoded> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| Error::Decode(format!("png encode failed: {e}")))?;
    Ok(Encoded::new(buf.into_inner(), "png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic rasterizer: a solid block sized from character count.
    struct BlockRasterizer;

    impl TextRasterizer for BlockRasterizer {
        fn render(&self, text: &str, style: &TextStyle<'_>) -> Result<RgbaImage> {
            let width = ((text.chars().count() as f32 * style.size_px * 0.5).ceil() as u32)
                .clamp(1, style.wrap_width);
            let height = (style.size_px * 1.25).ceil() as u32;
            Ok(RgbaImage::from_pixel(width, height, style.color))
        }
    }

    fn base_args() -> ArgBag {
        ArgBag::new()
            .with("text", "never gonna give you up")
            .with("username", "rick")
            .with("font", "/fonts/any.ttf")
    }

    fn png_avatar(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([200, 40, 40, 255]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn desaturation_preserves_alpha() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([200, 50, 10, 123]));
        desaturate(&mut img);
        for pixel in img.pixels() {
            assert_eq!(pixel[0], pixel[1]);
            assert_eq!(pixel[1], pixel[2]);
            assert_eq!(pixel[3], 123);
        }
    }

    #[test]
    fn large_avatar_scales_down_to_target_bound() {
        let img = RgbaImage::new(1000, 500);
        let scaled = scale_to_target(&img);
        assert_eq!(scaled.dimensions(), (320, 160));
    }

    #[test]
    fn small_avatar_never_exceeds_target_footprint() {
        let img = RgbaImage::new(10, 20);
        let scaled = scale_to_target(&img);
        assert!(scaled.width() <= AVATAR_TARGET);
        assert!(scaled.height() <= AVATAR_TARGET);
        // The longer dimension lands exactly on the bound.
        assert_eq!(scaled.height(), AVATAR_TARGET);
        assert_eq!(scaled.width(), AVATAR_TARGET / 2);
    }

    #[test]
    fn square_avatar_at_target_is_untouched() {
        let img = RgbaImage::new(320, 320);
        let scaled = scale_to_target(&img);
        assert_eq!(scaled.dimensions(), (320, 320));
    }

    #[test]
    fn framed_avatar_has_frame_border() {
        let framed = framed_avatar(RgbaImage::new(640, 640));
        assert_eq!(framed.dimensions(), (320 + 48, 320 + 48));
        // Border pixels carry the frame color.
        assert_eq!(framed.get_pixel(0, 0), &FRAME_COLOR);
    }

    #[test]
    fn quote_composes_to_decodable_png() {
        let args = base_args();
        let cancel = CancelFlag::new();
        let result = quote(&BlockRasterizer, &args, &cancel, &png_avatar(64, 64)).unwrap();
        assert_eq!(result.format, "png");

        let decoded = image::load_from_memory(&result.data).unwrap();
        // Backdrop must fit the framed avatar plus padding on both axes.
        assert!(decoded.width() > 368 + 2 * OUTER_PADDING);
        assert!(decoded.height() >= 368 + 2 * OUTER_PADDING);
    }

    #[test]
    fn quote_requires_text_username_and_font() {
        let cancel = CancelFlag::new();
        let incomplete = [
            ArgBag::new().with("username", "rick").with("font", "/f.ttf"),
            ArgBag::new().with("text", "quote").with("font", "/f.ttf"),
            ArgBag::new().with("text", "quote").with("username", "rick"),
        ];
        for args in incomplete {
            let err = quote(&BlockRasterizer, &args, &cancel, &png_avatar(8, 8)).unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
    }

    #[test]
    fn invalid_avatar_is_a_decode_error() {
        let args = base_args();
        let cancel = CancelFlag::new();
        let err = quote(&BlockRasterizer, &args, &cancel, b"not an image").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn cancellation_before_first_stage_kills() {
        let args = base_args();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = quote(&BlockRasterizer, &args, &cancel, &png_avatar(8, 8)).unwrap_err();
        assert!(matches!(err, Error::Killed));
    }

    #[test]
    fn text_card_is_the_panel_alone() {
        let args = base_args();
        let cancel = CancelFlag::new();
        let result = text_card(&BlockRasterizer, &args, &cancel).unwrap();
        assert_eq!(result.format, "png");

        let decoded = image::load_from_memory(&result.data).unwrap().to_rgba8();
        // Corners are panel-colored, not backdrop-colored.
        assert_eq!(decoded.get_pixel(0, 0), &PANEL_COLOR);
        // Sized to the wider layer plus inner padding on both sides.
        let name_w = ("rick".chars().count() as f32 * NAME_SIZE * 0.5).ceil() as u32;
        let quote_w = ("never gonna give you up".chars().count() as f32 * QUOTE_SIZE * 0.5)
            .ceil() as u32;
        let expected_w = name_w.max(quote_w.min(TEXT_WRAP_WIDTH)) + 2 * INNER_PADDING;
        assert_eq!(decoded.width(), expected_w);
    }
}
