//! Single-caption text overlay.

use clipkit_core::{Encoded, Error, Result};

use super::{push_encode_args, AudioEncode, OpCtx};
use crate::command::ToolCommand;
use crate::filter::{drawtext, FilterChain};

/// Draw a caption over the video.
///
/// Parameters: `caption` (text), `position` (`top` or `bottom`, default
/// `top`), `font_size` (clamped to [12, 72], default 32). Audio passes
/// through untouched.
pub fn caption(ctx: &OpCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ctx.cancel.checkpoint()?;

    let text = ctx.args.str_or("caption", "");
    let position = ctx.args.str_or("position", "top");
    let font_size = ctx.args.int_or("font_size", 32).clamp(12, 72);

    let ext = ctx.in_ext();
    let input_file = ctx.temp(&ext);
    input_file.write(input)?;
    let output = ctx.temp(&ext);

    let y_expr = if position == "bottom" { "(h-th-20)" } else { "20" };
    let chain = FilterChain::new().filter(drawtext(&text, font_size, 3, y_expr));

    let mut cmd = ToolCommand::new("ffmpeg");
    cmd.args(["-y", "-i"]);
    cmd.arg(input_file.path().display().to_string());
    cmd.arg("-vf");
    cmd.arg(chain.to_string());
    push_encode_args(&mut cmd, AudioEncode::Copy);
    cmd.arg(output.path().display().to_string());

    ctx.runner
        .run(&cmd)
        .map_err(|_| Error::tool("ffmpeg", "caption failed"))?;

    let data = output.read()?;
    Ok(Encoded::new(data, ext))
}
