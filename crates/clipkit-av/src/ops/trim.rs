//! Trim to a time window.

use clipkit_core::{Encoded, Error, Result};

use super::{push_encode_args, AudioEncode, OpCtx};
use crate::command::ToolCommand;

/// Trim the input with seek-then-limit semantics.
///
/// Parameters: `start` (seconds, clamped to >= 0, default 0) and `duration`
/// (seconds, clamped to [0.5, 60.0], default 10).
pub fn trim(ctx: &OpCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ctx.cancel.checkpoint()?;

    let start = ctx.args.float_or("start", 0.0).max(0.0);
    let duration = ctx.args.float_or("duration", 10.0).clamp(0.5, 60.0);

    let ext = ctx.in_ext();
    let input_file = ctx.temp(&ext);
    input_file.write(input)?;
    let output = ctx.temp(&ext);

    let mut cmd = ToolCommand::new("ffmpeg");
    cmd.arg("-y");
    cmd.arg("-ss");
    cmd.arg(start.to_string());
    cmd.arg("-i");
    cmd.arg(input_file.path().display().to_string());
    cmd.arg("-t");
    cmd.arg(duration.to_string());
    push_encode_args(&mut cmd, AudioEncode::Aac);
    cmd.arg(output.path().display().to_string());

    ctx.runner
        .run(&cmd)
        .map_err(|_| Error::tool("ffmpeg", "trim failed"))?;

    let data = output.read()?;
    Ok(Encoded::new(data, ext))
}
