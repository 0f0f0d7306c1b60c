//! Reverse playback of both tracks.

use clipkit_core::{Encoded, Error, Result};

use super::{push_encode_args, AudioEncode, OpCtx};
use crate::command::ToolCommand;

/// Reverse video and audio. No parameters.
pub fn reverse(ctx: &OpCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ctx.cancel.checkpoint()?;

    let ext = ctx.in_ext();
    let input_file = ctx.temp(&ext);
    input_file.write(input)?;
    let output = ctx.temp(&ext);

    let mut cmd = ToolCommand::new("ffmpeg");
    cmd.args(["-y", "-i"]);
    cmd.arg(input_file.path().display().to_string());
    cmd.args(["-vf", "reverse", "-af", "areverse"]);
    push_encode_args(&mut cmd, AudioEncode::Aac);
    cmd.arg(output.path().display().to_string());

    ctx.runner
        .run(&cmd)
        .map_err(|_| Error::tool("ffmpeg", "reverse failed"))?;

    let data = output.read()?;
    Ok(Encoded::new(data, ext))
}
