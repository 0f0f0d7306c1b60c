//! Concatenate two inputs.

use clipkit_core::{Encoded, Error, Result};

use super::{push_encode_args, AudioEncode, OpCtx};
use crate::command::ToolCommand;

/// Concatenate the input with a second buffer supplied as the `buffer2`
/// parameter.
///
/// A missing or empty second buffer is a validation failure reported before
/// any scratch file is created. Both inputs are assumed to carry compatible
/// codecs; the concat demuxer does no re-encoding negotiation.
pub fn stitch(ctx: &OpCtx<'_>, input: &[u8]) -> Result<Encoded> {
    let second = match ctx.args.blob("buffer2") {
        Some(b) if !b.is_empty() => b.clone(),
        _ => return Err(Error::validation("second video required for stitching")),
    };

    ctx.cancel.checkpoint()?;

    let ext = ctx.in_ext();
    let first_file = ctx.temp(&ext);
    first_file.write(input)?;
    let second_file = ctx.temp(&ext);
    second_file.write(&second)?;

    let list = ctx.temp("txt");
    list.write(
        format!(
            "file '{}'\nfile '{}'\n",
            first_file.path().display(),
            second_file.path().display()
        )
        .as_bytes(),
    )?;
    let output = ctx.temp(&ext);

    let mut cmd = ToolCommand::new("ffmpeg");
    cmd.args(["-y", "-f", "concat", "-safe", "0", "-i"]);
    cmd.arg(list.path().display().to_string());
    push_encode_args(&mut cmd, AudioEncode::Aac);
    cmd.arg(output.path().display().to_string());

    ctx.runner
        .run(&cmd)
        .map_err(|_| Error::tool("ffmpeg", "stitch failed"))?;

    let data = output.read()?;
    Ok(Encoded::new(data, ext))
}
