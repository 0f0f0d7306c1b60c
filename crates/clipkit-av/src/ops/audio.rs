//! Audio extraction with escalating fallback strategies.

use clipkit_core::{Encoded, Error, Result};

use super::OpCtx;
use crate::command::ToolCommand;

/// Extraction strategies in fixed escalation order: explicit-stream-mapped
/// primary encoder, permissive optional-stream encoder, forced-resample
/// re-encode, raw stream copy.
const STRATEGIES: [&[&str]; 4] = [
    &["-map", "0:a:0", "-acodec", "libmp3lame", "-q:a", "2"],
    &["-map", "0:a?", "-acodec", "mp3", "-q:a", "2"],
    &["-acodec", "libmp3lame", "-ar", "44100", "-ac", "2", "-b:a", "192k"],
    &["-acodec", "copy"],
];

/// Extract the audio track as MP3.
///
/// Strategies are attempted in order, stopping at the first whose invocation
/// succeeds *and* whose output file exists; a stale output is removed before
/// each retry. Exhausting all four fails the operation.
pub fn audio(ctx: &OpCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ctx.cancel.checkpoint()?;

    let input_file = ctx.temp(&ctx.in_ext());
    input_file.write(input)?;
    let output = ctx.temp("mp3");

    let mut extracted = false;
    for (i, strategy) in STRATEGIES.iter().enumerate() {
        if i > 0 {
            output.clear();
            ctx.cancel.checkpoint()?;
        }

        let mut cmd = ToolCommand::new("ffmpeg");
        cmd.args(["-y", "-i"]);
        cmd.arg(input_file.path().display().to_string());
        cmd.arg("-vn");
        cmd.args(strategy.iter().copied());
        cmd.arg(output.path().display().to_string());

        if ctx.runner.run(&cmd).is_ok() && output.exists() {
            extracted = true;
            break;
        }
    }

    if !extracted {
        return Err(Error::tool("ffmpeg", "audio extraction failed"));
    }

    let data = output.read()?;
    Ok(Encoded::new(data, "mp3"))
}
