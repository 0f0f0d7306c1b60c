//! Playback-speed adjustment.

use clipkit_core::{Encoded, Error, Result};

use super::{push_encode_args, AudioEncode, OpCtx};
use crate::command::ToolCommand;
use crate::filter::{Filter, FilterChain, FilterGraph};

/// Decompose a speed factor into `atempo` stages.
///
/// The primitive only operates in [0.5, 2.0], so out-of-range factors are
/// expressed as a chain: emit `2.0` stages while the remainder exceeds 2.0,
/// `0.5` stages while it is below 0.5, then the in-range remainder. The
/// product of the returned stages reconstructs `factor`.
pub fn tempo_chain(factor: f64) -> Vec<f64> {
    let mut stages = Vec::new();
    let mut rest = factor;
    while rest > 2.0 {
        stages.push(2.0);
        rest /= 2.0;
    }
    while rest < 0.5 {
        stages.push(0.5);
        rest *= 2.0;
    }
    stages.push(rest);
    stages
}

/// Adjust playback speed of both tracks.
///
/// Parameters: `speed` (float, clamped to [0.25, 4.0], default 2.0) and
/// `slow` (bool) which inverts the factor. Video timing scales by the
/// inverse of the effective factor; audio tempo goes through
/// [`tempo_chain`].
pub fn speed(ctx: &OpCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ctx.cancel.checkpoint()?;

    let speed = ctx.args.float_or("speed", 2.0).clamp(0.25, 4.0);
    let slow = ctx.args.bool_or("slow", false);
    let effective = if slow { 1.0 / speed } else { speed };

    let ext = ctx.in_ext();
    let input_file = ctx.temp(&ext);
    input_file.write(input)?;
    let output = ctx.temp(&ext);

    let mut audio = FilterChain::new();
    for stage in tempo_chain(effective) {
        audio.push(Filter::new("atempo").value(stage));
    }
    let graph = FilterGraph::new()
        .branch(
            &["0:v"],
            FilterChain::new()
                .filter(Filter::new("setpts").value(format!("{}*PTS", 1.0 / effective))),
            &["v"],
        )
        .branch(&["0:a"], audio, &["a"]);

    let mut cmd = ToolCommand::new("ffmpeg");
    cmd.args(["-y", "-i"]);
    cmd.arg(input_file.path().display().to_string());
    cmd.arg("-filter_complex");
    cmd.arg(graph.to_string());
    cmd.args(["-map", "[v]", "-map", "[a]"]);
    push_encode_args(&mut cmd, AudioEncode::Aac);
    cmd.arg(output.path().display().to_string());

    ctx.runner
        .run(&cmd)
        .map_err(|_| Error::tool("ffmpeg", "speed adjustment failed"))?;

    let data = output.read()?;
    Ok(Encoded::new(data, ext))
}
