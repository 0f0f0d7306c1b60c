//! Animated GIF conversion via two-pass palette generation.

use clipkit_core::{Encoded, Error, Result};

use super::OpCtx;
use crate::command::ToolCommand;
use crate::filter::{Filter, FilterChain, FilterGraph};

fn frame_filters(fps: i64, width: i64) -> FilterChain {
    FilterChain::new()
        .filter(Filter::new("fps").value(fps))
        .filter(
            Filter::new("scale")
                .value(width)
                .value(-1)
                .param("flags", "lanczos"),
        )
}

/// Convert the input to an animated GIF.
///
/// Parameters: `fps` (clamped to [5, 30], default 15) and `width` (clamped
/// to [120, 720], default 480). Two invocations are required: pass 1 builds
/// a constrained color palette, pass 2 re-renders the input using it. A
/// failed palette pass skips pass 2 entirely; scratch files are cleaned up
/// either way.
pub fn togif(ctx: &OpCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ctx.cancel.checkpoint()?;

    let fps = ctx.args.int_or("fps", 15).clamp(5, 30);
    let width = ctx.args.int_or("width", 480).clamp(120, 720);

    let input_file = ctx.temp(&ctx.in_ext());
    input_file.write(input)?;
    let palette = ctx.temp("png");
    let output = ctx.temp("gif");

    let palette_chain = frame_filters(fps, width).filter(Filter::new("palettegen"));
    let mut palette_cmd = ToolCommand::new("ffmpeg");
    palette_cmd.args(["-y", "-i"]);
    palette_cmd.arg(input_file.path().display().to_string());
    palette_cmd.arg("-vf");
    palette_cmd.arg(palette_chain.to_string());
    palette_cmd.arg(palette.path().display().to_string());

    ctx.runner
        .run(&palette_cmd)
        .map_err(|_| Error::tool("ffmpeg", "palette generation failed"))?;

    ctx.cancel.checkpoint()?;

    let render_graph = FilterGraph::new()
        .branch(&[], frame_filters(fps, width), &["x"])
        .branch(
            &["x", "1:v"],
            FilterChain::new().filter(Filter::new("paletteuse")),
            &[],
        );
    let mut render_cmd = ToolCommand::new("ffmpeg");
    render_cmd.args(["-y", "-i"]);
    render_cmd.arg(input_file.path().display().to_string());
    render_cmd.arg("-i");
    render_cmd.arg(palette.path().display().to_string());
    render_cmd.arg("-lavfi");
    render_cmd.arg(render_graph.to_string());
    render_cmd.arg(output.path().display().to_string());

    ctx.runner
        .run(&render_cmd)
        .map_err(|_| Error::tool("ffmpeg", "gif conversion failed"))?;

    let data = output.read()?;
    Ok(Encoded::new(data, "gif"))
}
