//! Top/bottom meme text overlay.

use clipkit_core::{Encoded, Error, Result};

use super::{push_encode_args, AudioEncode, OpCtx};
use crate::command::ToolCommand;
use crate::filter::{drawtext, FilterChain};

/// Draw top and/or bottom meme text over the video.
///
/// Parameters: `top` and `bottom` texts (each independently omitted when
/// empty; with both empty the video is re-encoded without a filter) and
/// `font_size` (clamped to [16, 96], default 48).
pub fn meme(ctx: &OpCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ctx.cancel.checkpoint()?;

    let top = ctx.args.str_or("top", "");
    let bottom = ctx.args.str_or("bottom", "");
    let font_size = ctx.args.int_or("font_size", 48).clamp(16, 96);

    let ext = ctx.in_ext();
    let input_file = ctx.temp(&ext);
    input_file.write(input)?;
    let output = ctx.temp(&ext);

    let mut chain = FilterChain::new();
    if !top.is_empty() {
        chain.push(drawtext(&top, font_size, 4, "20"));
    }
    if !bottom.is_empty() {
        chain.push(drawtext(&bottom, font_size, 4, "(h-th-20)"));
    }

    let mut cmd = ToolCommand::new("ffmpeg");
    cmd.args(["-y", "-i"]);
    cmd.arg(input_file.path().display().to_string());
    if !chain.is_empty() {
        cmd.arg("-vf");
        cmd.arg(chain.to_string());
    }
    push_encode_args(&mut cmd, AudioEncode::Copy);
    cmd.arg(output.path().display().to_string());

    ctx.runner
        .run(&cmd)
        .map_err(|_| Error::tool("ffmpeg", "meme text failed"))?;

    let data = output.read()?;
    Ok(Encoded::new(data, ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::testing::{files_in, FakeRunner};
    use clipkit_core::{ArgBag, CancelFlag};

    fn run_meme(runner: &FakeRunner, dir: &std::path::Path, args: &ArgBag) -> Result<Encoded> {
        let cancel = CancelFlag::new();
        let ctx = OpCtx {
            runner,
            scratch_dir: dir,
            in_format: "mp4",
            args,
            cancel: &cancel,
        };
        meme(&ctx, b"input")
    }

    #[test]
    fn both_texts_concatenate_into_one_filter() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::ok();
        let args = ArgBag::new().with("top", "one").with("bottom", "two");
        run_meme(&runner, dir.path(), &args).unwrap();

        let argv = runner.call(0);
        let vf = argv.iter().position(|a| a == "-vf").unwrap();
        let filter = &argv[vf + 1];
        assert!(filter.contains("text='one'"), "vf: {filter}");
        assert!(filter.contains("text='two'"), "vf: {filter}");
        assert!(filter.contains(":y=20"), "vf: {filter}");
        assert!(filter.contains(":y=(h-th-20)"), "vf: {filter}");
        assert_eq!(filter.matches("drawtext").count(), 2);
    }

    #[test]
    fn empty_top_is_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::ok();
        let args = ArgBag::new().with("bottom", "only bottom");
        run_meme(&runner, dir.path(), &args).unwrap();

        let argv = runner.call(0);
        let vf = argv.iter().position(|a| a == "-vf").unwrap();
        let filter = &argv[vf + 1];
        assert_eq!(filter.matches("drawtext").count(), 1);
        assert!(filter.contains(":y=(h-th-20)"));
    }

    #[test]
    fn no_text_means_no_filter_argument() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::ok();
        let args = ArgBag::new();
        run_meme(&runner, dir.path(), &args).unwrap();
        let argv = runner.call(0);
        assert!(!argv.iter().any(|a| a == "-vf"));
        assert_eq!(files_in(dir.path()), 0);
    }

    #[test]
    fn font_size_is_clamped_to_meme_range() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeRunner::ok();
        let args = ArgBag::new().with("top", "hi").with("font_size", 500i64);
        run_meme(&runner, dir.path(), &args).unwrap();
        let argv = runner.call(0);
        let vf = argv.iter().position(|a| a == "-vf").unwrap();
        assert!(argv[vf + 1].contains("fontsize=96"));
    }
}
