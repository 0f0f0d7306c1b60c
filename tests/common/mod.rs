//! Shared test harness: a recording fake runner, a deterministic text
//! rasterizer, and an engine wired to an isolated scratch directory.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use clipkit::Engine;
use clipkit_av::command::{CommandRunner, ToolCommand};
use clipkit_card::text::{TextRasterizer, TextStyle};
use clipkit_core::{Error, Result};
use image::RgbaImage;

/// Scripted outcome for one fake invocation.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    /// Report success and write bytes to the output path (last argv).
    Succeed,
    /// Report a tool failure.
    Fail,
    /// Report success but leave no output file behind.
    SucceedWithoutOutput,
}

/// Recording [`CommandRunner`]; unscripted calls succeed.
pub struct FakeRunner {
    calls: Mutex<Vec<Vec<String>>>,
    script: Mutex<VecDeque<Outcome>>,
}

impl FakeRunner {
    pub fn ok() -> Self {
        Self::scripted([])
    }

    pub fn scripted(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(outcomes.into_iter().collect()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// argv of call `index` (tool name excluded).
    pub fn call(&self, index: usize) -> Vec<String> {
        self.calls.lock().unwrap()[index].clone()
    }

    /// Value following `flag` in the argv of call `index`.
    pub fn arg_after(&self, index: usize, flag: &str) -> String {
        let argv = self.call(index);
        let pos = argv
            .iter()
            .position(|a| a == flag)
            .unwrap_or_else(|| panic!("{flag} not in argv: {argv:?}"));
        argv[pos + 1].clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, cmd: &ToolCommand) -> Result<()> {
        self.calls.lock().unwrap().push(cmd.argv().to_vec());
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Outcome::Succeed);
        match outcome {
            Outcome::Succeed => {
                if let Some(out_path) = cmd.argv().last() {
                    std::fs::write(out_path, b"transcoder output")
                        .map_err(|e| Error::resource(out_path.clone(), e.to_string()))?;
                }
                Ok(())
            }
            Outcome::SucceedWithoutOutput => Ok(()),
            Outcome::Fail => Err(Error::tool("ffmpeg", "scripted failure")),
        }
    }
}

/// Deterministic rasterizer: a solid block sized from character count.
pub struct BlockRasterizer;

impl TextRasterizer for BlockRasterizer {
    fn render(&self, text: &str, style: &TextStyle<'_>) -> Result<RgbaImage> {
        let width = ((text.chars().count() as f32 * style.size_px * 0.5).ceil() as u32)
            .clamp(1, style.wrap_width);
        let height = (style.size_px * 1.25).ceil() as u32;
        Ok(RgbaImage::from_pixel(width, height, style.color))
    }
}

/// An engine over a fake runner and an isolated scratch directory.
pub struct TestHarness {
    pub engine: Engine,
    pub runner: Arc<FakeRunner>,
    pub scratch: tempfile::TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::scripted([])
    }

    pub fn scripted(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let scratch = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRunner::scripted(outcomes));
        let engine = Engine::with_parts(
            scratch.path().to_path_buf(),
            runner.clone(),
            Arc::new(BlockRasterizer),
        );
        Self {
            engine,
            runner,
            scratch,
        }
    }

    /// Count of files left in the scratch directory.
    pub fn scratch_files(&self) -> usize {
        std::fs::read_dir(self.scratch.path())
            .map(|it| it.count())
            .unwrap_or(0)
    }
}

/// A small in-memory PNG for quote-card inputs.
pub fn png_avatar(w: u32, h: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(w, h, image::Rgba([180, 60, 60, 255]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}
