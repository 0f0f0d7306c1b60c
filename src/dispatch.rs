//! Command dispatch: operation name + input presence -> handler.
//!
//! Two handler tables are kept: operations that require input bytes and
//! generator operations that take none. A non-empty input buffer selects the
//! first table, an empty one the second; a failed lookup is reported
//! immediately rather than silently doing nothing. The one cross-cutting
//! rule lives here too: a `togif` flag in the parameter bag forces the
//! declared output format of a successful result to `gif`, whatever the
//! handler declared.

use std::collections::HashMap;
use std::path::Path;

use clipkit_av::command::CommandRunner;
use clipkit_av::ops::{self, OpCtx};
use clipkit_card::compose;
use clipkit_card::text::TextRasterizer;
use clipkit_core::{ArgBag, CancelFlag, Encoded, Error, Result};

/// Output format tag forced by the `togif` override.
const ANIMATED_FORMAT: &str = "gif";

/// Everything a handler needs for one invocation.
pub struct HandlerCtx<'a> {
    /// Runner for external-tool commands.
    pub runner: &'a dyn CommandRunner,
    /// Rasterizer for text layers.
    pub rasterizer: &'a dyn TextRasterizer,
    /// Directory scratch files are created in.
    pub scratch_dir: &'a Path,
    /// Declared input format tag.
    pub in_format: &'a str,
    /// Job parameters.
    pub args: &'a ArgBag,
    /// Cooperative cancellation flag.
    pub cancel: &'a CancelFlag,
}

impl<'a> HandlerCtx<'a> {
    fn op_ctx(&self) -> OpCtx<'a> {
        OpCtx {
            runner: self.runner,
            scratch_dir: self.scratch_dir,
            in_format: self.in_format,
            args: self.args,
            cancel: self.cancel,
        }
    }
}

/// Handler for an operation that consumes input bytes.
pub type InputHandler = fn(&HandlerCtx<'_>, &[u8]) -> Result<Encoded>;

/// Handler for an operation that generates output from parameters alone.
pub type GeneratorHandler = fn(&HandlerCtx<'_>) -> Result<Encoded>;

/// The two handler tables.
#[derive(Clone)]
pub struct Registry {
    with_input: HashMap<&'static str, InputHandler>,
    generators: HashMap<&'static str, GeneratorHandler>,
}

impl Registry {
    /// Create a registry with no handlers.
    pub fn empty() -> Self {
        Self {
            with_input: HashMap::new(),
            generators: HashMap::new(),
        }
    }

    /// Create a registry with the canonical operation set.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register("videospeed", run_speed);
        registry.register("videoreverse", run_reverse);
        registry.register("videocaption", run_caption);
        registry.register("videomeme", run_meme);
        registry.register("videotogif", run_togif);
        registry.register("videotrim", run_trim);
        registry.register("videostitch", run_stitch);
        registry.register("videoaudio", run_audio);
        registry.register("quote", run_quote);
        registry.register_generator("card", run_card);
        registry
    }

    /// Register (or replace) an input-consuming handler.
    pub fn register(&mut self, operation: &'static str, handler: InputHandler) {
        self.with_input.insert(operation, handler);
    }

    /// Register (or replace) a generator handler.
    pub fn register_generator(&mut self, operation: &'static str, handler: GeneratorHandler) {
        self.generators.insert(operation, handler);
    }

    /// All registered operation names, sorted.
    pub fn operations(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .with_input
            .keys()
            .chain(self.generators.keys())
            .copied()
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Select and invoke the handler for `operation`.
    ///
    /// A non-empty `input` selects the input-consuming table, an empty one
    /// the generator table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOperation`] when no handler is registered for
    /// the operation in the selected table, plus whatever the handler itself
    /// reports.
    pub fn dispatch(
        &self,
        operation: &str,
        ctx: &HandlerCtx<'_>,
        input: &[u8],
    ) -> Result<Encoded> {
        let mut output = if input.is_empty() {
            let handler = self
                .generators
                .get(operation)
                .ok_or_else(|| Error::UnknownOperation(operation.to_string()))?;
            handler(ctx)?
        } else {
            let handler = self
                .with_input
                .get(operation)
                .ok_or_else(|| Error::UnknownOperation(operation.to_string()))?;
            handler(ctx, input)?
        };

        if ctx.args.bool_or("togif", false) {
            output.format = ANIMATED_FORMAT.to_string();
        }
        Ok(output)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

// ---- Handler adapters -----------------------------------------------------

fn run_speed(ctx: &HandlerCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ops::speed::speed(&ctx.op_ctx(), input)
}

fn run_reverse(ctx: &HandlerCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ops::reverse::reverse(&ctx.op_ctx(), input)
}

fn run_caption(ctx: &HandlerCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ops::caption::caption(&ctx.op_ctx(), input)
}

fn run_meme(ctx: &HandlerCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ops::meme::meme(&ctx.op_ctx(), input)
}

fn run_togif(ctx: &HandlerCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ops::togif::togif(&ctx.op_ctx(), input)
}

fn run_trim(ctx: &HandlerCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ops::trim::trim(&ctx.op_ctx(), input)
}

fn run_stitch(ctx: &HandlerCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ops::stitch::stitch(&ctx.op_ctx(), input)
}

fn run_audio(ctx: &HandlerCtx<'_>, input: &[u8]) -> Result<Encoded> {
    ops::audio::audio(&ctx.op_ctx(), input)
}

fn run_quote(ctx: &HandlerCtx<'_>, input: &[u8]) -> Result<Encoded> {
    compose::quote(ctx.rasterizer, ctx.args, ctx.cancel, input)
}

fn run_card(ctx: &HandlerCtx<'_>) -> Result<Encoded> {
    compose::text_card(ctx.rasterizer, ctx.args, ctx.cancel)
}
