//! # clipkit-av
//!
//! External-tool invocation and ffmpeg-backed transformations for the
//! clipkit engine.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache the path to the
//!   ffmpeg binary, honoring a configured override.
//! - **Command execution** ([`ToolCommand`], [`CommandRunner`],
//!   [`SystemRunner`]) -- structured argv built per invocation, run
//!   synchronously on the worker with all diagnostic output discarded.
//! - **Scratch files** ([`scratch::TempFile`], [`scratch::JobScope`]) --
//!   collision-free temp paths with removal guaranteed on every exit path.
//! - **Filter graphs** ([`filter`]) -- structured builder for `-vf` /
//!   `-filter_complex` values with a single text-escaping function.
//! - **Operations** ([`ops`]) -- speed, reverse, caption, meme, togif, trim,
//!   stitch, and audio extraction.

pub mod command;
pub mod filter;
pub mod ops;
pub mod scratch;
pub mod tools;

// ---- Re-exports for convenience ----

pub use command::{CommandRunner, SystemRunner, ToolCommand};
pub use filter::{escape_text, Filter, FilterChain, FilterGraph};
pub use scratch::{sanitize_ext, JobScope, TempFile};
pub use tools::{ToolConfig, ToolRegistry};
