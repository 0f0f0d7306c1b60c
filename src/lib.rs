//! # clipkit
//!
//! Embeddable media-transformation job engine.
//!
//! A host hands the engine a [`Job`]: a named operation, an optional input
//! buffer, a declared input format tag, and an [`ArgBag`] of parameters. The
//! engine runs the transformation on a blocking worker and resolves a future
//! with exactly one [`JobResult`]: a result buffer with its declared output
//! format, a structured failure, or a killed outcome after cooperative
//! cancellation.
//!
//! ```no_run
//! use clipkit::{ArgBag, Engine, EngineConfig, Job};
//!
//! # async fn example(video: Vec<u8>) {
//! let engine = Engine::new(&EngineConfig::default());
//! let args = ArgBag::new().with("speed", 2.0);
//! let job = Job::new("videospeed", "mp4", video, args);
//! let submitted = engine.submit(job);
//! let result = submitted.wait().await;
//! # let _ = result;
//! # }
//! ```

pub mod dispatch;
pub mod engine;
pub mod job;

// ---- Re-exports for convenience ----

pub use dispatch::{HandlerCtx, Registry};
pub use engine::{Engine, SubmittedJob};
pub use job::{Job, JobResult};

pub use clipkit_core::{ArgBag, ArgValue, CancelFlag, Encoded, EngineConfig, Error, Result};
