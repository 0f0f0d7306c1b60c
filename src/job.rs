//! Job and result model.

use bytes::Bytes;
use clipkit_core::ArgBag;

/// One request to perform a named media transformation.
///
/// Immutable after creation; ownership moves to the engine on submit. An
/// empty input buffer means "no input" and routes the job to the generator
/// handler table.
#[derive(Debug, Clone)]
pub struct Job {
    /// Operation name, e.g. `videospeed` or `quote`.
    pub operation: String,
    /// Declared input format tag, e.g. `mp4`.
    pub input_format: String,
    /// Input bytes; empty means no input.
    pub input: Bytes,
    /// Typed parameters.
    pub args: ArgBag,
}

impl Job {
    /// Create a job with an input buffer.
    pub fn new(
        operation: impl Into<String>,
        input_format: impl Into<String>,
        input: impl Into<Bytes>,
        args: ArgBag,
    ) -> Self {
        Self {
            operation: operation.into(),
            input_format: input_format.into(),
            input: input.into(),
            args,
        }
    }

    /// Create an input-less generator job.
    pub fn generator(operation: impl Into<String>, args: ArgBag) -> Self {
        Self {
            operation: operation.into(),
            input_format: String::new(),
            input: Bytes::new(),
            args,
        }
    }
}

/// Terminal outcome of a job. Exactly one is produced per submission.
#[derive(Debug, Clone)]
pub enum JobResult {
    /// The transformation produced output; buffer ownership transfers to the
    /// caller. An empty buffer is a valid (empty) success.
    Success {
        /// Output bytes.
        data: Bytes,
        /// Declared output format tag.
        format: String,
    },
    /// The transformation failed.
    Failure {
        /// Human-readable failure message.
        message: String,
        /// Supplementary detail, when the failure carries one.
        detail: Option<String>,
    },
    /// The job observed its cancellation flag and stopped.
    Killed,
}

impl JobResult {
    /// Whether this is a [`JobResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, JobResult::Success { .. })
    }

    /// Whether this is [`JobResult::Killed`].
    pub fn is_killed(&self) -> bool {
        matches!(self, JobResult::Killed)
    }
}
