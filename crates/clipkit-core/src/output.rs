//! Normalized handler output.

/// An encoded result buffer plus its declared format tag.
///
/// Every operation handler resolves to this shape; the engine converts it
/// into the job-level success outcome, transferring buffer ownership to the
/// caller.
#[derive(Debug, Clone)]
pub struct Encoded {
    /// The output bytes. May be empty; an empty buffer with no error is a
    /// valid (empty) success.
    pub data: Vec<u8>,
    /// Declared output format tag, e.g. `mp4`, `gif`, `mp3`, `png`.
    pub format: String,
}

impl Encoded {
    /// Create a new encoded output.
    pub fn new(data: Vec<u8>, format: impl Into<String>) -> Self {
        Self {
            data,
            format: format.into(),
        }
    }
}
