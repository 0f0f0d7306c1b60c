//! ffmpeg-backed operation handlers.
//!
//! Every operation follows the same shape: validate and clamp parameters,
//! write the input buffer to a scratch file, build one or more
//! [`ToolCommand`]s, run them through the [`CommandRunner`], read the output
//! file back, and let the scratch files clean themselves up on every return
//! path. Failures surface a fixed per-operation message; the transcoder's
//! own diagnostics are discarded by design.

pub mod audio;
pub mod caption;
pub mod meme;
pub mod reverse;
pub mod speed;
pub mod stitch;
pub mod togif;
pub mod trim;

use std::path::Path;

use clipkit_core::{ArgBag, CancelFlag};

use crate::command::{CommandRunner, ToolCommand};
use crate::scratch::{sanitize_ext, TempFile};

/// Context shared by every operation invocation.
pub struct OpCtx<'a> {
    /// Runner executing the built commands.
    pub runner: &'a dyn CommandRunner,
    /// Directory scratch files are created in.
    pub scratch_dir: &'a Path,
    /// Declared input format tag (used as the scratch extension).
    pub in_format: &'a str,
    /// Job parameters.
    pub args: &'a ArgBag,
    /// Cooperative cancellation flag, polled between invocations.
    pub cancel: &'a CancelFlag,
}

impl OpCtx<'_> {
    /// Reserve a scratch file in the job's scratch directory.
    pub fn temp(&self, ext: &str) -> TempFile {
        TempFile::create(self.scratch_dir, ext)
    }

    /// Sanitized input extension.
    pub fn in_ext(&self) -> String {
        sanitize_ext(self.in_format)
    }
}

/// Audio handling for the shared encode tail.
pub(crate) enum AudioEncode {
    /// Re-encode audio as 128k AAC.
    Aac,
    /// Pass audio through untouched.
    Copy,
}

/// Append the x264 encode tail shared by the video operations.
pub(crate) fn push_encode_args(cmd: &mut ToolCommand, audio: AudioEncode) {
    cmd.args(["-c:v", "libx264", "-preset", "fast", "-crf", "23"]);
    match audio {
        AudioEncode::Aac => {
            cmd.args(["-c:a", "aac", "-b:a", "128k"]);
        }
        AudioEncode::Copy => {
            cmd.args(["-c:a", "copy"]);
        }
    }
    cmd.args(["-movflags", "+faststart"]);
}
