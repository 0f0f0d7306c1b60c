//! Engine configuration.
//!
//! Deserialized from JSON; every field defaults sensibly so a completely
//! empty `{}` document is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for an [`Engine`](https://docs.rs/clipkit) instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Explicit path to the ffmpeg binary. When absent (or the path does not
    /// exist) the binary is located via `PATH`.
    pub ffmpeg_path: Option<PathBuf>,
    /// Directory for scratch files. Defaults to the system temp directory.
    pub temp_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Deserialize an `EngineConfig` from a JSON string.
    ///
    /// This is intentionally string-based so the caller can read the file
    /// however it sees fit (async, embedded, etc.).
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// The directory scratch files are created in.
    pub fn scratch_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
