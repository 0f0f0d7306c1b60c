//! Scratch-file lifecycle for operation handlers.
//!
//! Every operation writes its input buffer(s) to uniquely-named files in the
//! configured scratch directory, points the external transcoder at them, and
//! reads the output back. [`TempFile`] removes its path when dropped, so
//! every return path of a handler cleans up; [`JobScope`] is the per-job
//! backstop the engine installs on the worker thread, sweeping anything a
//! handler somehow left registered before the job's result is delivered.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clipkit_core::{Error, Result};
use rand::Rng;

thread_local! {
    /// Scratch paths created by the job currently running on this thread.
    static LIVE_PATHS: RefCell<Vec<PathBuf>> = const { RefCell::new(Vec::new()) };
}

/// Reduce an untrusted format tag to a safe filename extension.
///
/// Keeps lowercase ASCII alphanumerics (at most 8), so a hostile tag can
/// never shape a path. Falls back to `bin` when nothing survives.
pub fn sanitize_ext(tag: &str) -> String {
    let cleaned: String = tag
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(8)
        .collect();
    if cleaned.is_empty() {
        "bin".to_string()
    } else {
        cleaned
    }
}

fn unique_name(ext: &str) -> String {
    let ns = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let suffix: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    format!("clipkit_{ns}_{suffix}.{ext}")
}

/// A uniquely-named scratch file, removed when dropped.
///
/// Names combine a nanosecond timestamp with a random six-digit suffix, so
/// concurrently running jobs never collide. The file itself is only created
/// once [`write`](TempFile::write) runs (or the external tool produces it).
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Reserve a fresh scratch path in `dir` with the given extension.
    pub fn create(dir: &Path, ext: &str) -> Self {
        let path = dir.join(unique_name(&sanitize_ext(ext)));
        LIVE_PATHS.with(|live| live.borrow_mut().push(path.clone()));
        Self { path }
    }

    /// The scratch path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a file currently exists at the scratch path.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the full buffer to the scratch path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resource`] if the write does not complete; callers
    /// must not hand the path to the transcoder after a failed write.
    pub fn write(&self, data: &[u8]) -> Result<()> {
        std::fs::write(&self.path, data)
            .map_err(|e| Error::resource(self.path.display().to_string(), e.to_string()))
    }

    /// Read the whole file back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resource`] if the file is absent or empty; a
    /// truncated buffer is never returned silently.
    pub fn read(&self) -> Result<Vec<u8>> {
        let data = std::fs::read(&self.path)
            .map_err(|e| Error::resource(self.path.display().to_string(), e.to_string()))?;
        if data.is_empty() {
            return Err(Error::resource(
                self.path.display().to_string(),
                "file is empty",
            ));
        }
        Ok(data)
    }

    /// Remove the current contents, keeping the path reserved.
    ///
    /// Used between retry attempts that reuse one output path; a missing
    /// file is not an error.
    pub fn clear(&self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
        LIVE_PATHS.with(|live| live.borrow_mut().retain(|p| p != &self.path));
    }
}

/// Per-job scratch teardown guard.
///
/// The engine creates one on the worker thread before dispatching a job and
/// drops it after the result is decided, on every terminal branch. Dropping
/// the scope removes any scratch paths still registered by the job and
/// clears the thread-local set, so worker threads hand clean state to the
/// next job they pick up.
#[derive(Debug)]
pub struct JobScope {
    _private: (),
}

impl JobScope {
    /// Open the scope for the job about to run on this thread.
    pub fn enter() -> Self {
        Self { _private: () }
    }
}

impl Drop for JobScope {
    fn drop(&mut self) {
        let leftovers = LIVE_PATHS.with(|live| std::mem::take(&mut *live.borrow_mut()));
        for path in leftovers {
            if std::fs::remove_file(&path).is_ok() {
                tracing::warn!("swept leaked scratch file: {}", path.display());
            }
        }
    }
}
