//! Async execution unit.
//!
//! [`Engine::submit`] moves a [`Job`] onto a blocking worker and returns a
//! [`SubmittedJob`] whose future resolves exactly once. While the job runs,
//! an external driver may set its cancellation flag; handlers poll it
//! between external-process invocations and compositing stages. On
//! completion the flag takes precedence: a cancelled job reports
//! [`JobResult::Killed`] even when an error was also detected. Per-job
//! scratch teardown runs on every terminal branch via a scope guard on the
//! worker thread.

use std::path::PathBuf;
use std::sync::Arc;

use clipkit_av::command::{CommandRunner, SystemRunner};
use clipkit_av::scratch::JobScope;
use clipkit_av::tools::ToolRegistry;
use clipkit_card::text::{FontFileRasterizer, TextRasterizer};
use clipkit_core::{ArgBag, CancelFlag, EngineConfig};
use tokio::sync::oneshot;

use crate::dispatch::{HandlerCtx, Registry};
use crate::job::{Job, JobResult};

/// The media-transformation job engine.
///
/// Cheap to clone pieces are shared across submissions; each submitted job
/// gets its own cancellation flag and scratch files.
pub struct Engine {
    registry: Registry,
    runner: Arc<dyn CommandRunner>,
    rasterizer: Arc<dyn TextRasterizer>,
    scratch_dir: PathBuf,
}

impl Engine {
    /// Create an engine from configuration, discovering external tools and
    /// using the production text rasterizer.
    pub fn new(config: &EngineConfig) -> Self {
        let tools = ToolRegistry::discover(config);
        Self::with_parts(
            config.scratch_dir(),
            Arc::new(SystemRunner::new(tools)),
            Arc::new(FontFileRasterizer),
        )
    }

    /// Create an engine from explicit parts. This is the seam hosts and
    /// tests use to substitute the runner or rasterizer.
    pub fn with_parts(
        scratch_dir: PathBuf,
        runner: Arc<dyn CommandRunner>,
        rasterizer: Arc<dyn TextRasterizer>,
    ) -> Self {
        let _ = std::fs::create_dir_all(&scratch_dir);
        Self {
            registry: Registry::standard(),
            runner,
            rasterizer,
            scratch_dir,
        }
    }

    /// Mutable access to the handler registry for host extension.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Submit a job for background execution.
    ///
    /// Must be called within a tokio runtime; the handler runs on a blocking
    /// worker and the returned [`SubmittedJob`] resolves when it finishes.
    pub fn submit(&self, job: Job) -> SubmittedJob {
        let cancel = CancelFlag::new();
        let (tx, rx) = oneshot::channel();

        let registry = self.registry.clone();
        let runner = Arc::clone(&self.runner);
        let rasterizer = Arc::clone(&self.rasterizer);
        let scratch_dir = self.scratch_dir.clone();
        let worker_cancel = cancel.clone();

        tokio::task::spawn_blocking(move || {
            tracing::info!("running job: {}", job.operation);

            // Scratch teardown must complete before the result is delivered,
            // so the scope guard drops with this block.
            let result = {
                let _teardown = JobScope::enter();

                let ctx = HandlerCtx {
                    runner: runner.as_ref(),
                    rasterizer: rasterizer.as_ref(),
                    scratch_dir: &scratch_dir,
                    in_format: &job.input_format,
                    args: &job.args,
                    cancel: &worker_cancel,
                };
                let outcome = registry.dispatch(&job.operation, &ctx, &job.input);

                if worker_cancel.is_cancelled() {
                    tracing::info!("job killed: {}", job.operation);
                    JobResult::Killed
                } else {
                    match outcome {
                        Ok(encoded) => JobResult::Success {
                            data: encoded.data.into(),
                            format: encoded.format,
                        },
                        Err(clipkit_core::Error::Killed) => JobResult::Killed,
                        Err(e) => {
                            tracing::warn!("job failed: {}: {e}", job.operation);
                            JobResult::Failure {
                                message: e.to_string(),
                                detail: e.detail(),
                            }
                        }
                    }
                }
            };

            // The receiver may have been dropped; the job's work is done
            // either way.
            let _ = tx.send(result);
        });

        SubmittedJob { cancel, rx }
    }

    /// Run one job to completion: the host-binding call signature.
    pub async fn execute(
        &self,
        operation: impl Into<String>,
        args: ArgBag,
        input_format: impl Into<String>,
        input: impl Into<bytes::Bytes>,
    ) -> JobResult {
        self.submit(Job::new(operation, input_format, input, args))
            .wait()
            .await
    }
}

/// Handle to a running job.
pub struct SubmittedJob {
    cancel: CancelFlag,
    rx: oneshot::Receiver<JobResult>,
}

impl SubmittedJob {
    /// The job's cancellation flag, for an external timeout/cancel driver.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Wait for the job's single terminal result.
    pub async fn wait(self) -> JobResult {
        match self.rx.await {
            Ok(result) => result,
            // The worker vanished without reporting (e.g. a handler panic).
            Err(_) => JobResult::Failure {
                message: "worker terminated without a result".to_string(),
                detail: None,
            },
        }
    }
}
