//! Structured external-tool invocations and the runner seam.
//!
//! Operations build a [`ToolCommand`] (tool name plus argv, never a shell
//! string) and hand it to a [`CommandRunner`]. The production
//! [`SystemRunner`] resolves the tool through a [`ToolRegistry`] and waits
//! for it synchronously on the calling worker thread; tests substitute a
//! recording fake.

use std::process::Stdio;

use clipkit_core::{Error, Result};

use crate::tools::ToolRegistry;

/// A single external-tool invocation: tool name plus argument vector.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    tool: String,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a new command for the named tool.
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// The tool name this command targets.
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// The argument vector.
    pub fn argv(&self) -> &[String] {
        &self.args
    }

    /// One-line rendering for logging.
    pub fn line(&self) -> String {
        let mut out = self.tool.clone();
        for arg in &self.args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }
}

/// Executes [`ToolCommand`]s; the seam between operations and the system.
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tool`] if the process cannot be spawned or exits
    /// with a non-zero status. Diagnostic output is not part of the error:
    /// callers learn *that* the tool failed, never *why*.
    fn run(&self, cmd: &ToolCommand) -> Result<()>;
}

/// Production runner backed by the real process table.
///
/// The invocation blocks the calling worker thread until the tool exits;
/// stdin, stdout, and stderr are all discarded.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    tools: ToolRegistry,
}

impl SystemRunner {
    /// Create a runner over the given registry.
    pub fn new(tools: ToolRegistry) -> Self {
        Self { tools }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &ToolCommand) -> Result<()> {
        let tool = self.tools.require(cmd.tool())?;

        tracing::debug!("running: {}", cmd.line());

        let status = std::process::Command::new(&tool.path)
            .args(cmd.argv())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| Error::tool(cmd.tool(), format!("failed to spawn: {e}")))?;

        if !status.success() {
            return Err(Error::tool(
                cmd.tool(),
                format!("exited with status {status}"),
            ));
        }

        Ok(())
    }
}
