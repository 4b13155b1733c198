//! Subprocess execution with streamed output.
//!
//! The external tool reports on stdout/stderr rather than through result
//! files, so both streams are read line-by-line while the process runs and
//! handed to a caller-supplied [`StreamHandler`]. Reading concurrently with
//! the child is required: waiting first and reading later can fill the OS
//! pipe buffer and deadlock the tool.
//!
//! Exit code 0 is the only success outcome. A process that cannot be
//! spawned, exits non-zero, or outlives the configured bounded wait surfaces
//! as a typed [`ExecError`].

use crate::command::CommandLine;
use std::io;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Consumes the tool's output streams as they arrive.
///
/// Implementations are supplied by the concrete tool integration and must be
/// callable from the background reader tasks, hence `Send + Sync`.
pub trait StreamHandler: Send + Sync {
    fn on_stdout(&self, line: &str);
    fn on_stderr(&self, line: &str);
}

/// Default handler that forwards tool output to the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingStreamHandler;

impl StreamHandler for TracingStreamHandler {
    fn on_stdout(&self, line: &str) {
        debug!(target: "auditbox::tool", "{line}");
    }

    fn on_stderr(&self, line: &str) {
        warn!(target: "auditbox::tool", "{line}");
    }
}

/// Subprocess failures.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to launch `{program}`: {source}")]
    Launch { program: String, source: io::Error },

    #[error("failed while waiting for the tool process: {0}")]
    Wait(#[source] io::Error),

    #[error("tool exited with code {0}")]
    NonZeroExit(i32),

    #[error("tool did not finish within {0:?}")]
    TimedOut(Duration),
}

/// Spawns the assembled command line and blocks the calling execution
/// context until the process terminates.
#[derive(Debug, Default)]
pub struct ProcessExecutor {
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Runs the command to completion, routing its output through `handler`.
    pub async fn run(
        &self,
        command_line: &CommandLine,
        handler: Arc<dyn StreamHandler>,
    ) -> Result<(), ExecError> {
        let mut command = Command::new(command_line.program());
        command
            .args(command_line.argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| ExecError::Launch {
            program: command_line.program().to_string_lossy().into_owned(),
            source,
        })?;

        let stdout_reader = child.stdout.take().map(|out| {
            let handler = Arc::clone(&handler);
            spawn_line_reader(out, move |line| handler.on_stdout(line))
        });
        let stderr_reader = child.stderr.take().map(|err| {
            let handler = Arc::clone(&handler);
            spawn_line_reader(err, move |line| handler.on_stderr(line))
        });

        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(waited) => waited.map_err(ExecError::Wait)?,
                Err(_) => {
                    warn!(limit = ?limit, "tool timed out, killing process");
                    if let Err(err) = child.start_kill() {
                        warn!(error = %err, "failed to kill timed-out tool process");
                    }
                    let _ = child.wait().await;
                    drain(stdout_reader, stderr_reader).await;
                    return Err(ExecError::TimedOut(limit));
                }
            },
            None => child.wait().await.map_err(ExecError::Wait)?,
        };

        // Readers finish on their own once the pipes hit EOF.
        drain(stdout_reader, stderr_reader).await;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(ExecError::NonZeroExit(code)),
            // Terminated by a signal: no exit code to preserve.
            None => Err(ExecError::NonZeroExit(-1)),
        }
    }
}

fn spawn_line_reader<R, F>(stream: R, consume: F) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    F: Fn(&str) + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => consume(&line),
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "failed to read tool output stream");
                    break;
                }
            }
        }
    })
}

async fn drain(stdout: Option<JoinHandle<()>>, stderr: Option<JoinHandle<()>>) {
    if let Some(task) = stdout {
        let _ = task.await;
    }
    if let Some(task) = stderr {
        let _ = task.await;
    }
}
