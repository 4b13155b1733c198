//! Task-level error taxonomy.
//!
//! Every phase of the task lifecycle has its own error type defined next to
//! the code that produces it (`ConfigError`, `ScanError`, `OptionsError`,
//! `ExecError`). [`TaskError`] is the umbrella the orchestrator returns:
//! each variant names the phase that failed, so a build log line carrying
//! the display string is enough to see where the task died. All variants are
//! fatal; nothing is retried.

use crate::config::ConfigError;
use crate::exec::ExecError;
use crate::options::OptionsError;
use crate::scan::ScanError;
use std::fmt;
use thiserror::Error;

/// Phases of the task lifecycle, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Validating,
    Scanning,
    WritingOptions,
    Launching,
    Running,
}

impl fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskPhase::Validating => "validation",
            TaskPhase::Scanning => "scan",
            TaskPhase::WritingOptions => "options-write",
            TaskPhase::Launching => "launch",
            TaskPhase::Running => "execution",
        };
        f.write_str(name)
    }
}

/// Failure of a single task execution.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("validation failed: {0}")]
    Configuration(#[from] ConfigError),

    #[error("source scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("options file generation failed: {0}")]
    Options(#[from] OptionsError),

    #[error("tool launch failed: {0}")]
    Launch(#[source] ExecError),

    #[error("tool execution failed: {0}")]
    ToolExecution(#[source] ExecError),
}

impl TaskError {
    /// The lifecycle phase this error aborted.
    pub fn phase(&self) -> TaskPhase {
        match self {
            TaskError::Configuration(_) => TaskPhase::Validating,
            TaskError::Scan(_) => TaskPhase::Scanning,
            TaskError::Options(_) => TaskPhase::WritingOptions,
            TaskError::Launch(_) => TaskPhase::Launching,
            TaskError::ToolExecution(_) => TaskPhase::Running,
        }
    }

    /// Exit code of the tool process, when it launched but exited non-zero.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            TaskError::ToolExecution(ExecError::NonZeroExit(code)) => Some(*code),
            _ => None,
        }
    }
}

impl From<ExecError> for TaskError {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Launch { .. } => TaskError::Launch(err),
            ExecError::Wait(_) | ExecError::NonZeroExit(_) | ExecError::TimedOut(_) => {
                TaskError::ToolExecution(err)
            }
        }
    }
}
