//! The task orchestrator.
//!
//! [`AnalyzerTask`] sequences one execution through the fixed lifecycle:
//! validate → scan → write options → build command → run → cleanup. All
//! per-execution state (the source mapping, the options file, the command
//! line) is assembled inside [`AnalyzerTask::execute`] and dropped with it;
//! the task struct itself only carries configuration and can run any number
//! of times.
//!
//! Concrete tool integrations plug in through [`ToolAdapter`]: the entry
//! point launched inside the VM, the option strings written to the options
//! file, and the [`StreamHandler`] consuming the tool's output.
//!
//! The single hard invariant of the framework lives here: once the options
//! file exists, no execution path leaves `execute()` without attempting its
//! deletion. Success, phase failure, and abort all funnel through the same
//! removal; the options file's `Drop` covers anything that bypasses it.

use crate::command::build_command_line;
use crate::config::{SourceSet, ToolConfig};
use crate::error::TaskError;
use crate::exec::{ProcessExecutor, StreamHandler};
use crate::options::OptionsFile;
use crate::scan::{SourceMapping, SourceScanner};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Contract between the orchestrator and a concrete tool integration.
///
/// One implementation exists per analysis tool (audit, metrics, coverage,
/// parse…); the orchestrator depends only on this interface.
pub trait ToolAdapter: Send + Sync {
    /// The tool's fixed entry-point identifier, e.g. its main class.
    fn entry_point(&self) -> &str;

    /// Option strings for this execution, written to the options file in
    /// order. The scanned source mapping is available so integrations can
    /// reference the participating files.
    fn options(&self, sources: &SourceMapping) -> Vec<String>;

    /// Consumer for the tool's stdout/stderr streams.
    fn stream_handler(&self) -> Arc<dyn StreamHandler>;
}

/// Summary of a completed execution.
#[derive(Debug, Clone)]
pub struct TaskReport {
    /// Number of source files handed to the tool.
    pub files_scanned: usize,
    /// Wall-clock time of the whole lifecycle.
    pub duration: Duration,
}

/// A configured analyzer task, ready to execute.
pub struct AnalyzerTask {
    config: ToolConfig,
    source_sets: Vec<SourceSet>,
    adapter: Arc<dyn ToolAdapter>,
}

impl AnalyzerTask {
    pub fn new(config: ToolConfig, adapter: Arc<dyn ToolAdapter>) -> Self {
        Self {
            config,
            source_sets: Vec::new(),
            adapter,
        }
    }

    /// Registers an inclusion spec. Multiple sets may be registered; on path
    /// collision the later set's identifier wins.
    pub fn add_source_set(&mut self, set: SourceSet) {
        self.source_sets.push(set);
    }

    #[must_use]
    pub fn with_source_set(mut self, set: SourceSet) -> Self {
        self.add_source_set(set);
        self
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Runs the full task lifecycle. Resolves once the subprocess has
    /// terminated, or earlier when a setup phase fails. Cleanup of the
    /// options file happens on every path out of this function.
    pub async fn execute(&self) -> Result<TaskReport, TaskError> {
        let start = Instant::now();
        info!(tool = %self.config.tool_name, "starting analyzer task");

        // Nothing expensive may happen before the installation checks pass:
        // a misconfigured installation must never produce a temporary file
        // or a subprocess.
        self.config.validate()?;

        let scanner = SourceScanner::new(&self.config, &self.source_sets);
        let sources = scanner.scan()?;
        info!(files = sources.len(), "source scan complete");

        let options_file = OptionsFile::create(&self.config.work_dir, &self.config.tool_name)?;
        let outcome = self.run_tool(&options_file, &sources).await;
        options_file.remove();
        outcome?;

        let report = TaskReport {
            files_scanned: sources.len(),
            duration: start.elapsed(),
        };
        info!(
            files = report.files_scanned,
            duration_ms = report.duration.as_millis() as u64,
            "analyzer task complete"
        );
        Ok(report)
    }

    /// The phases that run while the options file exists. Kept fallible and
    /// separate so `execute()` joins every outcome with the removal above.
    async fn run_tool(
        &self,
        options_file: &OptionsFile,
        sources: &SourceMapping,
    ) -> Result<(), TaskError> {
        let options = self.adapter.options(sources);
        options_file.write_options(&options)?;

        let command_line =
            build_command_line(&self.config, options_file.path(), self.adapter.entry_point());
        debug!(command = %command_line.display(), "launching analyzer");

        let handler = self.adapter.stream_handler();
        let executor = ProcessExecutor::with_timeout(self.config.timeout());
        executor.run(&command_line, handler).await?;
        Ok(())
    }
}
