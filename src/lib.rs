//! auditbox - task harness for external static-analysis tools
//!
//! This library provides a reusable task framework for integrating an
//! external static-analysis tool into a build pipeline. It scans declared
//! source locations, derives per-file identifiers, assembles the subprocess
//! command line, passes tool options through a generated file (to stay clear
//! of command-line length limits), streams the tool's output to a
//! caller-supplied consumer, and guarantees cleanup of temporary state
//! regardless of outcome.
//!
//! # Core Concepts
//!
//! - **Tool adapters**: concrete integrations implement [`ToolAdapter`] to
//!   supply the tool's entry point, its option strings, and a
//!   [`StreamHandler`] for its output
//! - **Source sets**: declared (base directory, include/exclude patterns)
//!   pairs resolved into a canonical path → identifier mapping
//! - **Task lifecycle**: the fixed sequence validate → scan → write-options
//!   → build-command → run → cleanup that every execution follows
//!
//! # Example Usage
//!
//! ```no_run
//! use auditbox::{AnalyzerTask, SourceSet, StreamHandler, ToolAdapter, ToolConfig};
//! use auditbox::exec::TracingStreamHandler;
//! use auditbox::scan::SourceMapping;
//! use std::sync::Arc;
//!
//! struct AuditAdapter;
//!
//! impl ToolAdapter for AuditAdapter {
//!     fn entry_point(&self) -> &str {
//!         "com.example.audit.Main"
//!     }
//!
//!     fn options(&self, sources: &SourceMapping) -> Vec<String> {
//!         let mut options = vec!["-fix".to_string()];
//!         options.extend(sources.keys().map(|p| p.display().to_string()));
//!         options
//!     }
//!
//!     fn stream_handler(&self) -> Arc<dyn StreamHandler> {
//!         Arc::new(TracingStreamHandler)
//!     }
//! }
//!
//! # async fn run() -> Result<(), auditbox::TaskError> {
//! let config = ToolConfig::new("maudit", "/opt/maudit");
//! let task = AnalyzerTask::new(config, Arc::new(AuditAdapter))
//!     .with_source_set(SourceSet::new("src/main").include("**/*.java"));
//!
//! let report = task.execute().await?;
//! println!("analyzed {} files", report.files_scanned);
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod exec;
pub mod options;
pub mod scan;
pub mod task;
pub mod util;

// Re-export key types for convenient access
pub use command::{build_command_line, CommandLine, CLASSPATH_SEPARATOR, OPTIONS_FLAG};
pub use config::{ConfigError, SourceSet, ToolConfig};
pub use error::{TaskError, TaskPhase};
pub use exec::{ExecError, ProcessExecutor, StreamHandler};
pub use options::{OptionsError, OptionsFile};
pub use scan::{ScanError, SourceMapping, SourceScanner};
pub use task::{AnalyzerTask, TaskReport, ToolAdapter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
