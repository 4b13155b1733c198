//! Tool configuration and installation validation.
//!
//! [`ToolConfig`] carries everything the caller supplies before a task runs:
//! the tool's installation directory, ordered classpath and source-path
//! entries, VM tuning, and the working directory used for the generated
//! options file. It is populated once and read-only during execution.
//!
//! [`ToolConfig::validate`] performs the cheap precondition checks — the home
//! directory and the tool's library artifact must exist — before the task
//! touches the filesystem or spawns anything. A misconfigured installation
//! must never produce a temporary file or a subprocess.
//!
//! Configuration can also be consumed from a TOML build description:
//!
//! ```
//! use auditbox::config::ToolConfig;
//!
//! let config = ToolConfig::from_toml(r#"
//!     tool_name = "maudit"
//!     home = "/opt/maudit"
//!     max_memory = "256m"
//!     vm_args = ["-verbose"]
//! "#).unwrap();
//! assert_eq!(config.tool_name, "maudit");
//! assert_eq!(config.source_extension, "java");
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// VM executable used when the caller does not override it.
pub const DEFAULT_VM_EXECUTABLE: &str = "java";

/// Source extension recognised by the scanner when none is configured.
pub const DEFAULT_SOURCE_EXTENSION: &str = "java";

/// Installation precondition failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tool_name must not be empty")]
    MissingToolName,

    #[error("'home' must point to the tool installation directory")]
    HomeMissing,

    #[error("{0} does not exist; check the tool installation")]
    ArtifactMissing(PathBuf),

    #[error("failed to parse tool configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Caller-supplied configuration for one analyzer task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Name of the external tool. Determines the library artifact path
    /// (`<home>/lib/<tool_name>.jar`), the home system property and the
    /// options-file name prefix.
    pub tool_name: String,

    /// Root of the tool installation. Required.
    pub home: PathBuf,

    /// User classpath entries, in order. The tool's own artifact is appended
    /// after these when the command line is built.
    pub classpath: Vec<PathBuf>,

    /// Raw source-path entries scanned in addition to any registered source
    /// sets. A directory entry is walked for sources; a file entry is taken
    /// as-is when it carries the recognised extension.
    pub source_path: Vec<PathBuf>,

    /// Maximum VM heap, e.g. `"256m"`. Emitted as `-Xmx<value>`.
    pub max_memory: Option<String>,

    /// Extra VM-level arguments, passed through in order.
    pub vm_args: Vec<String>,

    /// VM executable launching the tool. Defaults to `java`.
    pub vm_executable: PathBuf,

    /// Directory the execution-scoped options file is created in.
    /// Defaults to the process temp directory.
    pub work_dir: PathBuf,

    /// Filename extension (without the dot) a file must carry to be included
    /// in the source mapping.
    pub source_extension: String,

    /// Bounded wait for the tool process. When it elapses the process is
    /// killed and the task fails. Unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            tool_name: String::new(),
            home: PathBuf::new(),
            classpath: Vec::new(),
            source_path: Vec::new(),
            max_memory: None,
            vm_args: Vec::new(),
            vm_executable: PathBuf::from(DEFAULT_VM_EXECUTABLE),
            work_dir: std::env::temp_dir(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            timeout_secs: None,
        }
    }
}

impl ToolConfig {
    /// Creates a configuration with the required fields set and everything
    /// else defaulted.
    pub fn new(tool_name: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        Self {
            tool_name: tool_name.into(),
            home: home.into(),
            ..Default::default()
        }
    }

    /// Parses a configuration from a TOML build description.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Location of the tool's library artifact inside the installation.
    pub fn artifact_path(&self) -> PathBuf {
        self.home
            .join("lib")
            .join(format!("{}.jar", self.tool_name))
    }

    /// Checks installation preconditions, in order: tool name present, home
    /// directory exists, library artifact exists. Read-only; no side
    /// effects.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tool_name.trim().is_empty() {
            return Err(ConfigError::MissingToolName);
        }
        if self.home.as_os_str().is_empty() || !self.home.exists() {
            return Err(ConfigError::HomeMissing);
        }
        let artifact = self.artifact_path();
        if !artifact.exists() {
            return Err(ConfigError::ArtifactMissing(artifact));
        }
        Ok(())
    }

    /// The configured bounded wait, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// One declared (base directory, include/exclude patterns) pair describing
/// which source files participate in a scan. Patterns use gitignore-style
/// glob syntax; with no include patterns everything under the base directory
/// is considered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSet {
    pub base_dir: PathBuf,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl SourceSet {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }

    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.includes.push(pattern.into());
        self
    }

    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }
}
