//! Subprocess command-line assembly.
//!
//! [`CommandLine`] is an argv-style value: a program plus discrete argument
//! elements, never a shell string, so nothing in a path or option can be
//! re-interpreted by a shell. [`build_command_line`] produces the fixed
//! invocation shape the external tool expects:
//!
//! ```text
//! <vm> -classpath <user entries…><sep><artifact>
//!      -D<tool>.home=<abs home> [-Xmx…] [vm args…]
//!      <entry point> -arguments <abs options path>
//! ```
//!
//! Ordering is load-bearing: the tool's own artifact comes strictly after
//! every user classpath entry, and the options-file reference is the final
//! argument. No validation happens here; preconditions were checked before
//! the task got this far.

use crate::config::ToolConfig;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Flag token announcing the options-file path to the tool.
pub const OPTIONS_FLAG: &str = "-arguments";

/// Separator between classpath entries on this platform.
pub const CLASSPATH_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// A program invocation with discrete argument elements.
#[derive(Debug, Clone)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn argv(&self) -> &[OsString] {
        &self.args
    }

    /// Loggable single-line rendering.
    pub fn display(&self) -> String {
        let mut rendered = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&arg.to_string_lossy());
        }
        rendered
    }
}

/// Assembles the full tool invocation from the configuration and the
/// options-file location. `entry_point` is the tool's fixed entry-point
/// identifier, supplied by the concrete integration.
pub fn build_command_line(
    config: &ToolConfig,
    options_path: &Path,
    entry_point: &str,
) -> CommandLine {
    let mut classpath = OsString::new();
    for entry in &config.classpath {
        classpath.push(entry.as_os_str());
        classpath.push(CLASSPATH_SEPARATOR);
    }
    classpath.push(config.artifact_path().as_os_str());

    let home = config
        .home
        .canonicalize()
        .unwrap_or_else(|_| config.home.clone());

    let mut command = CommandLine::new(config.vm_executable.as_os_str())
        .arg("-classpath")
        .arg(classpath)
        .arg(format!("-D{}.home={}", config.tool_name, home.display()));

    if let Some(max) = &config.max_memory {
        command = command.arg(format!("-Xmx{max}"));
    }
    command = command.args(config.vm_args.iter().map(String::as_str));

    command
        .arg(entry_point)
        .arg(OPTIONS_FLAG)
        .arg(options_path.as_os_str())
}
