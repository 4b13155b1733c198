//! Shared fixtures for lifecycle tests: a fake tool installation and a fake
//! VM executable that records its arguments, proves the options file existed
//! while it ran, emits one line on each stream, and exits with a chosen
//! code.
#![allow(dead_code)]

use auditbox::scan::SourceMapping;
use auditbox::{StreamHandler, ToolAdapter};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Creates `<root>/<tool>-home/lib/<tool>.jar` and returns the home path.
pub fn create_install(root: &Path, tool: &str) -> PathBuf {
    let home = root.join(format!("{tool}-home"));
    fs::create_dir_all(home.join("lib")).unwrap();
    fs::write(home.join("lib").join(format!("{tool}.jar")), b"jar").unwrap();
    home
}

/// Writes an executable shell script standing in for the VM.
///
/// The script dumps its arguments one per line into `args_out`, appends
/// `options-present` plus the options-file content when its final argument
/// exists on disk, prints `tool-stdout` / `tool-stderr`, optionally sleeps,
/// and exits with `exit_code`.
pub fn fake_vm(
    root: &Path,
    name: &str,
    exit_code: i32,
    sleep_secs: u32,
    args_out: &Path,
) -> PathBuf {
    let script = format!(
        concat!(
            "#!/bin/sh\n",
            "printf '%s\\n' \"$@\" > \"{args}\"\n",
            "for last; do :; done\n",
            "if [ -f \"$last\" ]; then\n",
            "  echo 'options-present' >> \"{args}\"\n",
            "  cat \"$last\" >> \"{args}\"\n",
            "fi\n",
            "echo 'tool-stdout'\n",
            "echo 'tool-stderr' 1>&2\n",
            "sleep {sleep}\n",
            "exit {code}\n",
        ),
        args = args_out.display(),
        sleep = sleep_secs,
        code = exit_code,
    );
    let path = root.join(name);
    fs::write(&path, script).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
    path
}

/// Collects the lines handed to the stream handler.
#[derive(Default)]
pub struct CapturingHandler {
    pub stdout: Mutex<Vec<String>>,
    pub stderr: Mutex<Vec<String>>,
}

impl StreamHandler for CapturingHandler {
    fn on_stdout(&self, line: &str) {
        self.stdout.lock().unwrap().push(line.to_string());
    }

    fn on_stderr(&self, line: &str) {
        self.stderr.lock().unwrap().push(line.to_string());
    }
}

/// Adapter that serves fixed options and records the mapping it was given.
pub struct RecordingAdapter {
    pub entry_point: String,
    pub options: Vec<String>,
    pub handler: Arc<CapturingHandler>,
    pub seen_sources: Mutex<Option<SourceMapping>>,
}

impl RecordingAdapter {
    pub fn new(entry_point: &str, options: Vec<&str>) -> Self {
        Self {
            entry_point: entry_point.to_string(),
            options: options.into_iter().map(String::from).collect(),
            handler: Arc::new(CapturingHandler::default()),
            seen_sources: Mutex::new(None),
        }
    }
}

impl ToolAdapter for RecordingAdapter {
    fn entry_point(&self) -> &str {
        &self.entry_point
    }

    fn options(&self, sources: &SourceMapping) -> Vec<String> {
        *self.seen_sources.lock().unwrap() = Some(sources.clone());
        self.options.clone()
    }

    fn stream_handler(&self) -> Arc<dyn StreamHandler> {
        Arc::clone(&self.handler) as Arc<dyn StreamHandler>
    }
}

/// Lines of the args dump written by the fake VM.
pub fn read_args(args_out: &Path) -> Vec<String> {
    fs::read_to_string(args_out)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

/// Entries currently present in a directory.
pub fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}
