//! Execution-scoped options file.
//!
//! Tool options are handed to the subprocess through a generated file
//! instead of the command line, to stay clear of argument-length limits.
//! The file carries one option per line, UTF-8, no escaping or quoting.
//!
//! The filename embeds a v4 UUID so concurrently running task instances in
//! the same working directory never collide. Removal happens explicitly in
//! the orchestrator's cleanup step; the `Drop` impl is only the best-effort
//! fallback for paths where that step never ran.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Options-file creation or write failures.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to create options file {path}: {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to write options file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// A temporary file holding the tool's option strings for one execution.
#[derive(Debug)]
pub struct OptionsFile {
    path: PathBuf,
    removed: bool,
}

impl OptionsFile {
    /// Creates an empty, uniquely named options file inside `work_dir`.
    ///
    /// The file exists on disk from this point on, so cleanup has something
    /// to delete even when writing later fails halfway.
    pub fn create(work_dir: &Path, prefix: &str) -> Result<Self, OptionsError> {
        let name = format!("{prefix}-options-{}.txt", uuid::Uuid::new_v4());
        let path = work_dir.join(name);
        File::create(&path).map_err(|source| OptionsError::Create {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "created options file");
        Ok(Self {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the options one per line, in the given order, and flushes.
    pub fn write_options(&self, options: &[String]) -> Result<(), OptionsError> {
        let write_err = |source| OptionsError::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = File::create(&self.path).map_err(write_err)?;
        for option in options {
            file.write_all(option.as_bytes()).map_err(write_err)?;
            file.write_all(b"\n").map_err(write_err)?;
        }
        file.flush().map_err(write_err)?;
        Ok(())
    }

    /// Removes the file. Removal failures are logged, not surfaced: by this
    /// point the task outcome is already decided and must not be masked.
    pub fn remove(mut self) {
        self.removed = true;
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed options file"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to remove options file");
            }
        }
    }
}

impl Drop for OptionsFile {
    fn drop(&mut self) {
        if !self.removed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_option_per_line_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let file = OptionsFile::create(dir.path(), "maudit").unwrap();
        let options = vec![
            "alpha".to_string(),
            "beta".to_string(),
            "gamma".to_string(),
        ];
        file.write_options(&options).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "alpha\nbeta\ngamma\n");
    }

    #[test]
    fn empty_option_list_yields_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = OptionsFile::create(dir.path(), "maudit").unwrap();
        file.write_options(&[]).unwrap();
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "");
    }

    #[test]
    fn names_are_unique_per_instance() {
        let dir = tempfile::tempdir().unwrap();
        let first = OptionsFile::create(dir.path(), "maudit").unwrap();
        let second = OptionsFile::create(dir.path(), "maudit").unwrap();
        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn remove_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = OptionsFile::create(dir.path(), "maudit").unwrap();
        let path = file.path().to_path_buf();
        assert!(path.exists());
        file.remove();
        assert!(!path.exists());
    }

    #[test]
    fn drop_is_a_fallback_removal() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let file = OptionsFile::create(dir.path(), "maudit").unwrap();
            file.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn create_fails_in_missing_work_dir() {
        let err = OptionsFile::create(Path::new("/nonexistent/work-dir"), "maudit").unwrap_err();
        assert!(matches!(err, OptionsError::Create { .. }));
    }

    #[test]
    fn write_failure_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = OptionsFile::create(dir.path(), "maudit").unwrap();
        // Swap the file for a directory so the rewrite fails.
        fs::remove_file(file.path()).unwrap();
        fs::create_dir(file.path()).unwrap();
        let err = file.write_options(&["opt".to_string()]).unwrap_err();
        assert!(matches!(err, OptionsError::Write { .. }));
        fs::remove_dir(file.path()).unwrap();
    }
}
