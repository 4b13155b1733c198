//! Resolves configured source locations into a path → identifier mapping.
//!
//! Each [`SourceSet`] is walked with its include/exclude patterns applied as
//! gitignore-style overrides. Only files carrying the recognised source
//! extension make it into the mapping; everything else is skipped silently.
//! Raw `source_path` entries from the configuration are scanned as well: a
//! directory entry is walked for sources, a file entry is taken as-is.
//!
//! The mapping is rebuilt from scratch for every execution and never
//! persisted. When two locations resolve to the same canonical file, the
//! later one wins and a warning records the overwrite.

pub mod path_mapper;

use crate::config::{SourceSet, ToolConfig};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Canonical absolute source path → fully-qualified identifier.
pub type SourceMapping = BTreeMap<PathBuf, String>;

/// Inclusion resolution failures. Any of these aborts the task.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("source base directory does not exist: {0}")]
    BaseDirMissing(PathBuf),

    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: ignore::Error,
    },

    #[error("failed to walk {dir}: {source}")]
    Walk { dir: PathBuf, source: ignore::Error },

    #[error("failed to resolve {path}: {source}")]
    Canonicalize { path: PathBuf, source: io::Error },
}

/// Walks the registered source sets and raw source-path entries of one task
/// execution.
pub struct SourceScanner<'a> {
    config: &'a ToolConfig,
    sets: &'a [SourceSet],
}

impl<'a> SourceScanner<'a> {
    pub fn new(config: &'a ToolConfig, sets: &'a [SourceSet]) -> Self {
        Self { config, sets }
    }

    /// Aggregates all configured locations into one mapping.
    pub fn scan(&self) -> Result<SourceMapping, ScanError> {
        let mut mapping = SourceMapping::new();
        for (index, set) in self.sets.iter().enumerate() {
            let before = mapping.len();
            self.scan_set(set, &mut mapping)?;
            debug!(
                set = index,
                base = %set.base_dir.display(),
                added = mapping.len() - before,
                "scanned source set"
            );
        }
        for entry in &self.config.source_path {
            self.scan_path_entry(entry, &mut mapping)?;
        }
        debug!(files = mapping.len(), "files added for analysis");
        Ok(mapping)
    }

    fn scan_set(&self, set: &SourceSet, mapping: &mut SourceMapping) -> Result<(), ScanError> {
        if !set.base_dir.is_dir() {
            return Err(ScanError::BaseDirMissing(set.base_dir.clone()));
        }
        let base = canonicalize(&set.base_dir)?;

        let mut patterns = OverrideBuilder::new(&base);
        for include in &set.includes {
            patterns.add(include).map_err(|source| ScanError::Pattern {
                pattern: include.clone(),
                source,
            })?;
        }
        for exclude in &set.excludes {
            let negated = format!("!{exclude}");
            patterns.add(&negated).map_err(|source| ScanError::Pattern {
                pattern: exclude.clone(),
                source,
            })?;
        }
        let overrides = patterns.build().map_err(|source| ScanError::Pattern {
            pattern: String::new(),
            source,
        })?;

        let walk = WalkBuilder::new(&base)
            .standard_filters(false)
            .overrides(overrides)
            .build();
        for result in walk {
            let entry = result.map_err(|source| ScanError::Walk {
                dir: base.clone(),
                source,
            })?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(&base).unwrap_or(path);
            self.map_file(path, relative, mapping)?;
        }
        Ok(())
    }

    /// Scans a raw source-path entry: directories are walked for sources,
    /// plain files are taken as-is.
    fn scan_path_entry(&self, entry: &Path, mapping: &mut SourceMapping) -> Result<(), ScanError> {
        if entry.is_dir() {
            let base = canonicalize(entry)?;
            let walk = WalkBuilder::new(&base).standard_filters(false).build();
            for result in walk {
                let dirent = result.map_err(|source| ScanError::Walk {
                    dir: base.clone(),
                    source,
                })?;
                if !dirent.file_type().map(|t| t.is_file()).unwrap_or(false) {
                    continue;
                }
                let path = dirent.path();
                let relative = path.strip_prefix(&base).unwrap_or(path);
                self.map_file(path, relative, mapping)?;
            }
        } else if entry.is_file() {
            let name = entry.file_name().map(Path::new).unwrap_or(entry);
            self.map_file(entry, name, mapping)?;
        } else {
            warn!(entry = %entry.display(), "source path entry does not exist, skipping");
        }
        Ok(())
    }

    /// Adds one file when it carries the recognised extension; later entries
    /// overwrite earlier ones on collision (documented last-wins).
    fn map_file(
        &self,
        path: &Path,
        relative: &Path,
        mapping: &mut SourceMapping,
    ) -> Result<(), ScanError> {
        let Some(identifier) = path_mapper::host_identifier(relative, &self.config.source_extension)
        else {
            if relative.to_str().is_none() {
                warn!(path = %path.display(), "skipping non-UTF-8 source path");
            }
            return Ok(());
        };
        let canonical = canonicalize(path)?;
        if let Some(previous) = mapping.insert(canonical.clone(), identifier.clone()) {
            if previous != identifier {
                warn!(
                    path = %canonical.display(),
                    previous,
                    identifier,
                    "source file mapped by more than one location, keeping the later identifier"
                );
            }
        }
        Ok(())
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, ScanError> {
    path.canonicalize().map_err(|source| ScanError::Canonicalize {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, relative: &str, content: &str) -> PathBuf {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn config() -> ToolConfig {
        ToolConfig::new("maudit", "/unused")
    }

    #[test]
    fn only_recognised_extension_is_mapped() {
        let dir = tempfile::tempdir().unwrap();
        let source = write(dir.path(), "A.java", "class A {}");
        write(dir.path(), "B.txt", "notes");

        let config = config();
        let sets = [SourceSet::new(dir.path())];
        let mapping = SourceScanner::new(&config, &sets).scan().unwrap();

        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping.get(&source.canonicalize().unwrap()),
            Some(&"A".to_string())
        );
    }

    #[test]
    fn identifiers_are_relative_to_the_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "org/example/Main.java", "class Main {}");

        let config = config();
        let sets = [SourceSet::new(dir.path())];
        let mapping = SourceScanner::new(&config, &sets).scan().unwrap();

        assert_eq!(
            mapping.values().collect::<Vec<_>>(),
            vec!["org.example.Main"]
        );
    }

    #[test]
    fn include_and_exclude_patterns_filter_the_walk() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "core/Keep.java", "");
        write(dir.path(), "core/generated/Drop.java", "");
        write(dir.path(), "other/Skip.java", "");

        let config = config();
        let sets = [SourceSet::new(dir.path())
            .include("core/**")
            .exclude("core/generated/**")];
        let mapping = SourceScanner::new(&config, &sets).scan().unwrap();

        assert_eq!(mapping.values().collect::<Vec<_>>(), vec!["core.Keep"]);
    }

    #[test]
    fn later_set_wins_on_collision() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pkg/Dup.java", "");

        let config = config();
        // Same tree registered twice with different anchors: the second set's
        // identifier must survive.
        let sets = [
            SourceSet::new(dir.path()),
            SourceSet::new(dir.path().join("pkg")),
        ];
        let mapping = SourceScanner::new(&config, &sets).scan().unwrap();

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.values().collect::<Vec<_>>(), vec!["Dup"]);
    }

    #[test]
    fn missing_base_dir_aborts_the_scan() {
        let config = config();
        let sets = [SourceSet::new("/nonexistent/source-root")];
        let err = SourceScanner::new(&config, &sets).scan().unwrap_err();
        assert!(matches!(err, ScanError::BaseDirMissing(_)));
    }

    #[test]
    fn source_path_directories_and_files_are_scanned() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "tree/pkg/InTree.java", "");
        let single = write(dir.path(), "loose/Single.java", "");
        write(dir.path(), "tree/pkg/notes.txt", "");

        let mut config = config();
        config.source_path = vec![dir.path().join("tree"), single];
        let mapping = SourceScanner::new(&config, &[]).scan().unwrap();

        let identifiers: Vec<_> = mapping.values().cloned().collect();
        assert!(identifiers.contains(&"pkg.InTree".to_string()));
        assert!(identifiers.contains(&"Single".to_string()));
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn custom_extension_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/b/C.src", "");
        write(dir.path(), "a/b/C.java", "");

        let mut config = config();
        config.source_extension = "src".to_string();
        let sets = [SourceSet::new(dir.path())];
        let mapping = SourceScanner::new(&config, &sets).scan().unwrap();

        assert_eq!(mapping.values().collect::<Vec<_>>(), vec!["a.b.C"]);
    }
}
