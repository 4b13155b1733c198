//! Derives dotted identifiers from source file paths.
//!
//! The mapping deliberately takes the separator as a parameter instead of
//! reading the host's, so identifiers stay stable across platforms and the
//! function can be tested without a filesystem: `a/b/C.java` with `/` and
//! `a\b\C.java` with `\` both yield `a.b.C`.

use std::path::Path;

/// Derives the fully-qualified identifier for a source file path.
///
/// `path` is the path text relative to the root the identifier is anchored
/// at. The trailing `.<extension>` is stripped and every `separator` is
/// replaced with `.`. Returns `None` when the path does not carry the
/// extension, or when nothing remains after stripping it.
pub fn derive_identifier(path: &str, extension: &str, separator: char) -> Option<String> {
    let suffix = format!(".{extension}");
    let stem = path.strip_suffix(suffix.as_str())?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.replace(separator, "."))
}

/// Convenience wrapper using the host path separator.
///
/// Returns `None` for paths that are not valid UTF-8; encoding is the
/// caller's decision to surface.
pub fn host_identifier(relative: &Path, extension: &str) -> Option<String> {
    let text = relative.to_str()?;
    derive_identifier(text, extension, std::path::MAIN_SEPARATOR)
}
