//! Utilities for path collection, output naming, etc.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::error::{PdfMergeError, Result};

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Returns a flattened list of resolved paths, in pattern order. A pattern
/// that matches nothing is passed through verbatim, so the caller's
/// existence check reports it by name.
///
/// Errors:
/// - Malformed patterns yield [`PdfMergeError::InvalidArgument`].
/// - Propagates filesystem errors from the glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let paths = collect_paths_for_pattern(pattern.as_ref())?;
        if paths.is_empty() {
            resolved_paths.push(PathBuf::from(pattern.as_ref()));
        } else {
            resolved_paths.extend(paths);
        }
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./docs/chapter-?.pdf"`
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern).map_err(|err| {
        PdfMergeError::invalid_argument(format!("Invalid glob pattern '{pattern}': {err}"))
    })?;

    for entry in paths {
        let path = entry.map_err(|err| PdfMergeError::from(std::io::Error::from(err)))?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

/// Strip trailing `/` and `\` separators from a folder path.
///
/// A path made only of separators (a filesystem root) is kept as the root.
pub fn strip_trailing_separators(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => {
            let trimmed = s.trim_end_matches(['/', '\\']);
            if trimmed.is_empty() || trimmed.ends_with(':') {
                path.components().collect()
            } else {
                PathBuf::from(trimmed)
            }
        }
        None => path.components().collect(),
    }
}

/// Generated output filename: `merged_<YYYYMMDD>_<HHMMSS>.pdf`.
pub fn default_output_filename(now: NaiveDateTime) -> String {
    now.format("merged_%Y%m%d_%H%M%S.pdf").to_string()
}
