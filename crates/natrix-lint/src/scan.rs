//! Discovery of Vyper source files.

use crate::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Extension of Vyper contract files
pub const SOURCE_EXTENSION: &str = "vy";

/// Build a matcher from exclusion patterns such as `"tests/**"`.
pub fn build_exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// True if a path is a Vyper contract file.
pub fn is_source_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Collect `.vy` files under `paths`, sorted and deduplicated.
///
/// Files given explicitly are kept even without the `.vy` extension;
/// directories are walked recursively. Paths matching `exclude` are skipped.
pub fn collect_source_files(paths: &[PathBuf], exclude: &GlobSet) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in paths {
        if root.is_file() {
            if !exclude.is_match(root) {
                files.push(root.clone());
            }
            continue;
        }

        for entry in WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| !exclude.is_match(e.path()) || e.depth() == 0)
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file() && is_source_file(e.path()))
        {
            files.push(entry.into_path());
        }
    }

    files.sort();
    files.dedup();
    debug!(count = files.len(), "Collected source files");
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_directories_are_walked_and_sorted() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("b.vy"), "").unwrap();
        fs::write(nested.join("a.vy"), "").unwrap();
        fs::write(temp.path().join("notes.md"), "").unwrap();
        fs::write(temp.path().join("iface.vyi"), "").unwrap();

        let files = collect_source_files(&[temp.path().to_path_buf()], &GlobSet::empty());
        assert_eq!(files, vec![temp.path().join("b.vy"), nested.join("a.vy")]);
    }

    #[test]
    fn test_excluded_paths_are_skipped() {
        let temp = TempDir::new().unwrap();
        let mocks = temp.path().join("mocks");
        fs::create_dir_all(&mocks).unwrap();
        fs::write(mocks.join("mock.vy"), "").unwrap();
        fs::write(temp.path().join("token.vy"), "").unwrap();

        let exclude = build_exclude_set(&["**/mocks".to_string()]).unwrap();
        let files = collect_source_files(&[temp.path().to_path_buf()], &exclude);
        assert_eq!(files, vec![temp.path().join("token.vy")]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(build_exclude_set(&["a[".to_string()]).is_err());
    }
}
