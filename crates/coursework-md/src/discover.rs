//! Locating challenge files on disk.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Errors that can occur when discovering Markdown files.
#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    #[error("Markdown directory not found: {0}")]
    NotFound(String),
}

/// Find files under `root` whose name ends with `suffix`, sorted by path.
///
/// With `recursive` unset only files directly inside `root` are considered.
pub fn find_files(root: &Path, suffix: &str, recursive: bool) -> Result<Vec<PathBuf>, DiscoverError> {
    if !root.is_dir() {
        return Err(DiscoverError::NotFound(root.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(suffix))
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    Ok(files)
}

/// File name with `suffix` removed, e.g. `loops-challenge.md` -> `loops`.
pub fn base_name<'a>(path: &'a Path, suffix: &str) -> Option<&'a str> {
    path.file_name()?.to_str()?.strip_suffix(suffix)
}
