use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

use crate::filter::PathFilter;

/// Regular files under `base_path` whose relative path passes `filter`, in
/// depth-first file name order. Ignore files and hidden-file rules are off;
/// symbolic links are followed.
pub fn scan_files(base_path: &Path, filter: &PathFilter) -> Result<Vec<PathBuf>> {
    let walker = WalkBuilder::new(base_path)
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .follow_links(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        let is_file = match entry.file_type() {
            Some(t) if t.is_symlink() => entry.path().is_file(),
            Some(t) => t.is_file(),
            None => false,
        };
        if !is_file {
            continue;
        }
        let path = entry.path();
        let relative = relative_path(base_path, path);
        if filter.matches(&relative) {
            files.push(path.to_path_buf());
        } else {
            tracing::debug!(path = %relative, "excluded by pattern");
        }
    }
    Ok(files)
}

/// `path` relative to `base`, joined with `/` on every platform.
pub fn relative_path(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
