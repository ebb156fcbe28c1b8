//! Deterministic directory walking for the scanners.
//!
//! Traversal is depth-first with entries sorted by file name, so repeated
//! runs over an unchanged tree visit files in the same order. Each caller
//! names the directories it refuses to descend into.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// VCS metadata and build output, skipped by the story scan.
pub const VCS_AND_BUILD_DIRS: &[&str] = &[".git", "target", "node_modules"];

fn is_skipped_dir(entry: &DirEntry, skip_dirs: &[&str]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| skip_dirs.contains(&name))
}

/// Collect regular files under `root` accepted by `accept`, never descending
/// into a directory named in `skip_dirs`.
///
/// A missing root yields no files. Unreadable directory entries are logged
/// and skipped.
pub fn collect_files<F>(root: &Path, skip_dirs: &[&str], accept: F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    if !root.exists() {
        debug!(root = %root.display(), "walk root does not exist");
        return Vec::new();
    }

    let mut out = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e, skip_dirs));
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && accept(entry.path()) {
            out.push(entry.into_path());
        }
    }
    out
}

/// True when the file name ends in `.<ext>` for one of `extensions`.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want == ext))
}

/// Path rendered for reports, with a leading `./` dropped.
pub fn display_path(path: &Path) -> String {
    let trimmed = path.strip_prefix(".").unwrap_or(path);
    if trimmed.as_os_str().is_empty() {
        ".".to_string()
    } else {
        trimmed.to_string_lossy().into_owned()
    }
}
