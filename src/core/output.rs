//! Output helpers shared by the report sinks.
//!
//! Terminal previews stay bounded; files are written whole, with parent
//! directories created on demand.

use crate::core::error::RepogateError;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Collapse newlines/extra whitespace and bound length for terminal display.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Horizontal rule used under report headers.
pub fn rule(width: usize) -> String {
    "=".repeat(width)
}

/// Pretty JSON with two-space indentation.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, RepogateError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write `contents` to `path`, creating missing parent directories.
pub fn write_report(path: &Path, contents: &str) -> Result<(), RepogateError> {
    ensure_parent_dir(path)?;
    fs::write(path, contents).map_err(RepogateError::IoError)
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), RepogateError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(RepogateError::IoError)?;
        }
    }
    Ok(())
}
