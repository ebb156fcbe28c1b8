//! User-story extraction from Markdown and text files.
//!
//! Files under each search root are scanned with an ordered cascade of
//! patterns. The patterns overlap; the first record produced for an
//! identifier is kept and every later one is dropped, so results depend on
//! root order, traversal order and pattern order.

use crate::core::config::StoriesConfig;
use crate::core::error::RepogateError;
use crate::core::output;
use crate::core::walk;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// Story patterns in priority order. Patterns with a `desc` group produce
/// title and description directly; the others capture a `tail` that is split
/// on its first colon.
static STORY_CASCADE: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        // US-12: Title → "Description"   /   US-12 Title - "Description"
        Regex::new(r#"\b(?P<id>US-\d+)\b:?[ \t]*(?P<title>.+?)[ \t]*(?:→|-)[ \t]*"(?P<desc>[^"\n]+)""#)
            .unwrap(),
        // US-12 Title – "Description"
        Regex::new(r#"\b(?P<id>US-\d+)\b[: \t][ \t]*(?P<title>.+?)[ \t]*[-–][ \t]*"(?P<desc>[^"\n]+)""#)
            .unwrap(),
        // US-12: rest of line. The separator may run onto the next line.
        Regex::new(r"\b(?P<id>US-\d+)[:\s]+(?P<tail>[^\n]+)").unwrap(),
        // **US-12**: rest of line
        Regex::new(r"(?:\*\*)?\b(?P<id>US-\d+)(?:\*\*)?[:\s]+(?P<tail>[^\n]+)").unwrap(),
    ]
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source_file: String,
}

impl StoryRecord {
    /// Integer part of the identifier.
    pub fn number(&self) -> u64 {
        story_number(&self.id).unwrap_or(0)
    }
}

/// `US-<n>` → `n`, for positive `n` only.
pub fn story_number(id: &str) -> Option<u64> {
    id.strip_prefix("US-")
        .and_then(|n| n.parse::<u64>().ok())
        .filter(|n| *n > 0)
}

fn clean_field(raw: &str) -> String {
    let mut field = raw.trim();
    if let Some(rest) = field.strip_prefix('→') {
        field = rest.trim_start();
    }
    field = field.trim_matches('"').trim();
    field.to_string()
}

fn record_from(caps: &Captures<'_>, source: &str) -> Option<StoryRecord> {
    let id = caps.name("id")?.as_str();
    story_number(id)?;

    let (title, description) = match (caps.name("title"), caps.name("desc"), caps.name("tail")) {
        (Some(title), Some(desc), _) => (clean_field(title.as_str()), clean_field(desc.as_str())),
        (_, _, Some(tail)) => match tail.as_str().split_once(':') {
            Some((title, desc)) => (clean_field(title), clean_field(desc)),
            None => (clean_field(tail.as_str()), String::new()),
        },
        _ => return None,
    };
    if title.is_empty() && description.is_empty() {
        return None;
    }

    Some(StoryRecord {
        id: id.to_string(),
        title,
        description,
        source_file: source.to_string(),
    })
}

/// Every candidate record in `content`, pattern by pattern, in match order.
/// Identifiers may repeat; the catalog decides which one survives.
pub fn stories_in_text(content: &str, source: &str) -> Vec<StoryRecord> {
    let mut out = Vec::new();
    for pattern in STORY_CASCADE.iter() {
        for caps in pattern.captures_iter(content) {
            if let Some(record) = record_from(&caps, source) {
                out.push(record);
            }
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StorySummary {
    pub total: usize,
    pub with_titles: usize,
    pub with_descriptions: usize,
}

/// Identifier → record mapping with first-write-wins inserts.
#[derive(Debug, Clone, Default)]
pub struct StoryCatalog {
    records: HashMap<String, StoryRecord>,
}

impl StoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the identifier is already known. Returns whether the
    /// record was kept.
    pub fn insert(&mut self, record: StoryRecord) -> bool {
        match self.records.entry(record.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&StoryRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records ordered by identifier number, then identifier text.
    pub fn sorted(&self) -> Vec<&StoryRecord> {
        let mut records: Vec<&StoryRecord> = self.records.values().collect();
        records.sort_by(|a, b| a.number().cmp(&b.number()).then_with(|| a.id.cmp(&b.id)));
        records
    }

    pub fn summary(&self) -> StorySummary {
        StorySummary {
            total: self.records.len(),
            with_titles: self.records.values().filter(|r| !r.title.is_empty()).count(),
            with_descriptions: self
                .records
                .values()
                .filter(|r| !r.description.is_empty())
                .count(),
        }
    }
}

pub struct StoryExtractor {
    roots: Vec<PathBuf>,
    extensions: Vec<String>,
    skip: Vec<PathBuf>,
}

impl StoryExtractor {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        let defaults = StoriesConfig::default();
        let roots = if roots.is_empty() {
            defaults.search_roots
        } else {
            roots
        };
        Self {
            roots,
            extensions: defaults.extensions,
            skip: Vec::new(),
        }
    }

    pub fn from_config(config: &StoriesConfig) -> Self {
        Self::new(config.search_roots.clone()).with_extensions(config.extensions.clone())
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Never scan `path`, e.g. a report this tool itself writes.
    pub fn skip_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip.push(path.into());
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Scan every root in order. Missing roots, unreadable files and
    /// non-UTF-8 files are skipped; a file reachable from several roots is
    /// read once, under the first root that reaches it.
    pub fn scan(&self) -> StoryCatalog {
        let skip: HashSet<PathBuf> = self
            .skip
            .iter()
            .filter_map(|p| fs::canonicalize(p).ok())
            .collect();
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut catalog = StoryCatalog::new();

        for root in &self.roots {
            if !root.is_dir() {
                debug!(root = %root.display(), "search root missing, skipped");
                continue;
            }
            let files = walk::collect_files(root, walk::VCS_AND_BUILD_DIRS, |p| {
                walk::has_extension(p, &self.extensions)
            });
            for file in files {
                let key = fs::canonicalize(&file).unwrap_or_else(|_| file.clone());
                if skip.contains(&key) || !seen.insert(key) {
                    continue;
                }
                let content = match fs::read_to_string(&file) {
                    Ok(c) => c,
                    Err(e) => {
                        debug!(path = %file.display(), error = %e, "unreadable file skipped");
                        continue;
                    }
                };
                let source = walk::display_path(&file);
                let mut kept = 0usize;
                for record in stories_in_text(&content, &source) {
                    if catalog.insert(record) {
                        kept += 1;
                    }
                }
                if kept > 0 {
                    debug!(path = %source, kept, "stories recorded");
                }
            }
        }
        catalog
    }
}

/// Scan `search_roots` (the default roots when empty) and return the
/// identifier → record mapping.
pub fn extract(search_roots: &[PathBuf]) -> StoryCatalog {
    StoryExtractor::new(search_roots.to_vec()).scan()
}

pub fn render_text_report(catalog: &StoryCatalog) -> String {
    let mut out = String::from("# User Stories\n");
    out.push_str(&format!("Total: {}\n\n", catalog.len()));
    for story in catalog.sorted() {
        out.push_str(&format!(
            "{} | {} | \"{}\"\n",
            story.id, story.title, story.description
        ));
        out.push_str(&format!("Source: {}\n\n", story.source_file));
    }
    out
}

pub fn write_text_report(catalog: &StoryCatalog, path: &Path) -> Result<(), RepogateError> {
    output::write_report(path, &render_text_report(catalog))
}

pub fn write_csv_report(catalog: &StoryCatalog, path: &Path) -> Result<(), RepogateError> {
    output::ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Story ID", "Title", "Description", "Source File"])?;
    for story in catalog.sorted() {
        writer.write_record([
            story.id.as_str(),
            story.title.as_str(),
            story.description.as_str(),
            story.source_file.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
