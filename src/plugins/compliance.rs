//! Documentation compliance: YAML front-matter schema checks over a docs tree.
//!
//! Every Markdown document under the docs root must open with a `---` fenced
//! YAML block carrying the required metadata fields, an `ethical_score`
//! percentage at or above the minimum, and at least the minimum number of
//! `ai_keywords`.
//!
//! - Violations accumulate; a bad document never stops the scan
//! - Unreadable documents are reported as violations, not errors
//! - Traversal order is sorted, so repeated runs report identically

use crate::core::config::ComplianceConfig;
use crate::core::error::RepogateError;
use crate::core::output;
use crate::core::walk;
use colored::Colorize;
use regex::Regex;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static FRONT_MATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\r?\n(?:(.*?)\r?\n)??---(?:\r?\n|\z)").unwrap());

static PERCENTAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)%").unwrap());

/// Schema thresholds applied to every document.
#[derive(Debug, Clone, PartialEq)]
pub struct CompliancePolicy {
    pub required_fields: Vec<String>,
    pub min_ethical_score: u64,
    pub min_keywords: usize,
    pub excluded_files: Vec<String>,
}

impl Default for CompliancePolicy {
    fn default() -> Self {
        Self::from(&ComplianceConfig::default())
    }
}

impl From<&ComplianceConfig> for CompliancePolicy {
    fn from(config: &ComplianceConfig) -> Self {
        Self {
            required_fields: config.required_fields.clone(),
            min_ethical_score: config.min_ethical_score,
            min_keywords: config.min_keywords,
            excluded_files: config.excluded_files.clone(),
        }
    }
}

impl CompliancePolicy {
    pub fn is_excluded(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.excluded_files.iter().any(|x| x == name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrontMatterError {
    Missing,
    Invalid(String),
}

impl fmt::Display for FrontMatterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontMatterError::Missing => write!(f, "Missing YAML frontmatter"),
            FrontMatterError::Invalid(msg) => write!(f, "Invalid YAML frontmatter - {}", msg),
        }
    }
}

/// Parsed front-matter fields of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    fields: Mapping,
}

impl FrontMatter {
    /// Locate and parse the fenced block at the very start of `content`.
    pub fn extract(content: &str) -> Result<Self, FrontMatterError> {
        let caps = FRONT_MATTER
            .captures(content)
            .ok_or(FrontMatterError::Missing)?;
        let block = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        Self::parse(block)
    }

    pub fn parse(block: &str) -> Result<Self, FrontMatterError> {
        let value: Value =
            serde_yaml::from_str(block).map_err(|e| FrontMatterError::Invalid(e.to_string()))?;
        match value {
            Value::Mapping(fields) => Ok(Self { fields }),
            Value::Null => Ok(Self::default()),
            _ => Err(FrontMatterError::Invalid(
                "expected a mapping of fields".to_string(),
            )),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Presence test; a key with a null value is present.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }
}

/// Number of keywords in an `ai_keywords` value, or `None` for a value that
/// is neither a list nor a string.
pub fn keyword_count(value: &Value) -> Option<usize> {
    match value {
        Value::Sequence(items) => Some(items.len()),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .count(),
        ),
        _ => None,
    }
}

/// First integer written immediately before a `%`.
pub fn ethical_percentage(value: &Value) -> Option<u64> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    PERCENTAGE
        .captures(&text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

/// Schema messages for one document's front-matter, in check order.
pub fn validate_front_matter(front_matter: &FrontMatter, policy: &CompliancePolicy) -> Vec<String> {
    let mut messages = Vec::new();

    for field in &policy.required_fields {
        if !front_matter.contains(field) {
            messages.push(format!("Missing required field '{}'", field));
        }
    }

    match front_matter.get("ethical_score") {
        None => messages.push("Missing ethical_score field".to_string()),
        Some(value) => match ethical_percentage(value) {
            None => messages.push("Unable to parse ethical_score percentage".to_string()),
            Some(score) if score < policy.min_ethical_score => messages.push(format!(
                "Ethical score {}% below minimum {}% requirement",
                score, policy.min_ethical_score
            )),
            Some(_) => {}
        },
    }

    match front_matter.get("ai_keywords") {
        None => messages.push("Missing ai_keywords field".to_string()),
        Some(value) => match keyword_count(value) {
            None => {
                messages.push("ai_keywords must be list or comma-separated string".to_string())
            }
            Some(count) if count < policy.min_keywords => messages.push(format!(
                "Only {} AI keywords, minimum {} required",
                count, policy.min_keywords
            )),
            Some(_) => {}
        },
    }

    messages
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: PathBuf,
    pub message: String,
}

impl Violation {
    pub fn new(path: &Path, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", walk::display_path(&self.path), self.message)
    }
}

/// All violations for one document. Read failures become a single
/// `Validation error` violation.
pub fn check_document(path: &Path, policy: &CompliancePolicy) -> Vec<Violation> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return vec![Violation::new(path, format!("Validation error - {}", e))],
    };
    match FrontMatter::extract(&content) {
        Err(e) => vec![Violation::new(path, e.to_string())],
        Ok(front_matter) => validate_front_matter(&front_matter, policy)
            .into_iter()
            .map(|m| Violation::new(path, m))
            .collect(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub docs_root: PathBuf,
    pub files_checked: usize,
    pub compliant: bool,
    pub violations: Vec<Violation>,
}

impl ComplianceReport {
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }
}

pub struct ComplianceChecker {
    docs_root: PathBuf,
    policy: CompliancePolicy,
    verbose: bool,
}

impl ComplianceChecker {
    pub fn new(docs_root: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            docs_root: docs_root.into(),
            policy: CompliancePolicy::default(),
            verbose,
        }
    }

    pub fn from_config(config: &ComplianceConfig, verbose: bool) -> Self {
        Self::new(config.docs_root.clone(), verbose).with_policy(CompliancePolicy::from(config))
    }

    pub fn with_policy(mut self, policy: CompliancePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &CompliancePolicy {
        &self.policy
    }

    /// Markdown documents under the docs root, minus excluded basenames.
    /// Every subdirectory is visited, including `target/` and `.git/`.
    pub fn documents(&self) -> Result<Vec<PathBuf>, RepogateError> {
        if !self.docs_root.is_dir() {
            return Err(RepogateError::PathError(format!(
                "docs root not found: {}",
                self.docs_root.display()
            )));
        }
        let md = vec!["md".to_string()];
        Ok(walk::collect_files(&self.docs_root, &[], |p| {
            walk::has_extension(p, &md) && !self.policy.is_excluded(p)
        }))
    }

    fn scan<F>(&self, mut on_document: F) -> Result<ComplianceReport, RepogateError>
    where
        F: FnMut(&Path),
    {
        let documents = self.documents()?;
        let mut violations = Vec::new();
        for doc in &documents {
            on_document(doc);
            debug!(path = %doc.display(), "validating document");
            violations.extend(check_document(doc, &self.policy));
        }
        Ok(ComplianceReport {
            docs_root: self.docs_root.clone(),
            files_checked: documents.len(),
            compliant: violations.is_empty(),
            violations,
        })
    }

    /// Validate the whole tree without printing anything.
    pub fn check_tree(&self) -> Result<ComplianceReport, RepogateError> {
        self.scan(|_| {})
    }

    /// Validate the tree and print the human report to stdout.
    pub fn run(&self) -> Result<bool, RepogateError> {
        println!("{}", "Documentation Compliance Monitor".bold());
        println!("{}", output::rule(60));

        let verbose = self.verbose;
        let report = self.scan(|doc| {
            if verbose {
                println!("[INFO] Validating {}", walk::display_path(doc));
            }
        })?;

        if report.is_compliant() {
            println!();
            println!("{}", "ALL DOCUMENTATION COMPLIANT".bright_green().bold());
            println!(
                "{} document(s) checked under {}",
                report.files_checked,
                walk::display_path(&report.docs_root)
            );
        } else {
            println!();
            println!(
                "{}",
                format!("COMPLIANCE VIOLATIONS FOUND ({})", report.violations.len())
                    .bright_red()
                    .bold()
            );
            println!();
            println!("Violations:");
            for violation in &report.violations {
                println!("  • {}", violation);
            }
        }

        Ok(report.is_compliant())
    }
}

/// Check every document under `docs_root` with the default policy, print the
/// report, and return whether the tree is fully compliant.
pub fn run(docs_root: &Path, verbose: bool) -> Result<bool, RepogateError> {
    ComplianceChecker::new(docs_root, verbose).run()
}
