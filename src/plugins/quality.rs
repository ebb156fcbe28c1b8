//! Transformation quality gate for a single source file.
//!
//! Four checks run in a fixed order and never short-circuit each other:
//! syntax, imports, complexity and size. The verdict is valid only when all
//! four are valid; its quality score is the mean of the four scores, or zero
//! for an invalid verdict.
//!
//! Complexity and size only ever degrade the score. A caller that needs a
//! hard size gate has to threshold `checks.size.score` itself.

use crate::core::error::RepogateError;
use crate::core::output;
use crate::core::time;
use crate::plugins::syntax::{self, SourceLanguage, SyntaxOutcome};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const IMPORT_PENALTY: f64 = 0.1;
const MIN_IMPORT_SCORE: f64 = 0.8;
const COMPLEXITY_CEILING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(skip)]
    pub name: String,
    pub valid: bool,
    pub score: f64,
    pub message: String,
}

impl CheckResult {
    fn new(name: &str, valid: bool, score: f64, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            valid,
            score,
            message: message.into(),
        }
    }
}

/// The four check results, serialized in run order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityChecks {
    pub syntax: CheckResult,
    pub imports: CheckResult,
    pub complexity: CheckResult,
    pub size: CheckResult,
}

impl QualityChecks {
    pub fn iter(&self) -> impl Iterator<Item = &CheckResult> {
        [&self.syntax, &self.imports, &self.complexity, &self.size].into_iter()
    }

    pub fn all_valid(&self) -> bool {
        self.iter().all(|c| c.valid)
    }

    pub fn mean_score(&self) -> f64 {
        self.iter().map(|c| c.score).sum::<f64>() / 4.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub file_path: String,
    pub timestamp: f64,
    pub checks: QualityChecks,
    pub quality_score: f64,
}

impl ValidationReport {
    pub fn from_checks(file_path: &str, checks: QualityChecks) -> Self {
        let valid = checks.all_valid();
        let quality_score = if valid { checks.mean_score() } else { 0.0 };
        Self {
            valid,
            file_path: file_path.to_string(),
            timestamp: time::now_epoch_f64(),
            checks,
            quality_score,
        }
    }
}

/// Verdict for a file that could not be checked at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedInput {
    pub valid: bool,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QualityVerdict {
    Checked(ValidationReport),
    Rejected(RejectedInput),
}

impl QualityVerdict {
    fn rejected(error: impl Into<String>) -> Self {
        QualityVerdict::Rejected(RejectedInput {
            valid: false,
            error: error.into(),
        })
    }

    pub fn is_valid(&self) -> bool {
        match self {
            QualityVerdict::Checked(report) => report.valid,
            QualityVerdict::Rejected(_) => false,
        }
    }

    pub fn quality_score(&self) -> f64 {
        match self {
            QualityVerdict::Checked(report) => report.quality_score,
            QualityVerdict::Rejected(_) => 0.0,
        }
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            QualityVerdict::Checked(report) => Some(report),
            QualityVerdict::Rejected(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineEntry {
    #[serde(default)]
    pub target_lines: Option<u64>,
}

/// Per-file size targets from `baseline_metrics.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(default)]
    pub target_files_baseline: HashMap<String, BaselineEntry>,
}

impl Baseline {
    /// Load a baseline file; a missing file is an empty baseline.
    pub fn load(path: &Path) -> Result<Self, RepogateError> {
        if !path.exists() {
            warn!(path = %path.display(), "baseline metrics not found, using current sizes as targets");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(RepogateError::IoError)?;
        serde_json::from_str(&raw).map_err(|e| {
            RepogateError::ConfigError(format!("invalid baseline {}: {}", path.display(), e))
        })
    }

    pub fn with_target(mut self, file_path: &str, target_lines: u64) -> Self {
        self.target_files_baseline.insert(
            file_path.to_string(),
            BaselineEntry {
                target_lines: Some(target_lines),
            },
        );
        self
    }

    /// Target for `file_path`, matched as given or without a leading `./`.
    pub fn target_lines(&self, file_path: &str) -> Option<u64> {
        let lookup = |key: &str| {
            self.target_files_baseline
                .get(key)
                .and_then(|entry| entry.target_lines)
        };
        lookup(file_path).or_else(|| {
            file_path
                .strip_prefix("./")
                .and_then(lookup)
                .or_else(|| lookup(&format!("./{}", file_path)))
        })
    }
}

pub fn check_syntax(language: SourceLanguage, content: &str) -> CheckResult {
    match syntax::check_source(language, content) {
        SyntaxOutcome::Valid => CheckResult::new("syntax", true, 1.0, "Syntax valid"),
        SyntaxOutcome::Invalid(msg) => {
            CheckResult::new("syntax", false, 0.0, format!("Syntax error: {}", msg))
        }
        SyntaxOutcome::Unavailable(msg) => CheckResult::new(
            "syntax",
            true,
            1.0,
            format!("Syntax check unavailable: {}", msg),
        ),
    }
}

/// Import lines that close a parenthesis they never balanced.
fn unbalanced_import(language: SourceLanguage, line: &str) -> bool {
    let trimmed = line.trim();
    language.is_import(trimmed)
        && trimmed.ends_with(')')
        && line.matches('(').count() != line.matches(')').count()
}

pub fn check_imports(language: SourceLanguage, content: &str) -> CheckResult {
    let offenders = content
        .split('\n')
        .filter(|line| unbalanced_import(language, line))
        .count();
    let score = (1.0 - IMPORT_PENALTY * offenders as f64).max(0.0);
    // Compare on the count so float rounding cannot move the threshold.
    let allowed = ((1.0 - MIN_IMPORT_SCORE) / IMPORT_PENALTY).round() as usize;
    if offenders > allowed {
        CheckResult::new(
            "imports",
            false,
            score,
            format!(
                "Import syntax issues detected ({} unbalanced import lines)",
                offenders
            ),
        )
    } else {
        CheckResult::new("imports", true, score, "Import syntax clean")
    }
}

/// Score for an estimated complexity; full marks up to the ceiling.
pub fn complexity_score(estimated: f64) -> f64 {
    if estimated <= COMPLEXITY_CEILING {
        1.0
    } else {
        (1.0 - (estimated - COMPLEXITY_CEILING) / 10.0).max(0.0)
    }
}

pub fn check_complexity(language: SourceLanguage, content: &str) -> CheckResult {
    let mut functions = 0usize;
    let mut classes = 0usize;
    for line in content.split('\n') {
        let trimmed = line.trim();
        if language.is_function_def(trimmed) {
            functions += 1;
        } else if language.is_class_def(trimmed) {
            classes += 1;
        }
    }
    let estimated =
        (functions as f64 / 5.0 + classes as f64 / 2.0).min(COMPLEXITY_CEILING);
    let score = complexity_score(estimated);
    let message = if estimated <= COMPLEXITY_CEILING {
        format!("Complexity acceptable ({:.1})", estimated)
    } else {
        format!("High complexity ({:.1})", estimated)
    };
    CheckResult::new("complexity", true, score, message)
}

pub fn check_size(current_lines: u64, target_lines: Option<u64>) -> CheckResult {
    let target = target_lines.unwrap_or(current_lines);
    if current_lines <= target {
        let score = if current_lines == 0 {
            1.0
        } else {
            (target as f64 / current_lines as f64).min(1.0)
        };
        CheckResult::new(
            "size",
            true,
            score,
            format!("Size acceptable: {}/{} lines", current_lines, target),
        )
    } else {
        let over = current_lines - target;
        let score = if target == 0 {
            0.0
        } else {
            (1.0 - over as f64 / target as f64).max(0.0)
        };
        CheckResult::new(
            "size",
            true,
            score,
            format!("Size target not met: {} lines over target", over),
        )
    }
}

/// Run all four checks on already-loaded content.
pub fn check_content(
    file_path: &str,
    content: &str,
    language: SourceLanguage,
    baseline: &Baseline,
) -> ValidationReport {
    let checks = QualityChecks {
        syntax: check_syntax(language, content),
        imports: check_imports(language, content),
        complexity: check_complexity(language, content),
        size: check_size(
            content.lines().count() as u64,
            baseline.target_lines(file_path),
        ),
    };
    ValidationReport::from_checks(file_path, checks)
}

/// Validate `file_path` as the given language.
pub fn validate_as(file_path: &Path, baseline: &Baseline, language: SourceLanguage) -> QualityVerdict {
    if !file_path.exists() {
        return QualityVerdict::rejected("File does not exist");
    }
    let content = match fs::read_to_string(file_path) {
        Ok(c) => c,
        Err(e) => return QualityVerdict::rejected(format!("Cannot read file: {}", e)),
    };
    debug!(path = %file_path.display(), language = language.name(), "running quality checks");
    let display = file_path.to_string_lossy();
    QualityVerdict::Checked(check_content(&display, &content, language, baseline))
}

/// Validate `file_path`, choosing the language from its extension.
pub fn validate(file_path: &Path, baseline: &Baseline) -> QualityVerdict {
    validate_as(file_path, baseline, SourceLanguage::from_path(file_path))
}

/// Persist a verdict as `<state_dir>/quality_results_<epoch>.json`.
pub fn save_verdict(state_dir: &Path, verdict: &QualityVerdict) -> Result<PathBuf, RepogateError> {
    let path = state_dir.join(format!("quality_results_{}.json", time::now_epoch_secs()));
    output::write_report(&path, &output::to_pretty_json(verdict)?)?;
    debug!(path = %path.display(), "quality verdict saved");
    Ok(path)
}
