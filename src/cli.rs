//! CLI struct definitions for the three gate binaries.
//!
//! All clap-derived types live here. Dispatch lives in `lib.rs`.

use crate::plugins::syntax::SourceLanguage;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[clap(
    name = "docs-compliance",
    version = env!("CARGO_PKG_VERSION"),
    about = "Check YAML front-matter of every Markdown document under the docs root"
)]
pub(crate) struct ComplianceCli {
    /// Attempt to fix violations (not implemented; exits 1).
    #[clap(long)]
    pub fix: bool,
    /// Print each document as it is validated.
    #[clap(long, short = 'v')]
    pub verbose: bool,
    /// Documentation root (overrides `[compliance].docs_root`).
    #[clap(long)]
    pub docs_root: Option<PathBuf>,
    /// Output format: 'text' or 'json'.
    #[clap(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
    /// Configuration file (defaults to ./repogate.toml when present).
    #[clap(long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[clap(
    name = "story-extract",
    version = env!("CARGO_PKG_VERSION"),
    about = "Collect US-<n> user stories into text and CSV reports"
)]
pub(crate) struct StoriesCli {
    /// Search root, in priority order. Repeatable; replaces the configured roots.
    #[clap(long = "root")]
    pub roots: Vec<PathBuf>,
    /// Text report path.
    #[clap(long)]
    pub text_out: Option<PathBuf>,
    /// CSV report path.
    #[clap(long)]
    pub csv_out: Option<PathBuf>,
    /// Configuration file (defaults to ./repogate.toml when present).
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Enable debug logging.
    #[clap(long, short = 'v')]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[clap(
    name = "quality-gate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validate one transformed source file and record a JSON verdict"
)]
pub(crate) struct QualityCli {
    /// File to validate.
    pub file_path: PathBuf,
    /// Baseline metrics JSON (overrides `[quality].baseline`).
    #[clap(long)]
    pub baseline: Option<PathBuf>,
    /// Directory for quality_results_<epoch>.json (overrides `[quality].state_dir`).
    #[clap(long)]
    pub state_dir: Option<PathBuf>,
    /// Source language; detected from the extension when omitted.
    #[clap(long, value_enum)]
    pub language: Option<SourceLanguage>,
    /// Configuration file (defaults to ./repogate.toml when present).
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Enable debug logging.
    #[clap(long, short = 'v')]
    pub verbose: bool,
}
