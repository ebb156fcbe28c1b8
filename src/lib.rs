//! Repogate: repository hygiene gates for documentation-heavy projects.
//!
//! Three independent command-line tools share this crate:
//!
//! - `docs-compliance`: every Markdown document under the docs root must open
//!   with a YAML front-matter block carrying the required metadata fields, an
//!   ethical score of at least 91% and at least 8 AI keywords.
//! - `story-extract`: collect `US-<n>` user stories from Markdown and text
//!   files into a deduplicated, numerically sorted text report and CSV.
//! - `quality-gate`: run syntax, import, complexity and size checks on one
//!   transformed source file, persist a JSON verdict and exit non-zero when
//!   the file is rejected.
//!
//! # Exit codes
//!
//! - `0`: clean run
//! - `1`: violations found, invalid verdict, or `--fix` requested
//! - `2`: fatal error (bad configuration, missing docs root, report I/O)
//!
//! # Crate Structure
//!
//! - [`core`]: configuration, errors, logging, directory walking, output helpers
//! - [`plugins`]: the three tools plus Tree-sitter language support

pub mod core;
pub mod plugins;

mod cli;

use crate::cli::{ComplianceCli, QualityCli, ReportFormat, StoriesCli};
use crate::core::config::RepogateConfig;
use crate::core::error::RepogateError;
use crate::core::logging::{self, LogLevel};
use crate::core::output;
use crate::plugins::compliance::ComplianceChecker;
use crate::plugins::quality::{self, Baseline};
use crate::plugins::stories::{self, StoryExtractor};

use clap::Parser;
use colored::Colorize;
use tracing::info;

const FIX_UNAVAILABLE: &str = "Auto-fix not yet implemented - run without --fix for validation only";
const PREVIEW_ENTRIES: usize = 5;

/// Entry point for `docs-compliance`. Returns the process exit code.
pub fn run_compliance() -> Result<i32, RepogateError> {
    let cli = ComplianceCli::parse();
    logging::init(LogLevel::from_verbose(cli.verbose))?;

    if cli.fix {
        println!("{}", FIX_UNAVAILABLE);
        return Ok(1);
    }

    let mut config = RepogateConfig::load(cli.config.as_deref())?.compliance;
    if let Some(root) = cli.docs_root {
        config.docs_root = root;
    }

    let checker = ComplianceChecker::from_config(&config, cli.verbose);
    let compliant = match cli.format {
        ReportFormat::Text => checker.run()?,
        ReportFormat::Json => {
            let report = checker.check_tree()?;
            println!("{}", output::to_pretty_json(&report)?);
            report.is_compliant()
        }
    };
    Ok(if compliant { 0 } else { 1 })
}

/// Entry point for `story-extract`. Returns the process exit code.
pub fn run_stories() -> Result<i32, RepogateError> {
    let cli = StoriesCli::parse();
    logging::init(LogLevel::from_verbose(cli.verbose))?;

    let mut config = RepogateConfig::load(cli.config.as_deref())?.stories;
    if !cli.roots.is_empty() {
        config.search_roots = cli.roots;
    }
    if let Some(path) = cli.text_out {
        config.text_report = path;
    }
    if let Some(path) = cli.csv_out {
        config.csv_report = path;
    }

    let catalog = StoryExtractor::from_config(&config)
        .skip_path(&config.text_report)
        .skip_path(&config.csv_report)
        .scan();

    stories::write_text_report(&catalog, &config.text_report)?;
    stories::write_csv_report(&catalog, &config.csv_report)?;
    info!(
        text = %config.text_report.display(),
        csv = %config.csv_report.display(),
        "story reports written"
    );

    let summary = catalog.summary();
    println!("{}", "User Story Extraction".bold());
    println!("{}", output::rule(60));
    println!("Total stories: {}", summary.total);
    println!("With titles: {}", summary.with_titles);
    println!("With descriptions: {}", summary.with_descriptions);
    if !catalog.is_empty() {
        println!();
        println!("First {} entries:", PREVIEW_ENTRIES.min(catalog.len()));
        for story in catalog.sorted().into_iter().take(PREVIEW_ENTRIES) {
            println!(
                "  {}",
                output::compact_line(&format!("{} | {}", story.id, story.title), 72)
            );
        }
    }
    println!();
    println!("Text report: {}", config.text_report.display());
    println!("CSV report: {}", config.csv_report.display());
    Ok(0)
}

/// Entry point for `quality-gate`. Returns the process exit code.
pub fn run_quality() -> Result<i32, RepogateError> {
    let cli = QualityCli::parse();
    logging::init(LogLevel::from_verbose(cli.verbose))?;

    let mut config = RepogateConfig::load(cli.config.as_deref())?.quality;
    if let Some(path) = cli.baseline {
        config.baseline = path;
    }
    if let Some(dir) = cli.state_dir {
        config.state_dir = dir;
    }

    let baseline = Baseline::load(&config.baseline)?;
    let verdict = match cli.language {
        Some(language) => quality::validate_as(&cli.file_path, &baseline, language),
        None => quality::validate(&cli.file_path, &baseline),
    };
    let saved = quality::save_verdict(&config.state_dir, &verdict)?;
    info!(path = %saved.display(), valid = verdict.is_valid(), "quality verdict recorded");

    println!("{}", output::to_pretty_json(&verdict)?);
    Ok(if verdict.is_valid() { 0 } else { 1 })
}
