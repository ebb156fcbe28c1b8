//! `repogate.toml` configuration.
//!
//! Every key is optional. A missing default config file means defaults; an
//! explicitly requested config file must exist. Command-line flags are
//! applied on top by the binaries.

use crate::core::error::RepogateError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = "repogate.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepogateConfig {
    pub compliance: ComplianceConfig,
    pub stories: StoriesConfig,
    pub quality: QualityConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComplianceConfig {
    pub docs_root: PathBuf,
    /// Basenames never checked, wherever they appear in the tree.
    pub excluded_files: Vec<String>,
    pub required_fields: Vec<String>,
    pub min_ethical_score: u64,
    pub min_keywords: usize,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            docs_root: PathBuf::from("docs"),
            excluded_files: vec![
                "README.md".to_string(),
                "biological_consciousness_system_documentation.md".to_string(),
            ],
            required_fields: [
                "title",
                "document_category",
                "document_type",
                "version",
                "last_updated",
                "ai_keywords",
                "ethical_score",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            min_ethical_score: 91,
            min_keywords: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoriesConfig {
    /// Scanned in order; earlier roots win identifier conflicts.
    pub search_roots: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub text_report: PathBuf,
    pub csv_report: PathBuf,
}

impl Default for StoriesConfig {
    fn default() -> Self {
        Self {
            search_roots: [
                "docs/9.x-user-interface/9.1-wireframes",
                "implementation-code/modules",
                "testing-code",
                "docs",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
            extensions: vec!["md".to_string(), "txt".to_string()],
            text_report: PathBuf::from("user_stories_complete_456.txt"),
            csv_report: PathBuf::from("user_stories_complete_456.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    pub state_dir: PathBuf,
    pub baseline: PathBuf,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("refactoring_state"),
            baseline: PathBuf::from("refactoring_state/baseline_metrics.json"),
        }
    }
}

impl RepogateConfig {
    /// Load `explicit` if given (it must exist), else `./repogate.toml` if
    /// present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, RepogateError> {
        let path = match explicit {
            Some(p) => {
                if !p.is_file() {
                    return Err(RepogateError::ConfigError(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                p.to_path_buf()
            }
            None => {
                let default_path = PathBuf::from(CONFIG_FILE);
                if !default_path.is_file() {
                    debug!("no {} found, using defaults", CONFIG_FILE);
                    return Ok(Self::default());
                }
                default_path
            }
        };
        let raw = fs::read_to_string(&path).map_err(RepogateError::IoError)?;
        let config = Self::parse(&raw).map_err(|e| match e {
            RepogateError::ConfigError(msg) => {
                RepogateError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self, RepogateError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| RepogateError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), RepogateError> {
        if self.compliance.min_ethical_score > 100 {
            return Err(RepogateError::ConfigError(
                "compliance.min_ethical_score must be at most 100".to_string(),
            ));
        }
        if self.compliance.min_keywords == 0 {
            return Err(RepogateError::ConfigError(
                "compliance.min_keywords must be greater than 0".to_string(),
            ));
        }
        if self.stories.search_roots.is_empty() {
            return Err(RepogateError::ConfigError(
                "stories.search_roots must not be empty".to_string(),
            ));
        }
        if self.stories.extensions.is_empty() {
            return Err(RepogateError::ConfigError(
                "stories.extensions must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
