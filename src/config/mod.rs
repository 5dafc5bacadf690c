//! Configuration management for authscan
//!
//! Settings are layered with figment (see [`AuthScanConfig::load`]) and
//! extracted into the typed sections below. CLI flags are applied on top of
//! the extracted values by the commands themselves.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AuthScanError, Result};
use crate::report::{DEFAULT_TITLE, ReportFormat};
use crate::scanner::{DEFAULT_KEYWORDS, KeywordSet, ScannerConfig};

mod loader;
pub mod smart_load;

pub use loader::{DEFAULT_CONFIG, ENV_PREFIX, PROJECT_CONFIG_STEM};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthScanConfig {
    pub scanner: ScannerSettings,
    pub report: ReportSettings,
}

/// `[scanner]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    /// Identifiers that indicate auth code
    pub keywords: Vec<String>,

    /// File-name suffix of checked files, without the dot
    pub extension: String,

    pub follow_symlinks: bool,

    /// Globs relative to each scanned directory that are never checked
    pub exclude_paths: Vec<String>,
}

/// `[report]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub title: String,
    pub format: ReportFormat,

    /// Destination used when a report is saved without an explicit path
    pub output: PathBuf,

    /// Save a report after every scan
    pub auto_save: bool,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        let defaults = ScannerConfig::default();
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            extension: defaults.extension,
            follow_symlinks: defaults.follow_symlinks,
            exclude_paths: defaults.exclude_paths,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            format: ReportFormat::Text,
            output: PathBuf::from("scan_results.txt"),
            auto_save: false,
        }
    }
}

impl ScannerSettings {
    pub fn keyword_set(&self) -> Result<KeywordSet> {
        KeywordSet::new(self.keywords.iter().cloned())
    }

    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            extension: self.extension.clone(),
            follow_symlinks: self.follow_symlinks,
            exclude_paths: self.exclude_paths.clone(),
        }
    }
}

impl AuthScanConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.scanner.keyword_set()?;

        if self.scanner.extension.trim_start_matches('.').is_empty() {
            return Err(AuthScanError::invalid_configuration(
                "scanner.extension must not be empty",
            ));
        }

        for pattern in &self.scanner.exclude_paths {
            globset::Glob::new(pattern).map_err(|source| AuthScanError::InvalidExclude {
                pattern: pattern.clone(),
                source,
            })?;
        }

        if self.report.title.trim().is_empty() {
            return Err(AuthScanError::invalid_configuration(
                "report.title must not be empty",
            ));
        }

        Ok(())
    }
}
