//! Error types for the authscan library
//!
//! Per-file read failures are not errors at this level: the scanner turns them
//! into [`ScanError`](crate::scanner::ScanError) events and keeps walking.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the caller of the library
#[derive(Error, Debug)]
pub enum AuthScanError {
    /// Rejected before any file I/O happens
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid exclude pattern '{pattern}'")]
    InvalidExclude {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to compile auth pattern")]
    Pattern(#[from] regex::Error),

    #[error("failed to load configuration")]
    Config(#[from] Box<figment::Error>),

    #[error("failed to serialize report")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to format report")]
    Format(#[from] std::fmt::Error),

    #[error("failed to write report to {path}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AuthScanError {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn report_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReportWrite {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by caller input rather than the environment
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration(_) | Self::InvalidExclude { .. } | Self::Config(_)
        )
    }
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, AuthScanError>;
