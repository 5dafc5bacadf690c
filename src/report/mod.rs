//! Scan reports
//!
//! A [`ScanReport`] is a snapshot of one scan: the keywords as entered, the
//! generated pattern, the scanned directories and the findings in the order
//! they were produced. Generators render it without reordering anything.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{AuthScanError, Result};
use crate::scanner::{CompiledMatcher, Finding, ScanError, ScanSession};

mod json;
mod text;

pub use json::JsonReportGenerator;
pub use text::TextReportGenerator;

/// Default report title
pub const DEFAULT_TITLE: &str = "PHP鉴权代码扫描结果";

/// Timestamp layout used in report headers
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Core reporting trait - allows pluggable report formats
pub trait ReportGenerator {
    /// Generate report content as a string
    fn generate(&self, report: &ScanReport) -> Result<String>;
}

/// Supported report formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Plain text, one `[dir] file` line per finding
    #[default]
    Text,
    /// JSON document
    Json,
}

impl ReportFormat {
    pub fn generator(self) -> Box<dyn ReportGenerator> {
        match self {
            ReportFormat::Text => Box::new(TextReportGenerator),
            ReportFormat::Json => Box::new(JsonReportGenerator),
        }
    }
}

/// Everything a saved report contains
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub title: String,
    pub generated_at: DateTime<Local>,
    /// Keywords as the user entered them, before deduplication
    pub keywords: String,
    /// Source text of the compiled pattern
    pub pattern: String,
    pub directories: Vec<PathBuf>,
    pub findings: Vec<Finding>,
    pub errors: Vec<ScanError>,
}

impl ScanReport {
    pub fn new(
        title: impl Into<String>,
        keywords: impl Into<String>,
        matcher: &CompiledMatcher,
        session: &ScanSession,
    ) -> Self {
        Self {
            title: title.into(),
            generated_at: Local::now(),
            keywords: keywords.into(),
            pattern: matcher.source().to_string(),
            directories: session.roots().to_vec(),
            findings: session.findings().to_vec(),
            errors: session.errors().to_vec(),
        }
    }

    /// Override the report timestamp
    pub fn with_timestamp(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        format.generator().generate(self)
    }

    /// Render and write the report to `path`
    ///
    /// A failed write leaves the report (and the scan results) untouched so
    /// the caller can retry with another destination.
    pub fn save(&self, format: ReportFormat, path: &Path) -> Result<()> {
        let content = self.render(format)?;
        fs::write(path, content).map_err(|source| AuthScanError::report_write(path, source))?;
        tracing::info!("Report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{DirectoryScanner, KeywordSet, ScannerConfig};
    use chrono::TimeZone;
    use tempfile::TempDir;

    pub(super) fn sample_report(findings: Vec<Finding>) -> ScanReport {
        ScanReport {
            title: DEFAULT_TITLE.to_string(),
            generated_at: Local::now(),
            keywords: "session auth".to_string(),
            pattern: r"\bsession\b|\$session\[".to_string(),
            directories: vec![PathBuf::from("/srv/app/admin"), PathBuf::from("/srv/app/api")],
            findings,
            errors: vec![],
        }
        .with_timestamp(Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap())
    }

    #[test]
    fn test_report_from_session() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("Index.php"), "<?php\necho 1;").unwrap();

        let entered = "session  auth session";
        let keywords = KeywordSet::parse(entered).unwrap();
        let matcher = CompiledMatcher::compile(&keywords).unwrap();
        let scanner = DirectoryScanner::new(&matcher, ScannerConfig::default()).unwrap();
        let session = ScanSession::run(&scanner, &[temp_dir.path().to_path_buf()]).unwrap();

        let report = ScanReport::new(DEFAULT_TITLE, entered, &matcher, &session);
        assert_eq!(report.keywords, "session  auth session");
        assert_eq!(keywords.len(), 2);
        assert_eq!(report.pattern, matcher.source());
        assert_eq!(report.directories, vec![temp_dir.path().to_path_buf()]);
        assert_eq!(report.findings.len(), 1);
    }

    #[test]
    fn test_save_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scan_results.txt");

        sample_report(vec![]).save(ReportFormat::Text, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("PHP鉴权代码扫描结果 - 2024-05-06 07:08:09\n"));
    }

    #[test]
    fn test_save_to_unwritable_destination_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing-dir").join("report.txt");

        let err = sample_report(vec![]).save(ReportFormat::Text, &path).unwrap_err();
        assert!(matches!(err, AuthScanError::ReportWrite { .. }));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_format_parsing() {
        let format: ReportFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, ReportFormat::Json);
        assert_eq!(ReportFormat::default(), ReportFormat::Text);
    }
}
