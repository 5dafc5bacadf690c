use serde_json::json;

use super::{ReportGenerator, ScanReport};
use crate::error::Result;

/// JSON report for tooling that post-processes findings
pub struct JsonReportGenerator;

impl ReportGenerator for JsonReportGenerator {
    fn generate(&self, report: &ScanReport) -> Result<String> {
        let document = json!({
            "title": report.title,
            "generated_at": report.timestamp(),
            "keywords": report.keywords,
            "pattern": report.pattern,
            "directories": report.directories.iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>(),
            "findings": report.findings.iter().map(|f| json!({
                "root": f.root.display().to_string(),
                "path": f.relative_path.display().to_string(),
            })).collect::<Vec<_>>(),
            "errors": report.errors.iter().map(|e| json!({
                "root": e.root.display().to_string(),
                "path": e.path.display().to_string(),
                "message": e.message,
            })).collect::<Vec<_>>(),
            "summary": {
                "findings": report.findings.len(),
                "errors": report.errors.len(),
            }
        });

        let mut content = serde_json::to_string_pretty(&document)?;
        content.push('\n');
        Ok(content)
    }
}
