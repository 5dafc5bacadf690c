use std::fmt::{self, Write};
use std::path::PathBuf;

use super::{ReportGenerator, ScanReport};
use crate::error::Result;

const RULE_WIDTH: usize = 50;

/// Plain text report in the layout reviewers already archive
pub struct TextReportGenerator;

impl ReportGenerator for TextReportGenerator {
    fn generate(&self, report: &ScanReport) -> Result<String> {
        let mut out = String::new();
        write_report(&mut out, report)?;
        Ok(out)
    }
}

fn write_report(out: &mut impl Write, report: &ScanReport) -> fmt::Result {
    writeln!(out, "{} - {}", report.title, report.timestamp())?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out)?;

    writeln!(out, "【扫描配置】")?;
    writeln!(out, "关键词: {}", report.keywords)?;
    writeln!(out, "正则表达式: {}", report.pattern)?;
    writeln!(out, "扫描目录: {}", list_literal(&report.directories))?;
    writeln!(out)?;

    writeln!(out, "【扫描结果】")?;
    if report.findings.is_empty() {
        return writeln!(out, "所有PHP文件均包含鉴权代码！");
    }

    writeln!(out, "共发现 {} 个文件未检测到鉴权代码:", report.findings.len())?;
    writeln!(out)?;
    for finding in &report.findings {
        writeln!(out, "{finding}")?;
    }
    Ok(())
}

/// `['a', 'b']`
fn list_literal(paths: &[PathBuf]) -> String {
    let items: Vec<String> = paths
        .iter()
        .map(|path| format!("'{}'", path.display()))
        .collect();
    format!("[{}]", items.join(", "))
}
