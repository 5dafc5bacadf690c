use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use super::KeywordArgs;
use crate::cli::Output;
use crate::config::AuthScanConfig;
use crate::report::{ReportFormat, ScanReport};
use crate::scanner::{CompiledMatcher, DirectoryScanner, ScanEvent, ScanSession};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directories to scan, each reported relative to itself
    #[arg(value_name = "DIR", required = true)]
    pub directories: Vec<PathBuf>,

    #[command(flatten)]
    pub keywords: KeywordArgs,

    /// Additional paths to ignore (glob patterns, relative to each directory)
    #[arg(short, long, value_name = "GLOB", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Save the report to FILE
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Show statistics after scanning
    #[arg(long)]
    pub stats: bool,
}

pub fn execute(args: ScanArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    let mut config = AuthScanConfig::load(config_path).context("Failed to load configuration")?;

    // Apply CLI overrides
    args.keywords.apply(&mut config);
    let entered_keywords = args
        .keywords
        .entered()
        .unwrap_or_else(|| config.scanner.keywords.join(" "));
    config.scanner.exclude_paths.extend(args.exclude.iter().cloned());
    if args.follow_symlinks {
        config.scanner.follow_symlinks = true;
    }
    if let Some(format) = args.format {
        config.report.format = format;
    }

    let keywords = config.scanner.keyword_set().context("Invalid keywords")?;
    let matcher = CompiledMatcher::compile(&keywords)?;
    let scanner = DirectoryScanner::new(&matcher, config.scanner.scanner_config())
        .context("Invalid scanner configuration")?;

    output.banner("PHP auth scan");
    output.field("Keywords:", &entered_keywords);
    output.field("Pattern:", matcher.source());
    output.verbose(&format!("Scanning {} directories", args.directories.len()));

    let mut current_root: Option<PathBuf> = None;
    let session = ScanSession::run_with(&scanner, &args.directories, |event| {
        if current_root.as_deref() != Some(event.root()) {
            output.root(event.root());
            current_root = Some(event.root().to_path_buf());
        }
        match event {
            ScanEvent::Finding(finding) => output.finding(finding),
            ScanEvent::Error(error) => output.scan_error(error),
        }
        ControlFlow::Continue(())
    })?;

    output.blank_line();
    if session.has_findings() {
        output.alert(&format!("{} files without auth code", session.findings().len()));
    } else {
        output.success("All PHP files contain auth code");
    }
    if !session.errors().is_empty() {
        output.warning(&format!("{} files could not be read", session.errors().len()));
    }

    if args.stats {
        let stats = session.stats();
        output.section("📊 Scan Statistics");
        output.count("Files checked:", stats.files_visited);
        output.count("With auth code:", stats.files_covered);
        output.count("Placeholder files:", stats.files_trivial);
        output.count("Without auth code:", stats.findings);
        output.count("Unreadable:", stats.errors);
        output.count("Scan time (ms):", stats.scan_duration_ms);
    }

    let report_path = args
        .output
        .clone()
        .or_else(|| config.report.auto_save.then(|| config.report.output.clone()));
    if let Some(path) = report_path {
        save_report(&config, &entered_keywords, &matcher, &session, &path, output)?;
    }

    // Exit with error code if unguarded files were found
    if session.has_findings() {
        std::process::exit(1);
    }

    Ok(())
}

fn save_report(
    config: &AuthScanConfig,
    keywords: &str,
    matcher: &CompiledMatcher,
    session: &ScanSession,
    path: &Path,
    output: &Output,
) -> Result<()> {
    let report = ScanReport::new(&config.report.title, keywords, matcher, session);
    report
        .save(config.report.format, path)
        .with_context(|| format!("Failed to save report to {}", path.display()))?;
    output.success(&format!("Report saved to {}", path.display()));
    Ok(())
}
