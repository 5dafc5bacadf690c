//! Multi-root scan aggregation
//!
//! Roots are walked one after another; findings keep the order in which the
//! walks produced them and stay attributed to their own root.

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Instant;

use super::directory::DirectoryScanner;
use super::types::{Finding, ScanError, ScanEvent, ScanStats};
use crate::error::{AuthScanError, Result};

/// Accumulated results of scanning one or more roots
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanSession {
    roots: Vec<PathBuf>,
    findings: Vec<Finding>,
    errors: Vec<ScanError>,
    stats: ScanStats,
    stopped: bool,
}

impl ScanSession {
    /// Scan every root in order, collecting all events
    pub fn run(scanner: &DirectoryScanner<'_>, roots: &[PathBuf]) -> Result<Self> {
        Self::run_with(scanner, roots, |_| ControlFlow::Continue(()))
    }

    /// Scan every root in order, handing each event to `on_event` as soon as
    /// it is produced
    ///
    /// Returning [`ControlFlow::Break`] from the callback stops the scan
    /// between two files; everything seen up to that point is kept.
    pub fn run_with<F>(scanner: &DirectoryScanner<'_>, roots: &[PathBuf], mut on_event: F) -> Result<Self>
    where
        F: FnMut(&ScanEvent) -> ControlFlow<()>,
    {
        if roots.is_empty() {
            return Err(AuthScanError::invalid_configuration(
                "at least one directory is required",
            ));
        }

        let started = Instant::now();
        let mut session = ScanSession {
            roots: roots.to_vec(),
            ..Default::default()
        };

        for root in roots {
            let mut events = scanner.scan(root);
            for event in events.by_ref() {
                let flow = on_event(&event);
                session.record(event);
                if flow.is_break() {
                    session.stopped = true;
                    break;
                }
            }

            let root_stats = events.stats();
            tracing::info!(
                "{}: {} files, {} without auth, {} unreadable",
                root.display(),
                root_stats.files_visited,
                root_stats.findings,
                root_stats.errors
            );
            session.stats.absorb(&root_stats);

            if session.stopped {
                tracing::debug!("Scan stopped by caller in {}", root.display());
                break;
            }
        }

        session.stats.scan_duration_ms = started.elapsed().as_millis() as u64;
        Ok(session)
    }

    /// Append one event
    pub fn record(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Finding(finding) => self.findings.push(finding),
            ScanEvent::Error(error) => self.errors.push(error),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// True when the callback ended the scan before all roots were walked
    pub fn was_stopped(&self) -> bool {
        self.stopped
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{CompiledMatcher, ScannerConfig};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_files(root: &Path, names: &[&str], content: &str) {
        for name in names {
            let path = root.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
    }

    #[test]
    fn test_findings_are_attributed_to_their_root() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_files(first.path(), &["Index.php", "sub/User.php"], "<?php\necho 1;");
        write_files(second.path(), &["Index.php", "a.php", "b/c.php"], "<?php\necho 2;");

        let matcher = CompiledMatcher::from_keywords(["auth"]).unwrap();
        let scanner = DirectoryScanner::new(&matcher, ScannerConfig::default()).unwrap();
        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let session = ScanSession::run(&scanner, &roots).unwrap();

        assert_eq!(session.findings().len(), 5);
        assert_eq!(session.stats().findings, 5);
        assert_eq!(session.stats().files_visited, 5);

        let (from_first, from_second): (Vec<_>, Vec<_>) = session
            .findings()
            .iter()
            .partition(|f| f.root == first.path());
        assert_eq!(from_first.len(), 2);
        assert_eq!(from_second.len(), 3);

        // Root order is preserved and paths never leak the root prefix
        assert!(session.findings()[..2].iter().all(|f| f.root == first.path()));
        for finding in session.findings() {
            assert!(finding.relative_path.is_relative());
            assert!(finding.root.join(&finding.relative_path).is_file());
        }
        assert_eq!(session.roots(), roots.as_slice());
    }

    #[test]
    fn test_duplicate_roots_are_not_deduplicated() {
        let root = TempDir::new().unwrap();
        write_files(root.path(), &["Index.php"], "<?php\necho 1;");

        let matcher = CompiledMatcher::from_keywords(["auth"]).unwrap();
        let scanner = DirectoryScanner::new(&matcher, ScannerConfig::default()).unwrap();
        let roots = vec![root.path().to_path_buf(), root.path().to_path_buf()];
        let session = ScanSession::run(&scanner, &roots).unwrap();

        assert_eq!(session.findings().len(), 2);
    }

    #[test]
    fn test_missing_root_does_not_skip_siblings() {
        let present = TempDir::new().unwrap();
        write_files(present.path(), &["Index.php"], "<?php\necho 1;");
        let missing = present.path().join("nope");

        let matcher = CompiledMatcher::from_keywords(["auth"]).unwrap();
        let scanner = DirectoryScanner::new(&matcher, ScannerConfig::default()).unwrap();
        let roots = vec![missing.clone(), present.path().to_path_buf()];
        let session = ScanSession::run(&scanner, &roots).unwrap();

        assert_eq!(session.errors().len(), 1);
        assert_eq!(session.errors()[0].root, missing);
        assert_eq!(session.findings().len(), 1);
    }

    #[test]
    fn test_empty_root_list_is_rejected() {
        let matcher = CompiledMatcher::from_keywords(["auth"]).unwrap();
        let scanner = DirectoryScanner::new(&matcher, ScannerConfig::default()).unwrap();
        let err = ScanSession::run(&scanner, &[]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_callback_sees_events_in_order_and_can_stop() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_files(first.path(), &["a.php", "b.php", "c.php"], "<?php\necho 1;");
        write_files(second.path(), &["d.php"], "<?php\necho 1;");

        let matcher = CompiledMatcher::from_keywords(["auth"]).unwrap();
        let scanner = DirectoryScanner::new(&matcher, ScannerConfig::default()).unwrap();
        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];

        let mut seen = Vec::new();
        let session = ScanSession::run_with(&scanner, &roots, |event| {
            seen.push(event.clone());
            if seen.len() == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();

        assert!(session.was_stopped());
        assert_eq!(session.findings().len(), 2);
        assert_eq!(seen.len(), 2);
        assert_eq!(
            session.findings()[0].relative_path,
            PathBuf::from("a.php")
        );
        assert_eq!(
            session.findings()[1].relative_path,
            PathBuf::from("b.php")
        );
    }
}
