use std::fmt;
use std::path::{Path, PathBuf};

/// A file without any recognized auth guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Scan root the file was found under, as supplied by the caller
    pub root: PathBuf,
    /// Path of the file relative to `root`
    pub relative_path: PathBuf,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.root.display(), self.relative_path.display())
    }
}

/// Non-fatal diagnostic for a file (or directory) that could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub root: PathBuf,
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot read {}: {}", self.path.display(), self.message)
    }
}

/// One item of the lazy scan stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Finding(Finding),
    Error(ScanError),
}

impl ScanEvent {
    pub fn root(&self) -> &Path {
        match self {
            ScanEvent::Finding(finding) => &finding.root,
            ScanEvent::Error(error) => &error.root,
        }
    }

    pub fn as_finding(&self) -> Option<&Finding> {
        match self {
            ScanEvent::Finding(finding) => Some(finding),
            ScanEvent::Error(_) => None,
        }
    }
}

/// Counters collected while scanning
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Eligible files the walk reached
    pub files_visited: usize,
    /// Files containing at least one guard
    pub files_covered: usize,
    /// Placeholder files consisting of the PHP open tag only
    pub files_trivial: usize,
    pub findings: usize,
    pub errors: usize,
    pub scan_duration_ms: u64,
}

impl ScanStats {
    /// Fold the counters of another scan into this one
    pub fn absorb(&mut self, other: &ScanStats) {
        self.files_visited += other.files_visited;
        self.files_covered += other.files_covered;
        self.files_trivial += other.files_trivial;
        self.findings += other.findings;
        self.errors += other.errors;
        self.scan_duration_ms += other.scan_duration_ms;
    }
}

/// Configuration for the directory scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// File-name suffix, without the leading dot
    pub extension: String,
    pub follow_symlinks: bool,
    /// Globs matched against the path relative to the scan root
    pub exclude_paths: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            extension: "php".to_string(),
            follow_symlinks: false,
            exclude_paths: vec![],
        }
    }
}
