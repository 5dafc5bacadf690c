use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, Walk, WalkBuilder};

use super::pattern::CompiledMatcher;
use super::types::{Finding, ScanError, ScanEvent, ScanStats, ScannerConfig};
use crate::error::{AuthScanError, Result};

/// The PHP open tag; a file holding nothing but this is a placeholder
const PHP_OPEN_TAG: &str = "<?php";

/// Placeholder files are at most this many characters once trimmed
const TRIVIAL_FILE_MAX_CHARS: usize = 5;

/// Walks scan roots and checks every eligible file against the matcher
///
/// A scan is lazy: [`DirectoryScanner::scan`] returns an iterator that reads
/// one file per step, so memory stays proportional to the largest file and the
/// caller can stop pulling at any point. Scanning the same root again re-runs
/// the walk from the start.
///
/// ```no_run
/// use authscan::scanner::{CompiledMatcher, DirectoryScanner, ScanEvent, ScannerConfig};
///
/// # fn example() -> authscan::Result<()> {
/// let matcher = CompiledMatcher::from_keywords(["session", "auth"])?;
/// let scanner = DirectoryScanner::new(&matcher, ScannerConfig::default())?;
/// for event in scanner.scan("application/admin/controller") {
///     if let ScanEvent::Finding(finding) = event {
///         println!("{}", finding.relative_path.display());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryScanner<'m> {
    matcher: &'m CompiledMatcher,
    filter: FileFilter,
    follow_symlinks: bool,
}

impl<'m> DirectoryScanner<'m> {
    pub fn new(matcher: &'m CompiledMatcher, config: ScannerConfig) -> Result<Self> {
        let filter = FileFilter::new(&config.extension, &config.exclude_paths)?;
        Ok(Self {
            matcher,
            filter,
            follow_symlinks: config.follow_symlinks,
        })
    }

    /// Start a lazy scan of one root
    ///
    /// Paths in findings are relative to this `root`. A missing or unreadable
    /// root produces a single [`ScanEvent::Error`].
    pub fn scan<P: AsRef<Path>>(&self, root: P) -> ScanIter<'m> {
        let root = root.as_ref().to_path_buf();
        tracing::debug!("Scanning {}", root.display());

        // Sorted so that repeated scans of an unchanged tree agree
        let walker = WalkBuilder::new(&root)
            .standard_filters(false)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        ScanIter {
            matcher: self.matcher,
            filter: self.filter.clone(),
            root,
            walker,
            stats: ScanStats::default(),
            started: Instant::now(),
        }
    }

    /// Classify a single file found under `root`
    pub fn inspect_file(&self, root: &Path, path: &Path) -> FileVerdict {
        inspect(self.matcher, root, path)
    }
}

/// Outcome of checking one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileVerdict {
    /// The file references a keyword in a recognized shape
    Covered,
    /// The file holds nothing but the PHP open tag
    Trivial,
    Uncovered(Finding),
    Unreadable(ScanError),
}

/// Decides which walked files get checked
#[derive(Debug, Clone)]
struct FileFilter {
    suffix: String,
    excludes: GlobSet,
}

impl FileFilter {
    fn new(extension: &str, exclude_paths: &[String]) -> Result<Self> {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(AuthScanError::invalid_configuration(
                "file extension must not be empty",
            ));
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in exclude_paths {
            let glob = Glob::new(pattern).map_err(|source| AuthScanError::InvalidExclude {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let excludes = builder
            .build()
            .map_err(|source| AuthScanError::InvalidExclude {
                pattern: exclude_paths.join(","),
                source,
            })?;

        Ok(Self {
            suffix: format!(".{extension}"),
            excludes,
        })
    }

    fn accepts(&self, file_name: &str, relative_path: &Path) -> bool {
        file_name.ends_with(&self.suffix) && !self.excludes.is_match(relative_path)
    }
}

/// Lazy stream of scan events for one root
pub struct ScanIter<'m> {
    matcher: &'m CompiledMatcher,
    filter: FileFilter,
    root: PathBuf,
    walker: Walk,
    stats: ScanStats,
    started: Instant,
}

impl ScanIter<'_> {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Counters for the files handled so far
    pub fn stats(&self) -> ScanStats {
        ScanStats {
            scan_duration_ms: self.started.elapsed().as_millis() as u64,
            ..self.stats
        }
    }

    fn walk_error(&mut self, err: ignore::Error) -> ScanEvent {
        let path = error_path(&err)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        tracing::warn!("Walk error under {}: {}", self.root.display(), err);
        self.stats.errors += 1;
        ScanEvent::Error(ScanError {
            root: self.root.clone(),
            path,
            message: err.to_string(),
        })
    }

    fn is_candidate(&self, entry: &DirEntry) -> bool {
        // The root itself is never reported against itself
        if entry.depth() == 0 {
            return false;
        }

        // Symlinks that do not lead to a directory are treated as files, so a
        // dangling link surfaces as a read error instead of vanishing
        let is_file = match entry.file_type() {
            Some(ft) if ft.is_file() => true,
            Some(ft) if ft.is_symlink() => !entry.path().is_dir(),
            _ => false,
        };
        if !is_file {
            return false;
        }

        let file_name = entry.file_name().to_string_lossy();
        let relative = relative_to(entry.path(), &self.root);
        self.filter.accepts(&file_name, &relative)
    }
}

impl Iterator for ScanIter<'_> {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<ScanEvent> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(self.walk_error(err)),
            };

            if !self.is_candidate(&entry) {
                continue;
            }

            self.stats.files_visited += 1;
            match inspect(self.matcher, &self.root, entry.path()) {
                FileVerdict::Covered => self.stats.files_covered += 1,
                FileVerdict::Trivial => self.stats.files_trivial += 1,
                FileVerdict::Uncovered(finding) => {
                    self.stats.findings += 1;
                    return Some(ScanEvent::Finding(finding));
                }
                FileVerdict::Unreadable(error) => {
                    self.stats.errors += 1;
                    return Some(ScanEvent::Error(error));
                }
            }
        }
    }
}

fn inspect(matcher: &CompiledMatcher, root: &Path, path: &Path) -> FileVerdict {
    let content = match read_lenient(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!("Cannot read {}: {}", path.display(), err);
            return FileVerdict::Unreadable(ScanError {
                root: root.to_path_buf(),
                path: path.to_path_buf(),
                message: err.to_string(),
            });
        }
    };

    if is_trivial(&content) {
        tracing::debug!("Skipping placeholder file {}", path.display());
        return FileVerdict::Trivial;
    }

    match matcher.find(&content) {
        Some(guard) => {
            tracing::trace!("{} covered by '{}'", path.display(), guard);
            FileVerdict::Covered
        }
        None => FileVerdict::Uncovered(Finding {
            root: root.to_path_buf(),
            relative_path: relative_to(path, root),
        }),
    }
}

/// Read a file as text, dropping byte sequences that are not valid UTF-8
pub fn read_lenient(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode_lenient(&bytes))
}

/// Decode UTF-8, silently dropping invalid sequences
pub fn decode_lenient(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.utf8_chunks().map(|chunk| chunk.valid()).collect(),
    }
}

/// True for placeholder files: nothing but the PHP open tag once trimmed
pub fn is_trivial(content: &str) -> bool {
    let trimmed = content.trim();
    trimmed.chars().count() <= TRIVIAL_FILE_MAX_CHARS && trimmed.starts_with(PHP_OPEN_TAG)
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        _ => None,
    }
}
