//! Terminal output for the authscan commands
//!
//! Scan results (findings and unreadable files) are never silenced. Under
//! `--quiet` they switch to a self-describing `[root] path` form, since the
//! per-root headings are not printed.

use std::fmt::Display;
use std::path::Path;

use console::{Style, style};

use crate::scanner::{Finding, ScanError};

/// Width of the label column in `field` and `count` lines
const LABEL_WIDTH: usize = 20;

pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        self.line(&format!("{} {}", style("✔").green(), message));
    }

    pub fn info(&self, message: &str) {
        self.line(&format!("{} {}", style("ℹ").blue(), message));
    }

    /// Only shown with `-v`
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            self.line(&style(message).dim().to_string());
        }
    }

    /// Non-fatal notice on stderr
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Command title
    pub fn banner(&self, title: &str) {
        self.line(&format!("\n{}", style(title).bold().underlined()));
    }

    /// Heading of a block of related lines
    pub fn section(&self, title: &str) {
        self.line(&format!("\n{}", style(title).bold().cyan()));
    }

    /// Heading printed before the first event of a scan root
    pub fn root(&self, root: &Path) {
        self.section(&format!("🔎 {}", root.display()));
    }

    /// A file without auth code, always printed to stdout
    pub fn finding(&self, finding: &Finding) {
        if self.quiet {
            println!("{finding}");
        } else {
            println!("  {} {}", style("-").red().bold(), finding.relative_path.display());
        }
    }

    /// An unreadable file or directory, always printed to stderr
    pub fn scan_error(&self, error: &ScanError) {
        if self.quiet {
            eprintln!("[{}] {}", error.root.display(), error);
        } else {
            eprintln!("  {} {}", style("!").yellow().bold(), error);
        }
    }

    /// Labelled value, e.g. `Keywords:  session auth`
    pub fn field(&self, label: &str, value: &str) {
        self.labelled(label, style(value).white(), Style::new().dim());
    }

    /// Labelled value that is the point of the output
    pub fn emphasis(&self, label: &str, value: &str) {
        self.labelled(label, style(value).green().bold(), Style::new().dim());
    }

    pub fn count(&self, label: &str, value: impl Display) {
        self.labelled(label, style(value.to_string()).bold(), Style::new().dim());
    }

    /// Red summary line for a negative result
    pub fn alert(&self, message: &str) {
        self.line(&format!("{} {}", style("✗").red().bold(), style(message).red()));
    }

    pub fn blank_line(&self) {
        self.line("");
    }

    fn labelled<V: Display>(&self, label: &str, value: V, label_style: Style) {
        let label = format!("{:<width$}", label, width = LABEL_WIDTH);
        self.line(&format!("  {}{}", label_style.apply_to(label), value));
    }

    fn line(&self, text: &str) {
        if !self.quiet {
            println!("{text}");
        }
    }
}
