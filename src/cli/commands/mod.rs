//! Command implementations for the authscan CLI
//!
//! Each command is organized into its own module.

pub mod config;
pub mod pattern;
pub mod scan;
pub mod version;

use clap::Args;

use crate::config::AuthScanConfig;

/// Keyword flags shared by `scan` and `pattern`
#[derive(Args, Debug, Default, Clone)]
pub struct KeywordArgs {
    /// Keyword indicating auth code (repeatable or comma-separated)
    #[arg(short = 'k', long = "keyword", value_name = "KEYWORD", value_delimiter = ',')]
    pub keyword: Vec<String>,

    /// Whitespace-separated keyword list, e.g. "session auth login"
    #[arg(long, value_name = "LIST", conflicts_with = "keyword")]
    pub keywords: Option<String>,
}

impl KeywordArgs {
    /// Keywords exactly as typed on the command line, if any were given
    pub fn entered(&self) -> Option<String> {
        match &self.keywords {
            Some(line) => Some(line.clone()),
            None if !self.keyword.is_empty() => Some(self.keyword.join(" ")),
            None => None,
        }
    }

    /// Replace the configured keywords when any keyword flag was given
    pub fn apply(&self, config: &mut AuthScanConfig) {
        if let Some(line) = &self.keywords {
            config.scanner.keywords = line.split_whitespace().map(String::from).collect();
        } else if !self.keyword.is_empty() {
            config.scanner.keywords = self.keyword.clone();
        }
    }
}
