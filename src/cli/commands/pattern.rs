//! Pattern command implementation
//!
//! Prints the regular expression built from the effective keywords, and can
//! check a single file against it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::KeywordArgs;
use crate::cli::Output;
use crate::config::AuthScanConfig;
use crate::scanner::{CompiledMatcher, is_trivial, read_lenient};

#[derive(Args, Debug)]
pub struct PatternArgs {
    #[command(flatten)]
    pub keywords: KeywordArgs,

    /// Check FILE against the pattern
    #[arg(long, value_name = "FILE")]
    pub check: Option<PathBuf>,
}

pub fn execute(args: PatternArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    let mut config = AuthScanConfig::load(config_path).context("Failed to load configuration")?;
    args.keywords.apply(&mut config);

    let keywords = config.scanner.keyword_set().context("Invalid keywords")?;
    let matcher = CompiledMatcher::compile(&keywords)?;

    // The bare pattern goes to stdout so it can be piped into grep -P and friends
    println!("{}", matcher.source());

    let Some(path) = args.check else {
        return Ok(());
    };

    let content =
        read_lenient(&path).with_context(|| format!("Failed to read {}", path.display()))?;

    if is_trivial(&content) {
        output.info(&format!("{} is a placeholder file and is not checked", path.display()));
        return Ok(());
    }

    match matcher.find(&content) {
        Some(guard) => {
            output.success(&format!("{} contains auth code", path.display()));
            output.emphasis("Matched:", guard.trim());
            Ok(())
        }
        None => {
            output.alert(&format!("{} has no auth code", path.display()));
            std::process::exit(1);
        }
    }
}
