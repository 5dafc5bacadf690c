//! Command-line interface for authscan
//!
//! The CLI is one caller of the library: it resolves keywords and directories
//! from arguments and configuration, streams findings to the terminal and
//! optionally saves a report.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

pub mod commands;
mod output;

pub use output::Output;

/// authscan - find PHP files that are missing an auth guard
#[derive(Parser)]
#[command(name = "authscan", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Scan directories for PHP files without auth code
    Scan(commands::scan::ScanArgs),
    /// Print the pattern generated from the keywords
    Pattern(commands::pattern::PatternArgs),
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Show version information
    Version,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the default configuration to ./authscan.toml
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Validate configuration
    Validate,
    /// Show current configuration
    Show {
        /// Output format
        #[arg(long, value_enum, default_value = "toml")]
        format: commands::config::ShowFormat,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let config_path = self.config.as_deref();

        match self.command {
            Some(Commands::Scan(args)) => commands::scan::execute(args, config_path, &output),
            Some(Commands::Pattern(args)) => commands::pattern::execute(args, config_path, &output),
            Some(Commands::Config(cmd)) => commands::config::execute(cmd, config_path, &output),
            Some(Commands::Version) => commands::version::execute(&output),
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Logs go to stderr so findings on stdout stay pipeable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_arguments() {
        let cli = Cli::try_parse_from([
            "authscan", "-vv", "scan", "app/admin", "app/api", "-k", "session,auth", "-k", "login",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Scan(args)) => {
                assert_eq!(args.directories.len(), 2);
                assert_eq!(args.keywords.keyword, vec!["session", "auth", "login"]);
            }
            _ => panic!("expected scan command"),
        }
    }

    #[test]
    fn test_scan_requires_a_directory() {
        assert!(Cli::try_parse_from(["authscan", "scan"]).is_err());
    }
}
