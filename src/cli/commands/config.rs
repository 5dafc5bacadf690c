//! Configuration command implementations

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;

use crate::cli::{ConfigCommands, Output};
use crate::config::{AuthScanConfig, DEFAULT_CONFIG, PROJECT_CONFIG_STEM};

/// Serialization used by `config show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    Toml,
    Json,
    Yaml,
}

/// Execute config commands
pub fn execute(cmd: ConfigCommands, config_path: Option<&str>, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => init(force, output),
        ConfigCommands::Validate => validate(config_path, output),
        ConfigCommands::Show { format } => show(config_path, format),
    }
}

fn init(force: bool, output: &Output) -> Result<()> {
    let path = Path::new(".").join(format!("{PROJECT_CONFIG_STEM}.toml"));

    if path.exists() && !force {
        bail!(
            "{} already exists, use --force to overwrite it",
            path.display()
        );
    }

    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    output.success(&format!("Created {}", path.display()));
    output.info("Edit it to change keywords, excludes or report settings");
    Ok(())
}

fn validate(config_path: Option<&str>, output: &Output) -> Result<()> {
    let config = AuthScanConfig::load(config_path).context("Failed to load configuration")?;
    config.validate().context("Configuration is invalid")?;

    output.success("Configuration is valid");
    output.field("Keywords:", &config.scanner.keywords.join(" "));
    output.field("Extension:", &config.scanner.extension);
    if !config.scanner.exclude_paths.is_empty() {
        output.field("Excludes:", &config.scanner.exclude_paths.join(", "));
    }
    Ok(())
}

fn show(config_path: Option<&str>, format: ShowFormat) -> Result<()> {
    let config = AuthScanConfig::load(config_path).context("Failed to load configuration")?;
    // Printed without styling so the output can be redirected into a config file
    println!("{}", render(&config, format)?);
    Ok(())
}

fn render(config: &AuthScanConfig, format: ShowFormat) -> Result<String> {
    let text = match format {
        ShowFormat::Toml => toml::to_string_pretty(config)?,
        ShowFormat::Json => serde_json::to_string_pretty(config)?,
        ShowFormat::Yaml => serde_yml::to_string(config)?,
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_round_trips_through_toml() {
        let config = AuthScanConfig::default();
        let text = render(&config, ShowFormat::Toml).unwrap();
        let parsed: AuthScanConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_render_json_uses_lowercase_format() {
        let text = render(&AuthScanConfig::default(), ShowFormat::Json).unwrap();
        assert!(text.contains("\"format\": \"text\""));
        assert!(text.contains("\"AdminBase\""));
    }

    #[test]
    fn test_default_config_file_parses() {
        let parsed: AuthScanConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, AuthScanConfig::default());
    }
}
