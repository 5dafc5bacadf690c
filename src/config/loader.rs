use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};

use super::{AuthScanConfig, smart_load};
use crate::error::{AuthScanError, Result};

// Embed the default config at compile time
pub const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Prefix of environment overrides, e.g. `AUTHSCAN_SCANNER__FOLLOW_SYMLINKS`
pub const ENV_PREFIX: &str = "AUTHSCAN_";

/// Project config files are `authscan.{toml,json,yaml,yml}` in the working directory
pub const PROJECT_CONFIG_STEM: &str = "authscan";

impl AuthScanConfig {
    /// Load the merged configuration
    ///
    /// Precedence, lowest first: embedded defaults, user config, project
    /// config, environment. A custom config file replaces both the user and
    /// the project layer.
    pub fn load(custom_config: Option<&str>) -> Result<Self> {
        Self::figment(custom_config)
            .extract()
            .map_err(|err| AuthScanError::Config(Box::new(err)))
    }

    pub fn figment(custom_config: Option<&str>) -> Figment {
        tracing::trace!("CONFIG LOAD: custom config = {:?}", custom_config);

        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            figment = figment.merge(smart_load::auto(custom_path));
        } else {
            let user = Self::user_config_path();
            figment = figment
                // User config - support multiple formats
                .merge(Toml::file(&user))
                .merge(Json::file(user.replace(".toml", ".json")))
                .merge(Yaml::file(user.replace(".toml", ".yaml")))
                .merge(Yaml::file(user.replace(".toml", ".yml")))
                // Project config - support multiple formats
                .merge(Toml::file(format!("{PROJECT_CONFIG_STEM}.toml")))
                .merge(Json::file(format!("{PROJECT_CONFIG_STEM}.json")))
                .merge(Yaml::file(format!("{PROJECT_CONFIG_STEM}.yaml")))
                .merge(Yaml::file(format!("{PROJECT_CONFIG_STEM}.yml")));
        }

        // Environment variables always have highest priority
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/authscan/config.toml"),
            Err(_) => "~/.config/authscan/config.toml".to_string(),
        }
    }
}
