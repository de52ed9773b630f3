use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::CheckerConfig;
use super::smart_load;
use crate::checker::CheckKind;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "HEADER_CHECKER_";
const REPO_CONFIG_STEM: &str = "header-checker";

/// Values given on the command line. Anything left unset is skipped so it
/// does not mask lower-priority sources.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<CheckKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

impl CheckerConfig {
    /// Load the merged configuration and validate it
    pub fn load(custom_config: Option<&Path>, overrides: &CliOverrides) -> Result<Self> {
        let config = Self::load_unvalidated(custom_config, overrides)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the merged configuration without validating it, e.g. for display
    pub fn load_unvalidated(custom_config: Option<&Path>, overrides: &CliOverrides) -> Result<Self> {
        if let Some(path) = custom_config
            && !path.is_file()
        {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        Self::figment(custom_config, overrides)
            .extract()
            .context("Failed to load configuration")
    }

    /// The provider stack behind [`CheckerConfig::load`]
    pub fn figment(custom_config: Option<&Path>, overrides: &CliOverrides) -> Figment {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        // A custom config replaces the repository files rather than adding to them
        figment = match custom_config {
            Some(path) => figment.merge(smart_load::auto(path)),
            None => figment
                .merge(Toml::file(format!("{REPO_CONFIG_STEM}.toml")))
                .merge(Json::file(format!("{REPO_CONFIG_STEM}.json")))
                .merge(Yaml::file(format!("{REPO_CONFIG_STEM}.yaml")))
                .merge(Yaml::file(format!("{REPO_CONFIG_STEM}.yml"))),
        };

        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
    }
}
