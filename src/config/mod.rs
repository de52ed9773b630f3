//! Configuration management for header-checker
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. defaults embedded from `default-config.toml`
//! 2. `header-checker.{toml,json,yaml,yml}` in the working directory, or only
//!    the file passed with `--config`
//! 3. `HEADER_CHECKER_*` environment variables
//! 4. command-line flags that were actually given

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::checker::CheckKind;
use crate::checker::compiler::FILE_PLACEHOLDER;

pub mod core;
pub mod smart_load;

pub use self::core::CliOverrides;

/// Effective settings for one run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckerConfig {
    /// Which check to run
    #[serde(default)]
    pub action: CheckKind,

    /// Header file patterns, with optional `*`, `?`, `[..]` and `**`
    #[serde(default)]
    pub sources: Vec<String>,

    /// Paths containing any of these substrings are skipped
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Compile command; `{file}` is replaced by the source path
    pub command: String,

    /// Worker threads, 0 for one per CPU core
    #[serde(default)]
    pub threads: usize,

    /// Where the run's scratch directory is created; system temp if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

impl CheckerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            anyhow::bail!("No source patterns given; pass --source or set `sources` in the config");
        }

        if !self.command.contains(FILE_PLACEHOLDER) {
            anyhow::bail!(
                "Command template must contain {} placeholder: {}",
                FILE_PLACEHOLDER,
                self.command
            );
        }

        if let Some(dir) = &self.temp_dir
            && !dir.is_dir()
        {
            anyhow::bail!("Temp path is not a directory: {}", dir.display());
        }

        Ok(())
    }

    /// Render as TOML, the format of the embedded defaults
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
