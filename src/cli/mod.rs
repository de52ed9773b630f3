//! Command-line interface for header-checker
//!
//! A single command: pick a check, point it at some headers and a compile
//! command. Flags override config files and environment variables.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod output;

pub use output::Output;

use crate::checker::CheckKind;
use crate::config::CliOverrides;

/// Check that C/C++ headers compile on their own and carry no removable includes
#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Which check to run [default: complete]
    #[arg(value_enum)]
    pub action: Option<CheckKind>,

    /// Header file pattern; `**` matches across directories (repeatable)
    #[arg(short, long = "source", value_name = "PATTERN", value_delimiter = ',')]
    pub sources: Vec<String>,

    /// Skip headers whose path contains this text (repeatable)
    #[arg(short, long, value_name = "SUBSTR", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Compile command, `{file}` is replaced by the generated source
    #[arg(long, value_name = "TEMPLATE")]
    pub command: Option<String>,

    /// Directory in which the scratch directory is created
    #[arg(long = "temp", value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Worker threads, 0 for one per CPU core
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress everything except result lines and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Execute the CLI command. Errors are printed here and become a
    /// failing exit code.
    pub async fn run(self) -> ExitCode {
        commands::setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let config_path = self.config.clone();
        let show_config = self.show_config;

        let result = commands::check::execute(
            self.into_overrides(),
            config_path.as_deref(),
            show_config,
            &output,
        )
        .await;

        match result {
            Ok(code) => code,
            Err(e) => {
                output.error(&format!("{e:#}"));
                ExitCode::FAILURE
            }
        }
    }

    /// The flags that were actually given, as the top configuration layer
    pub fn into_overrides(self) -> CliOverrides {
        CliOverrides {
            action: self.action,
            sources: self.sources,
            exclude: self.exclude,
            command: self.command,
            threads: self.threads,
            temp_dir: self.temp_dir,
        }
    }
}
