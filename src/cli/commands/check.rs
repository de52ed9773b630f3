//! The check command: load config, discover headers, run the checker

use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;

use crate::checker::{CommandCompiler, HeaderChecker};
use crate::cli::Output;
use crate::config::{CheckerConfig, CliOverrides};
use crate::shared::glob::discover_files;

pub async fn execute(
    overrides: CliOverrides,
    config_path: Option<&Path>,
    show_config: bool,
    output: &Output,
) -> Result<ExitCode> {
    if show_config {
        let config = CheckerConfig::load_unvalidated(config_path, &overrides)?;
        print!("{}", config.to_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let config = CheckerConfig::load(config_path, &overrides)?;
    tracing::debug!("Effective configuration: {:?}", config);

    let compiler = CommandCompiler::new(&config.command);
    match compiler.resolve_program() {
        Some(program) => output.verbose(&format!("Compiler: {}", program.display())),
        None => {
            tracing::warn!("Compiler program not found on PATH: {}", config.command);
            output.warning(&format!("Compiler not found on PATH: {}", config.command));
        }
    }

    let base_dir = std::env::current_dir().context("Failed to read the working directory")?;
    let headers = discover_files(&config.sources, &config.exclude, &base_dir)?;
    if headers.is_empty() {
        output.warning("No header files matched the source patterns");
        return Ok(ExitCode::SUCCESS);
    }

    let checker = HeaderChecker::from_config(&config);
    output.info(&format!(
        "Checking {} headers ({}) with {} workers",
        headers.len(),
        config.action,
        checker.workers().min(headers.len())
    ));

    let stop = checker.stop_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, waiting for running checks to finish");
            stop.request();
        }
    });

    let summary = tokio::task::spawn_blocking(move || checker.run(headers))
        .await
        .context("Checker task failed")??;

    output.summary(&summary);

    Ok(if summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
