use clap::Parser;
use std::process::ExitCode;

use header_checker::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.run().await
}
