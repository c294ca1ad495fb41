use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use pwordcount::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    cli.run().await
}
