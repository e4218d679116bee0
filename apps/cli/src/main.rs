//! CaseScout CLI — AI use-case proposal generator.
//!
//! Researches a company and its industry from public web sources, derives
//! candidate AI use cases, and drafts a proposal with dataset pointers.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
