//! CatalogBridge CLI — read catalog entities from external locations.
//!
//! Runs the built-in processor chain on a single location and prints every
//! emission (entities, refresh, errors) to stdout as JSON lines.

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
