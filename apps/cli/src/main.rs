//! Pure Extracts CLI: product catalog administration and website workflows.
//!
//! Manages the botanical-extract catalog, lints product descriptions, and
//! talks to the chat, contact and grammar webhooks.

mod commands;
mod products;

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
