//! `auth-templates` binary entry point.

use anyhow::Result;
use auth_templates_cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_tracing();
    cli.run().await
}
