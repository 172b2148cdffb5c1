//! Nimbus CLI - Command-line interface
//!
//! Serves the bundled extensions and inspects what they mount.

mod commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "nimbus")]
#[command(about = "Extensible compute API server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::handle_command(cli.command).await
}
