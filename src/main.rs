// Entrypoint for the CLI application.
// - Keeps `main` small: parse options, set up logging, then hand over to the
//   interactive shell.
// - Returns `anyhow::Result` so errors are printed with their context chain.

use clap::Parser;
use emoji_sender::{config::Cli, setup_logging, ui};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), api_url = %cli.api_url, "starting");

    ui::run(&cli)
}
