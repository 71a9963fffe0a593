use clap::Parser;

mod cli;
mod commands;
mod logger;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    let config = commands::load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Scan { dir, out } => commands::scan(&config, &dir, out).await,
        Command::Watch { dir, page, out } => commands::watch(&config, &dir, page, out).await,
        Command::Parse { file } => commands::parse(&config, file.as_deref()),
    }
}
