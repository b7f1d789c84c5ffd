mod app;
mod cli;
mod logging;
mod render;

use clap::Parser;
use util::config::Settings;

use crate::{app::AppState, cli::Cli, logging::set_up_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = Settings::default().unwrap_or_else(|e| panic!("Configuration failed: '{e}'!"));

    set_up_logging(&cfg.log_level);

    let app_state = AppState::create_app_state(&cfg)?;

    cli::run(cli.command, &app_state).await
}
