//! Log Server Entry Point

use clap::Parser;
use logsrv::cli::Cli;
use logsrv::config::GatewayConfig;
use logsrv::{logging, server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init()?;
    let config = GatewayConfig::from_args(&cli.serve)?;
    let state = AppState::from_config(config)?;

    server::run(state).await
}
