//! Notepad server entry point.
//!
//! # Responsibility
//! - Load configuration, start logging, then serve the notes API.
//! - Exit non-zero with a readable message on startup failure.

use anyhow::{anyhow, Context};
use log::info;
use notepad_api::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("failed to load configuration")?;

    notepad_core::init_logging(&config.log_level, config.log_target.clone())
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;
    info!(
        "event=app_start module=server status=ok version={} log_target={}",
        notepad_core::core_version(),
        config.log_target
    );

    notepad_api::serve(&config)
        .await
        .map_err(|err| anyhow!("server stopped: {err}"))
}
