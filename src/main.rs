mod api;
mod config;
mod dates;
mod export;
mod grading;
mod models;
mod reconcile;
mod ui;

use anyhow::{Context, Result};
use config::Config;
use ui::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize backend client
    let client = api::BackendClient::new(config.api_base.clone());

    // Start TUI application
    let mut app = App::new(client, config.operator);
    app.run().await?;

    Ok(())
}
