//! Pairs terminal client entry point.
//!
//! Composition root: loads configuration, sets up file logging, builds the
//! runtime and hands it to the terminal UI.
//!
//! ```bash
//! # Play offline against the bundled creature list
//! PAIRS_OFFLINE=1 cargo run -p pairs-client
//!
//! # Start on hard with a fixed shuffle
//! PAIRS_DIFFICULTY=hard PAIRS_SEED=42 cargo run -p pairs-client
//! ```
mod app;
mod config;
mod input;
mod logging;
mod presentation;
mod state;

use anyhow::Result;
use pairs_runtime::RuntimeConfig;

use app::PairsApp;
use config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let runtime_config = RuntimeConfig::from_env();
    let client_config = ClientConfig::from_env();

    let log_dir = client_config
        .log_dir
        .clone()
        .unwrap_or_else(logging::default_log_dir);
    let _log_guard = logging::setup_logging(&log_dir)?;

    tracing::info!("Starting pairs client");
    tracing::info!("Catalog: {}", runtime_config.catalog.base_url);
    tracing::info!("Offline: {}", runtime_config.catalog.offline);

    PairsApp::build(runtime_config, client_config)
        .await?
        .run()
        .await
}
