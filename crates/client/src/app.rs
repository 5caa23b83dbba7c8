//! Glue code tying the runtime and the terminal UI together.
use std::time::Duration;

use anyhow::Result;

use pairs_runtime::{Runtime, RuntimeConfig};

use crate::config::ClientConfig;
use crate::presentation::{EventLoop, terminal};
use crate::state::ViewState;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub struct PairsApp {
    client_config: ClientConfig,
    runtime: Runtime,
}

impl PairsApp {
    pub async fn build(runtime_config: RuntimeConfig, client_config: ClientConfig) -> Result<Self> {
        let runtime = Runtime::builder().config(runtime_config).build().await?;
        Ok(Self {
            client_config,
            runtime,
        })
    }

    pub async fn run(self) -> Result<()> {
        tracing::info!("Terminal client starting...");

        let PairsApp {
            client_config,
            runtime,
        } = self;

        let view = ViewState::new(client_config.difficulty, client_config.theme);
        let event_loop = EventLoop::new(runtime.handle(), view);

        let mut terminal = terminal::init()?;
        let _guard = terminal::TerminalGuard;

        let view = event_loop.run(&mut terminal).await;

        terminal::restore()?;
        let view = view?;
        tracing::info!(
            status = %view.status,
            clicks = view.stats.clicks,
            "Terminal client exiting"
        );

        // An in-flight catalog draw keeps the worker alive until it finishes.
        match tokio::time::timeout(SHUTDOWN_GRACE, runtime.shutdown()).await {
            Ok(result) => result?,
            Err(_) => tracing::warn!("Runtime still busy after {:?}, exiting anyway", SHUTDOWN_GRACE),
        }
        Ok(())
    }
}
