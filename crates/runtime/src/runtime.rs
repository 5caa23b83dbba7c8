//! High-level runtime orchestrator.
//!
//! The runtime owns the session worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the game.

use std::env;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use pairs_core::GameConfig;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::catalog::{CatalogSource, PokeApiCatalog, StaticCatalog};
use crate::events::EventBus;
use crate::workers::{Command, SessionWorker};

/// Where boards are drawn from when no catalog is injected.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub index_limit: u32,
    /// Use the bundled list instead of the network.
    pub offline: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: PokeApiCatalog::DEFAULT_BASE_URL.to_string(),
            index_limit: PokeApiCatalog::DEFAULT_INDEX_LIMIT,
            offline: false,
        }
    }
}

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub catalog: CatalogConfig,
    /// Fixed seed for board shuffles and catalog draws (random when unset)
    pub seed: Option<u64>,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            catalog: CatalogConfig::default(),
            seed: None,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PAIRS_CATALOG_URL` - Catalog API root (default: public PokeAPI)
    /// - `PAIRS_INDEX_LIMIT` - Index entries listed before sampling (default: 1000)
    /// - `PAIRS_OFFLINE` - Use the bundled creature list (default: false)
    /// - `PAIRS_SEED` - Fixed RNG seed (default: random)
    /// - `PAIRS_MISMATCH_DELAY_MS` - Mismatch reveal delay (default: 1000)
    /// - `PAIRS_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    /// - `PAIRS_COMMAND_BUFFER` - Worker command queue size (default: 32)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("PAIRS_CATALOG_URL") {
            config.catalog.base_url = url;
        }
        if let Some(limit) = read_env::<u32>("PAIRS_INDEX_LIMIT") {
            config.catalog.index_limit = limit.max(1);
        }

        if let Some(offline) = read_env::<bool>("PAIRS_OFFLINE") {
            config.catalog.offline = offline;
        } else if env::var("PAIRS_OFFLINE").is_ok() {
            // Also accept just setting the variable without value as "true"
            config.catalog.offline = true;
        }

        config.seed = read_env::<u64>("PAIRS_SEED");

        if let Some(delay) = read_env::<u64>("PAIRS_MISMATCH_DELAY_MS") {
            config.game_config.mismatch_delay_ms = delay;
        }
        if let Some(capacity) = read_env::<usize>("PAIRS_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("PAIRS_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        config
    }

    fn rng(&self, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// Main runtime that hosts the session worker
///
/// Design: Runtime owns the worker task.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Completes once every other [`RuntimeHandle`] clone has been dropped too.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<Arc<dyn CatalogSource>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject a catalog instead of building one from [`CatalogConfig`].
    pub fn catalog(mut self, catalog: impl CatalogSource + 'static) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Build the runtime and spawn its worker.
    pub async fn build(self) -> Result<Runtime> {
        let config = self.config;

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None if config.catalog.offline => {
                tracing::info!("Using bundled offline catalog");
                Arc::new(StaticCatalog::builtin(config.rng(1))) as Arc<dyn CatalogSource>
            }
            None => {
                tracing::info!("Using catalog at {}", config.catalog.base_url);
                Arc::new(PokeApiCatalog::new(
                    config.catalog.base_url.clone(),
                    config.catalog.index_limit,
                    config.rng(1),
                ))
            }
        };

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size);
        let event_bus = EventBus::with_capacity(config.event_buffer_size);

        let worker = SessionWorker::new(
            config.game_config.clone(),
            catalog,
            config.rng(0),
            command_rx,
            command_tx.downgrade(),
            event_bus.clone(),
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            worker_handle,
        })
    }
}
