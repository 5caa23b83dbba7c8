//! Runtime orchestration for the pairs game.
//!
//! This crate wires together the catalog, the session worker, the countdown
//! and the event bus into a cohesive runtime API. Consumers embed [`Runtime`]
//! to drive sessions, subscribe to events, and interact with the board
//! through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`catalog`] draws creatures from PokeAPI or an in-memory list
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod catalog;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    FetchError, GameObserver, Result, RuntimeError, RuntimeHandle, dispatch, spawn_observer,
};
pub use catalog::{CatalogSource, PokeApiCatalog, StaticCatalog};
pub use events::{
    BoardChange, BoardEvent, ClockEvent, Event, EventBus, SessionEvent, StatsEvent, Topic,
};
pub use runtime::{CatalogConfig, Runtime, RuntimeBuilder, RuntimeConfig};
