//! Topic-based event bus for runtime events.
//!
//! The session worker publishes every observable change to a topic; front-ends
//! subscribe only to the topics they render.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{BoardChange, BoardEvent, ClockEvent, SessionEvent, StatsEvent};
