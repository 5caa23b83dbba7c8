//! Event types for different topics.

use pairs_core::{Card, GameSession, Generation, PowerUpPhase, Stats, Status};
use serde::{Deserialize, Serialize};

/// Why the board was re-published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardChange {
    Dealt,
    Flipped,
    Matched,
    /// A mismatched pair went face down.
    Hidden,
    /// Power-up peek started.
    Revealed,
    /// Power-up peek ended.
    Concealed,
    Cleared,
}

/// Full board snapshot after a change, for renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardEvent {
    pub generation: Generation,
    pub change: BoardChange,
    pub cards: Vec<Card>,
}

impl BoardEvent {
    pub fn snapshot(session: &GameSession, change: BoardChange) -> Self {
        Self {
            generation: session.generation(),
            change,
            cards: session.cards().to_vec(),
        }
    }
}

/// Counters after a change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatsEvent {
    pub generation: Generation,
    pub stats: Stats,
}

/// One countdown step (also published once when the clock starts).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClockEvent {
    pub generation: Generation,
    pub time_left: u32,
}

/// Lifecycle and power-up changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    StatusChanged {
        generation: Generation,
        status: Status,
        message: Option<String>,
    },
    PowerUpChanged {
        generation: Generation,
        phase: PowerUpPhase,
        /// Whether activation would succeed now (phase ready and playing).
        available: bool,
    },
}

impl SessionEvent {
    pub fn status(session: &GameSession) -> Self {
        SessionEvent::StatusChanged {
            generation: session.generation(),
            status: session.status(),
            message: session.message().map(str::to_owned),
        }
    }

    pub fn power_up(session: &GameSession) -> Self {
        SessionEvent::PowerUpChanged {
            generation: session.generation(),
            phase: session.power_up(),
            available: session.power_up_available(),
        }
    }
}
