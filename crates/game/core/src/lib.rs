//! Deterministic rules of the pairs game.
//!
//! `pairs-core` defines the canonical state machine (cards, board, session,
//! power-up) and exposes pure APIs the runtime drives. All state mutation
//! flows through [`session::GameSession`]; timing, fetching and rendering live
//! in other crates and only call into the transitions defined here.
pub mod board;
pub mod card;
pub mod config;
pub mod difficulty;
pub mod power_up;
pub mod session;

pub use board::{Board, BoardError};
pub use card::{Card, CardId, Entity};
pub use config::GameConfig;
pub use difficulty::{Difficulty, DifficultyPreset};
pub use power_up::PowerUpPhase;
pub use session::{
    DealError, FETCH_ERROR_MESSAGE, FlipOutcome, FlipRejection, GameSession, Generation,
    LOSS_MESSAGE, Stats, Status, TickOutcome, WIN_MESSAGE,
};
