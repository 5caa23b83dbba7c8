//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns the game state and applies commands; the countdown
//! is a helper task the worker starts and stops.

mod countdown;
mod session;

pub use session::{Command, SessionWorker};
