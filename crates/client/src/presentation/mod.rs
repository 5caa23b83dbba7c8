//! Terminal presentation components used by the client.
pub mod event_loop;
pub mod terminal;
pub mod theme;
pub mod ui;

pub use event_loop::EventLoop;
