//! Callback interface for UI layers.
//!
//! A front-end implements [`GameObserver`] and hands it to [`spawn_observer`];
//! the returned task feeds it every event from the bus. The core never calls
//! into rendering code directly.
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use pairs_core::{Card, Stats, Status};

use crate::events::{Event, EventBus, SessionEvent, Topic};

/// Receives presentation updates. Every method defaults to doing nothing.
pub trait GameObserver: Send + 'static {
    /// The board changed; `cards` is the full board in display order.
    fn render(&mut self, _cards: &[Card]) {}

    fn on_stats_changed(&mut self, _stats: &Stats) {}

    /// Seconds left on the clock.
    fn on_clock(&mut self, _time_left: u32) {}

    fn on_power_up(&mut self, _available: bool) {}

    /// Message area text; `None` clears it.
    fn on_message(&mut self, _message: Option<&str>) {}

    fn on_status(&mut self, _status: Status) {}

    fn on_win(&mut self) {}

    fn on_lose(&mut self) {}
}

/// Routes one event to the matching observer callbacks.
pub fn dispatch<O: GameObserver + ?Sized>(observer: &mut O, event: &Event) {
    match event {
        Event::Board(board) => observer.render(&board.cards),
        Event::Stats(stats) => observer.on_stats_changed(&stats.stats),
        Event::Clock(clock) => observer.on_clock(clock.time_left),
        Event::Session(SessionEvent::StatusChanged {
            status, message, ..
        }) => {
            observer.on_status(*status);
            observer.on_message(message.as_deref());
            match status {
                Status::Won => observer.on_win(),
                Status::Lost => observer.on_lose(),
                _ => {}
            }
        }
        Event::Session(SessionEvent::PowerUpChanged { available, .. }) => {
            observer.on_power_up(*available)
        }
    }
}

/// Drives `observer` from every topic of `bus` until the bus closes.
///
/// Returns the observer when the task finishes.
pub fn spawn_observer<O: GameObserver>(bus: &EventBus, mut observer: O) -> JoinHandle<O> {
    let mut board = bus.subscribe(Topic::Board);
    let mut stats = bus.subscribe(Topic::Stats);
    let mut clock = bus.subscribe(Topic::Clock);
    let mut session = bus.subscribe(Topic::Session);

    tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                event = board.recv() => event,
                event = stats.recv() => event,
                event = clock.recv() => event,
                event = session.recv() => event,
            };

            match received {
                Ok(event) => dispatch(&mut observer, &event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(target: "runtime::observer", skipped, "Observer lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
        observer
    })
}
