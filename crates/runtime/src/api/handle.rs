//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the session or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use pairs_core::{CardId, Difficulty, FlipOutcome, GameSession, Generation};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Start a new session and wait until its board is dealt.
    ///
    /// Any running session is discarded first. Fails with
    /// [`RuntimeError::Fetch`] when the catalog draw fails (the session is
    /// left idle) and with [`RuntimeError::Superseded`] when another
    /// `start`/`reset` arrived before the board was ready.
    pub async fn start(&self, difficulty: Difficulty) -> Result<Generation> {
        self.request(|reply| Command::Start { difficulty, reply }).await?
    }

    /// Flip a card. Ignored flips come back as [`FlipOutcome::Rejected`].
    pub async fn flip(&self, card: CardId) -> Result<FlipOutcome> {
        self.request(|reply| Command::Flip { card, reply }).await
    }

    /// Trigger the reveal-all power-up. Returns `false` when it was not available.
    pub async fn activate_power_up(&self) -> Result<bool> {
        self.request(|reply| Command::ActivatePowerUp { reply }).await
    }

    /// Stop the clock and clear the session.
    pub async fn reset(&self) -> Result<Generation> {
        self.request(|reply| Command::Reset { reply }).await
    }

    /// Query the current session (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameSession> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Whether the countdown clock is running.
    pub async fn timer_running(&self) -> Result<bool> {
        self.request(|reply| Command::TimerRunning { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Board` - Board snapshots after every visible change
    /// - `Topic::Stats` - Click and match counters
    /// - `Topic::Clock` - Countdown ticks
    /// - `Topic::Session` - Status, messages and power-up availability
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use pairs_runtime::Topic;
    ///
    /// let mut clock_rx = handle.subscribe(Topic::Clock);
    /// while let Ok(event) = clock_rx.recv().await {
    ///     // Update the clock display
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
