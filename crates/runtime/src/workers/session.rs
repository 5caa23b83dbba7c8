//! Session worker that owns the authoritative [`pairs_core::GameSession`].
//!
//! Receives commands from [`crate::RuntimeHandle`] and from its own delayed
//! tasks, applies them through the core state machine and publishes events to
//! the [`EventBus`]. Everything that waits (catalog draw, mismatch delay,
//! power-up windows, countdown) runs in a detached task that reports back with
//! a command tagged by the generation it was scheduled under.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use pairs_core::{
    Board, CardId, Difficulty, Entity, FETCH_ERROR_MESSAGE, FlipOutcome, GameConfig, GameSession,
    Generation, TickOutcome,
};

use super::countdown::Countdown;
use crate::api::{Result, RuntimeError};
use crate::catalog::{CatalogSource, FetchError};
use crate::events::{
    BoardChange, BoardEvent, ClockEvent, Event, EventBus, SessionEvent, StatsEvent,
};

/// Commands processed by the session worker.
pub enum Command {
    /// Begin a new session and draw its board.
    /// Replies once the board is dealt or the draw failed.
    Start {
        difficulty: Difficulty,
        reply: oneshot::Sender<Result<Generation>>,
    },
    Flip {
        card: CardId,
        reply: oneshot::Sender<FlipOutcome>,
    },
    ActivatePowerUp { reply: oneshot::Sender<bool> },
    Reset { reply: oneshot::Sender<Generation> },
    /// Query the current session (read-only snapshot).
    QueryState { reply: oneshot::Sender<GameSession> },
    TimerRunning { reply: oneshot::Sender<bool> },

    // ----- internal, sent by the worker's own tasks -----
    CatalogLoaded {
        generation: Generation,
        result: std::result::Result<Vec<Entity>, FetchError>,
        reply: oneshot::Sender<Result<Generation>>,
    },
    Tick { generation: Generation },
    ResolveMismatch { generation: Generation },
    ConcealPowerUp { generation: Generation },
    RestorePowerUp { generation: Generation },
}

/// Background task that processes session commands.
pub struct SessionWorker {
    session: GameSession,
    config: GameConfig,
    catalog: Arc<dyn CatalogSource>,
    rng: StdRng,
    command_rx: mpsc::Receiver<Command>,
    /// Weak so that the channel closes once every handle is dropped.
    command_tx: mpsc::WeakSender<Command>,
    event_bus: EventBus,
    countdown: Countdown,
}

impl SessionWorker {
    pub fn new(
        config: GameConfig,
        catalog: Arc<dyn CatalogSource>,
        rng: StdRng,
        command_rx: mpsc::Receiver<Command>,
        command_tx: mpsc::WeakSender<Command>,
        event_bus: EventBus,
    ) -> Self {
        let countdown = Countdown::new(Duration::from_millis(config.tick_ms));
        Self {
            session: GameSession::new(),
            config,
            catalog,
            rng,
            command_rx,
            command_tx,
            event_bus,
            countdown,
        }
    }

    /// Main worker loop. Returns when every command sender is gone.
    pub async fn run(mut self) {
        info!(target: "runtime::worker", "SessionWorker started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        self.countdown.stop();
        info!(target: "runtime::worker", "SessionWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Start { difficulty, reply } => self.handle_start(difficulty, reply),
            Command::Flip { card, reply } => {
                let outcome = self.handle_flip(card);
                if reply.send(outcome).is_err() {
                    debug!("Flip reply channel closed (caller dropped)");
                }
            }
            Command::ActivatePowerUp { reply } => {
                let activated = self.handle_power_up();
                if reply.send(activated).is_err() {
                    debug!("ActivatePowerUp reply channel closed (caller dropped)");
                }
            }
            Command::Reset { reply } => {
                let generation = self.handle_reset();
                if reply.send(generation).is_err() {
                    debug!("Reset reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.session.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::TimerRunning { reply } => {
                if reply.send(self.countdown.is_running()).is_err() {
                    debug!("TimerRunning reply channel closed (caller dropped)");
                }
            }
            Command::CatalogLoaded {
                generation,
                result,
                reply,
            } => {
                let result = self.handle_catalog_loaded(generation, result);
                if reply.send(result).is_err() {
                    debug!("Start reply channel closed (caller dropped)");
                }
            }
            Command::Tick { generation } => self.handle_tick(generation),
            Command::ResolveMismatch { generation } => {
                if self.session.resolve_mismatch(generation).is_some() {
                    self.publish_board(BoardChange::Hidden);
                } else {
                    trace!(target: "runtime::worker", %generation, "Stale mismatch resolution ignored");
                }
            }
            Command::ConcealPowerUp { generation } => self.handle_conceal(generation),
            Command::RestorePowerUp { generation } => {
                if self.session.restore_power_up(generation) {
                    debug!(target: "runtime::worker", %generation, "Power-up available again");
                    self.publish(Event::Session(SessionEvent::power_up(&self.session)));
                }
            }
        }
    }

    // ===== lifecycle =====

    fn handle_start(&mut self, difficulty: Difficulty, reply: oneshot::Sender<Result<Generation>>) {
        self.countdown.stop();
        let generation = self.session.begin(difficulty);
        let pairs = difficulty.preset().pairs as usize;

        info!(
            target: "runtime::worker",
            %generation,
            %difficulty,
            pairs,
            "Starting session"
        );
        self.publish_session_reset();

        let catalog = Arc::clone(&self.catalog);
        let commands = self.command_tx.clone();
        tokio::spawn(async move {
            let result = catalog.fetch_random_entities(pairs).await;
            match commands.upgrade() {
                Some(tx) => {
                    let loaded = Command::CatalogLoaded {
                        generation,
                        result,
                        reply,
                    };
                    if tx.send(loaded).await.is_err() {
                        debug!("Worker closed before catalog draw completed");
                    }
                }
                None => debug!("Worker gone before catalog draw completed"),
            }
        });
    }

    fn handle_catalog_loaded(
        &mut self,
        generation: Generation,
        result: std::result::Result<Vec<Entity>, FetchError>,
    ) -> Result<Generation> {
        if generation != self.session.generation() {
            debug!(
                target: "runtime::worker",
                %generation,
                live = %self.session.generation(),
                "Catalog draw superseded"
            );
            return Err(RuntimeError::Superseded { generation });
        }

        let dealt = result
            .map_err(RuntimeError::from)
            .and_then(|entities| Board::build(&entities, &mut self.rng).map_err(RuntimeError::from))
            .and_then(|board| {
                self.session
                    .deal(generation, board)
                    .map_err(RuntimeError::from)
            });

        if let Err(error) = dealt {
            warn!(target: "runtime::worker", %generation, error = %error, "Failed to deal board");
            self.session.abort(generation, FETCH_ERROR_MESSAGE);
            self.publish_lifecycle();
            return Err(error);
        }

        info!(
            target: "runtime::worker",
            %generation,
            cards = self.session.cards().len(),
            time_left = self.session.time_left(),
            "Board dealt"
        );

        self.publish_board(BoardChange::Dealt);
        self.publish_stats();
        self.publish_clock();
        self.publish_lifecycle();

        self.countdown
            .start(generation, self.session.time_left(), self.command_tx.clone());
        Ok(generation)
    }

    fn handle_reset(&mut self) -> Generation {
        self.countdown.stop();
        let generation = self.session.reset();
        info!(target: "runtime::worker", %generation, "Session reset");
        self.publish_session_reset();
        generation
    }

    // ===== flip / evaluation =====

    fn handle_flip(&mut self, card: CardId) -> FlipOutcome {
        let outcome = self.session.flip(card);
        let generation = self.session.generation();

        match &outcome {
            FlipOutcome::Rejected(reason) => {
                debug!(target: "runtime::worker", %card, %reason, "Flip ignored");
                return outcome;
            }
            FlipOutcome::Flipped(_) => self.publish_board(BoardChange::Flipped),
            FlipOutcome::Matched { pair, won } => {
                debug!(target: "runtime::worker", first = %pair[0], second = %pair[1], "Pair matched");
                self.publish_board(BoardChange::Matched);
                if *won {
                    self.countdown.stop();
                    info!(
                        target: "runtime::worker",
                        %generation,
                        clicks = self.session.stats().clicks,
                        "Session won"
                    );
                    self.publish_lifecycle();
                }
            }
            FlipOutcome::Mismatched { pair } => {
                debug!(target: "runtime::worker", first = %pair[0], second = %pair[1], "Pair mismatched");
                self.publish_board(BoardChange::Flipped);
                self.schedule(
                    self.config.mismatch_delay_ms,
                    Command::ResolveMismatch { generation },
                );
            }
        }

        self.publish_stats();
        outcome
    }

    // ===== clock =====

    fn handle_tick(&mut self, generation: Generation) {
        match self.session.tick(generation) {
            TickOutcome::Ignored => {
                trace!(target: "runtime::timer", %generation, "Stale tick ignored");
            }
            TickOutcome::Ticked { .. } => {
                self.publish_clock();
                self.publish_stats();
            }
            TickOutcome::Expired => {
                self.countdown.stop();
                info!(target: "runtime::worker", %generation, "Session lost, time is up");
                self.publish_clock();
                self.publish_stats();
                self.publish_lifecycle();
            }
        }
    }

    // ===== power-up =====

    fn handle_power_up(&mut self) -> bool {
        let Some(revealed) = self.session.activate_power_up() else {
            debug!(target: "runtime::worker", "Power-up unavailable");
            return false;
        };
        let generation = self.session.generation();

        debug!(target: "runtime::worker", %generation, revealed = revealed.len(), "Power-up activated");
        self.publish_board(BoardChange::Revealed);
        self.publish(Event::Session(SessionEvent::power_up(&self.session)));
        self.schedule(
            self.config.power_up_reveal_ms,
            Command::ConcealPowerUp { generation },
        );
        true
    }

    fn handle_conceal(&mut self, generation: Generation) {
        let Some(hidden) = self.session.conceal_power_up(generation) else {
            trace!(target: "runtime::worker", %generation, "Stale power-up conceal ignored");
            return;
        };

        debug!(target: "runtime::worker", %generation, hidden = hidden.len(), "Power-up ended");
        self.publish_board(BoardChange::Concealed);
        self.publish(Event::Session(SessionEvent::power_up(&self.session)));
        self.schedule(
            self.config.power_up_cooldown_ms,
            Command::RestorePowerUp { generation },
        );
    }

    // ===== helpers =====

    /// Sends `command` back to this worker after `delay_ms`.
    fn schedule(&self, delay_ms: u64, command: Command) {
        let commands = self.command_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            if let Some(tx) = commands.upgrade() {
                let _ = tx.send(command).await;
            }
        });
    }

    fn publish(&self, event: Event) {
        self.event_bus.publish(event);
    }

    fn publish_board(&self, change: BoardChange) {
        self.publish(Event::Board(BoardEvent::snapshot(&self.session, change)));
    }

    fn publish_stats(&self) {
        self.publish(Event::Stats(StatsEvent {
            generation: self.session.generation(),
            stats: self.session.stats(),
        }));
    }

    fn publish_clock(&self) {
        self.publish(Event::Clock(ClockEvent {
            generation: self.session.generation(),
            time_left: self.session.time_left(),
        }));
    }

    fn publish_session_reset(&self) {
        self.publish_board(BoardChange::Cleared);
        self.publish_stats();
        self.publish_clock();
        self.publish_lifecycle();
    }

    /// Status change followed by the power-up availability it implies.
    fn publish_lifecycle(&self) {
        self.publish(Event::Session(SessionEvent::status(&self.session)));
        self.publish(Event::Session(SessionEvent::power_up(&self.session)));
    }
}
