//! Pumps runtime events, user input, and rendering for the terminal client.
use anyhow::Result;
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{self, Duration};

use pairs_core::Difficulty;
use pairs_runtime::{Event, RuntimeError, RuntimeHandle, Topic, dispatch};

use crate::input::{self, KeyAction};
use crate::presentation::{terminal::Tui, ui};
use crate::state::ViewState;

const FRAME_INTERVAL_MS: u64 = 16;

pub struct EventLoop {
    handle: RuntimeHandle,
    board_rx: broadcast::Receiver<Event>,
    stats_rx: broadcast::Receiver<Event>,
    clock_rx: broadcast::Receiver<Event>,
    session_rx: broadcast::Receiver<Event>,
    view: ViewState,
}

impl EventLoop {
    pub fn new(handle: RuntimeHandle, view: ViewState) -> Self {
        Self {
            board_rx: handle.subscribe(Topic::Board),
            stats_rx: handle.subscribe(Topic::Stats),
            clock_rx: handle.subscribe(Topic::Clock),
            session_rx: handle.subscribe(Topic::Session),
            handle,
            view,
        }
    }

    pub async fn run(mut self, terminal: &mut Tui) -> Result<ViewState> {
        let session = self.handle.query_state().await?;
        self.view.sync(&session);
        ui::render(terminal, &self.view)?;

        loop {
            let received = tokio::select! {
                event = self.board_rx.recv() => Some(event),
                event = self.stats_rx.recv() => Some(event),
                event = self.clock_rx.recv() => Some(event),
                event = self.session_rx.recv() => Some(event),
                _ = time::sleep(Duration::from_millis(FRAME_INTERVAL_MS)) => None,
            };

            let quit = match received {
                Some(event) => self.handle_runtime_event(event, terminal).await?,
                None => self.handle_input_tick(terminal).await?,
            };
            if quit {
                break;
            }
        }

        Ok(self.view)
    }

    async fn handle_runtime_event(
        &mut self,
        result: Result<Event, RecvError>,
        terminal: &mut Tui,
    ) -> Result<bool> {
        match result {
            Ok(event) => {
                dispatch(&mut self.view, &event);
                ui::render(terminal, &self.view)?;
                Ok(false)
            }
            Err(RecvError::Closed) => {
                tracing::warn!("Event stream closed");
                Ok(true)
            }
            Err(RecvError::Lagged(skipped)) => {
                // Lost updates; resync from the authoritative state.
                tracing::warn!("Dropped {} stale events", skipped);
                let session = self.handle.query_state().await?;
                self.view.sync(&session);
                ui::render(terminal, &self.view)?;
                Ok(false)
            }
        }
    }

    async fn handle_input_tick(&mut self, terminal: &mut Tui) -> Result<bool> {
        if !event::poll(Duration::from_millis(0))? {
            return Ok(false);
        }

        match event::read()? {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                let quit = self.apply(input::handle_key(key)).await?;
                ui::render(terminal, &self.view)?;
                Ok(quit)
            }
            TermEvent::Resize(_, _) => {
                ui::render(terminal, &self.view)?;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    async fn apply(&mut self, action: KeyAction) -> Result<bool> {
        match action {
            KeyAction::Quit => return Ok(true),
            KeyAction::Move(direction) => self.view.move_cursor(direction),
            KeyAction::ToggleTheme => self.view.toggle_theme(),
            KeyAction::Flip => {
                if let Some(card) = self.view.card_under_cursor() {
                    let outcome = self.handle.flip(card).await?;
                    tracing::debug!(%card, ?outcome, "Flip");
                }
            }
            KeyAction::Start(difficulty) => {
                let difficulty = difficulty.unwrap_or(self.view.difficulty);
                self.view.difficulty = difficulty;
                self.spawn_start(difficulty);
            }
            KeyAction::PowerUp => {
                let activated = self.handle.activate_power_up().await?;
                tracing::debug!(activated, "Power-up requested");
            }
            KeyAction::Reset => {
                self.handle.reset().await?;
            }
            KeyAction::None => {}
        }
        Ok(false)
    }

    /// Loading runs in the background; progress arrives as events.
    fn spawn_start(&self, difficulty: Difficulty) {
        let handle = self.handle.clone();
        tokio::spawn(async move {
            match handle.start(difficulty).await {
                Ok(generation) => {
                    tracing::info!(%generation, %difficulty, "Board ready");
                }
                Err(RuntimeError::Superseded { generation }) => {
                    tracing::debug!(%generation, "Start superseded");
                }
                Err(error) => tracing::warn!("Failed to start session: {}", error),
            }
        });
    }
}
