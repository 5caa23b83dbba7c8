//! The session state machine.
//!
//! [`GameSession`] is the authoritative state of one game: board, selection,
//! counters, clock and power-up phase. Every transition is a plain method that
//! either applies or reports why it was ignored; nothing here sleeps or does
//! I/O. Transitions that the runtime schedules for later (mismatch reset,
//! clock ticks, power-up edges) take the [`Generation`] they were scheduled
//! under and are no-ops once the session has been restarted or reset.

use core::fmt;

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::card::{Card, CardId};
use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::power_up::PowerUpPhase;

/// Shown when the last pair is found.
pub const WIN_MESSAGE: &str = "Congratulations! You won!";
/// Shown when the clock runs out.
pub const LOSS_MESSAGE: &str = "Game Over! Time is up!";
/// Shown when the catalog draw fails.
pub const FETCH_ERROR_MESSAGE: &str = "Error loading Pokémon. Please try again.";

/// Identity of a session lifetime. Bumped by every `begin` and `reset`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Generation(pub u64);

impl Generation {
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse lifecycle of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    #[default]
    Idle,
    /// Waiting for the catalog draw.
    Loading,
    Playing,
    Won,
    Lost,
}

/// Counters shown to the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub clicks: u32,
    pub matched_pairs: u32,
    pub total_pairs: u32,
    pub time_left: u32,
}

/// Why a flip was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlipRejection {
    NotPlaying,
    /// A mismatched pair is still on display.
    Evaluating,
    UnknownCard,
    AlreadyFlipped,
    AlreadyMatched,
    SelectionFull,
}

/// Result of [`GameSession::flip`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlipOutcome {
    Rejected(FlipRejection),
    /// First card of a pair is up.
    Flipped(CardId),
    /// Second card matched the first. `won` is set when this was the last pair.
    Matched { pair: [CardId; 2], won: bool },
    /// Second card did not match; the runtime must call
    /// [`GameSession::resolve_mismatch`] after the reveal delay.
    Mismatched { pair: [CardId; 2] },
}

/// Result of [`GameSession::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickOutcome {
    /// Stale generation or the session is not playing.
    Ignored,
    Ticked { time_left: u32 },
    /// The clock reached zero and the session is lost.
    Expired,
}

/// Errors raised when handing a built board to the session.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DealError {
    #[error("board was built for session {found} but the live session is {live}")]
    Stale { live: Generation, found: Generation },

    #[error("cannot deal while the session is {status}")]
    NotLoading { status: Status },

    #[error("expected {expected} pairs, board has {actual} cards")]
    CardCount { expected: u32, actual: usize },
}

/// Authoritative state of the single live game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSession {
    generation: Generation,
    status: Status,
    difficulty: Option<Difficulty>,
    total_pairs: u32,
    matched_pairs: u32,
    clicks: u32,
    time_left: u32,
    can_flip: bool,
    power_up: PowerUpPhase,
    flipped: ArrayVec<CardId, { GameConfig::SELECTION_SIZE }>,
    board: Board,
    message: Option<String>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::fresh(Generation::default())
    }

    fn fresh(generation: Generation) -> Self {
        Self {
            generation,
            status: Status::Idle,
            difficulty: None,
            total_pairs: 0,
            matched_pairs: 0,
            clicks: 0,
            time_left: 0,
            can_flip: true,
            power_up: PowerUpPhase::Ready,
            flipped: ArrayVec::new(),
            board: Board::default(),
            message: None,
        }
    }

    // ===== accessors =====

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == Status::Playing
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn stats(&self) -> Stats {
        Stats {
            clicks: self.clicks,
            matched_pairs: self.matched_pairs,
            total_pairs: self.total_pairs,
            time_left: self.time_left,
        }
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn can_flip(&self) -> bool {
        self.can_flip
    }

    pub fn power_up(&self) -> PowerUpPhase {
        self.power_up
    }

    /// Whether [`activate_power_up`](Self::activate_power_up) would succeed now.
    pub fn power_up_available(&self) -> bool {
        self.status == Status::Playing && self.power_up.is_available()
    }

    /// Currently selected cards, in selection order.
    pub fn flipped(&self) -> &[CardId] {
        &self.flipped
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cards(&self) -> &[Card] {
        self.board.cards()
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.board.card(id)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    // ===== lifecycle =====

    /// Discards the previous game and waits for a board of `difficulty`.
    pub fn begin(&mut self, difficulty: Difficulty) -> Generation {
        let preset = difficulty.preset();
        *self = Self::fresh(self.generation.next());
        self.status = Status::Loading;
        self.difficulty = Some(difficulty);
        self.total_pairs = preset.pairs;
        self.time_left = preset.time_seconds;
        self.generation
    }

    /// Installs the board drawn for `generation` and starts play.
    pub fn deal(&mut self, generation: Generation, board: Board) -> Result<(), DealError> {
        if generation != self.generation {
            return Err(DealError::Stale {
                live: self.generation,
                found: generation,
            });
        }
        if self.status != Status::Loading {
            return Err(DealError::NotLoading {
                status: self.status,
            });
        }
        if board.len() % 2 != 0 || board.pairs() != self.total_pairs as usize {
            return Err(DealError::CardCount {
                expected: self.total_pairs,
                actual: board.len(),
            });
        }

        self.board = board;
        self.status = Status::Playing;
        self.can_flip = true;
        Ok(())
    }

    /// Abandons a load that failed. Returns `false` when `generation` is stale.
    pub fn abort(&mut self, generation: Generation, message: impl Into<String>) -> bool {
        if generation != self.generation || self.status != Status::Loading {
            return false;
        }
        self.status = Status::Idle;
        self.board = Board::default();
        self.message = Some(message.into());
        true
    }

    /// Clears everything and returns to `Idle`.
    pub fn reset(&mut self) -> Generation {
        *self = Self::fresh(self.generation.next());
        self.generation
    }

    // ===== flip / evaluation =====

    /// Selects a card; evaluates the pair when it is the second selection.
    pub fn flip(&mut self, id: CardId) -> FlipOutcome {
        if self.status != Status::Playing {
            return FlipOutcome::Rejected(FlipRejection::NotPlaying);
        }
        if !self.can_flip {
            return FlipOutcome::Rejected(FlipRejection::Evaluating);
        }
        let Some(card) = self.board.card(id) else {
            return FlipOutcome::Rejected(FlipRejection::UnknownCard);
        };
        if card.is_matched {
            return FlipOutcome::Rejected(FlipRejection::AlreadyMatched);
        }
        if card.is_flipped {
            return FlipOutcome::Rejected(FlipRejection::AlreadyFlipped);
        }
        if self.flipped.is_full() {
            return FlipOutcome::Rejected(FlipRejection::SelectionFull);
        }

        if let Some(card) = self.board.card_mut(id) {
            card.is_flipped = true;
        }
        self.flipped.push(id);
        self.clicks += 1;

        if self.flipped.is_full() {
            let pair = [self.flipped[0], self.flipped[1]];
            return self.evaluate(pair);
        }
        FlipOutcome::Flipped(id)
    }

    fn evaluate(&mut self, pair: [CardId; 2]) -> FlipOutcome {
        self.can_flip = false;

        let same = match (self.board.card(pair[0]), self.board.card(pair[1])) {
            (Some(a), Some(b)) => a.name == b.name,
            _ => false,
        };

        if !same {
            return FlipOutcome::Mismatched { pair };
        }

        self.matched_pairs += 1;
        for id in pair {
            if let Some(card) = self.board.card_mut(id) {
                card.is_matched = true;
            }
        }

        // Win is decided before the selection slot is released.
        let won = self.matched_pairs == self.total_pairs;
        if won {
            self.finish(Status::Won, WIN_MESSAGE);
        }

        self.flipped.clear();
        self.can_flip = true;
        FlipOutcome::Matched { pair, won }
    }

    /// Hides a mismatched pair once its reveal delay elapsed.
    ///
    /// Returns the hidden pair, or `None` for a stale generation or when no
    /// mismatch is pending. Never changes [`Status`].
    pub fn resolve_mismatch(&mut self, generation: Generation) -> Option<[CardId; 2]> {
        if generation != self.generation || self.can_flip || !self.flipped.is_full() {
            return None;
        }
        let pair = [self.flipped[0], self.flipped[1]];

        for id in pair {
            if let Some(card) = self.board.card_mut(id) {
                card.is_flipped = false;
            }
        }
        self.flipped.clear();
        self.can_flip = true;
        Some(pair)
    }

    // ===== clock =====

    /// Advances the countdown by one second.
    pub fn tick(&mut self, generation: Generation) -> TickOutcome {
        if generation != self.generation || self.status != Status::Playing {
            return TickOutcome::Ignored;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.finish(Status::Lost, LOSS_MESSAGE);
            return TickOutcome::Expired;
        }
        TickOutcome::Ticked {
            time_left: self.time_left,
        }
    }

    fn finish(&mut self, status: Status, message: &str) {
        self.status = status;
        self.message = Some(message.to_owned());
    }

    // ===== power-up =====

    /// Reveals every card that is neither selected nor matched.
    ///
    /// Returns the revealed ids, or `None` when not playing or the power-up is
    /// not ready. Selection, counters and `can_flip` are untouched.
    pub fn activate_power_up(&mut self) -> Option<Vec<CardId>> {
        if !self.power_up_available() {
            return None;
        }

        self.power_up = PowerUpPhase::Revealing;
        let revealed = self
            .board
            .cards_mut()
            .filter(|card| card.is_selectable())
            .map(|card| {
                card.is_revealed = true;
                card.id
            })
            .collect();
        Some(revealed)
    }

    /// Ends the reveal window and starts the cooldown.
    ///
    /// Returns the ids that went face down again; cards matched or selected
    /// meanwhile stay up.
    pub fn conceal_power_up(&mut self, generation: Generation) -> Option<Vec<CardId>> {
        if generation != self.generation || self.power_up != PowerUpPhase::Revealing {
            return None;
        }

        self.power_up = PowerUpPhase::CoolingDown;
        let mut hidden = Vec::new();
        for card in self.board.cards_mut().filter(|card| card.is_revealed) {
            card.is_revealed = false;
            if !card.is_face_up() {
                hidden.push(card.id);
            }
        }
        Some(hidden)
    }

    /// Makes the power-up available again after its cooldown.
    pub fn restore_power_up(&mut self, generation: Generation) -> bool {
        if generation != self.generation || self.power_up != PowerUpPhase::CoolingDown {
            return false;
        }
        self.power_up = PowerUpPhase::Ready;
        true
    }
}
