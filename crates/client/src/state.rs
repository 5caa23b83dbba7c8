//! View state fed by runtime events.
//!
//! [`ViewState`] is the client's [`GameObserver`]: the event loop dispatches
//! every bus event into it and redraws from it. It also tracks the purely
//! local bits (cursor, theme, selected difficulty).

use pairs_core::{Card, CardId, Difficulty, GameSession, Stats, Status};
use pairs_runtime::GameObserver;

use crate::presentation::theme::ThemeMode;

/// Cursor step on the card grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Grid width for a board of `len` cards.
pub fn columns_for(len: usize) -> usize {
    match len {
        0..=16 => 4,
        _ => 6,
    }
}

#[derive(Clone, Debug)]
pub struct ViewState {
    pub cards: Vec<Card>,
    pub stats: Stats,
    pub time_left: u32,
    pub status: Status,
    pub message: Option<String>,
    pub power_up_available: bool,
    pub difficulty: Difficulty,
    pub theme: ThemeMode,
    /// Index into `cards`, not a card id.
    pub cursor: usize,
}

impl ViewState {
    pub fn new(difficulty: Difficulty, theme: ThemeMode) -> Self {
        Self {
            cards: Vec::new(),
            stats: Stats::default(),
            time_left: 0,
            status: Status::Idle,
            message: None,
            power_up_available: false,
            difficulty,
            theme,
            cursor: 0,
        }
    }

    /// Rebuilds from a full snapshot, keeping local settings.
    pub fn sync(&mut self, session: &GameSession) {
        self.render(session.cards());
        self.stats = session.stats();
        self.time_left = session.time_left();
        self.status = session.status();
        self.message = session.message().map(str::to_owned);
        self.power_up_available = session.power_up_available();
    }

    pub fn columns(&self) -> usize {
        columns_for(self.cards.len())
    }

    pub fn card_under_cursor(&self) -> Option<CardId> {
        self.cards.get(self.cursor).map(|card| card.id)
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        let len = self.cards.len();
        if len == 0 {
            return;
        }
        let columns = self.columns();
        let (row, col) = (self.cursor / columns, self.cursor % columns);
        let rows = len.div_ceil(columns);

        let (row, col) = match direction {
            Direction::Up => ((row + rows - 1) % rows, col),
            Direction::Down => ((row + 1) % rows, col),
            Direction::Left => (row, (col + columns - 1) % columns),
            Direction::Right => (row, (col + 1) % columns),
        };
        self.cursor = (row * columns + col).min(len - 1);
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }
}

impl GameObserver for ViewState {
    fn render(&mut self, cards: &[Card]) {
        if cards.len() != self.cards.len() {
            self.cursor = 0;
        }
        self.cards = cards.to_vec();
    }

    fn on_stats_changed(&mut self, stats: &Stats) {
        self.stats = *stats;
    }

    fn on_clock(&mut self, time_left: u32) {
        self.time_left = time_left;
    }

    fn on_power_up(&mut self, available: bool) {
        self.power_up_available = available;
    }

    fn on_message(&mut self, message: Option<&str>) {
        self.message = message.map(str::to_owned);
    }

    fn on_status(&mut self, status: Status) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairs_core::Entity;

    fn board(len: u32) -> Vec<Card> {
        (0..len)
            .map(|i| Card::new(CardId(i), &Entity::new(format!("e{}", i % (len / 2)), "img")))
            .collect()
    }

    fn view(len: u32) -> ViewState {
        let mut view = ViewState::new(Difficulty::Easy, ThemeMode::Light);
        view.render(&board(len));
        view
    }

    #[test]
    fn grid_widths() {
        assert_eq!(columns_for(12), 4);
        assert_eq!(columns_for(16), 4);
        assert_eq!(columns_for(24), 6);
    }

    #[test]
    fn cursor_wraps_around_edges() {
        let mut view = view(12);

        view.move_cursor(Direction::Left);
        assert_eq!(view.cursor, 3);
        view.move_cursor(Direction::Right);
        assert_eq!(view.cursor, 0);
        view.move_cursor(Direction::Up);
        assert_eq!(view.cursor, 8);
        view.move_cursor(Direction::Down);
        assert_eq!(view.cursor, 0);
        view.move_cursor(Direction::Down);
        assert_eq!(view.card_under_cursor(), Some(CardId(4)));
    }

    #[test]
    fn cursor_ignores_empty_board() {
        let mut view = ViewState::new(Difficulty::Hard, ThemeMode::Dark);
        view.move_cursor(Direction::Right);
        assert_eq!(view.cursor, 0);
        assert_eq!(view.card_under_cursor(), None);
    }

    #[test]
    fn new_board_resets_cursor() {
        let mut view = view(12);
        view.cursor = 7;
        view.render(&board(24));
        assert_eq!(view.cursor, 0);
        assert_eq!(view.columns(), 6);
    }

    #[test]
    fn sync_takes_power_up_from_session() {
        let mut view = view(12);
        view.on_power_up(true);

        view.sync(&GameSession::new());
        assert!(!view.power_up_available);
        assert_eq!(view.status, Status::Idle);
        assert!(view.cards.is_empty());
    }
}
