//! Light and dark color schemes for the terminal UI.
use ratatui::style::{Color, Modifier, Style};

use pairs_core::{Card, Status};

/// Which palette is active. Toggled from the keyboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// Concrete styles for one [`ThemeMode`].
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    background: Color,
    text: Color,
    muted: Color,
    card_back: Color,
    card_face: Color,
    matched: Color,
    accent: Color,
    warning: Color,
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                background: Color::White,
                text: Color::Black,
                muted: Color::Gray,
                card_back: Color::Blue,
                card_face: Color::Black,
                matched: Color::Green,
                accent: Color::Magenta,
                warning: Color::Red,
            },
            ThemeMode::Dark => Self {
                background: Color::Black,
                text: Color::White,
                muted: Color::DarkGray,
                card_back: Color::LightBlue,
                card_face: Color::White,
                matched: Color::LightGreen,
                accent: Color::LightMagenta,
                warning: Color::LightRed,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub fn accent(&self) -> Style {
        self.base().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Glyph and style for a card's label.
    pub fn card(&self, card: &Card) -> (String, Style) {
        if card.is_matched {
            (card.name.clone(), self.base().fg(self.matched))
        } else if card.is_flipped {
            (
                card.name.clone(),
                self.base().fg(self.card_face).add_modifier(Modifier::BOLD),
            )
        } else if card.is_revealed {
            (
                card.name.clone(),
                self.base().fg(self.muted).add_modifier(Modifier::ITALIC),
            )
        } else {
            ("?".to_string(), self.base().fg(self.card_back))
        }
    }

    /// Border of a card; the cursor card is highlighted.
    pub fn card_border(&self, card: &Card, under_cursor: bool) -> Style {
        if under_cursor {
            self.accent()
        } else if card.is_matched {
            self.base().fg(self.matched)
        } else {
            self.base().fg(self.card_back)
        }
    }

    /// Clock turns red during the last ten seconds.
    pub fn clock(&self, time_left: u32, status: Status) -> Style {
        if status == Status::Playing && time_left <= 10 {
            self.base().fg(self.warning).add_modifier(Modifier::BOLD)
        } else {
            self.base().fg(self.text)
        }
    }

    pub fn message(&self, status: Status) -> Style {
        match status {
            Status::Won => self.base().fg(self.matched).add_modifier(Modifier::BOLD),
            Status::Lost => self.base().fg(self.warning).add_modifier(Modifier::BOLD),
            Status::Idle => self.base().fg(self.warning),
            _ => self.base(),
        }
    }

    pub fn power_up(&self, available: bool) -> Style {
        if available {
            self.accent()
        } else {
            self.muted()
        }
    }
}
