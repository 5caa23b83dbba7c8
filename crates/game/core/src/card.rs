//! Card records and the catalog entities they are built from.

use core::fmt;

/// Unique identifier of a card within one board.
///
/// Ids are assigned over the doubled entity list before shuffling, so for a
/// board of `n` pairs the cards `k` and `k + n` always share a name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named creature with a display image, as drawn from the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub name: String,
    pub image: String,
}

impl Entity {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
        }
    }
}

/// One face of a pair on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub id: CardId,
    /// Pair key: exactly two cards on a board share it.
    pub name: String,
    pub image: String,
    /// Selected by the player and currently face up.
    pub is_flipped: bool,
    /// Part of a found pair; stays face up for the rest of the session.
    pub is_matched: bool,
    /// Shown by the power-up peek. Independent of selection.
    pub is_revealed: bool,
}

impl Card {
    pub fn new(id: CardId, entity: &Entity) -> Self {
        Self {
            id,
            name: entity.name.clone(),
            image: entity.image.clone(),
            is_flipped: false,
            is_matched: false,
            is_revealed: false,
        }
    }

    /// Whether the front face is visible for any reason.
    pub fn is_face_up(&self) -> bool {
        self.is_flipped || self.is_matched || self.is_revealed
    }

    /// Whether the player may still select this card.
    pub fn is_selectable(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }
}
