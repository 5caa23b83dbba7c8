//! Difficulty tiers and their board/clock presets.

use strum::{Display, EnumIter, EnumString};

/// Difficulty tier selected before a session starts.
///
/// Parses from and prints as lowercase (`easy`, `medium`, `hard`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Board size and time limit for this tier.
    pub const fn preset(self) -> DifficultyPreset {
        match self {
            Difficulty::Easy => DifficultyPreset::new(6, 120),
            Difficulty::Medium => DifficultyPreset::new(8, 90),
            Difficulty::Hard => DifficultyPreset::new(12, 60),
        }
    }
}

/// Pair count and time limit of a difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifficultyPreset {
    pub pairs: u32,
    pub time_seconds: u32,
}

impl DifficultyPreset {
    pub const fn new(pairs: u32, time_seconds: u32) -> Self {
        Self {
            pairs,
            time_seconds,
        }
    }
}
