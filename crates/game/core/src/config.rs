/// Game timing constants and tunable parameters.
///
/// The runtime reads these when scheduling delayed transitions; the core only
/// stores them so every layer agrees on the same numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// How long a mismatched pair stays face up before it is hidden again.
    pub mismatch_delay_ms: u64,
    /// How long the power-up keeps the board revealed.
    pub power_up_reveal_ms: u64,
    /// Cooldown between the power-up hiding the board and becoming available again.
    pub power_up_cooldown_ms: u64,
    /// Interval between countdown ticks.
    pub tick_ms: u64,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Cards in an evaluation.
    pub const SELECTION_SIZE: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MISMATCH_DELAY_MS: u64 = 1_000;
    pub const DEFAULT_POWER_UP_REVEAL_MS: u64 = 3_000;
    pub const DEFAULT_POWER_UP_COOLDOWN_MS: u64 = 30_000;
    pub const DEFAULT_TICK_MS: u64 = 1_000;

    pub fn new() -> Self {
        Self {
            mismatch_delay_ms: Self::DEFAULT_MISMATCH_DELAY_MS,
            power_up_reveal_ms: Self::DEFAULT_POWER_UP_REVEAL_MS,
            power_up_cooldown_ms: Self::DEFAULT_POWER_UP_COOLDOWN_MS,
            tick_ms: Self::DEFAULT_TICK_MS,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
