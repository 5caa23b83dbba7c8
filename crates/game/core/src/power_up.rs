/// Lifecycle of the reveal-all power-up within one session.
///
/// `Ready → Revealing → CoolingDown → Ready`. The two timed edges are driven
/// by the runtime; the core only validates and applies them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerUpPhase {
    #[default]
    Ready,
    /// Board is revealed; waiting for the reveal window to close.
    Revealing,
    /// Board hidden again; waiting for the cooldown to elapse.
    CoolingDown,
}

impl PowerUpPhase {
    pub const fn is_available(self) -> bool {
        matches!(self, PowerUpPhase::Ready)
    }
}
