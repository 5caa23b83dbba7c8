//! Client-side configuration for the terminal UI.
use std::env;
use std::path::PathBuf;

use pairs_core::Difficulty;

use crate::presentation::theme::ThemeMode;

/// Terminal client configuration.
///
/// Runtime knobs live in [`pairs_runtime::RuntimeConfig`]; this only holds
/// what the front-end itself needs.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Difficulty preselected on launch.
    pub difficulty: Difficulty,
    pub theme: ThemeMode,
    /// Overrides the platform cache directory for logs.
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PAIRS_DIFFICULTY` - `easy`, `medium` or `hard` (default: easy)
    /// - `PAIRS_THEME` - `light` or `dark` (default: light)
    /// - `PAIRS_LOG_DIR` - Directory for `client.log` (default: platform cache dir)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(difficulty) = read_env::<Difficulty>("PAIRS_DIFFICULTY") {
            config.difficulty = difficulty;
        }
        if let Some(theme) = read_env::<ThemeMode>("PAIRS_THEME") {
            config.theme = theme;
        }
        config.log_dir = env::var("PAIRS_LOG_DIR").ok().map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
