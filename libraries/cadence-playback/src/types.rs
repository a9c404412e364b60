//! Shared types for playback management

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Repeat mode
///
/// Cycles `Off -> All -> One -> Off`. Persisted as `"none" | "all" | "one"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// No repeat (stop at end of queue)
    #[default]
    #[serde(rename = "none")]
    Off,

    /// Repeat entire queue
    #[serde(rename = "all")]
    All,

    /// Repeat current track
    #[serde(rename = "one")]
    One,
}

impl RepeatMode {
    /// Next mode in the fixed cycle
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

/// Queue navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the end of the queue
    Next,

    /// Toward the start of the queue
    Previous,
}

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Volume used when nothing is persisted (0-100)
    pub initial_volume: u8,

    /// Recently played bound
    pub history_size: usize,

    /// Maximum queue length accepted by `enqueue`
    pub max_queue_size: usize,

    /// How long cache entries stay fresh
    pub cache_retention: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_volume: 70,
            history_size: 50,
            max_queue_size: 100,
            cache_retention: Duration::hours(24),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_cycle_returns_to_start() {
        let mode = RepeatMode::Off;
        assert_eq!(mode.cycle(), RepeatMode::All);
        assert_eq!(mode.cycle().cycle(), RepeatMode::One);
        assert_eq!(mode.cycle().cycle().cycle(), RepeatMode::Off);
    }

    #[test]
    fn repeat_mode_persisted_names() {
        assert_eq!(serde_json::to_string(&RepeatMode::Off).unwrap(), "\"none\"");
        assert_eq!(
            serde_json::from_str::<RepeatMode>("\"one\"").unwrap(),
            RepeatMode::One
        );
    }
}
