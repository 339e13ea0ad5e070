//! Auto-advance configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MIN_INTERVAL_MS: u64 = 500;
const MAX_INTERVAL_MS: u64 = 60_000;

/// Playback configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    /// Delay between automatic stage advances, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl PlaybackConfig {
    /// Get the auto-advance interval as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Validate playback configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&self.interval_ms) {
            return Err(ValidationError::InvalidPlaybackInterval);
        }
        Ok(())
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    4_000
}
