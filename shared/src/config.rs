use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Selection, MAX_BURST};

/// Errors concerning a [`ShowConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tunables of a show. Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    /// Frame admission rate.
    pub fps: f64,
    /// Period of the ambient launch timer.
    pub auto_launch_interval_ms: f64,
    /// Probability that an ambient timer tick launches a shell.
    pub auto_launch_chance: f64,
    /// Gap between consecutive launches of a burst.
    pub burst_stagger_ms: f64,
    /// Shells in a burst triggered by the UI or a celebration.
    pub burst_size: usize,
    pub screen_shake: bool,
    /// Clears the frame instead of fading it, and skips background stars.
    pub performance_mode: bool,
    pub audio: bool,
    pub selection: Selection,
    /// Seed of the show's dice. Unset means the frontend seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for ShowConfig {
    fn default() -> Self {
        ShowConfig {
            fps: 60.0,
            auto_launch_interval_ms: 800.0,
            auto_launch_chance: 0.3,
            burst_stagger_ms: 50.0,
            burst_size: 20,
            screen_shake: true,
            performance_mode: false,
            audio: true,
            selection: Selection::Random,
            seed: None,
        }
    }
}

impl ShowConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<ShowConfig, ConfigError> {
        let config: ShowConfig = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fps > 0.0) {
            return Err(ConfigError::Invalid {
                field: "fps",
                reason: "must be positive",
            });
        }

        if !(self.auto_launch_interval_ms > 0.0) {
            return Err(ConfigError::Invalid {
                field: "auto_launch_interval_ms",
                reason: "must be positive",
            });
        }

        if !(0.0..=1.0).contains(&self.auto_launch_chance) {
            return Err(ConfigError::Invalid {
                field: "auto_launch_chance",
                reason: "must lie in [0, 1]",
            });
        }

        if self.burst_size > MAX_BURST {
            return Err(ConfigError::Invalid {
                field: "burst_size",
                reason: "must not exceed 200",
            });
        }

        if !(self.burst_stagger_ms >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "burst_stagger_ms",
                reason: "must not be negative",
            });
        }

        Ok(())
    }

    /// Minimum gap between two admitted frames.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps
    }
}
