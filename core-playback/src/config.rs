//! # Player Configuration
//!
//! Configuration types for a single player instance.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Player configuration.
///
/// Loadable from JSON; missing fields take their defaults.
///
/// ```rust
/// use core_playback::PlayerConfig;
///
/// let config = PlayerConfig::from_json_str(r#"{ "auto_start": true }"#).unwrap();
/// assert!(config.auto_start);
/// assert_eq!(config.minimum_buffer_remain_to_play, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Start loading the item as soon as the player is built. When `false` the
    /// player is normalised to `Stopped` instead.
    ///
    /// Default: false.
    #[serde(default = "default_auto_start")]
    pub auto_start: bool,

    /// Emit diagnostic tracing for state, flag, telemetry and seek changes.
    /// Warnings and errors are logged regardless.
    ///
    /// Default: true.
    #[serde(default = "default_should_log")]
    pub should_log: bool,

    /// Buffered seconds ahead of the playhead at or below which the player
    /// considers itself waiting for buffer.
    ///
    /// Default: 1.0 second.
    #[serde(default = "default_minimum_buffer_remain_to_play")]
    pub minimum_buffer_remain_to_play: f64,

    /// Period of the telemetry sampler.
    ///
    /// Default: 300 ms.
    #[serde(default = "default_sample_interval")]
    pub sample_interval: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            auto_start: default_auto_start(),
            should_log: default_should_log(),
            minimum_buffer_remain_to_play: default_minimum_buffer_remain_to_play(),
            sample_interval: default_sample_interval(),
        }
    }
}

impl PlayerConfig {
    /// Configuration that starts loading immediately.
    pub fn autoplay() -> Self {
        Self {
            auto_start: true,
            ..Default::default()
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PlaybackError::InvalidConfig(format!("malformed JSON: {e}")))?;
        config.validate().map_err(PlaybackError::InvalidConfig)?;
        Ok(config)
    }

    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    pub fn with_should_log(mut self, should_log: bool) -> Self {
        self.should_log = should_log;
        self
    }

    pub fn with_minimum_buffer_remain_to_play(mut self, seconds: f64) -> Self {
        self.minimum_buffer_remain_to_play = seconds;
        self
    }

    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.minimum_buffer_remain_to_play.is_finite() {
            return Err("minimum_buffer_remain_to_play must be finite".to_string());
        }

        if self.minimum_buffer_remain_to_play < 0.0 {
            return Err("minimum_buffer_remain_to_play must be >= 0".to_string());
        }

        if self.sample_interval.is_zero() {
            return Err("sample_interval must be > 0".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_auto_start() -> bool {
    false
}

fn default_should_log() -> bool {
    true
}

fn default_minimum_buffer_remain_to_play() -> f64 {
    1.0
}

fn default_sample_interval() -> Duration {
    Duration::from_millis(300)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlayerConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.auto_start);
        assert!(config.should_log);
        assert_eq!(config.minimum_buffer_remain_to_play, 1.0);
        assert_eq!(config.sample_interval, Duration::from_millis(300));
    }

    #[test]
    fn test_autoplay_preset() {
        let config = PlayerConfig::autoplay();
        assert!(config.auto_start);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PlayerConfig::default();

        config.minimum_buffer_remain_to_play = -0.5;
        assert!(config.validate().is_err());

        config.minimum_buffer_remain_to_play = f64::NAN;
        assert!(config.validate().is_err());

        config.minimum_buffer_remain_to_play = 0.0;
        assert!(config.validate().is_ok());

        config.sample_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_defaults_missing_fields() {
        let config = PlayerConfig::from_json_str(
            r#"{ "should_log": false, "minimum_buffer_remain_to_play": 2.5 }"#,
        )
        .unwrap();
        assert!(!config.should_log);
        assert_eq!(config.minimum_buffer_remain_to_play, 2.5);
        assert!(!config.auto_start);
        assert_eq!(config.sample_interval, Duration::from_millis(300));
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let err = PlayerConfig::from_json_str(r#"{ "minimum_buffer_remain_to_play": -1 }"#)
            .unwrap_err();
        assert!(matches!(err, PlaybackError::InvalidConfig(_)));

        let err = PlayerConfig::from_json_str("not json").unwrap_err();
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_serde_round_trip_keeps_interval() {
        let config = PlayerConfig::default().with_sample_interval(Duration::from_millis(500));
        let json = serde_json::to_string(&config).unwrap();
        let back = PlayerConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_builder_setters() {
        let config = PlayerConfig::default()
            .with_auto_start(true)
            .with_should_log(false)
            .with_minimum_buffer_remain_to_play(3.0)
            .with_sample_interval(Duration::from_millis(100));
        assert!(config.auto_start);
        assert!(!config.should_log);
        assert_eq!(config.minimum_buffer_remain_to_play, 3.0);
        assert_eq!(config.sample_interval, Duration::from_millis(100));
    }
}
