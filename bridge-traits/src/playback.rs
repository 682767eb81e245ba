//! Playback value types shared by the core and host adapters.
//!
//! Media time is carried as a rational value (`value / timescale`) so host
//! engines that count in sample or frame units can hand times over without
//! rounding. The core converts to seconds at the edge.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier assigned to every player instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Generate a new player identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Player lifecycle state.
///
/// `Failed` is terminal. `Stopped` is reachable from every state and may be
/// entered repeatedly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Init,
    Stopped,
    Starting,
    Failed,
    Playing,
    Paused,
}

impl PlaybackState {
    /// Whether the state is terminal (no further transitions except `Stopped`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlaybackState::Failed)
    }

    /// Whether a play/pause control should render its "pause" (selected) face.
    pub fn shows_pause_control(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Starting)
    }

    /// Short lowercase label used in logs and events.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Init => "init",
            PlaybackState::Stopped => "stopped",
            PlaybackState::Starting => "starting",
            PlaybackState::Failed => "failed",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rational media time: `value / timescale` seconds.
///
/// A non-positive timescale marks the time as invalid or indefinite (for
/// example the duration of a live stream or of an item that has not loaded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaTime {
    pub value: i64,
    pub timescale: i32,
}

impl MediaTime {
    /// Zero seconds.
    pub const ZERO: MediaTime = MediaTime {
        value: 0,
        timescale: 1,
    };

    /// Invalid / indefinite time.
    pub const INVALID: MediaTime = MediaTime {
        value: 0,
        timescale: 0,
    };

    pub const fn new(value: i64, timescale: i32) -> Self {
        Self { value, timescale }
    }

    /// Whole seconds with a timescale of one.
    pub const fn from_whole_seconds(seconds: i64) -> Self {
        Self::new(seconds, 1)
    }

    /// Convert seconds to a millisecond-precision media time.
    ///
    /// Non-finite input yields [`MediaTime::INVALID`].
    pub fn from_secs_f64(seconds: f64) -> Self {
        if !seconds.is_finite() {
            return Self::INVALID;
        }
        Self::new((seconds * 1000.0).round() as i64, 1000)
    }

    pub fn is_valid(&self) -> bool {
        self.timescale > 0
    }

    /// Seconds as a float; `NaN` when the time is invalid.
    pub fn as_secs_f64(&self) -> f64 {
        if !self.is_valid() {
            return f64::NAN;
        }
        self.value as f64 / self.timescale as f64
    }
}

impl Default for MediaTime {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A contiguous range of loaded media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: MediaTime,
    pub duration: MediaTime,
}

impl TimeRange {
    pub fn new(start: MediaTime, duration: MediaTime) -> Self {
        Self { start, duration }
    }

    /// Build a range from float seconds.
    pub fn from_secs(start: f64, duration: f64) -> Self {
        Self::new(MediaTime::from_secs_f64(start), MediaTime::from_secs_f64(duration))
    }

    /// End of the range in seconds (`start + duration`).
    pub fn end_secs(&self) -> f64 {
        self.start.as_secs_f64() + self.duration.as_secs_f64()
    }
}
