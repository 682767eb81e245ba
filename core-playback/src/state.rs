//! Per-player telemetry and derived flags.

use serde::{Deserialize, Serialize};

/// Raw playback measurements, owned exclusively by one player.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Telemetry {
    /// Item duration. Zero until the item is ready or when it is indefinite.
    pub duration_seconds: f64,
    /// Playhead, rounded to milliseconds.
    pub current_second: f64,
    /// End of the first loaded range, clamped to the duration.
    pub loaded_seconds: f64,
    /// `loaded_seconds - current_second`; only meaningful while
    /// `loaded_seconds > 0`.
    pub buffer_remain_seconds: f64,
    /// A seek has been issued and has not completed yet.
    pub seeking: bool,
}

/// Booleans recomputed from telemetry and lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DerivedFlags {
    pub is_waiting_buffer: bool,
    pub is_loading: bool,
    pub is_finished: bool,
}
