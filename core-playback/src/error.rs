//! # Playback Error Types
//!
//! Errors surfaced by the player, its handle and its builder.
//!
//! Buffering stalls are not errors: a stalled network keeps the player in the
//! waiting-buffer state indefinitely and is reported through the loading
//! indicator only.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// Seek target outside `[0, duration)`, not finite, or issued before the
    /// duration is known. The player state is left untouched.
    #[error("Seek target {target}s outside [0, {duration}s)")]
    InvalidSeekTarget { target: f64, duration: f64 },

    /// The media item reported failure.
    #[error("Media primitive failed: {}", .reason.as_deref().unwrap_or("no reason given"))]
    PrimitiveFailure { reason: Option<String> },

    /// A command was issued after the player entered the terminal `Failed` state.
    #[error("Player has failed; only stop() is accepted")]
    PlayerFailed,

    /// A `PlayerHandle` outlived its player.
    #[error("Player has been released")]
    PlayerReleased,

    // ========================================================================
    // Setup Errors
    // ========================================================================
    /// A required bridge capability was not supplied to the builder.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Invalid player configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Platform Errors
    // ========================================================================
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl PlaybackError {
    /// Returns `true` if retrying the same call can never succeed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PlaybackError::PrimitiveFailure { .. }
                | PlaybackError::PlayerFailed
                | PlaybackError::PlayerReleased
        )
    }

    /// Returns `true` if the error was caused by invalid input from the caller.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::InvalidSeekTarget { .. }
                | PlaybackError::InvalidConfig(_)
                | PlaybackError::CapabilityMissing { .. }
        )
    }

    pub(crate) fn capability_missing(capability: &str, message: &str) -> Self {
        PlaybackError::CapabilityMissing {
            capability: capability.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
