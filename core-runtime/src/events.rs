//! # Event Bus System
//!
//! Typed player events over `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! A player always notifies its delegate and control surface on the UI
//! thread. The event bus is the third, optional outlet: every notification is
//! also emitted as a [`PlayerEventEnvelope`] so analytics, picture-in-picture
//! controllers or test harnesses can follow one or many players without
//! becoming the delegate.
//!
//! ```text
//! ┌──────────┐   emit    ┌───────────┐   subscribe   ┌────────────┐
//! │ Player A ├──────────>│           ├──────────────>│ Analytics  │
//! └──────────┘           │ EventBus  │               └────────────┘
//!                        │ (broadcast│
//! ┌──────────┐   emit    │  channel) │   subscribe   ┌────────────┐
//! │ Player B ├──────────>│           ├──────────────>│ PiP window │
//! └──────────┘           └───────────┘               └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bridge_traits::{PlaybackState, PlayerId};
//! use core_runtime::events::{EventBus, EventStream, PlayerEvent, PlayerEventEnvelope};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(100);
//! let player = PlayerId::new();
//! let mut stream = EventStream::new(bus.subscribe()).for_player(player);
//!
//! bus.emit(PlayerEventEnvelope::new(
//!     player,
//!     0,
//!     PlayerEvent::StateChanged { state: PlaybackState::Playing },
//! ))
//! .ok();
//!
//! let envelope = stream.recv().await.unwrap();
//! assert_eq!(envelope.sequence, 0);
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   Telemetry events arrive every sampler tick, so slow subscribers should
//!   expect this and resynchronise from the next `StateChanged`.
//! - **`RecvError::Closed`**: All senders have been dropped. This indicates shutdown.

use bridge_traits::{PlaybackState, PlayerId};
use core_async::sync::broadcast;
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

// Re-export commonly used types
pub use core_async::sync::broadcast::error::{RecvError, SendError};
pub use core_async::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Player Events
// ============================================================================

/// Observable change of one player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum PlayerEvent {
    /// Lifecycle state changed.
    StateChanged { state: PlaybackState },
    /// Item duration became known.
    DurationChanged { seconds: f64 },
    /// Buffered extent grew or shrank.
    LoadedChanged {
        seconds: f64,
        /// `seconds / duration`, in `0.0..=1.0`.
        progress: f64,
    },
    /// Playback position advanced.
    PositionChanged { seconds: f64 },
    LoadingStarted,
    LoadingStopped,
    /// Rebuffering started or ended.
    WaitingBufferChanged { waiting: bool },
    /// Playback reached the end of the item.
    Finished,
    /// The media item reported failure. Terminal.
    Failed { reason: Option<String> },
    SeekStarted { target: f64 },
    SeekCompleted { target: f64, finished: bool },
}

impl PlayerEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            PlayerEvent::StateChanged { .. } => "Player state changed",
            PlayerEvent::DurationChanged { .. } => "Duration resolved",
            PlayerEvent::LoadedChanged { .. } => "Buffered range changed",
            PlayerEvent::PositionChanged { .. } => "Playback position changed",
            PlayerEvent::LoadingStarted => "Loading started",
            PlayerEvent::LoadingStopped => "Loading stopped",
            PlayerEvent::WaitingBufferChanged { waiting: true } => "Rebuffering",
            PlayerEvent::WaitingBufferChanged { waiting: false } => "Buffer ready",
            PlayerEvent::Finished => "Playback finished",
            PlayerEvent::Failed { .. } => "Player failed",
            PlayerEvent::SeekStarted { .. } => "Seek started",
            PlayerEvent::SeekCompleted { .. } => "Seek completed",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            PlayerEvent::Failed { .. } => EventSeverity::Error,
            PlayerEvent::WaitingBufferChanged { waiting: true } => EventSeverity::Warning,
            PlayerEvent::StateChanged { .. } | PlayerEvent::Finished => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }

    /// Whether the event is a high-frequency telemetry update.
    pub fn is_telemetry(&self) -> bool {
        matches!(
            self,
            PlayerEvent::PositionChanged { .. } | PlayerEvent::LoadedChanged { .. }
        )
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

/// A player event tagged with its source and per-player sequence number.
///
/// Sequence numbers start at zero and increase by one for every event a
/// player emits, in the order the changes happened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerEventEnvelope {
    pub player_id: PlayerId,
    pub sequence: u64,
    pub event: PlayerEvent,
}

impl PlayerEventEnvelope {
    pub fn new(player_id: PlayerId, sequence: u64, event: PlayerEvent) -> Self {
        Self {
            player_id,
            sequence,
            event,
        }
    }

    /// Serialize for hosts that forward events across an FFI or IPC boundary.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::Internal(format!("failed to serialize player event: {e}")))
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to player events.
///
/// Clone the bus to share it between players; every clone feeds the same
/// channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlayerEventEnvelope>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns an error if there are no active subscribers.
    pub fn emit(
        &self,
        envelope: PlayerEventEnvelope,
    ) -> std::result::Result<usize, SendError<PlayerEventEnvelope>> {
        self.sender.send(envelope)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<PlayerEventEnvelope> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    ///
    /// ```rust
    /// use core_runtime::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    ///
    /// let _subscriber = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&PlayerEventEnvelope) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with filtering.
///
/// Filters compose: each call to [`EventStream::filter`] adds a predicate and
/// an envelope must pass all of them.
pub struct EventStream {
    receiver: Receiver<PlayerEventEnvelope>,
    filters: Vec<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<PlayerEventEnvelope>) -> Self {
        Self {
            receiver,
            filters: Vec::new(),
        }
    }

    /// Adds a filter function to this stream.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PlayerEventEnvelope) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Box::new(predicate));
        self
    }

    /// Only events emitted by `player_id`.
    pub fn for_player(self, player_id: PlayerId) -> Self {
        self.filter(move |envelope| envelope.player_id == player_id)
    }

    /// Drop position and buffered-range updates.
    pub fn without_telemetry(self) -> Self {
        self.filter(|envelope| !envelope.event.is_telemetry())
    }

    fn accepts(&self, envelope: &PlayerEventEnvelope) -> bool {
        self.filters.iter().all(|filter| filter(envelope))
    }

    /// Receives the next event that passes the filters.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> std::result::Result<PlayerEventEnvelope, RecvError> {
        loop {
            let envelope = self.receiver.recv().await?;
            if self.accepts(&envelope) {
                return Ok(envelope);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no events are currently available.
    pub fn try_recv(&mut self) -> Option<std::result::Result<PlayerEventEnvelope, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) => {
                    if self.accepts(&envelope) {
                        return Some(Ok(envelope));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Convert into a `futures::Stream` that skips lag notifications and ends
    /// when the bus closes.
    pub fn into_stream(self) -> impl Stream<Item = PlayerEventEnvelope> + Send {
        stream::unfold(self, |mut events| async move {
            loop {
                match events.recv().await {
                    Ok(envelope) => return Some((envelope, events)),
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Player event subscriber lagged");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("filters", &self.filters.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
