//! Media primitive contracts.
//!
//! The primitive is the host's decode/render engine (AVPlayer, ExoPlayer, a
//! GStreamer pipeline, ...). Side-effecting calls (`attach`, `detach`,
//! `play`, `pause`, `seek`) are only issued from jobs running on the
//! [`UiDispatcher`](crate::dispatch::UiDispatcher). The read-only queries
//! `current_time` and `loaded_time_ranges` are polled from the sampler task
//! on a runtime worker and must be safe to call from any thread.
//!
//! Status observation is an explicit typed callback. Observers may be invoked
//! on any thread and must be cheap; the core only records the new status and
//! schedules work.

use crate::playback::{MediaTime, TimeRange};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Readiness of a media item, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    Unknown,
    Failed,
    ReadyToPlay,
}

/// Token returned by [`MediaItem::add_status_observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(Uuid);

impl ObserverId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

/// Callback receiving item status changes.
pub type StatusObserver = Box<dyn Fn(ItemStatus) + Send + Sync>;

/// Callback invoked once a seek settles. `true` when the seek finished,
/// `false` when it was interrupted by another seek.
pub type SeekCompletion = Box<dyn FnOnce(bool) + Send>;

/// A loadable media item (one per player).
pub trait MediaItem: Send + Sync {
    /// Item duration from its metadata. Invalid until the item is ready.
    fn duration(&self) -> MediaTime;

    /// Current readiness.
    fn status(&self) -> ItemStatus;

    /// Failure description, when the host can provide one.
    fn error(&self) -> Option<String> {
        None
    }

    /// Human readable locator (URL or path) used for diagnostics only.
    fn locator(&self) -> Option<String> {
        None
    }

    /// Register a status observer. The observer stays registered until
    /// [`MediaItem::remove_status_observer`] is called with the returned id.
    fn add_status_observer(&self, observer: StatusObserver) -> ObserverId;

    /// Unregister a status observer. Must be synchronous: once this returns the
    /// observer is never invoked again.
    fn remove_status_observer(&self, id: ObserverId);
}

/// The host media engine.
pub trait MediaPrimitive: Send + Sync {
    /// Load `item` for playback, replacing any current item.
    fn attach(&self, item: Arc<dyn MediaItem>);

    /// Release the current item and its decode resources.
    fn detach(&self);

    /// Whether an item is currently attached.
    fn has_item(&self) -> bool;

    fn play(&self);

    fn pause(&self);

    /// Seek to `to`. `completion` is invoked exactly once, on any thread.
    fn seek(&self, to: MediaTime, completion: SeekCompletion);

    /// Current playback position.
    fn current_time(&self) -> MediaTime;

    /// Loaded ranges of the attached item, earliest first.
    fn loaded_time_ranges(&self) -> Vec<TimeRange>;
}
