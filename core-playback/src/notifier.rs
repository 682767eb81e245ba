//! # Event Notifier
//!
//! Fans each published [`PlayerEvent`] out to the player's observers:
//!
//! 1. the attached control surface (button, labels, progress, slider)
//! 2. the loading indicator
//! 3. the [`PlayerDelegate`]
//! 4. the optional [`EventBus`]
//!
//! [`EventNotifier::publish`] is only ever called from a job running on the
//! UI dispatcher, so observers see events strictly in the order the player
//! produced them. No lock is held while calling out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use bridge_traits::{ActivityIndicator, PlaybackState, PlayerId};
use core_runtime::events::{EventBus, PlayerEvent, PlayerEventEnvelope};
use parking_lot::Mutex;
use tracing::trace;

use crate::control::{format_clock, ControlSurface};
use crate::state::Telemetry;

/// Observer of a single player. Every method runs on the UI dispatcher and
/// defaults to a no-op.
pub trait PlayerDelegate: Send + Sync {
    fn player_state_did_change(&self, _state: PlaybackState) {}

    fn start_loading(&self) {}

    fn stop_loading(&self) {}

    fn did_finish(&self) {}

    fn duration_seconds(&self, _seconds: f64) {}

    fn loaded_seconds_did_change(&self, _seconds: f64) {}

    fn current_second_did_change(&self, _seconds: f64) {}

    /// Delivered after `player_state_did_change(Failed)`, with the reason the
    /// media item gave, if any.
    fn player_did_fail(&self, _reason: Option<String>) {}
}

pub struct EventNotifier {
    player_id: PlayerId,
    delegate: Option<Weak<dyn PlayerDelegate>>,
    indicator: Option<Arc<dyn ActivityIndicator>>,
    bus: Option<EventBus>,
    control: Mutex<Option<Weak<dyn ControlSurface>>>,
    /// Duration as last published, for slider positioning.
    duration: Mutex<f64>,
    sequence: AtomicU64,
}

impl EventNotifier {
    pub fn new(
        player_id: PlayerId,
        delegate: Option<Weak<dyn PlayerDelegate>>,
        indicator: Option<Arc<dyn ActivityIndicator>>,
        bus: Option<EventBus>,
    ) -> Self {
        Self {
            player_id,
            delegate,
            indicator,
            bus,
            control: Mutex::new(None),
            duration: Mutex::new(0.0),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn event_bus(&self) -> Option<&EventBus> {
        self.bus.as_ref()
    }

    /// Replace the control surface and return the previous one, if it is
    /// still alive.
    pub fn set_control(
        &self,
        control: Option<Weak<dyn ControlSurface>>,
    ) -> Option<Arc<dyn ControlSurface>> {
        let previous = std::mem::replace(&mut *self.control.lock(), control);
        previous.and_then(|weak| weak.upgrade())
    }

    pub fn control(&self) -> Option<Arc<dyn ControlSurface>> {
        self.control.lock().as_ref().and_then(Weak::upgrade)
    }

    /// Bring a freshly attached surface up to date.
    pub fn sync_control(&self, state: PlaybackState, telemetry: &Telemetry) {
        let Some(control) = self.control() else {
            return;
        };
        control
            .play_button()
            .set_selected(state.shows_pause_control());
        control
            .duration_seconds_label()
            .set_text(&format_clock(telemetry.duration_seconds));
        control
            .current_second_label()
            .set_text(&format_clock(telemetry.current_second));
        if telemetry.duration_seconds > 0.0 {
            control
                .loaded_progress()
                .set_progress((telemetry.loaded_seconds / telemetry.duration_seconds) as f32, false);
            if !control.is_slider_touching() && !telemetry.seeking {
                control
                    .playing_slider()
                    .set_value((telemetry.current_second / telemetry.duration_seconds) as f32);
            }
        }
    }

    /// Deliver one event. `seeking` is the player's live seeking flag.
    pub fn publish(&self, event: &PlayerEvent, seeking: bool) {
        let control = self.control();
        let delegate = self.delegate.as_ref().and_then(Weak::upgrade);

        match event {
            PlayerEvent::StateChanged { state } => {
                if let Some(control) = &control {
                    control.play_button().set_selected(state.shows_pause_control());
                }
                if let Some(delegate) = &delegate {
                    delegate.player_state_did_change(*state);
                }
            }
            PlayerEvent::DurationChanged { seconds } => {
                *self.duration.lock() = *seconds;
                if let Some(control) = &control {
                    control.duration_seconds_label().set_text(&format_clock(*seconds));
                }
                if let Some(delegate) = &delegate {
                    delegate.duration_seconds(*seconds);
                }
            }
            PlayerEvent::LoadedChanged { seconds, progress } => {
                if let Some(control) = &control {
                    control.loaded_progress().set_progress(*progress as f32, true);
                }
                if let Some(delegate) = &delegate {
                    delegate.loaded_seconds_did_change(*seconds);
                }
            }
            PlayerEvent::PositionChanged { seconds } => {
                if let Some(control) = &control {
                    control.current_second_label().set_text(&format_clock(*seconds));
                    let duration = *self.duration.lock();
                    // Don't fight the user's finger or an in-flight seek.
                    if !control.is_slider_touching() && !seeking && duration > 0.0 {
                        control.playing_slider().set_value((*seconds / duration) as f32);
                    }
                }
                if let Some(delegate) = &delegate {
                    delegate.current_second_did_change(*seconds);
                }
            }
            PlayerEvent::LoadingStarted => {
                if let Some(indicator) = &self.indicator {
                    indicator.start_animating();
                }
                if let Some(delegate) = &delegate {
                    delegate.start_loading();
                }
            }
            PlayerEvent::LoadingStopped => {
                if let Some(indicator) = &self.indicator {
                    indicator.stop_animating();
                }
                if let Some(delegate) = &delegate {
                    delegate.stop_loading();
                }
            }
            PlayerEvent::Finished => {
                if let Some(delegate) = &delegate {
                    delegate.did_finish();
                }
            }
            PlayerEvent::Failed { reason } => {
                if let Some(delegate) = &delegate {
                    delegate.player_did_fail(reason.clone());
                }
            }
            PlayerEvent::WaitingBufferChanged { .. }
            | PlayerEvent::SeekStarted { .. }
            | PlayerEvent::SeekCompleted { .. } => {}
        }

        self.emit(event);
    }

    fn emit(&self, event: &PlayerEvent) {
        let Some(bus) = &self.bus else {
            return;
        };
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let envelope = PlayerEventEnvelope::new(self.player_id, sequence, event.clone());
        if bus.emit(envelope).is_err() {
            trace!(player_id = %self.player_id, "no event bus subscribers");
        }
    }
}
