//! # Derived-State Engine
//!
//! Pure reconciliation of telemetry and lifecycle state into the derived
//! flags, expressed as a reducer over [`PlayerModel`].
//!
//! Every mutation method returns the [`SideEffect`]s it implies, in the order
//! they must run. Flags are edge-triggered: an effect is only produced when a
//! value actually changes, so calling a method twice with the same input is a
//! no-op the second time.
//!
//! ```text
//!  sample ──► position / loaded ──► isWaitingBuffer ──► isFinished
//!                                        │                  │
//!                                        └──► isLoading ◄───┘
//!  state  ──────────────────────────────────► isLoading
//! ```

use bridge_traits::PlaybackState;
use core_runtime::events::PlayerEvent;

use crate::effects::{PrimitiveCommand, SideEffect};
use crate::error::{PlaybackError, Result};
use crate::sampler::TelemetrySample;
use crate::state::{DerivedFlags, Telemetry};

/// Distance from the end, in seconds, under which playback counts as finished.
pub const FINISH_TOLERANCE_SECONDS: f64 = 1.0;

// ============================================================================
// Pure detectors
// ============================================================================

/// `duration > 0` and the playhead is within one second of the end.
pub fn detect_is_finished(telemetry: &Telemetry) -> bool {
    telemetry.duration_seconds > 0.0
        && (telemetry.duration_seconds - telemetry.current_second).abs()
            < FINISH_TOLERANCE_SECONDS
}

/// Seconds buffered ahead of the playhead, once anything is loaded.
pub fn buffer_remain(telemetry: &Telemetry) -> Option<f64> {
    (telemetry.loaded_seconds > 0.0)
        .then(|| telemetry.loaded_seconds - telemetry.current_second)
}

/// Waiting while seeking, while nothing is loaded, or while the buffer ahead
/// is at or below `minimum_remain`.
pub fn detect_is_waiting_buffer(telemetry: &Telemetry, minimum_remain: f64) -> bool {
    // Never report ready mid-seek, whatever the buffer says.
    if telemetry.seeking {
        return true;
    }
    match buffer_remain(telemetry) {
        None => true,
        Some(remain) => remain <= minimum_remain,
    }
}

pub fn detect_is_loading(state: PlaybackState, is_waiting_buffer: bool) -> bool {
    state == PlaybackState::Starting || (is_waiting_buffer && state == PlaybackState::Playing)
}

// ============================================================================
// Reducer
// ============================================================================

/// Everything a player knows about its item, guarded by the player's lock.
#[derive(Debug, Clone, Default)]
pub struct PlayerModel {
    pub state: PlaybackState,
    pub telemetry: Telemetry,
    pub derived: DerivedFlags,
    /// Latched on the first `Failed` status; survives a later `stop()`.
    pub has_failed: bool,
    pub failure_reason: Option<String>,
    seek_generation: u64,
    /// Accept the next position sample even if it moved backwards.
    resync_pending: bool,
}

impl PlayerModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifecycle transition. Writing the current state is a no-op.
    pub fn set_state(&mut self, next: PlaybackState) -> Vec<SideEffect> {
        if self.state == next {
            return Vec::new();
        }
        self.state = next;

        let mut effects = vec![SideEffect::Publish(PlayerEvent::StateChanged { state: next })];
        self.update_loading(&mut effects);
        effects
    }

    /// `start()`: attach the item if needed, then `Starting`.
    pub fn start(&mut self) -> Result<Vec<SideEffect>> {
        self.ensure_not_failed()?;
        let mut effects = vec![SideEffect::Primitive(PrimitiveCommand::AttachIfDetached)];
        effects.extend(self.set_state(PlaybackState::Starting));
        Ok(effects)
    }

    pub fn play(&mut self) -> Result<Vec<SideEffect>> {
        self.ensure_not_failed()?;
        let mut effects = vec![SideEffect::Primitive(PrimitiveCommand::Play)];
        effects.extend(self.set_state(PlaybackState::Playing));
        Ok(effects)
    }

    pub fn pause(&mut self) -> Result<Vec<SideEffect>> {
        self.ensure_not_failed()?;
        let mut effects = vec![SideEffect::Primitive(PrimitiveCommand::Pause)];
        effects.extend(self.set_state(PlaybackState::Paused));
        Ok(effects)
    }

    /// `stop()` is accepted in every state, including after failure.
    pub fn stop(&mut self) -> Vec<SideEffect> {
        let mut effects = vec![SideEffect::Primitive(PrimitiveCommand::Detach)];
        effects.extend(self.set_state(PlaybackState::Stopped));
        effects
    }

    /// Latch the failure and enter `Failed`. Later failures are ignored.
    pub fn fail(&mut self, reason: Option<String>) -> Vec<SideEffect> {
        if self.has_failed {
            return Vec::new();
        }
        self.has_failed = true;
        self.failure_reason = reason.clone();

        let mut effects = self.set_state(PlaybackState::Failed);
        effects.push(SideEffect::Publish(PlayerEvent::Failed { reason }));
        effects
    }

    /// Whether a buffer-ready edge may resume playback right now.
    pub fn may_auto_resume(&self) -> bool {
        !self.has_failed
            && !self.derived.is_finished
            && !matches!(
                self.state,
                PlaybackState::Paused | PlaybackState::Stopped | PlaybackState::Failed
            )
    }

    /// Record the item duration. Non-finite or negative values count as
    /// unknown (zero).
    pub fn set_duration(&mut self, seconds: f64) -> Vec<SideEffect> {
        let seconds = if seconds.is_finite() && seconds > 0.0 {
            seconds
        } else {
            0.0
        };
        if seconds == self.telemetry.duration_seconds {
            return Vec::new();
        }
        self.telemetry.duration_seconds = seconds;
        vec![SideEffect::Publish(PlayerEvent::DurationChanged { seconds })]
    }

    /// Validate and begin a seek. Returns the seek generation along with the
    /// effects; on error nothing is modified.
    pub fn begin_seek(&mut self, target: f64) -> Result<(u64, Vec<SideEffect>)> {
        let duration = self.telemetry.duration_seconds;
        let in_range = target.is_finite() && duration > 0.0 && target >= 0.0 && target < duration;
        if !in_range {
            return Err(PlaybackError::InvalidSeekTarget { target, duration });
        }

        self.telemetry.seeking = true;
        self.seek_generation += 1;
        let generation = self.seek_generation;

        Ok((
            generation,
            vec![
                SideEffect::Publish(PlayerEvent::SeekStarted { target }),
                SideEffect::Primitive(PrimitiveCommand::Seek { target, generation }),
            ],
        ))
    }

    /// Seek completion. Only the most recent seek clears `seeking`.
    pub fn finish_seek(&mut self, generation: u64, target: f64, finished: bool) -> Vec<SideEffect> {
        if generation == self.seek_generation && self.telemetry.seeking {
            self.telemetry.seeking = false;
            self.resync_pending = true;
        }
        vec![SideEffect::Publish(PlayerEvent::SeekCompleted { target, finished })]
    }

    /// One sampler tick.
    ///
    /// Order: position, loaded extent, `isWaitingBuffer`, `isFinished`; each
    /// flag edge also re-derives `isLoading`. Once finished, ticks are ignored.
    pub fn apply_sample(&mut self, sample: &TelemetrySample, minimum_remain: f64) -> Vec<SideEffect> {
        if self.derived.is_finished {
            return Vec::new();
        }
        let mut effects = Vec::new();

        if let Some(current) = sample.current_second {
            self.update_position(current, &mut effects);
        }
        if let Some(loaded) = sample.loaded_seconds {
            self.update_loaded(loaded, &mut effects);
        }

        if !self.telemetry.seeking {
            if let Some(remain) = buffer_remain(&self.telemetry) {
                self.telemetry.buffer_remain_seconds = remain;
            }
        }
        let waiting = detect_is_waiting_buffer(&self.telemetry, minimum_remain);
        self.set_waiting(waiting, true, &mut effects);

        let finished = detect_is_finished(&self.telemetry);
        if finished != self.derived.is_finished {
            self.derived.is_finished = finished;
            // No resume here: a finished item must not restart on its own.
            self.set_waiting(false, false, &mut effects);
            if finished {
                effects.push(SideEffect::Publish(PlayerEvent::Finished));
            }
        }

        effects
    }

    fn update_position(&mut self, current: f64, effects: &mut Vec<SideEffect>) {
        let telemetry = &mut self.telemetry;
        let regressed = current < telemetry.current_second;
        if regressed && !telemetry.seeking && !self.resync_pending {
            // Stale sample delivered out of order.
            return;
        }
        if !telemetry.seeking {
            self.resync_pending = false;
        }
        if current != telemetry.current_second {
            telemetry.current_second = current;
            effects.push(SideEffect::Publish(PlayerEvent::PositionChanged { seconds: current }));
        }
    }

    fn update_loaded(&mut self, loaded: f64, effects: &mut Vec<SideEffect>) {
        let telemetry = &mut self.telemetry;
        // Loaded ranges can overshoot the duration slightly.
        let loaded = loaded.min(telemetry.duration_seconds);
        if loaded == telemetry.loaded_seconds {
            return;
        }
        telemetry.loaded_seconds = loaded;

        let duration = telemetry.duration_seconds;
        if loaded >= 0.0 && duration > 0.0 {
            effects.push(SideEffect::Publish(PlayerEvent::LoadedChanged {
                seconds: loaded,
                progress: loaded / duration,
            }));
        }
    }

    fn set_waiting(&mut self, waiting: bool, allow_resume: bool, effects: &mut Vec<SideEffect>) {
        if self.derived.is_waiting_buffer == waiting {
            return;
        }
        self.derived.is_waiting_buffer = waiting;
        effects.push(SideEffect::Publish(PlayerEvent::WaitingBufferChanged { waiting }));

        if waiting {
            effects.push(SideEffect::Primitive(PrimitiveCommand::Pause));
        } else if allow_resume {
            effects.push(SideEffect::ResumeUnlessPaused);
        }
        self.update_loading(effects);
    }

    fn update_loading(&mut self, effects: &mut Vec<SideEffect>) {
        let loading = detect_is_loading(self.state, self.derived.is_waiting_buffer);
        if loading == self.derived.is_loading {
            return;
        }
        self.derived.is_loading = loading;
        effects.push(SideEffect::Publish(if loading {
            PlayerEvent::LoadingStarted
        } else {
            PlayerEvent::LoadingStopped
        }));
    }

    fn ensure_not_failed(&self) -> Result<()> {
        if self.has_failed {
            return Err(PlaybackError::PlayerFailed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry(duration: f64, current: f64, loaded: f64) -> Telemetry {
        Telemetry {
            duration_seconds: duration,
            current_second: current,
            loaded_seconds: loaded,
            ..Default::default()
        }
    }

    fn sample(current: f64, loaded: f64) -> TelemetrySample {
        TelemetrySample {
            current_second: Some(current),
            loaded_seconds: Some(loaded),
        }
    }

    fn events(effects: &[SideEffect]) -> Vec<PlayerEvent> {
        effects.iter().filter_map(|e| e.event().cloned()).collect()
    }

    fn playing_model(duration: f64) -> PlayerModel {
        let mut model = PlayerModel::new();
        model.set_duration(duration);
        model.play().unwrap();
        model
    }

    #[test]
    fn finished_requires_known_duration() {
        assert!(!detect_is_finished(&telemetry(0.0, 0.0, 0.0)));
        assert!(!detect_is_finished(&telemetry(-1.0, -1.0, 0.0)));
        assert!(detect_is_finished(&telemetry(100.0, 99.2, 0.0)));
        assert!(!detect_is_finished(&telemetry(100.0, 99.0, 0.0)));
        assert!(detect_is_finished(&telemetry(100.0, 100.5, 0.0)));
    }

    #[test]
    fn waiting_while_seeking_regardless_of_buffer() {
        let mut t = telemetry(100.0, 10.0, 100.0);
        assert!(!detect_is_waiting_buffer(&t, 1.0));
        t.seeking = true;
        assert!(detect_is_waiting_buffer(&t, 1.0));
    }

    #[test]
    fn waiting_when_nothing_loaded() {
        assert!(detect_is_waiting_buffer(&telemetry(100.0, 0.0, 0.0), 1.0));
        assert!(buffer_remain(&telemetry(100.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn waiting_threshold_is_inclusive() {
        assert!(detect_is_waiting_buffer(&telemetry(100.0, 50.0, 50.5), 1.0));
        assert!(detect_is_waiting_buffer(&telemetry(100.0, 50.0, 51.0), 1.0));
        assert!(!detect_is_waiting_buffer(&telemetry(100.0, 50.0, 51.5), 1.0));
        assert!(!detect_is_waiting_buffer(&telemetry(100.0, 50.0, 51.5), 0.0));
    }

    #[test]
    fn loading_truth_table() {
        use PlaybackState::*;
        for waiting in [false, true] {
            assert!(detect_is_loading(Starting, waiting));
            assert!(!detect_is_loading(Paused, waiting));
            assert!(!detect_is_loading(Stopped, waiting));
            assert!(!detect_is_loading(Failed, waiting));
            assert!(!detect_is_loading(Init, waiting));
        }
        assert!(detect_is_loading(Playing, true));
        assert!(!detect_is_loading(Playing, false));
    }

    #[test]
    fn equal_state_write_is_noop() {
        let mut model = PlayerModel::new();
        let first = model.set_state(PlaybackState::Paused);
        assert_eq!(
            events(&first),
            vec![PlayerEvent::StateChanged {
                state: PlaybackState::Paused
            }]
        );
        assert!(model.set_state(PlaybackState::Paused).is_empty());
    }

    #[test]
    fn start_orders_attach_before_state_and_loading() {
        let mut model = PlayerModel::new();
        let effects = model.start().unwrap();
        assert_eq!(
            effects,
            vec![
                SideEffect::Primitive(PrimitiveCommand::AttachIfDetached),
                SideEffect::Publish(PlayerEvent::StateChanged {
                    state: PlaybackState::Starting
                }),
                SideEffect::Publish(PlayerEvent::LoadingStarted),
            ]
        );
        assert!(model.derived.is_loading);
    }

    #[test]
    fn empty_buffer_at_start_is_waiting() {
        let mut model = PlayerModel::new();
        model.set_duration(100.0);
        model.start().unwrap();

        let effects = model.apply_sample(&sample(0.0, 0.0), 1.0);
        assert!(model.derived.is_waiting_buffer);
        assert!(model.derived.is_loading);
        assert!(effects.contains(&SideEffect::Primitive(PrimitiveCommand::Pause)));
    }

    #[test]
    fn low_buffer_pauses_primitive_and_starts_loading() {
        let mut model = playing_model(100.0);
        model.apply_sample(&sample(40.0, 60.0), 1.0);
        assert!(!model.derived.is_waiting_buffer);
        assert!(!model.derived.is_loading);

        let effects = model.apply_sample(&sample(50.0, 50.5), 1.0);
        assert!((model.telemetry.buffer_remain_seconds - 0.5).abs() < 1e-9);
        assert!(model.derived.is_waiting_buffer);
        assert!(model.derived.is_loading);
        assert_eq!(
            effects,
            vec![
                SideEffect::Publish(PlayerEvent::PositionChanged { seconds: 50.0 }),
                SideEffect::Publish(PlayerEvent::LoadedChanged {
                    seconds: 50.5,
                    progress: 0.505
                }),
                SideEffect::Publish(PlayerEvent::WaitingBufferChanged { waiting: true }),
                SideEffect::Primitive(PrimitiveCommand::Pause),
                SideEffect::Publish(PlayerEvent::LoadingStarted),
            ]
        );
    }

    #[test]
    fn refilled_buffer_requests_resume() {
        let mut model = playing_model(100.0);
        model.apply_sample(&sample(10.0, 10.2), 1.0);
        assert!(model.derived.is_waiting_buffer);

        let effects = model.apply_sample(&sample(10.0, 30.0), 1.0);
        assert!(!model.derived.is_waiting_buffer);
        assert!(!model.derived.is_loading);
        assert!(effects.contains(&SideEffect::ResumeUnlessPaused));
        assert!(effects.contains(&SideEffect::Publish(PlayerEvent::LoadingStopped)));
    }

    #[test]
    fn repeated_sample_is_edge_free() {
        let mut model = playing_model(100.0);
        model.apply_sample(&sample(10.0, 30.0), 1.0);
        assert!(model.apply_sample(&sample(10.0, 30.0), 1.0).is_empty());
    }

    #[test]
    fn finishing_forces_waiting_false_without_resume() {
        let mut model = playing_model(100.0);
        model.apply_sample(&sample(90.0, 99.0), 1.0);

        let effects = model.apply_sample(&sample(99.2, 99.2), 1.0);
        assert!(model.derived.is_finished);
        assert!(!model.derived.is_waiting_buffer);
        assert!(!model.derived.is_loading);
        assert!(!effects.contains(&SideEffect::ResumeUnlessPaused));
        assert_eq!(
            events(&effects).last(),
            Some(&PlayerEvent::Finished),
            "finished is published after the waiting flag settles"
        );
        assert!(!model.may_auto_resume());
    }

    #[test]
    fn samples_ignored_after_finish() {
        let mut model = playing_model(100.0);
        model.apply_sample(&sample(99.5, 100.0), 1.0);
        assert!(model.derived.is_finished);
        assert!(model.apply_sample(&sample(10.0, 20.0), 1.0).is_empty());
        assert_eq!(model.telemetry.current_second, 99.5);
    }

    #[test]
    fn loaded_is_clamped_to_duration() {
        let mut model = playing_model(100.0);
        model.apply_sample(&sample(10.0, 100.4), 1.0);
        assert_eq!(model.telemetry.loaded_seconds, 100.0);
    }

    #[test]
    fn missing_loaded_range_keeps_previous_value() {
        let mut model = playing_model(100.0);
        model.apply_sample(&sample(10.0, 40.0), 1.0);
        model.apply_sample(
            &TelemetrySample {
                current_second: Some(11.0),
                loaded_seconds: None,
            },
            1.0,
        );
        assert_eq!(model.telemetry.loaded_seconds, 40.0);
        assert_eq!(model.telemetry.current_second, 11.0);
    }

    #[test]
    fn loaded_without_duration_is_stored_but_not_published() {
        let mut model = PlayerModel::new();
        model.play().unwrap();
        let effects = model.apply_sample(&sample(0.0, 5.0), 1.0);
        // Clamped to the unknown (zero) duration.
        assert_eq!(model.telemetry.loaded_seconds, 0.0);
        assert!(!events(&effects)
            .iter()
            .any(|e| matches!(e, PlayerEvent::LoadedChanged { .. })));
    }

    #[test]
    fn out_of_range_seek_leaves_model_untouched() {
        let mut model = playing_model(100.0);
        for target in [150.0, 100.0, -1.0, f64::NAN] {
            let err = model.begin_seek(target).unwrap_err();
            assert!(matches!(err, PlaybackError::InvalidSeekTarget { .. }));
        }
        assert!(!model.telemetry.seeking);

        let mut unknown = PlayerModel::new();
        assert!(unknown.begin_seek(0.0).is_err());
    }

    #[test]
    fn seeking_keeps_waiting_even_with_full_buffer() {
        let mut model = playing_model(100.0);
        model.apply_sample(&sample(10.0, 100.0), 1.0);
        assert!(!model.derived.is_waiting_buffer);

        model.begin_seek(60.0).unwrap();
        model.apply_sample(&sample(10.0, 100.0), 1.0);
        assert!(model.derived.is_waiting_buffer);
    }

    #[test]
    fn position_regression_discarded_unless_resyncing() {
        let mut model = playing_model(100.0);
        model.apply_sample(&sample(20.0, 50.0), 1.0);

        model.apply_sample(&sample(19.5, 50.0), 1.0);
        assert_eq!(model.telemetry.current_second, 20.0);

        let (generation, _) = model.begin_seek(5.0).unwrap();
        model.finish_seek(generation, 5.0, true);
        assert!(!model.telemetry.seeking);

        model.apply_sample(&sample(5.0, 50.0), 1.0);
        assert_eq!(model.telemetry.current_second, 5.0);

        model.apply_sample(&sample(4.0, 50.0), 1.0);
        assert_eq!(model.telemetry.current_second, 5.0);
    }

    #[test]
    fn superseded_seek_does_not_clear_seeking() {
        let mut model = playing_model(100.0);
        let (first, _) = model.begin_seek(10.0).unwrap();
        let (second, _) = model.begin_seek(20.0).unwrap();
        assert_ne!(first, second);

        let effects = model.finish_seek(first, 10.0, false);
        assert!(model.telemetry.seeking);
        assert_eq!(
            events(&effects),
            vec![PlayerEvent::SeekCompleted {
                target: 10.0,
                finished: false
            }]
        );

        model.finish_seek(second, 20.0, true);
        assert!(!model.telemetry.seeking);
    }

    #[test]
    fn failure_latches() {
        let mut model = PlayerModel::new();
        model.start().unwrap();

        let effects = model.fail(Some("decode error".into()));
        assert_eq!(model.state, PlaybackState::Failed);
        assert!(!model.derived.is_loading);
        assert!(events(&effects).contains(&PlayerEvent::Failed {
            reason: Some("decode error".into())
        }));
        assert!(model.fail(None).is_empty());

        assert!(matches!(model.play(), Err(PlaybackError::PlayerFailed)));
        assert!(matches!(model.start(), Err(PlaybackError::PlayerFailed)));
        model.stop();
        assert_eq!(model.state, PlaybackState::Stopped);
        assert!(matches!(model.pause(), Err(PlaybackError::PlayerFailed)));
    }

    #[test]
    fn user_pause_blocks_auto_resume() {
        let mut model = playing_model(100.0);
        assert!(model.may_auto_resume());
        model.pause().unwrap();
        assert!(!model.may_auto_resume());
        model.stop();
        assert!(!model.may_auto_resume());
    }

    #[test]
    fn duration_sanitised() {
        let mut model = PlayerModel::new();
        assert!(model.set_duration(f64::NAN).is_empty());
        assert_eq!(model.telemetry.duration_seconds, 0.0);
        assert_eq!(
            events(&model.set_duration(42.0)),
            vec![PlayerEvent::DurationChanged { seconds: 42.0 }]
        );
        assert!(model.set_duration(42.0).is_empty());
    }
}
