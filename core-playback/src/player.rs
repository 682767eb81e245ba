//! # Player
//!
//! The playback state machine for one media item.
//!
//! ## Threads
//!
//! Commands ([`Player::play`], [`Player::seek`], ...), status callbacks from
//! the media item and sampler ticks may arrive on any thread. Each of them
//! locks the [`PlayerModel`], runs the reducer and enqueues the resulting
//! [`SideEffect`]s on the UI dispatcher *before* releasing the lock, so
//! batches reach the UI thread in the order the model changed. The UI jobs
//! perform every primitive call and every notification.
//!
//! ## Lifetime
//!
//! Only [`Player`] owns the shared state. Queued jobs, the sampler task, the
//! status observer and seek completions hold weak references and do nothing
//! once the player is gone. Dropping a [`Player`] cancels the sampler and
//! unregisters the status observer before anything else is released.
//!
//! ## Example
//!
//! ```rust,ignore
//! let player = PlayerBuilder::new()
//!     .config(PlayerConfig::autoplay())
//!     .item(item)
//!     .primitive(primitive)
//!     .dispatcher(dispatcher)
//!     .delegate(&delegate)
//!     .build()?;
//!
//! player.seek(42.0)?;
//! ```

use std::sync::{Arc, Weak};

use bridge_traits::{
    ItemStatus, MediaItem, MediaPrimitive, MediaTime, ObserverId, OverlayHost, OverlayId,
    OverlayLayer, PlaybackState, PlayerId, UiDispatcher,
};
use core_async::runtime::Handle;
use core_runtime::events::EventStream;
use parking_lot::Mutex;
use tracing::{warn, Span};

use crate::config::PlayerConfig;
use crate::control::{ControlSurface, MaskSurface};
use crate::effects::{PrimitiveCommand, SideEffect};
use crate::engine::PlayerModel;
use crate::error::{PlaybackError, Result};
use crate::notifier::EventNotifier;
use crate::sampler::{spawn_sampler, SampleTarget, SamplerHandle, TelemetrySample, TickFlow};
use crate::state::{DerivedFlags, Telemetry};

/// Diagnostic tracing inside the player's span, gated on `should_log`.
macro_rules! diag {
    ($inner:expr, $level:ident, $($arg:tt)+) => {
        if $inner.config.should_log {
            tracing::$level!(parent: &$inner.span, $($arg)+);
        }
    };
}

/// Everything the builder hands over.
pub(crate) struct PlayerParts {
    pub id: PlayerId,
    pub config: PlayerConfig,
    pub item: Arc<dyn MediaItem>,
    pub primitive: Arc<dyn MediaPrimitive>,
    pub dispatcher: Arc<dyn UiDispatcher>,
    pub runtime: Handle,
    pub notifier: EventNotifier,
    pub overlay_host: Option<Arc<dyn OverlayHost>>,
}

#[derive(Debug, Default)]
struct OverlaySlots {
    control: Option<OverlayId>,
    mask: Option<OverlayId>,
}

pub(crate) struct PlayerInner {
    id: PlayerId,
    config: PlayerConfig,
    item: Arc<dyn MediaItem>,
    primitive: Arc<dyn MediaPrimitive>,
    dispatcher: Arc<dyn UiDispatcher>,
    runtime: Handle,
    notifier: EventNotifier,
    overlay_host: Option<Arc<dyn OverlayHost>>,
    // Lock order: model, then sampler.
    model: Mutex<PlayerModel>,
    sampler: Mutex<Option<SamplerHandle>>,
    observer: Mutex<Option<ObserverId>>,
    overlays: Mutex<OverlaySlots>,
    span: Span,
    weak_self: Weak<PlayerInner>,
}

/// A video player bound to one media item.
pub struct Player {
    inner: Arc<PlayerInner>,
}

impl Player {
    /// Wire the parts together and register the status observer.
    ///
    /// The caller applies the construction policy (`start` or `stop`).
    pub(crate) fn assemble(parts: PlayerParts) -> Self {
        let span = tracing::info_span!("player", player_id = %parts.id);
        if let Some(locator) = parts.item.locator() {
            if parts.config.should_log {
                tracing::debug!(
                    parent: &span,
                    locator = %core_runtime::logging::redact_locator(&locator),
                    "player created"
                );
            }
        }

        let inner = Arc::new_cyclic(|weak_self| PlayerInner {
            id: parts.id,
            config: parts.config,
            item: parts.item,
            primitive: parts.primitive,
            dispatcher: parts.dispatcher,
            runtime: parts.runtime,
            notifier: parts.notifier,
            overlay_host: parts.overlay_host,
            model: Mutex::new(PlayerModel::new()),
            sampler: Mutex::new(None),
            observer: Mutex::new(None),
            overlays: Mutex::new(OverlaySlots::default()),
            span,
            weak_self: weak_self.clone(),
        });

        let weak = Arc::downgrade(&inner);
        let observer = inner.item.add_status_observer(Box::new(move |status| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_status(status);
            }
        }));
        *inner.observer.lock() = Some(observer);

        Self { inner }
    }

    pub fn id(&self) -> PlayerId {
        self.inner.id
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.inner.config
    }

    /// Non-owning handle for control surfaces and other callbacks.
    pub fn handle(&self) -> PlayerHandle {
        PlayerHandle {
            id: self.inner.id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Attach the item to the primitive if needed and enter `Starting`.
    pub fn start(&self) -> Result<()> {
        self.inner.start()
    }

    pub fn play(&self) -> Result<()> {
        self.inner.play()
    }

    pub fn pause(&self) -> Result<()> {
        self.inner.pause()
    }

    /// Detach the item, enter `Stopped` and stop sampling. Always accepted.
    pub fn stop(&self) -> Result<()> {
        self.inner.stop()
    }

    /// Seek to `seconds`, which must lie in `[0, duration)`.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::InvalidSeekTarget`] when out of range; nothing is
    /// changed and the primitive is not called.
    pub fn seek(&self, seconds: f64) -> Result<()> {
        self.inner.seek(seconds)
    }

    /// Take one telemetry sample now, for hosts that drive sampling from
    /// their own display clock.
    pub fn sample_now(&self) -> Result<()> {
        self.inner.sample().map(|_| ())
    }

    pub fn state(&self) -> PlaybackState {
        self.inner.model.lock().state
    }

    pub fn telemetry(&self) -> Telemetry {
        self.inner.model.lock().telemetry
    }

    pub fn derived(&self) -> DerivedFlags {
        self.inner.model.lock().derived
    }

    pub fn is_seeking(&self) -> bool {
        self.inner.model.lock().telemetry.seeking
    }

    pub fn failure_reason(&self) -> Option<String> {
        self.inner.model.lock().failure_reason.clone()
    }

    /// The failure the media item reported, once the player has failed.
    pub fn failure(&self) -> Option<PlaybackError> {
        let model = self.inner.model.lock();
        model.has_failed.then(|| PlaybackError::PrimitiveFailure {
            reason: model.failure_reason.clone(),
        })
    }

    pub fn is_sampling(&self) -> bool {
        self.inner.is_sampler_running()
    }

    /// Events of this player on the configured event bus.
    pub fn subscribe(&self) -> Option<EventStream> {
        self.inner
            .notifier
            .event_bus()
            .map(|bus| EventStream::new(bus.subscribe()).for_player(self.inner.id))
    }

    /// Show `surface` in front of the video, replacing any previous control
    /// surface. The player holds it weakly.
    pub fn attach_control_surface<S>(&self, surface: &Arc<S>) -> Result<()>
    where
        S: ControlSurface + 'static,
    {
        let container = surface.container();
        let weak: Weak<dyn ControlSurface> = Arc::downgrade(surface) as Weak<dyn ControlSurface>;
        self.inner.on_ui(move |inner| {
            inner.notifier.set_control(Some(weak));
            inner.swap_overlay(container, OverlayLayer::Front);
            let (state, telemetry) = {
                let model = inner.model.lock();
                (model.state, model.telemetry)
            };
            inner.notifier.sync_control(state, &telemetry);
        })
    }

    pub fn detach_control_surface(&self) -> Result<()> {
        self.inner.on_ui(|inner| {
            inner.notifier.set_control(None);
            let previous = inner.overlays.lock().control.take();
            inner.remove_overlay(previous);
        })
    }

    /// Show `surface` behind the controls, replacing any previous mask.
    pub fn attach_mask_surface(&self, surface: &dyn MaskSurface) -> Result<()> {
        let container = surface.container();
        self.inner
            .on_ui(move |inner| inner.swap_overlay(container, OverlayLayer::Back))
    }

    pub fn detach_mask_surface(&self) -> Result<()> {
        self.inner.on_ui(|inner| {
            let previous = inner.overlays.lock().mask.take();
            inner.remove_overlay(previous);
        })
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        if let Some(sampler) = self.inner.sampler.lock().take() {
            sampler.abort();
        }
        if let Some(observer) = self.inner.observer.lock().take() {
            self.inner.item.remove_status_observer(observer);
        }
        diag!(self.inner, debug, "player released");
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.inner.id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl PlayerInner {
    // ========================================================================
    // Commands
    // ========================================================================

    fn start(&self) -> Result<()> {
        let mut model = self.model.lock();
        let effects = model.start()?;
        self.enqueue(effects)?;
        // A re-attached item keeps its status, so no new ReadyToPlay arrives.
        if self.item.status() == ItemStatus::ReadyToPlay && !model.derived.is_finished {
            diag!(self, debug, "item already ready, resuming");
            self.begin_playback(&mut model)?;
        }
        Ok(())
    }

    fn play(&self) -> Result<()> {
        self.apply(PlayerModel::play)
    }

    fn pause(&self) -> Result<()> {
        self.apply(PlayerModel::pause)
    }

    fn stop(&self) -> Result<()> {
        let mut model = self.model.lock();
        let effects = model.stop();
        self.enqueue(effects)?;
        if let Some(sampler) = self.sampler.lock().take() {
            sampler.stop();
            diag!(self, debug, "sampler stopped");
        }
        Ok(())
    }

    fn seek(&self, seconds: f64) -> Result<()> {
        let mut model = self.model.lock();
        let (generation, effects) = model.begin_seek(seconds).map_err(|err| {
            diag!(self, debug, target = seconds, error = %err, "seek rejected");
            err
        })?;
        diag!(self, debug, target = seconds, generation, "seeking begin");
        self.enqueue(effects)
    }

    fn apply<F>(&self, command: F) -> Result<()>
    where
        F: FnOnce(&mut PlayerModel) -> Result<Vec<SideEffect>>,
    {
        let mut model = self.model.lock();
        let effects = command(&mut model)?;
        self.enqueue(effects)
    }

    // ========================================================================
    // Media item status
    // ========================================================================

    fn handle_status(&self, status: ItemStatus) {
        let result = match status {
            ItemStatus::Unknown => {
                diag!(self, trace, "item status unknown");
                Ok(())
            }
            ItemStatus::Failed => self.handle_failed(),
            ItemStatus::ReadyToPlay => self.handle_ready(),
        };
        if let Err(err) = result {
            warn!(parent: &self.span, error = %err, ?status, "status change not applied");
        }
    }

    fn handle_failed(&self) -> Result<()> {
        let mut model = self.model.lock();
        let reason = self.item.error();
        let effects = model.fail(reason.clone());
        if effects.is_empty() {
            return Ok(());
        }
        warn!(parent: &self.span, reason = reason.as_deref().unwrap_or("unknown"), "media item failed");
        self.enqueue(effects)?;
        if let Some(sampler) = self.sampler.lock().take() {
            sampler.stop();
        }
        Ok(())
    }

    fn handle_ready(&self) -> Result<()> {
        let mut model = self.model.lock();
        if model.has_failed {
            diag!(self, debug, "ready to play after failure ignored");
            return Ok(());
        }
        if model.derived.is_finished {
            diag!(self, debug, "ready to play after finish ignored");
            return Ok(());
        }
        if self.is_sampler_running() {
            return Ok(());
        }
        self.begin_playback(&mut model)
    }

    /// Resolve the duration, make sure the sampler runs, then play.
    /// Called with the model lock held.
    fn begin_playback(&self, model: &mut PlayerModel) -> Result<()> {
        let duration = self.item.duration().as_secs_f64();
        diag!(self, debug, duration, "item ready to play");
        let effects = model.set_duration(duration);
        self.enqueue(effects)?;

        let mut sampler = self.sampler.lock();
        if !sampler.as_ref().is_some_and(|running| !running.is_stopped()) {
            *sampler = Some(spawn_sampler(
                &self.runtime,
                self.config.sample_interval,
                self.weak_self.clone(),
            ));
        }
        drop(sampler);

        let effects = model.play()?;
        self.enqueue(effects)
    }

    fn is_sampler_running(&self) -> bool {
        self.sampler
            .lock()
            .as_ref()
            .is_some_and(|running| !running.is_stopped())
    }

    // ========================================================================
    // Telemetry
    // ========================================================================

    /// One sample. Returns whether playback has finished.
    fn sample(&self) -> Result<bool> {
        if self.model.lock().derived.is_finished {
            return Ok(true);
        }
        let sample = TelemetrySample::capture(self.primitive.as_ref());

        let mut model = self.model.lock();
        let remain_before = model.telemetry.buffer_remain_seconds;
        let effects = model.apply_sample(&sample, self.config.minimum_buffer_remain_to_play);
        if model.telemetry.buffer_remain_seconds != remain_before {
            diag!(
                self,
                trace,
                seconds = model.telemetry.buffer_remain_seconds,
                "buffer remain changed"
            );
        }
        self.enqueue(effects)?;
        Ok(model.derived.is_finished)
    }

    // ========================================================================
    // UI dispatch
    // ========================================================================

    /// Queue `effects` as one UI job. Called with the model lock held.
    fn enqueue(&self, effects: Vec<SideEffect>) -> Result<()> {
        if effects.is_empty() {
            return Ok(());
        }
        for event in effects.iter().filter_map(SideEffect::event) {
            if event.is_telemetry() {
                diag!(self, trace, ?event, "{}", event.description());
            } else {
                diag!(self, debug, ?event, "{}", event.description());
            }
        }
        self.on_ui(move |inner| inner.execute(effects))
    }

    fn on_ui<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce(&PlayerInner) + Send + 'static,
    {
        let weak = self.weak_self.clone();
        self.dispatcher.dispatch(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                job(inner.as_ref());
            }
        }))?;
        Ok(())
    }

    fn execute(&self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::Primitive(command) => self.run_command(command),
                SideEffect::ResumeUnlessPaused => self.resume_unless_paused(),
                SideEffect::Publish(event) => {
                    let seeking = self.model.lock().telemetry.seeking;
                    self.notifier.publish(&event, seeking);
                }
            }
        }
    }

    fn run_command(&self, command: PrimitiveCommand) {
        match command {
            PrimitiveCommand::AttachIfDetached => {
                if !self.primitive.has_item() {
                    self.primitive.attach(Arc::clone(&self.item));
                }
            }
            PrimitiveCommand::Detach => self.primitive.detach(),
            PrimitiveCommand::Play => self.primitive.play(),
            PrimitiveCommand::Pause => self.primitive.pause(),
            PrimitiveCommand::Seek { target, generation } => {
                let weak = self.weak_self.clone();
                self.primitive.seek(
                    MediaTime::from_secs_f64(target),
                    Box::new(move |finished| {
                        if let Some(inner) = weak.upgrade() {
                            inner.complete_seek(generation, target, finished);
                        }
                    }),
                );
            }
        }
    }

    fn complete_seek(&self, generation: u64, target: f64, finished: bool) {
        let mut model = self.model.lock();
        let effects = model.finish_seek(generation, target, finished);
        diag!(self, debug, target, generation, finished, "seeking end");
        if let Err(err) = self.enqueue(effects) {
            warn!(parent: &self.span, error = %err, "seek completion not delivered");
        }
    }

    /// Buffer refilled: resume unless the user paused, the item finished or
    /// the player stopped in the meantime.
    fn resume_unless_paused(&self) {
        let mut model = self.model.lock();
        if !model.may_auto_resume() {
            diag!(self, trace, state = %model.state, "auto-resume skipped");
            return;
        }
        let result = model.play().and_then(|effects| self.enqueue(effects));
        if let Err(err) = result {
            warn!(parent: &self.span, error = %err, "auto-resume failed");
        }
    }

    // ========================================================================
    // Overlays
    // ========================================================================

    fn swap_overlay(&self, container: OverlayId, layer: OverlayLayer) {
        let previous = {
            let mut slots = self.overlays.lock();
            let slot = match layer {
                OverlayLayer::Front => &mut slots.control,
                OverlayLayer::Back => &mut slots.mask,
            };
            slot.replace(container)
        };
        self.remove_overlay(previous);
        if let Some(host) = &self.overlay_host {
            host.add_overlay(container, layer);
        }
    }

    fn remove_overlay(&self, container: Option<OverlayId>) {
        if let (Some(host), Some(container)) = (&self.overlay_host, container) {
            host.remove_overlay(container);
        }
    }
}

impl SampleTarget for PlayerInner {
    fn tick(&self) -> TickFlow {
        match self.sample() {
            Ok(false) => TickFlow::Continue,
            Ok(true) => {
                diag!(self, debug, "sampler finished");
                TickFlow::Stop
            }
            Err(err) => {
                warn!(parent: &self.span, error = %err, "sampling stopped");
                TickFlow::Stop
            }
        }
    }
}

/// Weak reference to a [`Player`].
///
/// Every call fails with [`PlaybackError::PlayerReleased`] once the player
/// has been dropped.
#[derive(Clone)]
pub struct PlayerHandle {
    id: PlayerId,
    inner: Weak<PlayerInner>,
}

impl PlayerHandle {
    fn upgrade(&self) -> Result<Arc<PlayerInner>> {
        self.inner.upgrade().ok_or(PlaybackError::PlayerReleased)
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn state(&self) -> Option<PlaybackState> {
        self.inner.upgrade().map(|inner| inner.model.lock().state)
    }

    pub fn start(&self) -> Result<()> {
        self.upgrade()?.start()
    }

    pub fn play(&self) -> Result<()> {
        self.upgrade()?.play()
    }

    pub fn pause(&self) -> Result<()> {
        self.upgrade()?.pause()
    }

    pub fn stop(&self) -> Result<()> {
        self.upgrade()?.stop()
    }

    pub fn seek(&self, seconds: f64) -> Result<()> {
        self.upgrade()?.seek(seconds)
    }

    /// Pause when the play button shows "pause", play otherwise.
    pub fn toggle_play_pause(&self) -> Result<()> {
        let inner = self.upgrade()?;
        let showing_pause = inner.model.lock().state.shows_pause_control();
        if showing_pause {
            inner.pause()
        } else {
            inner.play()
        }
    }
}

impl std::fmt::Debug for PlayerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerHandle")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}
