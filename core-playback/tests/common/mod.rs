//! Scripted fakes shared by the integration tests.
//!
//! - `FakeItem`: status and duration set by the test; observers invoked
//!   synchronously on `set_status`
//! - `FakePrimitive`: records every call; position and loaded range set by
//!   the test; seek completions held until the test releases them
//! - `ManualDispatcher`: FIFO queue drained by `run_pending()` on the test
//!   thread
//! - `RecordingDelegate`: records every delegate callback in order

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bridge_desktop::TracingActivityIndicator;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{
    ItemStatus, MediaItem, MediaPrimitive, MediaTime, ObserverId, PlaybackState,
    SeekCompletion, StatusObserver, TimeRange, UiDispatcher, UiJob,
};
use core_playback::{Player, PlayerBuilder, PlayerConfig, PlayerDelegate};
use parking_lot::Mutex;

// ============================================================================
// Media item
// ============================================================================

type SharedObserver = Arc<dyn Fn(ItemStatus) + Send + Sync>;

pub struct FakeItem {
    status: Mutex<ItemStatus>,
    duration: Mutex<MediaTime>,
    error: Mutex<Option<String>>,
    observers: Mutex<Vec<(ObserverId, SharedObserver)>>,
}

impl FakeItem {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(ItemStatus::Unknown),
            duration: Mutex::new(MediaTime::INVALID),
            error: Mutex::new(None),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn set_duration(&self, seconds: f64) {
        *self.duration.lock() = MediaTime::from_secs_f64(seconds);
    }

    pub fn set_error(&self, reason: &str) {
        *self.error.lock() = Some(reason.to_string());
    }

    /// Change the status and notify every observer on the calling thread.
    pub fn set_status(&self, status: ItemStatus) {
        *self.status.lock() = status;
        let observers: Vec<SharedObserver> = self
            .observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(status);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }
}

impl MediaItem for FakeItem {
    fn duration(&self) -> MediaTime {
        *self.duration.lock()
    }

    fn status(&self) -> ItemStatus {
        *self.status.lock()
    }

    fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    fn locator(&self) -> Option<String> {
        Some("https://cdn.example.com/movie.m3u8?token=secret".to_string())
    }

    fn add_status_observer(&self, observer: StatusObserver) -> ObserverId {
        let id = ObserverId::new();
        let observer: SharedObserver = Arc::from(observer);
        self.observers.lock().push((id, Arc::clone(&observer)));

        let current = *self.status.lock();
        if current != ItemStatus::Unknown {
            observer(current);
        }
        id
    }

    fn remove_status_observer(&self, id: ObserverId) {
        self.observers.lock().retain(|(existing, _)| *existing != id);
    }
}

// ============================================================================
// Media primitive
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Attach,
    Detach,
    Play,
    Pause,
    Seek(f64),
}

pub struct FakePrimitive {
    calls: Mutex<Vec<Call>>,
    attached: AtomicBool,
    current: Mutex<MediaTime>,
    ranges: Mutex<Vec<TimeRange>>,
    pending_seeks: Mutex<VecDeque<SeekCompletion>>,
}

impl FakePrimitive {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            attached: AtomicBool::new(false),
            current: Mutex::new(MediaTime::ZERO),
            ranges: Mutex::new(Vec::new()),
            pending_seeks: Mutex::new(VecDeque::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().last().cloned()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn set_position(&self, seconds: f64) {
        *self.current.lock() = MediaTime::from_secs_f64(seconds);
    }

    /// One loaded range from zero to `seconds`.
    pub fn set_loaded(&self, seconds: f64) {
        *self.ranges.lock() = vec![TimeRange::from_secs(0.0, seconds)];
    }

    /// Position and loaded extent in one go.
    pub fn set_telemetry(&self, position: f64, loaded: f64) {
        self.set_position(position);
        self.set_loaded(loaded);
    }

    pub fn pending_seek_count(&self) -> usize {
        self.pending_seeks.lock().len()
    }

    /// Complete the oldest outstanding seek. Returns `false` if none.
    pub fn complete_next_seek(&self, finished: bool) -> bool {
        let completion = self.pending_seeks.lock().pop_front();
        match completion {
            Some(completion) => {
                completion(finished);
                true
            }
            None => false,
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl MediaPrimitive for FakePrimitive {
    fn attach(&self, _item: Arc<dyn MediaItem>) {
        self.attached.store(true, Ordering::SeqCst);
        self.record(Call::Attach);
    }

    fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
        self.record(Call::Detach);
    }

    fn has_item(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    fn play(&self) {
        self.record(Call::Play);
    }

    fn pause(&self) {
        self.record(Call::Pause);
    }

    fn seek(&self, to: MediaTime, completion: SeekCompletion) {
        self.record(Call::Seek(to.as_secs_f64()));
        self.pending_seeks.lock().push_back(completion);
    }

    fn current_time(&self) -> MediaTime {
        *self.current.lock()
    }

    fn loaded_time_ranges(&self) -> Vec<TimeRange> {
        self.ranges.lock().clone()
    }
}

// ============================================================================
// UI dispatcher
// ============================================================================

#[derive(Default)]
pub struct ManualDispatcher {
    queue: Mutex<VecDeque<UiJob>>,
    closed: AtomicBool,
}

impl ManualDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run queued jobs, including jobs they enqueue, until the queue is
    /// empty. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let job = self.queue.lock().pop_front();
            match job {
                Some(job) => {
                    job();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl UiDispatcher for ManualDispatcher {
    fn dispatch(&self, job: UiJob) -> BridgeResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BridgeError::DispatcherClosed);
        }
        self.queue.lock().push_back(job);
        Ok(())
    }
}

// ============================================================================
// Delegate
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Note {
    State(PlaybackState),
    StartLoading,
    StopLoading,
    Finished,
    Duration(f64),
    Loaded(f64),
    Current(f64),
    Failed(Option<String>),
}

#[derive(Default)]
pub struct RecordingDelegate {
    notes: Mutex<Vec<Note>>,
}

impl RecordingDelegate {
    pub fn notes(&self) -> Vec<Note> {
        self.notes.lock().clone()
    }

    pub fn states(&self) -> Vec<PlaybackState> {
        self.notes
            .lock()
            .iter()
            .filter_map(|note| match note {
                Note::State(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, note: &Note) -> usize {
        self.notes.lock().iter().filter(|n| *n == note).count()
    }

    pub fn clear(&self) {
        self.notes.lock().clear();
    }

    fn push(&self, note: Note) {
        self.notes.lock().push(note);
    }
}

impl PlayerDelegate for RecordingDelegate {
    fn player_state_did_change(&self, state: PlaybackState) {
        self.push(Note::State(state));
    }

    fn start_loading(&self) {
        self.push(Note::StartLoading);
    }

    fn stop_loading(&self) {
        self.push(Note::StopLoading);
    }

    fn did_finish(&self) {
        self.push(Note::Finished);
    }

    fn duration_seconds(&self, seconds: f64) {
        self.push(Note::Duration(seconds));
    }

    fn loaded_seconds_did_change(&self, seconds: f64) {
        self.push(Note::Loaded(seconds));
    }

    fn current_second_did_change(&self, seconds: f64) {
        self.push(Note::Current(seconds));
    }

    fn player_did_fail(&self, reason: Option<String>) {
        self.push(Note::Failed(reason));
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A player wired to fakes. Must be created inside a Tokio runtime.
pub struct Harness {
    pub item: Arc<FakeItem>,
    pub primitive: Arc<FakePrimitive>,
    pub dispatcher: Arc<ManualDispatcher>,
    pub delegate: Arc<RecordingDelegate>,
    pub indicator: Arc<TracingActivityIndicator>,
    pub player: Player,
}

impl Harness {
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_builder(config, |builder| builder)
    }

    pub fn autoplay() -> Self {
        Self::new(PlayerConfig::autoplay())
    }

    pub fn with_builder<F>(config: PlayerConfig, customize: F) -> Self
    where
        F: FnOnce(PlayerBuilder) -> PlayerBuilder,
    {
        let item = Arc::new(FakeItem::new());
        let primitive = Arc::new(FakePrimitive::new());
        let dispatcher = Arc::new(ManualDispatcher::new());
        let delegate = Arc::new(RecordingDelegate::default());
        let indicator = Arc::new(TracingActivityIndicator::new("test-spinner"));

        let builder = PlayerBuilder::new()
            .config(config)
            .item(item.clone())
            .primitive(primitive.clone())
            .dispatcher(dispatcher.clone())
            .delegate(&delegate)
            .indicator(indicator.clone());
        let player = customize(builder).build().expect("player builds");

        Self {
            item,
            primitive,
            dispatcher,
            delegate,
            indicator,
            player,
        }
    }

    /// Item becomes ready with `duration` seconds; UI jobs are drained.
    pub fn ready(&self, duration: f64) {
        self.item.set_duration(duration);
        self.item.set_status(ItemStatus::ReadyToPlay);
        self.run();
    }

    pub fn run(&self) -> usize {
        self.dispatcher.run_pending()
    }

    /// Set the primitive's telemetry, take one sample and drain the UI queue.
    pub fn sample(&self, position: f64, loaded: f64) {
        self.primitive.set_telemetry(position, loaded);
        self.player.sample_now().expect("sample");
        self.run();
    }
}
