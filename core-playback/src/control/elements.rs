//! Default control elements.
//!
//! Headless widgets that only record the values written to them. Hosts with
//! a real view layer substitute their own [`ButtonElement`]/[`LabelElement`]
//! implementations through the `with_*` setters on [`ControlElements`]; each
//! surface owns its own set, nothing is shared between surfaces.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use bridge_traits::{ButtonElement, LabelElement, ProgressElement, SliderElement};
use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct HeadlessButton {
    selected: AtomicBool,
}

impl HeadlessButton {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ButtonElement for HeadlessButton {
    fn set_selected(&self, selected: bool) {
        self.selected.store(selected, Ordering::SeqCst);
    }

    fn is_selected(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct HeadlessLabel {
    text: Mutex<String>,
}

impl HeadlessLabel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LabelElement for HeadlessLabel {
    fn set_text(&self, text: &str) {
        *self.text.lock() = text.to_string();
    }

    fn text(&self) -> String {
        self.text.lock().clone()
    }
}

/// `f32` stored as its bit pattern.
#[derive(Debug, Default)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::SeqCst);
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Default)]
pub struct HeadlessProgress {
    progress: AtomicF32,
    animated: AtomicBool,
}

impl HeadlessProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last write asked for animation.
    pub fn was_animated(&self) -> bool {
        self.animated.load(Ordering::SeqCst)
    }
}

impl ProgressElement for HeadlessProgress {
    fn set_progress(&self, progress: f32, animated: bool) {
        self.progress.store(progress.clamp(0.0, 1.0));
        self.animated.store(animated, Ordering::SeqCst);
    }

    fn progress(&self) -> f32 {
        self.progress.load()
    }
}

#[derive(Debug, Default)]
pub struct HeadlessSlider {
    value: AtomicF32,
    touching: AtomicBool,
}

impl HeadlessSlider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the user's finger going down on, or lifting off, the thumb.
    pub fn set_touching(&self, touching: bool) {
        self.touching.store(touching, Ordering::SeqCst);
    }
}

impl SliderElement for HeadlessSlider {
    fn set_value(&self, value: f32) {
        self.value.store(value.clamp(0.0, 1.0));
    }

    fn value(&self) -> f32 {
        self.value.load()
    }

    fn is_touching(&self) -> bool {
        self.touching.load(Ordering::SeqCst)
    }
}

/// The named sub-elements of a control surface.
#[derive(Clone)]
pub struct ControlElements {
    pub play_button: Arc<dyn ButtonElement>,
    pub back_button: Arc<dyn ButtonElement>,
    pub title_label: Arc<dyn LabelElement>,
    pub current_second_label: Arc<dyn LabelElement>,
    pub duration_seconds_label: Arc<dyn LabelElement>,
    pub loaded_progress: Arc<dyn ProgressElement>,
    pub playing_slider: Arc<dyn SliderElement>,
}

impl ControlElements {
    /// A fresh set of headless elements.
    pub fn headless() -> Self {
        Self {
            play_button: Arc::new(HeadlessButton::new()),
            back_button: Arc::new(HeadlessButton::new()),
            title_label: Arc::new(HeadlessLabel::new()),
            current_second_label: Arc::new(HeadlessLabel::new()),
            duration_seconds_label: Arc::new(HeadlessLabel::new()),
            loaded_progress: Arc::new(HeadlessProgress::new()),
            playing_slider: Arc::new(HeadlessSlider::new()),
        }
    }

    pub fn with_play_button(mut self, button: Arc<dyn ButtonElement>) -> Self {
        self.play_button = button;
        self
    }

    pub fn with_back_button(mut self, button: Arc<dyn ButtonElement>) -> Self {
        self.back_button = button;
        self
    }

    pub fn with_title_label(mut self, label: Arc<dyn LabelElement>) -> Self {
        self.title_label = label;
        self
    }

    pub fn with_current_second_label(mut self, label: Arc<dyn LabelElement>) -> Self {
        self.current_second_label = label;
        self
    }

    pub fn with_duration_seconds_label(mut self, label: Arc<dyn LabelElement>) -> Self {
        self.duration_seconds_label = label;
        self
    }

    pub fn with_loaded_progress(mut self, progress: Arc<dyn ProgressElement>) -> Self {
        self.loaded_progress = progress;
        self
    }

    pub fn with_playing_slider(mut self, slider: Arc<dyn SliderElement>) -> Self {
        self.playing_slider = slider;
        self
    }
}

impl Default for ControlElements {
    fn default() -> Self {
        Self::headless()
    }
}
