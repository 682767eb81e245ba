//! # Control Surfaces
//!
//! Optional overlays a player drives while it plays.
//!
//! A [`ControlSurface`] is a container plus a set of named elements (play and
//! back buttons, title and time labels, buffered progress, scrub slider) and
//! two input callbacks. Only the container and the element set are required;
//! every accessor and callback has a default. The player writes to the
//! elements from the UI dispatcher and reads the slider's touch state to stay
//! out of the user's way while they scrub.
//!
//! A [`MaskSurface`] is a bare container (dimming layer, gesture catcher)
//! placed behind the controls.

mod elements;
mod format;
mod layout;

pub use elements::{
    ControlElements, HeadlessButton, HeadlessLabel, HeadlessProgress, HeadlessSlider,
};
pub use format::format_clock;
pub use layout::{
    Anchor, Attribute, Color, Constraint, ControlLayout, ElementKind, ElementSpec, ElementStyle,
};

use bridge_traits::{
    ButtonElement, LabelElement, OverlayId, ProgressElement, SliderElement,
};
use tracing::warn;

use crate::player::PlayerHandle;

/// Transport controls overlay.
pub trait ControlSurface: Send + Sync {
    /// Overlay the elements live in.
    fn container(&self) -> OverlayId;

    fn elements(&self) -> &ControlElements;

    fn play_button(&self) -> &dyn ButtonElement {
        self.elements().play_button.as_ref()
    }

    fn back_button(&self) -> &dyn ButtonElement {
        self.elements().back_button.as_ref()
    }

    fn title_label(&self) -> &dyn LabelElement {
        self.elements().title_label.as_ref()
    }

    fn current_second_label(&self) -> &dyn LabelElement {
        self.elements().current_second_label.as_ref()
    }

    fn duration_seconds_label(&self) -> &dyn LabelElement {
        self.elements().duration_seconds_label.as_ref()
    }

    fn loaded_progress(&self) -> &dyn ProgressElement {
        self.elements().loaded_progress.as_ref()
    }

    fn playing_slider(&self) -> &dyn SliderElement {
        self.elements().playing_slider.as_ref()
    }

    fn is_slider_touching(&self) -> bool {
        self.playing_slider().is_touching()
    }

    fn did_tap_play_button(&self) {}

    fn did_tap_back_button(&self) {}

    fn title_for_video(&self) -> String {
        String::new()
    }

    fn layout(&self) -> ControlLayout {
        ControlLayout::standard()
    }

    /// Reset every element to its idle value and return the layout the host
    /// should apply to the container.
    fn setup_control_panel(&self) -> ControlLayout {
        self.play_button().set_selected(false);
        self.title_label().set_text(&self.title_for_video());
        self.current_second_label().set_text("00:00");
        self.duration_seconds_label().set_text("00:00");
        self.loaded_progress().set_progress(0.0, false);
        self.playing_slider().set_value(0.0);
        self.layout()
    }
}

/// Overlay placed behind the controls.
pub trait MaskSurface: Send + Sync {
    fn container(&self) -> OverlayId;
}

/// Mask with nothing but a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainMask {
    container: OverlayId,
}

impl PlainMask {
    pub fn new() -> Self {
        Self {
            container: OverlayId::new(),
        }
    }
}

impl Default for PlainMask {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskSurface for PlainMask {
    fn container(&self) -> OverlayId {
        self.container
    }
}

type BackAction = Box<dyn Fn() + Send + Sync>;

/// Control surface wired to a player through a [`PlayerHandle`].
///
/// Tapping play toggles between play and pause; tapping back runs the
/// host's closure, if one was given.
pub struct StandardControlSurface {
    container: OverlayId,
    elements: ControlElements,
    player: PlayerHandle,
    title: String,
    on_back: Option<BackAction>,
}

impl StandardControlSurface {
    pub fn new(player: PlayerHandle) -> Self {
        Self {
            container: OverlayId::new(),
            elements: ControlElements::headless(),
            player,
            title: String::new(),
            on_back: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_elements(mut self, elements: ControlElements) -> Self {
        self.elements = elements;
        self
    }

    pub fn with_container(mut self, container: OverlayId) -> Self {
        self.container = container;
        self
    }

    pub fn on_back<F>(mut self, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_back = Some(Box::new(action));
        self
    }

    pub fn player(&self) -> &PlayerHandle {
        &self.player
    }
}

impl ControlSurface for StandardControlSurface {
    fn container(&self) -> OverlayId {
        self.container
    }

    fn elements(&self) -> &ControlElements {
        &self.elements
    }

    fn did_tap_play_button(&self) {
        if let Err(err) = self.player.toggle_play_pause() {
            warn!(player_id = %self.player.id(), error = %err, "play button tap ignored");
        }
    }

    fn did_tap_back_button(&self) {
        if let Some(action) = &self.on_back {
            action();
        }
    }

    fn title_for_video(&self) -> String {
        self.title.clone()
    }
}
