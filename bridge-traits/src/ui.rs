//! Widget capabilities used by control surfaces.
//!
//! These traits describe the handful of view operations the playback core
//! performs on overlay controls. They are deliberately narrow: the host keeps
//! full ownership of layout, styling and hit testing, and only exposes the
//! state the core writes (selection, text, progress) or reads (slider touch).
//!
//! All methods take `&self`; implementations use interior mutability and are
//! only ever called from the UI dispatcher.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A toggleable button (the play/pause button uses the selected face for
/// "pause").
pub trait ButtonElement: Send + Sync {
    fn set_selected(&self, selected: bool);
    fn is_selected(&self) -> bool;
}

/// A single-line text label.
pub trait LabelElement: Send + Sync {
    fn set_text(&self, text: &str);
    fn text(&self) -> String;
}

/// A determinate progress bar (buffered extent).
pub trait ProgressElement: Send + Sync {
    /// Set progress in `0.0..=1.0`.
    fn set_progress(&self, progress: f32, animated: bool);
    fn progress(&self) -> f32;
}

/// A scrub slider.
pub trait SliderElement: Send + Sync {
    /// Set value in `0.0..=1.0`.
    fn set_value(&self, value: f32);
    fn value(&self) -> f32;
    /// Whether the user is currently dragging the thumb.
    fn is_touching(&self) -> bool;
}

/// A spinner shown while the player is loading.
pub trait ActivityIndicator: Send + Sync {
    fn start_animating(&self);
    fn stop_animating(&self);
    fn is_animating(&self) -> bool;
}

/// Identifier of an overlay container inside the host view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayId(Uuid);

impl OverlayId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OverlayId {
    fn default() -> Self {
        Self::new()
    }
}

/// Z-placement of an overlay relative to the video layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayLayer {
    /// Above everything (transport controls).
    Front,
    /// Directly above the video, below the controls (masks, gesture layers).
    Back,
}

/// The view that hosts the video layer and its overlays.
pub trait OverlayHost: Send + Sync {
    /// Insert the container `id` filling the host bounds.
    fn add_overlay(&self, id: OverlayId, layer: OverlayLayer);

    /// Remove the container `id`. Unknown ids are ignored.
    fn remove_overlay(&self, id: OverlayId);
}
