//! Side effects produced by the reconciliation engine.
//!
//! The engine never touches the primitive or the UI. It returns these values
//! and the player executes them, in order, on the UI dispatcher.

use core_runtime::events::PlayerEvent;

/// Operation on the media primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveCommand {
    /// Attach the player's item unless the primitive already has one.
    AttachIfDetached,
    Detach,
    Play,
    Pause,
    /// Seek to `target` seconds. `generation` identifies the seek so a
    /// superseded completion does not clear the seeking flag.
    Seek { target: f64, generation: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    Primitive(PrimitiveCommand),
    /// Buffer became sufficient again: resume playback unless the user paused
    /// (evaluated against the state at execution time).
    ResumeUnlessPaused,
    /// Deliver to the delegate, the control surface, the loading indicator
    /// and the event bus.
    Publish(PlayerEvent),
}

impl SideEffect {
    pub fn event(&self) -> Option<&PlayerEvent> {
        match self {
            SideEffect::Publish(event) => Some(event),
            _ => None,
        }
    }
}
