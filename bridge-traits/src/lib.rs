//! # Host Bridge Traits
//!
//! Contracts between the video player core and the host platform.
//!
//! ## Overview
//!
//! The core owns playback state reconciliation; everything that touches the
//! operating system is a trait defined here and implemented per platform.
//!
//! ## Traits
//!
//! ### Media
//! - [`MediaPrimitive`](media::MediaPrimitive) - The host decode/render engine
//! - [`MediaItem`](media::MediaItem) - One loadable item with typed status observation
//!
//! ### Threading
//! - [`UiDispatcher`](dispatch::UiDispatcher) - FIFO executor for the designated UI thread
//!
//! ### Views
//! - [`ButtonElement`](ui::ButtonElement), [`LabelElement`](ui::LabelElement),
//!   [`ProgressElement`](ui::ProgressElement), [`SliderElement`](ui::SliderElement) -
//!   Widget capabilities written by control surfaces
//! - [`ActivityIndicator`](ui::ActivityIndicator) - Loading spinner
//! - [`OverlayHost`](ui::OverlayHost) - Video view accepting control and mask overlays
//!
//! ### Utilities
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Dispatcher, indicator |
//! | iOS      | TBD                 | 📋 Planned |
//! | Android  | TBD                 | 📋 Planned |
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync`. Status observers and seek
//! completions may fire on arbitrary threads; everything else is called from
//! the UI dispatcher.

pub mod dispatch;
pub mod error;
pub mod log;
pub mod media;
pub mod playback;
pub mod ui;

pub use error::BridgeError;

// Re-export commonly used types
pub use dispatch::{UiDispatcher, UiJob};
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{ItemStatus, MediaItem, MediaPrimitive, ObserverId, SeekCompletion, StatusObserver};
pub use playback::{MediaTime, PlaybackState, PlayerId, TimeRange};
pub use ui::{
    ActivityIndicator, ButtonElement, LabelElement, OverlayHost, OverlayId, OverlayLayer,
    ProgressElement, SliderElement,
};
