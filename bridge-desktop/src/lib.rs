//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux) and for headless hosts such as test harnesses.
//!
//! ## Overview
//!
//! - `UiDispatcher` using a dedicated, named OS thread draining a FIFO channel
//! - `ActivityIndicator` that records its animation state and traces transitions
//! - `OverlayHost` that keeps overlay containers in z-order
//!
//! Desktop toolkits that already own an event loop (winit, GTK, Qt) should
//! implement `UiDispatcher` over their own loop proxy instead of using
//! [`MainThreadDispatcher`].
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{MainThreadDispatcher, TracingActivityIndicator};
//! use std::sync::Arc;
//!
//! let dispatcher = Arc::new(MainThreadDispatcher::new()?);
//! let indicator = Arc::new(TracingActivityIndicator::new("player-spinner"));
//! // hand both to core_playback::PlayerBuilder
//! ```

mod dispatcher;
mod indicator;
mod overlay;

pub use dispatcher::MainThreadDispatcher;
pub use indicator::TracingActivityIndicator;
pub use overlay::LayeredOverlayHost;
