//! Runtime abstraction layer for the video player core.
//!
//! Every crate in the workspace goes through this facade instead of naming
//! Tokio directly. The player needs exactly four things from a runtime:
//!
//! - `task`: spawn the telemetry sampler and join or abort it
//! - `time`: periodic intervals and sleeps
//! - `sync`: channels and the cancellation token that stops the sampler
//! - `runtime`: capture a handle so callbacks arriving on host threads can
//!   still spawn onto the runtime that created the player
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::CancellationToken;
//! use core_async::time::{interval, Duration};
//!
//! async fn ticker(cancel: CancellationToken) {
//!     let mut ticks = interval(Duration::from_millis(300));
//!     loop {
//!         core_async::select! {
//!             _ = cancel.cancelled() => break,
//!             _ = ticks.tick() => { /* sample */ }
//!         }
//!     }
//! }
//! ```

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};

/// Waits on multiple concurrent branches, returning when the first completes.
pub use tokio::select;
