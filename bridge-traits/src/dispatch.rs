//! Designated UI thread contract.
//!
//! Every observable side effect of the core (primitive calls, delegate
//! callbacks, widget writes) runs as a [`UiJob`] on a single serialized
//! context supplied by the host: the main thread on mobile, an event-loop
//! proxy on desktop, or the dedicated thread in `bridge-desktop`.

use crate::error::Result;

/// A unit of work for the UI thread.
pub type UiJob = Box<dyn FnOnce() + Send + 'static>;

/// Serial executor for UI-affine work.
///
/// # Contract
///
/// - Jobs run in the order they were dispatched (FIFO).
/// - `dispatch` never runs the job inline, even when called from the UI
///   thread itself; the core relies on this to avoid re-entrancy while it
///   holds its state lock.
/// - `dispatch` must not block waiting for the job to run.
pub trait UiDispatcher: Send + Sync {
    /// Enqueue `job`. Returns [`BridgeError::DispatcherClosed`](crate::BridgeError::DispatcherClosed)
    /// once the executor has shut down.
    fn dispatch(&self, job: UiJob) -> Result<()>;

    /// Whether the calling thread is the UI thread.
    fn is_ui_thread(&self) -> bool {
        false
    }
}
