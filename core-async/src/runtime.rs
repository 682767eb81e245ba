//! Runtime handles.
//!
//! A player is usually created from async code but receives status callbacks
//! on whatever thread the media stack uses. Capturing a [`Handle`] at build
//! time lets those callbacks spawn work without an ambient runtime.

pub use tokio::runtime::{Builder, Handle, Runtime, TryCurrentError};

/// Returns a handle to the runtime driving the current thread, if any.
pub fn current_handle() -> Option<Handle> {
    Handle::try_current().ok()
}

/// Runs the provided future to completion on a fresh current-thread runtime.
///
/// # Panics
///
/// Panics if the runtime cannot be built (for example when the OS refuses to
/// create the timer driver).
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build Tokio runtime")
        .block_on(future)
}
