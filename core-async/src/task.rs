//! Task spawning.
//!
//! Thin re-exports over `tokio::task`. Spawned futures must be `Send`
//! because the sampler may be resumed on any worker thread.

pub use tokio::task::{spawn_blocking, yield_now, AbortHandle, JoinError, JoinHandle};

/// Spawns a new asynchronous task on the current runtime.
///
/// # Panics
///
/// Panics when called outside a runtime context. Code that may run on a
/// host thread should capture a [`crate::runtime::Handle`] up front and use
/// [`crate::runtime::Handle::spawn`] instead.
///
/// # Examples
///
/// ```rust
/// use core_async::task::spawn;
///
/// # async fn example() {
/// let handle = spawn(async { 42 });
/// assert_eq!(handle.await.unwrap(), 42);
/// # }
/// ```
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;
