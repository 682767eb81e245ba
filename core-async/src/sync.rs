//! Synchronization primitives.
//!
//! Async-aware channels and locks from `tokio::sync`, plus the
//! `CancellationToken` from `tokio-util` used to stop background loops.
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::CancellationToken;
//!
//! let token = CancellationToken::new();
//! let child = token.child_token();
//! token.cancel();
//! assert!(child.is_cancelled());
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Barrier, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard, Semaphore, SemaphorePermit,
};

pub use tokio_util::sync::{CancellationToken, DropGuard, WaitForCancellationFuture};
