//! Dedicated UI thread dispatcher.

use bridge_traits::{
    dispatch::{UiDispatcher, UiJob},
    error::{BridgeError, Result},
};
use core_async::sync::mpsc;
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle, ThreadId};
use tracing::{debug, error};

const DEFAULT_THREAD_NAME: &str = "vplayer-ui";

/// Runs every dispatched job, in order, on one named OS thread.
///
/// A panicking job is logged and does not take the thread down. Dropping the
/// dispatcher closes the queue; jobs already queued still run.
pub struct MainThreadDispatcher {
    sender: Mutex<Option<mpsc::UnboundedSender<UiJob>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    thread_id: ThreadId,
}

impl MainThreadDispatcher {
    /// Spawn the UI thread with the default name.
    pub fn new() -> Result<Self> {
        Self::with_thread_name(DEFAULT_THREAD_NAME)
    }

    /// Spawn the UI thread with a custom name.
    pub fn with_thread_name(name: &str) -> Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<UiJob>();

        let worker = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Some(job) = rx.blocking_recv() {
                    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        error!("UI job panicked; continuing with next job");
                    }
                }
                debug!("UI dispatcher queue closed");
            })
            .map_err(|e| BridgeError::OperationFailed(format!("failed to spawn UI thread: {e}")))?;

        let thread_id = worker.thread().id();
        debug!(thread = name, "UI dispatcher started");

        Ok(Self {
            sender: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
            thread_id,
        })
    }

    /// Close the queue and wait for queued jobs to drain.
    ///
    /// Must not be called from the UI thread itself.
    pub fn shutdown(&self) -> Result<()> {
        if self.is_ui_thread() {
            return Err(BridgeError::OperationFailed(
                "cannot shut down the UI dispatcher from its own thread".to_string(),
            ));
        }

        self.sender.lock().take();
        if let Some(worker) = self.worker.lock().take() {
            worker
                .join()
                .map_err(|_| BridgeError::OperationFailed("UI thread panicked".to_string()))?;
        }
        Ok(())
    }
}

impl UiDispatcher for MainThreadDispatcher {
    fn dispatch(&self, job: UiJob) -> Result<()> {
        let sender = self.sender.lock();
        match sender.as_ref() {
            Some(tx) => tx.send(job).map_err(|_| BridgeError::DispatcherClosed),
            None => Err(BridgeError::DispatcherClosed),
        }
    }

    fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }
}

impl Drop for MainThreadDispatcher {
    fn drop(&mut self) {
        self.sender.get_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc as std_mpsc;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn jobs_run_in_fifo_order() {
        let dispatcher = MainThreadDispatcher::new().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..50 {
            let seen = seen.clone();
            dispatcher
                .dispatch(Box::new(move || seen.lock().push(i)))
                .unwrap();
        }
        dispatcher.shutdown().unwrap();

        assert_eq!(*seen.lock(), (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn jobs_run_on_the_named_thread() {
        let dispatcher = Arc::new(MainThreadDispatcher::with_thread_name("test-ui").unwrap());
        assert!(!dispatcher.is_ui_thread());

        let (tx, rx) = std_mpsc::channel();
        let inner = dispatcher.clone();
        dispatcher
            .dispatch(Box::new(move || {
                let name = thread::current().name().map(str::to_string);
                tx.send((name, inner.is_ui_thread())).unwrap();
            }))
            .unwrap();

        let (name, on_ui) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("test-ui"));
        assert!(on_ui);
    }

    #[test]
    fn dispatch_from_ui_thread_is_not_inline() {
        let dispatcher = Arc::new(MainThreadDispatcher::new().unwrap());
        let order = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = std_mpsc::channel();

        let inner = dispatcher.clone();
        let outer_order = order.clone();
        dispatcher
            .dispatch(Box::new(move || {
                let nested_order = outer_order.clone();
                inner
                    .dispatch(Box::new(move || {
                        nested_order.lock().push("nested");
                        tx.send(()).unwrap();
                    }))
                    .unwrap();
                outer_order.lock().push("outer");
            }))
            .unwrap();

        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(*order.lock(), vec!["outer", "nested"]);
    }

    #[test]
    fn panicking_job_does_not_kill_thread() {
        let dispatcher = MainThreadDispatcher::new().unwrap();
        let (tx, rx) = std_mpsc::channel();

        dispatcher.dispatch(Box::new(|| panic!("boom"))).unwrap();
        dispatcher.dispatch(Box::new(move || tx.send(7).unwrap())).unwrap();

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);
    }

    #[test]
    fn dispatch_after_shutdown_fails() {
        let dispatcher = MainThreadDispatcher::new().unwrap();
        dispatcher.shutdown().unwrap();

        let err = dispatcher.dispatch(Box::new(|| {})).unwrap_err();
        assert!(matches!(err, BridgeError::DispatcherClosed));
    }
}
