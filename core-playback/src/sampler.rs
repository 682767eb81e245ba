//! # Telemetry Sampler
//!
//! Periodic task that reads the primitive's playhead and loaded ranges and
//! feeds them to the player.
//!
//! The task holds only a weak reference to its target, so a dropped player
//! ends the loop on the next tick even if nobody cancelled it. Cancellation is
//! cooperative through a [`CancellationToken`]; no tick runs after
//! [`SamplerHandle::stop`] returns, except one that was already executing.

use std::sync::Weak;

use bridge_traits::MediaPrimitive;
use core_async::runtime::Handle;
use core_async::sync::CancellationToken;
use core_async::task::JoinHandle;
use core_async::time::{periodic, Duration};
use tracing::trace;

/// One reading of the primitive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelemetrySample {
    /// Playhead rounded to milliseconds; `None` while the time is invalid.
    pub current_second: Option<f64>,
    /// End of the first loaded range; `None` when nothing is loaded.
    pub loaded_seconds: Option<f64>,
}

impl TelemetrySample {
    pub fn capture(primitive: &dyn MediaPrimitive) -> Self {
        let current = primitive.current_time().as_secs_f64();
        let current_second = current
            .is_finite()
            .then(|| (current * 1000.0).round() / 1000.0);

        let loaded_seconds = primitive
            .loaded_time_ranges()
            .first()
            .map(|range| range.end_secs())
            .filter(|end| end.is_finite());

        Self {
            current_second,
            loaded_seconds,
        }
    }
}

/// Whether the sampler should keep running after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Stop,
}

/// Receiver of sampler ticks.
pub trait SampleTarget: Send + Sync + 'static {
    fn tick(&self) -> TickFlow;
}

/// Owner's side of a running sampler.
#[derive(Debug)]
pub struct SamplerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SamplerHandle {
    /// Cancel the loop. Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Cancel and abort the task at its next await point.
    pub fn abort(&self) {
        self.cancel.cancel();
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.task.is_finished()
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn the sampling loop on `runtime`. The first tick fires one `period`
/// after the call.
pub fn spawn_sampler<T>(runtime: &Handle, period: Duration, target: Weak<T>) -> SamplerHandle
where
    T: SampleTarget,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let task = runtime.spawn(async move {
        let mut ticks = periodic(period);
        loop {
            core_async::select! {
                _ = token.cancelled() => {
                    trace!("sampler cancelled");
                    break;
                }
                _ = ticks.tick() => {
                    let Some(target) = target.upgrade() else {
                        trace!("sampler target released");
                        break;
                    };
                    if token.is_cancelled() {
                        break;
                    }
                    if target.tick() == TickFlow::Stop {
                        trace!("sampler stopped by target");
                        break;
                    }
                }
            }
        }
    });

    SamplerHandle { cancel, task }
}
