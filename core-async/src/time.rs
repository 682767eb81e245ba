//! Time-related abstractions.
//!
//! Intervals default to Tokio's burst behaviour; periodic samplers should
//! switch to [`MissedTickBehavior::Skip`] so a stalled thread does not
//! produce a flurry of catch-up ticks.
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{interval, Duration, MissedTickBehavior};
//!
//! # async fn example() {
//! let mut ticks = interval(Duration::from_millis(300));
//! ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
//! ticks.tick().await; // first tick completes immediately
//! # }
//! ```

pub use tokio::time::{
    interval, interval_at, sleep, sleep_until, timeout, Interval, MissedTickBehavior, Sleep,
    Timeout,
};

pub use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Creates an interval whose first tick fires after one full `period`
/// and which skips missed ticks instead of bursting.
pub fn periodic(period: Duration) -> Interval {
    let start = tokio::time::Instant::now() + period;
    let mut ticks = interval_at(start, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticks
}

/// Returns the current time as milliseconds since UNIX_EPOCH.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
