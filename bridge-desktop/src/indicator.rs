//! Loading indicator for hosts without a native spinner.

use bridge_traits::ui::ActivityIndicator;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Records whether it is animating and traces each transition.
#[derive(Debug)]
pub struct TracingActivityIndicator {
    name: String,
    animating: AtomicBool,
}

impl TracingActivityIndicator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            animating: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for TracingActivityIndicator {
    fn default() -> Self {
        Self::new("loading")
    }
}

impl ActivityIndicator for TracingActivityIndicator {
    fn start_animating(&self) {
        if !self.animating.swap(true, Ordering::SeqCst) {
            debug!(indicator = %self.name, "Loading indicator started");
        }
    }

    fn stop_animating(&self) {
        if self.animating.swap(false, Ordering::SeqCst) {
            debug!(indicator = %self.name, "Loading indicator stopped");
        }
    }

    fn is_animating(&self) -> bool {
        self.animating.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_animation_state() {
        let indicator = TracingActivityIndicator::new("spinner");
        assert!(!indicator.is_animating());

        indicator.start_animating();
        indicator.start_animating();
        assert!(indicator.is_animating());

        indicator.stop_animating();
        assert!(!indicator.is_animating());
        assert_eq!(indicator.name(), "spinner");
    }
}
