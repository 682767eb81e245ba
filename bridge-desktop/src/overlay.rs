//! Overlay host that tracks container z-order.

use bridge_traits::ui::{OverlayHost, OverlayId, OverlayLayer};
use parking_lot::Mutex;
use tracing::trace;

/// Keeps overlay ids ordered back-to-front above the video layer.
///
/// `Back` overlays are inserted directly above the video; `Front` overlays
/// are appended on top of everything.
#[derive(Debug, Default)]
pub struct LayeredOverlayHost {
    stack: Mutex<Vec<OverlayId>>,
}

impl LayeredOverlayHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay ids from back to front.
    pub fn overlays(&self) -> Vec<OverlayId> {
        self.stack.lock().clone()
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.stack.lock().contains(&id)
    }
}

impl OverlayHost for LayeredOverlayHost {
    fn add_overlay(&self, id: OverlayId, layer: OverlayLayer) {
        let mut stack = self.stack.lock();
        stack.retain(|existing| *existing != id);
        match layer {
            OverlayLayer::Back => stack.insert(0, id),
            OverlayLayer::Front => stack.push(id),
        }
        trace!(?id, ?layer, depth = stack.len(), "Overlay added");
    }

    fn remove_overlay(&self, id: OverlayId) {
        self.stack.lock().retain(|existing| *existing != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_overlays_stay_below_front() {
        let host = LayeredOverlayHost::new();
        let controls = OverlayId::new();
        let mask = OverlayId::new();

        host.add_overlay(controls, OverlayLayer::Front);
        host.add_overlay(mask, OverlayLayer::Back);
        assert_eq!(host.overlays(), vec![mask, controls]);

        host.remove_overlay(mask);
        assert_eq!(host.overlays(), vec![controls]);
        assert!(!host.contains(mask));
    }

    #[test]
    fn re_adding_moves_overlay() {
        let host = LayeredOverlayHost::new();
        let a = OverlayId::new();
        let b = OverlayId::new();
        host.add_overlay(a, OverlayLayer::Front);
        host.add_overlay(b, OverlayLayer::Front);
        host.add_overlay(a, OverlayLayer::Front);
        assert_eq!(host.overlays(), vec![b, a]);
    }
}
