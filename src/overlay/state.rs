//! Overlay geometry state, surviving widget teardown/recreation
//!
//! The widget node is destroyed and rebuilt whenever matches or the collapse
//! flag change. Whatever the user did to the node (dragged it, resized it)
//! lives here between renders. Memory-only: reset on navigation/reload.

/// Default anchor inset from the viewport's bottom-right corner, in px.
pub const DEFAULT_ANCHOR_PX: f64 = 16.0;

/// Where the overlay sits. The two representations are mutually exclusive:
/// whichever pair is active, the node's other pair is cleared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayPosition {
    /// Anchored to the bottom-right corner (the initial placement).
    Docked { right: f64, bottom: f64 },
    /// Absolute position the user dragged the widget to.
    Free { left: f64, top: f64 },
}

impl Default for OverlayPosition {
    fn default() -> Self {
        OverlayPosition::Docked {
            right: DEFAULT_ANCHOR_PX,
            bottom: DEFAULT_ANCHOR_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySize {
    pub width: f64,
    pub height: f64,
}

/// Live geometry read off the widget node just before it is destroyed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Resolved placement for a mount: position plus the size to apply, if any.
/// Size is only ever applied to the expanded layout; the collapsed chip
/// sizes itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: OverlayPosition,
    pub size: Option<OverlaySize>,
}

/// Position, size and their capture/reapply rules.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayState {
    pub position: OverlayPosition,
    pub size: Option<OverlaySize>,
}

impl OverlayState {
    /// Capture the live node's geometry before teardown so the replacement
    /// reproduces it exactly. Capturing converts a docked position into a
    /// free one: the rendered spot is what the user saw.
    pub fn capture(&mut self, geometry: OverlayGeometry) {
        self.position = OverlayPosition::Free {
            left: geometry.left,
            top: geometry.top,
        };
        self.size = Some(OverlaySize {
            width: geometry.width,
            height: geometry.height,
        });
    }

    /// A drag moved the widget; the docked anchor, if any, is gone.
    pub fn set_position(&mut self, left: f64, top: f64) {
        self.position = OverlayPosition::Free { left, top };
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.size = Some(OverlaySize { width, height });
    }

    /// Resolve the placement for the next mount.
    pub fn placement(&self, collapsed: bool) -> Placement {
        Placement {
            position: self.position,
            size: if collapsed { None } else { self.size },
        }
    }
}

// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_docked_without_size() {
        let state = OverlayState::default();
        assert_eq!(
            state.position,
            OverlayPosition::Docked { right: 16.0, bottom: 16.0 }
        );
        assert!(state.size.is_none());
    }

    #[test]
    fn test_capture_round_trips_position() {
        let mut state = OverlayState::default();
        state.capture(OverlayGeometry { left: 120.0, top: 80.0, width: 300.0, height: 180.0 });
        assert_eq!(state.position, OverlayPosition::Free { left: 120.0, top: 80.0 });
        assert_eq!(state.size, Some(OverlaySize { width: 300.0, height: 180.0 }));
    }

    #[test]
    fn test_collapsed_placement_drops_size() {
        let mut state = OverlayState::default();
        state.set_size(400.0, 200.0);
        assert!(state.placement(true).size.is_none());
        assert_eq!(
            state.placement(false).size,
            Some(OverlaySize { width: 400.0, height: 200.0 })
        );
    }

    #[test]
    fn test_drag_replaces_docked_anchor() {
        let mut state = OverlayState::default();
        state.set_position(40.0, 60.0);
        assert_eq!(state.position, OverlayPosition::Free { left: 40.0, top: 60.0 });
    }
}
