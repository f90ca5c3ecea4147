//! Drag/resize gesture math
//!
//! A gesture is bounded by pointer-down and pointer-up. The state captured
//! at pointer-down plus the current pointer position fully determine the
//! node's next geometry; no incremental accumulation, so a missed move
//! event cannot drift the widget.

use super::state::OverlayGeometry;

/// The expanded widget never shrinks below this floor.
pub const MIN_WIDTH: f64 = 240.0;
pub const MIN_HEIGHT: f64 = 140.0;

/// An in-flight pointer gesture, created at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveGesture {
    Drag {
        start_x: f64,
        start_y: f64,
        origin_left: f64,
        origin_top: f64,
        width: f64,
        height: f64,
    },
    Resize {
        start_x: f64,
        start_y: f64,
        origin_width: f64,
        origin_height: f64,
    },
}

/// What a pointer move changes on the node and in the overlay state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureUpdate {
    Position { left: f64, top: f64 },
    Size { width: f64, height: f64 },
}

impl ActiveGesture {
    pub fn begin_drag(pointer: (f64, f64), geometry: OverlayGeometry) -> Self {
        ActiveGesture::Drag {
            start_x: pointer.0,
            start_y: pointer.1,
            origin_left: geometry.left,
            origin_top: geometry.top,
            width: geometry.width,
            height: geometry.height,
        }
    }

    pub fn begin_resize(pointer: (f64, f64), geometry: OverlayGeometry) -> Self {
        ActiveGesture::Resize {
            start_x: pointer.0,
            start_y: pointer.1,
            origin_width: geometry.width,
            origin_height: geometry.height,
        }
    }

    /// Compute the geometry for the current pointer position. Drags are
    /// clamped to the viewport box; resizes to the minimum size floor.
    pub fn update(&self, pointer: (f64, f64), viewport: (f64, f64)) -> GestureUpdate {
        match *self {
            ActiveGesture::Drag {
                start_x,
                start_y,
                origin_left,
                origin_top,
                width,
                height,
            } => {
                let max_left = (viewport.0 - width).max(0.0);
                let max_top = (viewport.1 - height).max(0.0);
                GestureUpdate::Position {
                    left: (origin_left + pointer.0 - start_x).clamp(0.0, max_left),
                    top: (origin_top + pointer.1 - start_y).clamp(0.0, max_top),
                }
            }
            ActiveGesture::Resize {
                start_x,
                start_y,
                origin_width,
                origin_height,
            } => GestureUpdate::Size {
                width: (origin_width + pointer.0 - start_x).max(MIN_WIDTH),
                height: (origin_height + pointer.1 - start_y).max(MIN_HEIGHT),
            },
        }
    }
}
