//! Host capability boundary
//!
//! Everything the evaluation pipeline needs from the surrounding page goes
//! through this trait, so the session logic runs (and is tested) without a
//! real document. The wasm build wires [`web::WebHost`]; tests use
//! [`fake::FakeHost`].

pub mod web;

#[cfg(test)]
pub mod fake;

use crate::overlay::{OverlayGeometry, OverlayView, Placement};
use crate::settings::SettingsPatch;

pub trait OverlayHost {
    /// Hostname of the current page.
    fn hostname(&self) -> String;

    /// Visible text of the document body, excluding the widget's own text.
    /// `None` while the body is not yet parsed.
    fn body_text(&self) -> Option<String>;

    fn overlay_present(&self) -> bool;

    /// Remove the widget node if mounted.
    fn remove_overlay(&mut self);

    /// Mount a fresh widget node. The host guarantees at most one node with
    /// the fixed overlay id exists afterwards, regardless of prior state.
    fn mount_overlay(&mut self, view: &OverlayView, placement: &Placement);

    /// Live geometry of the mounted node, `None` when nothing is mounted.
    fn capture_geometry(&self) -> Option<OverlayGeometry>;

    /// Move the live node during a drag (clears the docked anchor pair).
    fn apply_position(&mut self, left: f64, top: f64);

    /// Resize the live node during a resize gesture.
    fn apply_size(&mut self, width: f64, height: f64);

    /// Viewport dimensions in px.
    fn viewport(&self) -> (f64, f64);

    /// Arm the single debounce timer; replaces any pending one. The host
    /// calls back `timer_fired(token)` on expiry.
    fn arm_timer(&mut self, token: u64, delay_ms: u32);

    /// Hand a partial settings record to the settings store. Fire-and-forget;
    /// the store's change notification closes the loop.
    fn persist(&mut self, patch: &SettingsPatch);

    /// Wall-clock milliseconds.
    fn now_ms(&self) -> f64;
}
