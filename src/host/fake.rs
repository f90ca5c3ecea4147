//! Scripted host for session tests: records every mount, removal and
//! persist call, and simulates node geometry the way a real document would
//! (mount resolves the placement against the viewport, gestures move the
//! simulated node).

use super::OverlayHost;
use crate::overlay::{OverlayGeometry, OverlayPosition, OverlayView, Placement};
use crate::settings::SettingsPatch;

/// Natural size the simulated node takes when the placement carries none.
const NATURAL_WIDTH: f64 = 300.0;
const NATURAL_HEIGHT: f64 = 180.0;

#[derive(Debug, Clone)]
pub struct MountRecord {
    pub view: OverlayView,
    pub placement: Placement,
}

#[derive(Debug)]
pub struct FakeHost {
    pub hostname: String,
    pub body: Option<String>,
    pub viewport: (f64, f64),
    pub clock_ms: f64,

    pub mounted: Option<MountRecord>,
    pub geometry: Option<OverlayGeometry>,
    pub mounts: Vec<MountRecord>,
    pub removals: usize,
    pub armed: Option<(u64, u32)>,
    pub persisted: Vec<SettingsPatch>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            hostname: "news.example.com".to_string(),
            body: Some(String::new()),
            viewport: (1280.0, 720.0),
            clock_ms: 0.0,
            mounted: None,
            geometry: None,
            mounts: Vec::new(),
            removals: 0,
            armed: None,
            persisted: Vec::new(),
        }
    }
}

impl FakeHost {
    pub fn with_body(body: &str) -> Self {
        Self {
            body: Some(body.to_string()),
            ..Default::default()
        }
    }

    /// Take the armed timer, if any, for the test to fire manually.
    pub fn take_armed(&mut self) -> Option<(u64, u32)> {
        self.armed.take()
    }

    fn resolve_geometry(&self, placement: &Placement) -> OverlayGeometry {
        let (width, height) = placement
            .size
            .map(|s| (s.width, s.height))
            .unwrap_or((NATURAL_WIDTH, NATURAL_HEIGHT));
        let (left, top) = match placement.position {
            OverlayPosition::Free { left, top } => (left, top),
            OverlayPosition::Docked { right, bottom } => (
                self.viewport.0 - right - width,
                self.viewport.1 - bottom - height,
            ),
        };
        OverlayGeometry { left, top, width, height }
    }
}

impl OverlayHost for FakeHost {
    fn hostname(&self) -> String {
        self.hostname.clone()
    }

    fn body_text(&self) -> Option<String> {
        self.body.clone()
    }

    fn overlay_present(&self) -> bool {
        self.mounted.is_some()
    }

    fn remove_overlay(&mut self) {
        if self.mounted.take().is_some() {
            self.removals += 1;
            self.geometry = None;
        }
    }

    fn mount_overlay(&mut self, view: &OverlayView, placement: &Placement) {
        // replacing an existing node counts as a removal, like the DOM path
        if self.mounted.take().is_some() {
            self.removals += 1;
        }
        let record = MountRecord {
            view: view.clone(),
            placement: *placement,
        };
        self.geometry = Some(self.resolve_geometry(placement));
        self.mounted = Some(record.clone());
        self.mounts.push(record);
    }

    fn capture_geometry(&self) -> Option<OverlayGeometry> {
        if self.mounted.is_some() {
            self.geometry
        } else {
            None
        }
    }

    fn apply_position(&mut self, left: f64, top: f64) {
        if let Some(geometry) = self.geometry.as_mut() {
            geometry.left = left;
            geometry.top = top;
        }
    }

    fn apply_size(&mut self, width: f64, height: f64) {
        if let Some(geometry) = self.geometry.as_mut() {
            geometry.width = width;
            geometry.height = height;
        }
    }

    fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    fn arm_timer(&mut self, token: u64, delay_ms: u32) {
        self.armed = Some((token, delay_ms));
    }

    fn persist(&mut self, patch: &SettingsPatch) {
        self.persisted.push(patch.clone());
    }

    fn now_ms(&self) -> f64 {
        self.clock_ms
    }
}
