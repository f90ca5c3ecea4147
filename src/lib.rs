//! CallOutCore: Mention Watcher + Overlay Engine
//!
//! A Rust/WASM engine for the CallOut content script. It watches the
//! rendered page for configured names appearing next to reporting verbs
//! ("Elon Musk predicts", "says Sam Altman") and surfaces matches through a
//! draggable, resizable, collapsible overlay widget.
//!
//! # Architecture
//!
//! ## Evaluation pipeline
//! - `matcher/` - Name + reporting-verb adjacency matching (regex over an
//!   inflection-generated verb vocabulary, Aho-Corasick prescreen)
//! - `site.rs` - Hostname eligibility by site mode (all/whitelist/blacklist)
//! - `change.rs` - Content-hash skip detection between debounced scans
//! - `schedule.rs` - Debounce + gesture-suspension state machine
//! - `session.rs` - Per-document session context and the evaluation procedure
//!
//! ## Overlay widget
//! - `overlay/` - Geometry state surviving re-renders, drag/resize gesture
//!   math, and the pure view descriptor
//! - `host/` - Capability boundary: `web-sys` implementation for the real
//!   document, a scripted fake for tests
//!
//! ## Boundary
//! - `settings.rs` - Lenient settings normalization and per-key merge
//! - `conductor.rs` - `WatchConductor`: bootstrap guard, MutationObserver
//!   wiring, settings-change entry point
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { WatchConductor } from 'calloutcore';
//!
//! await init();
//!
//! const conductor = new WatchConductor((patch) => chrome.storage.local.set(patch));
//! conductor.bootstrap(await chrome.storage.local.get(null));
//!
//! chrome.storage.onChanged.addListener((changes, area) => {
//!   if (area !== 'local') return;
//!   conductor.settingsChanged(changes);
//! });
//! ```

pub mod change;
pub mod conductor;
pub mod host;
pub mod log;
pub mod matcher;
pub mod overlay;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod site;

pub use conductor::WatchConductor;
pub use matcher::{build_vocabulary_pattern, find_matches, find_mentions, MentionHit, ReportingLexicon};
pub use overlay::{OverlayState, OverlayView};
pub use schedule::EvaluationScheduler;
pub use session::{EvalStats, WatchSession};
pub use settings::{Settings, SettingsPatch, SiteMode};

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("calloutcore v{}", env!("CARGO_PKG_VERSION"))
}
