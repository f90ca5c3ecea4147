//! WatchSession: per-document session context and evaluation procedure
//!
//! One session per document lifetime owns every piece of mutable state the
//! pipeline needs: the cached settings snapshot, the scheduler, the overlay
//! geometry state, the dismissal flag, the change detector and the render
//! cache. Nothing ambient, nothing global.
//!
//! Re-render idempotence: an evaluation whose matches and collapse flag
//! equal the last mounted render leaves the node alone. The widget's own
//! mount/teardown feeds the mutation observer like any other DOM change, so
//! without this the pipeline would re-render itself forever.

use std::collections::HashMap;

use instant::Instant;
use serde_json::Value;

use crate::change::ChangeDetector;
use crate::host::OverlayHost;
use crate::log;
use crate::matcher::{build_vocabulary_pattern, find_mentions, ReportingLexicon};
use crate::overlay::{build_view, ActiveGesture, GestureUpdate, OverlayState};
use crate::schedule::{Action, EvaluationScheduler};
use crate::settings::{Settings, SettingsPatch};
use crate::site;

const COMPONENT: &str = "Session";

/// Timing and outcome of the last evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalStats {
    pub total_us: u64,
    pub match_us: u64,
    pub text_length: usize,
    pub match_count: usize,
    pub was_skipped: bool,
}

pub struct WatchSession<H: OverlayHost> {
    host: H,
    settings: Settings,
    lexicon: ReportingLexicon,
    scheduler: EvaluationScheduler,
    overlay_state: OverlayState,
    change_detector: ChangeDetector,
    gesture: Option<ActiveGesture>,
    dismissed_for_session: bool,
    /// Wall-clock ms when each name was first matched this session.
    first_seen_ms: HashMap<String, f64>,
    /// (matched names, collapsed) of the currently mounted render.
    last_rendered: Option<(Vec<String>, bool)>,
    last_stats: Option<EvalStats>,
}

impl<H: OverlayHost> WatchSession<H> {
    pub fn new(host: H, settings: Settings) -> Self {
        Self {
            host,
            settings,
            lexicon: ReportingLexicon::default(),
            scheduler: EvaluationScheduler::new(),
            overlay_state: OverlayState::default(),
            change_detector: ChangeDetector::new(),
            gesture: None,
            dismissed_for_session: false,
            first_seen_ms: HashMap::new(),
            last_rendered: None,
            last_stats: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn last_stats(&self) -> Option<EvalStats> {
        self.last_stats
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    // =========================================================================
    // Watcher-facing entry points
    // =========================================================================

    /// One mutation batch from the document observer.
    pub fn mutation_batch(&mut self) {
        let action = self.scheduler.request_debounced();
        self.dispatch(action);
    }

    /// A `{key: {newValue}}` change record from the settings store. Merged
    /// immediately; the evaluation is prompt rather than debounced (explicit
    /// user action, not DOM churn).
    pub fn settings_changed(&mut self, changes: &Value) {
        self.settings.merge_changes(changes);
        // the hash only covers the text, not the vocabulary matched against it
        self.change_detector.reset();
        log::debug(COMPONENT, "settings merged, re-evaluating");
        let action = self.scheduler.request_immediate();
        self.dispatch(action);
    }

    /// Replace the whole snapshot (bootstrap).
    pub fn replace_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.change_detector.reset();
    }

    /// The host's debounce timer expired.
    pub fn timer_fired(&mut self, token: u64) {
        let action = self.scheduler.timer_fired(token);
        self.dispatch(action);
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Schedule { token, delay_ms } => self.host.arm_timer(token, delay_ms),
            Action::EvaluateNow => self.evaluate(),
        }
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    pub fn drag_started(&mut self, x: f64, y: f64) {
        if self.gesture.is_some() {
            return;
        }
        let Some(geometry) = self.host.capture_geometry() else {
            return;
        };
        self.gesture = Some(ActiveGesture::begin_drag((x, y), geometry));
        self.scheduler.gesture_started();
    }

    pub fn resize_started(&mut self, x: f64, y: f64) {
        if self.gesture.is_some() {
            return;
        }
        let Some(geometry) = self.host.capture_geometry() else {
            return;
        };
        self.gesture = Some(ActiveGesture::begin_resize((x, y), geometry));
        self.scheduler.gesture_started();
    }

    /// Stray moves without an active gesture are no-ops.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        let Some(gesture) = self.gesture else {
            return;
        };
        match gesture.update((x, y), self.host.viewport()) {
            GestureUpdate::Position { left, top } => {
                self.overlay_state.set_position(left, top);
                self.host.apply_position(left, top);
            }
            GestureUpdate::Size { width, height } => {
                self.overlay_state.set_size(width, height);
                self.host.apply_size(width, height);
            }
        }
    }

    /// Stray pointer-ups without an active gesture are no-ops.
    pub fn pointer_released(&mut self) {
        if self.gesture.take().is_none() {
            return;
        }
        let action = self.scheduler.gesture_ended();
        self.dispatch(action);
    }

    // =========================================================================
    // Widget controls
    // =========================================================================

    /// Collapsed chip clicked: persist expansion. The store's change
    /// notification re-renders.
    pub fn expand_clicked(&mut self) {
        self.host.persist(&SettingsPatch::collapsed(false));
    }

    /// Collapse control: persisted, unlike dismissal.
    pub fn collapse_clicked(&mut self) {
        self.host.persist(&SettingsPatch::collapsed(true));
    }

    /// Close control: session-scoped suppression, persisted settings
    /// untouched. Holds until the page reloads.
    pub fn close_clicked(&mut self) {
        self.dismissed_for_session = true;
        self.retract_overlay();
        log::debug(COMPONENT, "overlay dismissed for this session");
    }

    // =========================================================================
    // Evaluation procedure
    // =========================================================================

    pub fn evaluate(&mut self) {
        let overall = Instant::now();

        if self.dismissed_for_session {
            self.retract_overlay();
            return;
        }

        let hostname = self.host.hostname();
        if !site::is_eligible(
            &hostname,
            self.settings.site_mode,
            &self.settings.whitelist,
            &self.settings.blacklist,
        ) {
            // a mode change must retract an already-shown overlay, not just
            // suppress future ones
            self.retract_overlay();
            log::debug(COMPONENT, &format!("{} filtered by site mode", hostname));
            return;
        }

        let Some(pattern) = build_vocabulary_pattern(&self.settings.names, &self.lexicon) else {
            log::debug(COMPONENT, "no usable names configured");
            return;
        };

        let Some(text) = self.host.body_text() else {
            return;
        };
        if text.is_empty() {
            return;
        }

        let text_changed = self.change_detector.has_changed(&text);
        let overlay_consistent = self.host.overlay_present() == self.last_rendered.is_some();
        if !text_changed && overlay_consistent {
            self.last_stats = Some(EvalStats {
                total_us: overall.elapsed().as_micros() as u64,
                match_us: 0,
                text_length: text.len(),
                match_count: self.last_rendered.as_ref().map_or(0, |(n, _)| n.len()),
                was_skipped: true,
            });
            return;
        }

        let match_start = Instant::now();
        if !pattern.is_match(&text) {
            self.retract_overlay();
            log::debug(
                COMPONENT,
                &format!("no match in {} bytes ({}us)", text.len(), overall.elapsed().as_micros()),
            );
            return;
        }

        let hits = find_mentions(&text, &self.settings.names, &self.lexicon);
        let match_us = match_start.elapsed().as_micros() as u64;
        if hits.is_empty() {
            self.retract_overlay();
            return;
        }

        let now = self.host.now_ms();
        for hit in &hits {
            self.first_seen_ms.entry(hit.name.clone()).or_insert(now);
        }

        let names: Vec<String> = hits.iter().map(|h| h.name.clone()).collect();
        let collapsed = self.settings.ui_collapsed;
        let unchanged = self.host.overlay_present()
            && self
                .last_rendered
                .as_ref()
                .map_or(false, |(n, c)| *n == names && *c == collapsed);
        if unchanged {
            self.last_stats = Some(EvalStats {
                total_us: overall.elapsed().as_micros() as u64,
                match_us,
                text_length: text.len(),
                match_count: names.len(),
                was_skipped: true,
            });
            return;
        }

        if let Some(geometry) = self.host.capture_geometry() {
            self.overlay_state.capture(geometry);
        }
        self.host.remove_overlay();

        let view = build_view(&hits, collapsed, &self.first_seen_ms, now);
        let placement = self.overlay_state.placement(collapsed);
        self.host.mount_overlay(&view, &placement);
        self.last_rendered = Some((names, collapsed));

        let stats = EvalStats {
            total_us: overall.elapsed().as_micros() as u64,
            match_us,
            text_length: text.len(),
            match_count: hits.len(),
            was_skipped: false,
        };
        log::debug(
            COMPONENT,
            &format!(
                "matched {} name(s) in {} bytes, match {}us, total {}us",
                stats.match_count, stats.text_length, stats.match_us, stats.total_us
            ),
        );
        self.last_stats = Some(stats);
    }

    fn retract_overlay(&mut self) {
        if self.host.overlay_present() {
            self.host.remove_overlay();
        }
        self.last_rendered = None;
    }
}
