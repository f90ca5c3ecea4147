//! EvaluationScheduler: debounce and gesture suspension
//!
//! Explicit state machine instead of bare cancel-and-reschedule timers.
//! The scheduler never owns a timer or runs an evaluation itself; it maps
//! inputs (mutation batch, settings change, timer fire, gesture start/end)
//! to actions the session executes. Timer staleness is handled by token:
//! scheduling hands out a fresh token, and a fire with any other token is
//! ignored.

/// Quiet period after a mutation burst before re-scanning.
pub const DEBOUNCE_MS: u32 = 350;

/// Longer quiet period while the user is dragging or resizing, so a
/// re-scan cannot tear the widget down mid-gesture.
pub const GESTURE_DEBOUNCE_MS: u32 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// A debounce timer with this token is pending.
    Scheduled(u64),
    /// An immediate evaluation arrived mid-gesture; it runs at gesture end.
    GestureSuspended,
}

/// What the session must do in response to an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Schedule { token: u64, delay_ms: u32 },
    EvaluateNow,
}

#[derive(Debug)]
pub struct EvaluationScheduler {
    phase: Phase,
    gesture_active: bool,
    next_token: u64,
}

impl Default for EvaluationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationScheduler {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            gesture_active: false,
            next_token: 0,
        }
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture_active
    }

    /// A mutation batch arrived: debounce. Re-arming supersedes any pending
    /// timer (last request wins, no queuing).
    pub fn request_debounced(&mut self) -> Action {
        let token = self.bump();
        self.phase = Phase::Scheduled(token);
        Action::Schedule {
            token,
            delay_ms: if self.gesture_active {
                GESTURE_DEBOUNCE_MS
            } else {
                DEBOUNCE_MS
            },
        }
    }

    /// A settings change arrived: evaluate promptly. Mid-gesture the work is
    /// suspended instead, to run exactly once when the gesture ends.
    pub fn request_immediate(&mut self) -> Action {
        if self.gesture_active {
            self.phase = Phase::GestureSuspended;
            Action::None
        } else {
            self.phase = Phase::Idle;
            Action::EvaluateNow
        }
    }

    /// A timer fired. Stale tokens (superseded or cancelled timers) are
    /// ignored; a fire during a gesture re-arms instead of evaluating.
    pub fn timer_fired(&mut self, token: u64) -> Action {
        match self.phase {
            Phase::Scheduled(current) if current == token => {
                if self.gesture_active {
                    let fresh = self.bump();
                    self.phase = Phase::Scheduled(fresh);
                    Action::Schedule {
                        token: fresh,
                        delay_ms: GESTURE_DEBOUNCE_MS,
                    }
                } else {
                    self.phase = Phase::Idle;
                    Action::EvaluateNow
                }
            }
            _ => Action::None,
        }
    }

    pub fn gesture_started(&mut self) {
        self.gesture_active = true;
    }

    /// Gesture ended. Suspended work runs now; a live timer is left to fire
    /// on its own.
    pub fn gesture_ended(&mut self) -> Action {
        self.gesture_active = false;
        if self.phase == Phase::GestureSuspended {
            self.phase = Phase::Idle;
            Action::EvaluateNow
        } else {
            Action::None
        }
    }

    fn bump(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}
