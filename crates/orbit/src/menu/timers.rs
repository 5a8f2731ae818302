//! Session-relative timers: gesture activation and submenu hover opening.
//!
//! Both take the time elapsed since the menu session opened instead of reading a clock, so the
//! owning controller decides what "now" is.

use super::{GESTURE_TIME_LIMIT, GESTURE_WARMUP, SUBMENU_HOVER_DELAY};
use std::time::Duration;

/// The span of a session during which a ring crossing counts as a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureWindow {
    pub warmup: Duration,
    pub limit: Duration,
}

impl Default for GestureWindow {
    fn default() -> Self {
        Self {
            warmup: GESTURE_WARMUP,
            limit: GESTURE_TIME_LIMIT,
        }
    }
}

impl GestureWindow {
    pub fn new(warmup: Duration, limit: Duration) -> Self {
        Self { warmup, limit }
    }

    pub fn contains(&self, elapsed: Duration) -> bool {
        elapsed > self.warmup && elapsed < self.limit
    }

    pub fn is_over(&self, elapsed: Duration) -> bool {
        elapsed >= self.limit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Disarmed,
    Armed,
    Fired,
    Expired,
}

/// Fires at most once per session: the first time the pointer is past the main ring, inside the
/// gesture window, with a selection.
#[derive(Debug, Clone)]
pub struct GestureTimer {
    window: GestureWindow,
    phase: GesturePhase,
}

impl GestureTimer {
    pub fn new(window: GestureWindow) -> Self {
        Self {
            window,
            phase: GesturePhase::Disarmed,
        }
    }

    pub fn window(&self) -> GestureWindow {
        self.window
    }

    pub fn set_window(&mut self, window: GestureWindow) {
        self.window = window;
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn arm(&mut self) {
        self.phase = GesturePhase::Armed;
    }

    pub fn disarm(&mut self) {
        self.phase = GesturePhase::Disarmed;
    }

    /// Returns `true` exactly once per arming, on the call that fires the gesture.
    pub fn check(&mut self, elapsed: Duration, crossed_outer: bool, has_selection: bool) -> bool {
        if self.phase != GesturePhase::Armed {
            return false;
        }
        if self.window.is_over(elapsed) {
            self.phase = GesturePhase::Expired;
            return false;
        }
        if crossed_outer && has_selection && self.window.contains(elapsed) {
            self.phase = GesturePhase::Fired;
            return true;
        }
        false
    }
}

/// A submenu waiting to open once the session clock reaches `due`. `wait` is the countdown
/// that was started when the slot became hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverDeadline {
    pub slot: usize,
    pub wait: Duration,
    pub due: Duration,
}

/// Single-shot timer for opening a hovered submenu. Moving to another slot restarts it.
#[derive(Debug, Clone)]
pub struct HoverTimer {
    delay: Duration,
    pending: Option<HoverDeadline>,
}

impl Default for HoverTimer {
    fn default() -> Self {
        Self::new(SUBMENU_HOVER_DELAY)
    }
}

impl HoverTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn pending(&self) -> Option<HoverDeadline> {
        self.pending
    }

    /// Starts or restarts the countdown for `slot`. While the gesture window is still open the
    /// countdown only begins once it closes, so a quick flick through a submenu item never
    /// opens that submenu.
    pub fn track(&mut self, slot: usize, elapsed: Duration, gesture: GestureWindow) {
        if self.pending.is_some_and(|p| p.slot == slot) {
            return;
        }
        let wait = if elapsed < gesture.limit {
            (gesture.limit - elapsed) + self.delay
        } else {
            self.delay
        };
        self.pending = Some(HoverDeadline {
            slot,
            wait,
            due: elapsed + wait,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Returns the slot whose submenu should open, at most once per tracking.
    pub fn poll(&mut self, elapsed: Duration) -> Option<usize> {
        let deadline = self.pending?;
        if elapsed < deadline.due {
            return None;
        }
        self.pending = None;
        Some(deadline.slot)
    }
}
