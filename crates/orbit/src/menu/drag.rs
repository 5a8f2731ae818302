//! Drag-to-reorder state machine.
//!
//! `Idle -> Pending -> Dragging -> Idle`. A press arms a pending drag; the drag activates once
//! the pointer travels past the distance threshold or the press outlasts the time threshold.
//! While dragging, every retarget first puts the dragged item back on its initial slot and then
//! swaps it onto the new one, so the other items only ever move by a single pairwise swap
//! relative to the original layout.
//!
//! Calls that do not fit the current state are ignored. Effects are reported as [`DragEvent`]s
//! pushed onto the caller's buffer, in the order they must be applied.

use super::geometry::{Point, RingId};
use super::{DRAG_DISTANCE_THRESHOLD, DRAG_TIME_THRESHOLD};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragThresholds {
    pub distance: f64,
    pub time: Duration,
}

impl Default for DragThresholds {
    fn default() -> Self {
        Self {
            distance: DRAG_DISTANCE_THRESHOLD,
            time: DRAG_TIME_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Pending,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Activated { index: usize, target: RingId },
    Swapped { a: usize, b: usize, target: RingId },
    Finished { target: RingId },
    Canceled { target: RingId },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Grip {
    target: RingId,
    initial_index: usize,
    current_index: usize,
    start_point: Point,
    start_time: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Pending(Grip),
    Dragging(Grip),
}

#[derive(Debug, Clone)]
pub struct DragManager {
    thresholds: DragThresholds,
    state: DragState,
}

impl Default for DragManager {
    fn default() -> Self {
        Self::new(DragThresholds::default())
    }
}

impl DragManager {
    pub fn new(thresholds: DragThresholds) -> Self {
        Self {
            thresholds,
            state: DragState::Idle,
        }
    }

    pub fn set_thresholds(&mut self, thresholds: DragThresholds) {
        self.thresholds = thresholds;
    }

    pub fn phase(&self) -> DragPhase {
        match self.state {
            DragState::Idle => DragPhase::Idle,
            DragState::Pending(_) => DragPhase::Pending,
            DragState::Dragging(_) => DragPhase::Dragging,
        }
    }

    pub fn is_active(&self) -> bool {
        self.grip().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn target(&self) -> Option<RingId> {
        self.grip().map(|g| g.target)
    }

    /// Slot the dragged item occupies right now.
    pub fn current_index(&self) -> Option<usize> {
        self.grip().map(|g| g.current_index)
    }

    /// Slot the dragged item started from. Fixed for the whole drag.
    pub fn initial_index(&self) -> Option<usize> {
        self.grip().map(|g| g.initial_index)
    }

    fn grip(&self) -> Option<&Grip> {
        match &self.state {
            DragState::Idle => None,
            DragState::Pending(grip) | DragState::Dragging(grip) => Some(grip),
        }
    }

    pub fn begin_potential_drag(&mut self, index: usize, pos: Point, target: RingId, now: Instant) {
        if !matches!(self.state, DragState::Idle) {
            return;
        }
        self.state = DragState::Pending(Grip {
            target,
            initial_index: index,
            current_index: index,
            start_point: pos,
            start_time: now,
        });
    }

    /// Returns `true` only on the call that activates the drag.
    pub fn try_activate(&mut self, pos: Point, now: Instant, events: &mut Vec<DragEvent>) -> bool {
        let DragState::Pending(grip) = self.state else {
            return false;
        };

        let moved = pos.distance_to(grip.start_point) > self.thresholds.distance;
        let held = now.saturating_duration_since(grip.start_time) >= self.thresholds.time;
        if !(moved || held) {
            return false;
        }

        self.state = DragState::Dragging(grip);
        events.push(DragEvent::Activated {
            index: grip.current_index,
            target: grip.target,
        });
        true
    }

    pub fn update_target(&mut self, new_index: usize, events: &mut Vec<DragEvent>) {
        let DragState::Dragging(grip) = &mut self.state else {
            return;
        };
        if new_index == grip.current_index {
            return;
        }

        let target = grip.target;
        if grip.current_index != grip.initial_index {
            events.push(DragEvent::Swapped {
                a: grip.current_index,
                b: grip.initial_index,
                target,
            });
        }
        if new_index != grip.initial_index {
            events.push(DragEvent::Swapped {
                a: grip.initial_index,
                b: new_index,
                target,
            });
        }
        grip.current_index = new_index;
    }

    /// Commits whatever order the drag produced. The caller persists it.
    pub fn finish(&mut self, events: &mut Vec<DragEvent>) {
        let Some(grip) = self.grip().copied() else {
            return;
        };
        self.state = DragState::Idle;
        events.push(DragEvent::Finished {
            target: grip.target,
        });
    }

    /// Restores the original order and returns to idle.
    pub fn cancel(&mut self, events: &mut Vec<DragEvent>) {
        let was_dragging = self.is_dragging();
        let Some(grip) = self.grip().copied() else {
            return;
        };

        if was_dragging && grip.current_index != grip.initial_index {
            events.push(DragEvent::Swapped {
                a: grip.current_index,
                b: grip.initial_index,
                target: grip.target,
            });
        }
        self.state = DragState::Idle;
        events.push(DragEvent::Canceled {
            target: grip.target,
        });
    }

    /// Distinguishes a click from an aborted drag at release time.
    pub fn has_moved_significantly(&self, pos: Point) -> bool {
        self.grip()
            .is_some_and(|g| pos.distance_to(g.start_point) > self.thresholds.distance)
    }
}
