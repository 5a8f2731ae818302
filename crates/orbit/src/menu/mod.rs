use std::time::Duration;

pub mod confirm;
pub mod controller;
pub mod drag;
pub mod geometry;
pub mod item;
pub mod submenu;
pub mod timers;

pub use confirm::{ConfirmHandle, InputGate};
pub use controller::{ControllerState, MenuController, MenuEvent, SessionId};
pub use drag::{DragEvent, DragManager, DragThresholds};
pub use geometry::{Point, Polar, Ring, RingHit, RingId, RingLayout, RingMetrics};
pub use item::{Action, ItemId, MenuItem};
pub use submenu::SubmenuStack;
pub use timers::{GestureTimer, GestureWindow, HoverTimer};

pub const CANVAS_SIZE: f64 = 500.0;
pub const LOCAL_CENTER: Point = Point::new(CANVAS_SIZE / 2.0, CANVAS_SIZE / 2.0);

pub const CENTER_RADIUS: f64 = 45.0;
pub const RING_THICKNESS: f64 = 85.0;
pub const INDICATOR_THICKNESS: f64 = 4.0;
pub const RING_GAP: f64 = 5.0;
pub const SUBMENU_GRACE_MARGIN: f64 = 150.0; // overshoot tolerated past the submenu ring
pub const CENTER_CLOSE_SLACK: f64 = 10.0; // how far into the hole before a submenu closes
pub const PREVIEW_DEAD_ZONE: f64 = 20.0; // ticks ignore the pointer this close to the center

pub const GESTURE_WARMUP: Duration = Duration::from_millis(100);
pub const GESTURE_TIME_LIMIT: Duration = Duration::from_millis(500);
pub const GESTURE_TICK: Duration = Duration::from_millis(16);
pub const SUBMENU_HOVER_DELAY: Duration = Duration::from_millis(300);
pub const MAX_SUBMENU_DEPTH: usize = 3;

pub const DRAG_DISTANCE_THRESHOLD: f64 = 10.0;
pub const DRAG_TIME_THRESHOLD: Duration = Duration::from_millis(300);

/// Everything the controller reads from configuration, resolved once and handed over by value.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    pub metrics: RingMetrics,
    pub indicator_thickness: f64,
    pub enable_gesture_activation: bool,
    pub gesture: GestureWindow,
    pub gesture_tick: Duration,
    pub submenu_hover_delay: Duration,
    pub max_submenu_depth: usize,
    pub submenu_grace_margin: f64,
    pub drag: DragThresholds,
    pub local_center: Point,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            metrics: RingMetrics {
                center_radius: CENTER_RADIUS,
                ring_thickness: RING_THICKNESS,
                ring_gap: RING_GAP,
            },
            indicator_thickness: INDICATOR_THICKNESS,
            enable_gesture_activation: false,
            gesture: GestureWindow::default(),
            gesture_tick: GESTURE_TICK,
            submenu_hover_delay: SUBMENU_HOVER_DELAY,
            max_submenu_depth: MAX_SUBMENU_DEPTH,
            submenu_grace_margin: SUBMENU_GRACE_MARGIN,
            drag: DragThresholds::default(),
            local_center: LOCAL_CENTER,
        }
    }
}
