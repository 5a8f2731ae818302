use crate::menu::{ConfirmHandle, Point, SessionId};

/// Everything the UI loop reacts to. Pointer positions are in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Open the menu, at the given position or else where the pointer was last seen.
    Show(Option<Point>),
    Hide,
    PointerMove(Point),
    PointerDown(Point),
    PointerUp(Point),
    CancelDrag,
    Back,
    Tick(SessionId),
    /// Name of the process that just took the foreground.
    Foreground(String),
    Confirm(String),
    Resolve(ConfirmHandle, bool),
    Dismiss(ConfirmHandle),
    ConfigReload,
}
