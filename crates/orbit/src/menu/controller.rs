//! The menu controller: turns pointer samples, button presses and ticks into [`MenuEvent`]s.
//!
//! Every handler runs to completion and returns the events it produced, in order. The controller
//! never reads a clock; callers pass `now`. Input that arrives without an open session, or while
//! the [`InputGate`] is blocking, is dropped.

use super::confirm::{ConfirmHandle, InputGate};
use super::drag::{DragEvent, DragManager};
use super::geometry::{Point, Polar, Ring, RingHit, RingId, RingLayout, classify_distance};
use super::item::{ItemId, MenuItem, item_ids};
use super::submenu::SubmenuStack;
use super::timers::{GesturePhase, GestureTimer, HoverTimer};
use super::{CENTER_CLOSE_SLACK, InteractionConfig, PREVIEW_DEAD_ZONE};
use derive_more::{Display, From};
use log::debug;
use std::time::{Duration, Instant};

/// Identifies one showing of the menu. Ticks carry it so a tick queued for an earlier showing
/// cannot touch the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From)]
pub struct SessionId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum MenuEvent {
    SelectionChanged {
        ring: RingId,
        slot: usize,
        label: String,
    },
    SubmenuOpened {
        parent_slot: usize,
        depth: usize,
        items: Vec<ItemId>,
    },
    SubmenuClosed,
    DragActivated {
        ring: RingId,
        slot: usize,
    },
    ItemsSwapped {
        ring: RingId,
        a: usize,
        b: usize,
    },
    DragFinished {
        ring: RingId,
    },
    DragCanceled {
        ring: RingId,
    },
    /// The order of one ring changed and should be persisted. `path` locates the ring: empty
    /// for the main ring, otherwise the index path of the submenu's parent.
    ReorderCommitted {
        ring: RingId,
        path: Vec<usize>,
        order: Vec<ItemId>,
    },
    ItemActivated(MenuItem),
    ConfirmationRequested {
        handle: ConfirmHandle,
        message: String,
    },
    ConfirmationResolved {
        handle: ConfirmHandle,
        accepted: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    NoSelection,
    ItemSelected,
    SubmenuHighlighted,
    Dragging,
}

#[derive(Debug, Clone)]
pub struct InteractionSession {
    pub id: SessionId,
    pub opened_at: Instant,
    pub selected: Option<usize>,
    pub was_in_center: bool,
    pub captured: bool,
    /// Menu center in screen pixels, for ticks that sample the global pointer.
    pub screen_center: Point,
    pub dpi_scale: f64,
}

#[derive(Debug)]
pub struct MenuController {
    config: InteractionConfig,
    items: Vec<MenuItem>,
    session: Option<InteractionSession>,
    next_session: u64,
    drag: DragManager,
    submenus: SubmenuStack,
    gesture: GestureTimer,
    hover: HoverTimer,
    gate: InputGate,
}

impl MenuController {
    pub fn new(config: InteractionConfig, items: Vec<MenuItem>) -> Self {
        Self {
            drag: DragManager::new(config.drag),
            submenus: SubmenuStack::new(config.max_submenu_depth),
            gesture: GestureTimer::new(config.gesture),
            hover: HoverTimer::new(config.submenu_hover_delay),
            gate: InputGate::default(),
            session: None,
            next_session: 0,
            config,
            items,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Replaces the configuration snapshot. Takes effect for the current session too.
    pub fn apply_config(&mut self, config: InteractionConfig) {
        self.drag.set_thresholds(config.drag);
        self.submenus.set_max_depth(config.max_submenu_depth);
        self.gesture.set_window(config.gesture);
        self.hover.set_delay(config.submenu_hover_delay);
        if !config.enable_gesture_activation && self.gesture.phase() == GesturePhase::Armed {
            self.gesture.disarm();
        }
        self.config = config;
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Swaps in a new item tree, dropping any drag, submenu and selection that pointed into the
    /// old one.
    pub fn set_items(&mut self, items: Vec<MenuItem>) -> Vec<MenuEvent> {
        let mut out = Vec::new();
        self.abort_drag(&mut out);
        self.close_submenu_into(&mut out);
        self.hover.cancel();
        if let Some(session) = &mut self.session {
            session.selected = None;
            session.was_in_center = false;
        }
        self.items = items;
        out
    }

    pub fn session(&self) -> Option<&InteractionSession> {
        self.session.as_ref()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn selected(&self) -> Option<usize> {
        self.session.as_ref().and_then(|s| s.selected)
    }

    pub fn submenus(&self) -> &SubmenuStack {
        &self.submenus
    }

    pub fn drag(&self) -> &DragManager {
        &self.drag
    }

    pub fn is_gated(&self) -> bool {
        self.gate.is_blocking()
    }

    pub fn state(&self) -> ControllerState {
        if self.drag.is_dragging() {
            ControllerState::Dragging
        } else if self
            .submenus
            .active()
            .is_some_and(|active| active.hovered.is_some())
        {
            ControllerState::SubmenuHighlighted
        } else if self.selected().is_some() {
            ControllerState::ItemSelected
        } else {
            ControllerState::NoSelection
        }
    }

    /// Starts a new showing. Every latch and timer of a previous showing is dropped.
    pub fn open_session(
        &mut self,
        now: Instant,
        screen_center: Point,
        dpi_scale: f64,
    ) -> SessionId {
        self.abort_drag(&mut Vec::new());
        self.submenus.close();
        self.hover.cancel();
        if self.config.enable_gesture_activation {
            self.gesture.arm();
        } else {
            self.gesture.disarm();
        }

        self.next_session += 1;
        let id = SessionId(self.next_session);
        self.session = Some(InteractionSession {
            id,
            opened_at: now,
            selected: None,
            was_in_center: false,
            captured: false,
            screen_center,
            dpi_scale: if dpi_scale > 0.0 { dpi_scale } else { 1.0 },
        });
        debug!("Menu session {id} opened");
        id
    }

    /// Ends the showing. Overlays go with it, so a pending confirmation is refused.
    pub fn close_session(&mut self) -> Vec<MenuEvent> {
        let mut out = Vec::new();
        if let Some(resolution) = self.gate.release() {
            debug!("Confirmation {} refused on close", resolution.handle);
            out.push(MenuEvent::ConfirmationResolved {
                handle: resolution.handle,
                accepted: resolution.accepted,
            });
        }
        let Some(session) = self.session.as_ref() else {
            return out;
        };
        let id = session.id;
        self.abort_drag(&mut out);
        self.close_submenu_into(&mut out);
        self.hover.cancel();
        self.gesture.disarm();
        self.session = None;
        debug!("Menu session {id} closed");
        out
    }

    /// Whether `local` falls on the menu rather than on the transparent canvas around it.
    pub fn contains(&self, local: Point) -> bool {
        let distance = self.polar(local).distance;
        let outer = if self.submenus.is_open() {
            self.config.metrics.submenu_ring().outer
        } else {
            self.config.metrics.main_ring().outer
        };
        distance <= outer
    }

    pub fn pointer_move(&mut self, local: Point, now: Instant) -> Vec<MenuEvent> {
        let mut out = Vec::new();
        if !self.accepting() {
            return out;
        }
        let polar = self.polar(local);

        if self.drag.is_active() && self.service_drag(local, polar, now, &mut out) {
            return out;
        }

        let main = self.main_layout();
        if !main.is_active() {
            return out;
        }

        if self.submenus.is_open() {
            let grace = self.config.submenu_grace_margin;
            match classify_distance(polar.distance, &self.rings(), grace) {
                RingHit::Outside => self.close_submenu_into(&mut out),
                RingHit::Center if polar.distance < main.ring.inner - CENTER_CLOSE_SLACK => {
                    self.close_submenu_into(&mut out)
                }
                RingHit::Ring(RingId::Submenu) => {
                    let slot = self.submenu_layout().and_then(|l| l.slot_at(polar.angle));
                    self.hover_submenu_slot(slot, &mut out);
                    return out;
                }
                _ => {}
            }
        }

        let elapsed = self.elapsed(now);
        if main.ring.contains(polar.distance) {
            let came_from_center = self
                .session
                .as_mut()
                .is_some_and(|s| std::mem::take(&mut s.was_in_center));
            if let Some(slot) = main.slot_at(polar.angle) {
                if self.selected() != Some(slot) {
                    self.select_main(slot, elapsed, &mut out);
                } else if came_from_center
                    && self.items[slot].has_submenu()
                    && !self.submenu_open_under(slot)
                {
                    self.hover.cancel();
                    self.open_submenu_at(slot, &mut out);
                }
            }
        } else if polar.distance < main.ring.inner
            && let Some(session) = &mut self.session
        {
            session.was_in_center = true;
        }

        if polar.distance > main.ring.outer {
            self.check_gesture(elapsed, &mut out);
        }
        out
    }

    pub fn pointer_down(&mut self, local: Point, now: Instant) -> Vec<MenuEvent> {
        let out = Vec::new();
        if !self.accepting() {
            return out;
        }
        if let Some(session) = &mut self.session {
            session.captured = true;
        }

        if let Some((ring, slot)) = self.target_under(self.polar(local)) {
            self.drag.begin_potential_drag(slot, local, ring, now);
        }
        out
    }

    pub fn pointer_up(&mut self, local: Point, now: Instant) -> Vec<MenuEvent> {
        let mut out = Vec::new();
        if !self.accepting() {
            return out;
        }
        if let Some(session) = &mut self.session {
            session.captured = false;
        }

        if self.drag.is_dragging() {
            let mut events = Vec::new();
            self.drag.finish(&mut events);
            self.apply_drag_events(events, &mut out);
            return out;
        }
        if self.drag.is_active() {
            let aborted = self.drag.has_moved_significantly(local);
            // a press that never became a drag leaves no trace
            self.drag.cancel(&mut Vec::new());
            if aborted {
                return out;
            }
        }

        if let Some((ring, slot)) = self.target_under(self.polar(local)) {
            self.activate(ring, slot, &mut out);
        }
        out
    }

    /// Periodic poll while the menu is visible. `screen_pos` is the global pointer position.
    pub fn tick(&mut self, session: SessionId, screen_pos: Point, now: Instant) -> Vec<MenuEvent> {
        let mut out = Vec::new();
        if !self.accepting() || self.session_id() != Some(session) {
            return out;
        }
        let elapsed = self.elapsed(now);

        if !self.drag.is_dragging()
            && let Some(slot) = self.hover.poll(elapsed)
            && self.items.get(slot).is_some_and(MenuItem::has_submenu)
            && !self.submenu_open_under(slot)
        {
            self.open_submenu_at(slot, &mut out);
        }

        if self.gesture.phase() != GesturePhase::Armed || self.drag.is_active() {
            return out;
        }
        let Some((screen_center, dpi)) = self
            .session
            .as_ref()
            .map(|s| (s.screen_center, s.dpi_scale))
        else {
            return out;
        };
        let polar = Polar::from_offset(screen_pos.offset_from(screen_center));
        let main = self.main_layout();
        let main_ring = main.ring.scaled(dpi);

        // keep the selection live even before the pointer leaves the ring
        let in_main = main_ring.contains(polar.distance);
        if polar.distance > PREVIEW_DEAD_ZONE * dpi
            && (in_main || !self.submenus.is_open())
            && let Some(slot) = main.slot_at(polar.angle)
            && self.selected() != Some(slot)
        {
            self.select_main(slot, elapsed, &mut out);
        }

        if polar.distance > main_ring.outer {
            self.check_gesture(elapsed, &mut out);
        }
        out
    }

    /// Aborts the current drag and restores the original order.
    pub fn cancel_drag(&mut self) -> Vec<MenuEvent> {
        let mut out = Vec::new();
        self.abort_drag(&mut out);
        out
    }

    pub fn go_back(&mut self) -> Vec<MenuEvent> {
        self.close_submenu()
    }

    pub fn open_submenu(&mut self, id: &ItemId) -> Vec<MenuEvent> {
        let mut out = Vec::new();
        self.open_submenu_into(id, &mut out);
        out
    }

    pub fn close_submenu(&mut self) -> Vec<MenuEvent> {
        let mut out = Vec::new();
        self.close_submenu_into(&mut out);
        out
    }

    /// Puts up a confirmation. Input stays gated until the returned handle is resolved or
    /// dismissed. A confirmation that was still pending is refused.
    pub fn request_confirmation(
        &mut self,
        message: impl Into<String>,
    ) -> (ConfirmHandle, Vec<MenuEvent>) {
        let mut out = Vec::new();
        self.abort_drag(&mut out);
        self.hover.cancel();

        if let Some(previous) = self.gate.pending().map(|p| p.handle)
            && let Some(resolution) = self.gate.dismiss(previous)
        {
            out.push(MenuEvent::ConfirmationResolved {
                handle: resolution.handle,
                accepted: resolution.accepted,
            });
        }

        let message = message.into();
        let handle = self.gate.request(message.clone());
        debug!("Confirmation {handle} requested");
        out.push(MenuEvent::ConfirmationRequested { handle, message });
        (handle, out)
    }

    pub fn resolve_confirmation(
        &mut self,
        handle: ConfirmHandle,
        accepted: bool,
    ) -> Vec<MenuEvent> {
        self.gate
            .resolve(handle, accepted)
            .map(|resolution| {
                debug!("Confirmation {handle} resolved: {accepted}");
                vec![MenuEvent::ConfirmationResolved {
                    handle: resolution.handle,
                    accepted: resolution.accepted,
                }]
            })
            .unwrap_or_default()
    }

    pub fn dismiss_confirmation(&mut self, handle: ConfirmHandle) -> Vec<MenuEvent> {
        self.resolve_confirmation(handle, false)
    }

    pub fn set_context_menu_open(&mut self, open: bool) {
        if open {
            self.abort_drag(&mut Vec::new());
            self.hover.cancel();
        }
        self.gate.set_context_menu_open(open);
    }

    fn accepting(&self) -> bool {
        self.session.is_some() && !self.gate.is_blocking()
    }

    fn elapsed(&self, now: Instant) -> Duration {
        self.session
            .as_ref()
            .map_or(Duration::ZERO, |s| now.saturating_duration_since(s.opened_at))
    }

    fn polar(&self, local: Point) -> Polar {
        Polar::from_offset(local.offset_from(self.config.local_center))
    }

    fn main_layout(&self) -> RingLayout {
        RingLayout::new(self.config.metrics.main_ring(), self.items.len())
    }

    fn submenu_layout(&self) -> Option<RingLayout> {
        let items = self.submenus.items(&self.items)?;
        Some(RingLayout::new(self.config.metrics.submenu_ring(), items.len()))
            .filter(RingLayout::is_active)
    }

    fn rings(&self) -> [(RingId, Ring); 2] {
        [
            (RingId::Main, self.config.metrics.main_ring()),
            (RingId::Submenu, self.config.metrics.submenu_ring()),
        ]
    }

    fn submenu_open_under(&self, slot: usize) -> bool {
        self.submenus.active().is_some_and(|a| a.root_slot() == slot)
    }

    fn label(&self, ring: RingId, slot: usize) -> String {
        self.ring_items(ring)
            .and_then(|items| items.get(slot))
            .map(|item| item.label.clone())
            .unwrap_or_default()
    }

    fn ring_items(&self, ring: RingId) -> Option<&[MenuItem]> {
        match ring {
            RingId::Main => Some(&self.items),
            RingId::Submenu => self.submenus.items(&self.items),
        }
    }

    /// Ring and slot under the pointer, recomputed from scratch.
    fn target_under(&self, polar: Polar) -> Option<(RingId, usize)> {
        if self.submenus.is_open()
            && classify_distance(polar.distance, &self.rings(), self.config.submenu_grace_margin)
                == RingHit::Ring(RingId::Submenu)
        {
            let slot = self.submenu_layout()?.slot_at(polar.angle)?;
            return Some((RingId::Submenu, slot));
        }
        let slot = self.main_layout().hit(polar)?;
        Some((RingId::Main, slot))
    }

    fn select_main(&mut self, slot: usize, elapsed: Duration, out: &mut Vec<MenuEvent>) {
        if self.submenus.is_open() && !self.submenu_open_under(slot) {
            self.close_submenu_into(out);
        }
        if let Some(session) = &mut self.session {
            session.selected = Some(slot);
        }
        out.push(MenuEvent::SelectionChanged {
            ring: RingId::Main,
            slot,
            label: self.label(RingId::Main, slot),
        });

        if self.items[slot].has_submenu() && !self.submenu_open_under(slot) {
            self.hover.track(slot, elapsed, self.gesture.window());
        } else {
            self.hover.cancel();
        }
    }

    fn hover_submenu_slot(&mut self, slot: Option<usize>, out: &mut Vec<MenuEvent>) {
        let Some(active) = self.submenus.active() else {
            return;
        };
        if active.hovered == slot {
            return;
        }
        self.submenus.set_hovered(slot);
        if let Some(slot) = slot {
            out.push(MenuEvent::SelectionChanged {
                ring: RingId::Submenu,
                slot,
                label: self.label(RingId::Submenu, slot),
            });
        }
    }

    fn check_gesture(&mut self, elapsed: Duration, out: &mut Vec<MenuEvent>) {
        if self.submenus.is_open() {
            return;
        }
        let selected = self.selected();
        if !self.gesture.check(elapsed, true, selected.is_some()) {
            return;
        }
        if let Some(slot) = selected {
            debug!("Gesture activation on slot {slot} after {elapsed:?}");
            self.activate(RingId::Main, slot, out);
        }
    }

    /// Opens the submenu of a submenu-only item, otherwise reports the item as chosen.
    fn activate(&mut self, ring: RingId, slot: usize, out: &mut Vec<MenuEvent>) {
        let Some(item) = self.ring_items(ring).and_then(|items| items.get(slot)).cloned() else {
            return;
        };
        self.hover.cancel();
        if item.is_submenu_only() {
            self.open_submenu_into(&item.id, out);
        } else {
            self.gesture.disarm();
            out.push(MenuEvent::ItemActivated(item));
        }
    }

    fn open_submenu_at(&mut self, slot: usize, out: &mut Vec<MenuEvent>) {
        if let Some(id) = self.items.get(slot).map(|item| item.id.clone()) {
            self.open_submenu_into(&id, out);
        }
    }

    fn open_submenu_into(&mut self, id: &ItemId, out: &mut Vec<MenuEvent>) {
        if self.drag.target() == Some(RingId::Submenu) {
            self.abort_drag(out);
        }
        let Some(opened) = self.submenus.open(&self.items, id) else {
            return;
        };
        if opened.replaced {
            out.push(MenuEvent::SubmenuClosed);
        }
        let items = self.submenus.items(&self.items).map(item_ids).unwrap_or_default();
        debug!(
            "Submenu opened under slot {} at depth {}",
            opened.parent_slot, opened.depth
        );
        out.push(MenuEvent::SubmenuOpened {
            parent_slot: opened.parent_slot,
            depth: opened.depth,
            items,
        });
    }

    fn close_submenu_into(&mut self, out: &mut Vec<MenuEvent>) {
        if self.drag.target() == Some(RingId::Submenu) {
            self.abort_drag(out);
        }
        if self.submenus.close() {
            debug!("Submenu closed");
            out.push(MenuEvent::SubmenuClosed);
        }
    }

    /// Cancels whatever drag is in progress. Only a drag that actually started is visible to
    /// the caller.
    fn abort_drag(&mut self, out: &mut Vec<MenuEvent>) {
        let mut events = Vec::new();
        let visible = self.drag.is_dragging();
        self.drag.cancel(&mut events);
        if visible {
            debug!("Drag canceled");
            self.apply_drag_events(events, out);
        }
    }

    /// Advances an active drag. Returns whether the pointer is now owned by the drag.
    fn service_drag(
        &mut self,
        local: Point,
        polar: Polar,
        now: Instant,
        out: &mut Vec<MenuEvent>,
    ) -> bool {
        let mut events = Vec::new();
        self.drag.try_activate(local, now, &mut events);

        if self.drag.is_dragging() {
            let layout = match self.drag.target() {
                Some(RingId::Submenu) => self.submenu_layout(),
                _ => Some(self.main_layout()),
            };
            if let Some(slot) = layout.and_then(|l| l.hit(polar)) {
                self.drag.update_target(slot, &mut events);
            }
        }

        self.apply_drag_events(events, out);
        self.drag.is_dragging()
    }

    fn apply_drag_events(&mut self, events: Vec<DragEvent>, out: &mut Vec<MenuEvent>) {
        for event in events {
            match event {
                DragEvent::Activated { index, target } => {
                    if target == RingId::Main {
                        self.hover.cancel();
                        self.close_submenu_into(out);
                    }
                    debug!("Drag activated on {target} slot {index}");
                    out.push(MenuEvent::DragActivated {
                        ring: target,
                        slot: index,
                    });
                }
                DragEvent::Swapped { a, b, target } => {
                    let items = match target {
                        RingId::Main => Some(self.items.as_mut_slice()),
                        RingId::Submenu => self.submenus.items_mut(&mut self.items),
                    };
                    if let Some(items) = items
                        && a < items.len()
                        && b < items.len()
                    {
                        items.swap(a, b);
                        out.push(MenuEvent::ItemsSwapped { ring: target, a, b });
                    }
                }
                DragEvent::Finished { target } => {
                    out.push(MenuEvent::DragFinished { ring: target });
                    let path = match target {
                        RingId::Main => Vec::new(),
                        RingId::Submenu => self
                            .submenus
                            .active()
                            .map(|a| a.path().to_vec())
                            .unwrap_or_default(),
                    };
                    let order = self.ring_items(target).map(item_ids).unwrap_or_default();
                    debug!("Drag committed on {target}");
                    out.push(MenuEvent::ReorderCommitted {
                        ring: target,
                        path,
                        order,
                    });
                }
                DragEvent::Canceled { target } => {
                    out.push(MenuEvent::DragCanceled { ring: target });
                }
            }
        }
        self.follow_dragged_item(out);
    }

    /// The selection indicator stays on the dragged item.
    fn follow_dragged_item(&mut self, out: &mut Vec<MenuEvent>) {
        let (Some(ring), Some(slot)) = (self.drag.target(), self.drag.current_index()) else {
            return;
        };
        if !self.drag.is_dragging() {
            return;
        }
        match ring {
            RingId::Main => {
                if self.selected() == Some(slot) {
                    return;
                }
                if let Some(session) = &mut self.session {
                    session.selected = Some(slot);
                }
            }
            RingId::Submenu => {
                if self.submenus.active().and_then(|a| a.hovered) == Some(slot) {
                    return;
                }
                self.submenus.set_hovered(Some(slot));
            }
        }
        out.push(MenuEvent::SelectionChanged {
            ring,
            slot,
            label: self.label(ring, slot),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::LOCAL_CENTER;
    use crate::menu::item::{Action, KeyCombo};
    use std::path::PathBuf;

    const SCREEN_CENTER: Point = Point::new(1000.0, 600.0);

    /// Local point `distance` px from the center, `angle` degrees clockwise from the top.
    fn at(angle: f64, distance: f64) -> Point {
        let rad = angle.to_radians();
        Point::new(
            LOCAL_CENTER.x + rad.sin() * distance,
            LOCAL_CENTER.y - rad.cos() * distance,
        )
    }

    fn ms(t0: Instant, value: u64) -> Instant {
        t0 + Duration::from_millis(value)
    }

    // slots: 0 top, 1 right, 2 bottom, 3 left
    fn items() -> Vec<MenuItem> {
        vec![
            MenuItem::new("Copy")
                .with_id("copy")
                .with_action(Action::Shortcut(KeyCombo::new("Ctrl+C"))),
            MenuItem::new("Apps").with_id("apps").with_children(vec![
                MenuItem::new("Terminal")
                    .with_id("term")
                    .with_action(Action::Command("foot".to_string())),
                MenuItem::new("More")
                    .with_id("more")
                    .with_children(vec![MenuItem::new("Editor").with_id("editor")]),
                MenuItem::new("Downloads")
                    .with_id("downloads")
                    .with_action(Action::LaunchPath(PathBuf::from("/tmp"))),
            ]),
            MenuItem::new("Paste")
                .with_id("paste")
                .with_action(Action::Shortcut(KeyCombo::new("Ctrl+V"))),
            MenuItem::new("Home")
                .with_id("home")
                .with_action(Action::LaunchPath(PathBuf::from("/home"))),
        ]
    }

    fn ids(values: &[&str]) -> Vec<ItemId> {
        values.iter().copied().map(ItemId::from).collect()
    }

    fn started(config: InteractionConfig) -> (MenuController, SessionId, Instant) {
        let mut controller = MenuController::new(config, items());
        let t0 = Instant::now();
        let id = controller.open_session(t0, SCREEN_CENTER, 1.0);
        (controller, id, t0)
    }

    fn with_gestures() -> InteractionConfig {
        InteractionConfig {
            enable_gesture_activation: true,
            ..InteractionConfig::default()
        }
    }

    fn activated(events: &[MenuEvent]) -> Option<&str> {
        events.iter().find_map(|e| match e {
            MenuEvent::ItemActivated(item) => Some(item.label.as_str()),
            _ => None,
        })
    }

    /// Opens the "Apps" submenu through the center: ring, hole, same slot again.
    fn open_apps(controller: &mut MenuController, t0: Instant) {
        controller.pointer_move(at(90.0, 80.0), ms(t0, 10));
        controller.pointer_move(at(90.0, 10.0), ms(t0, 20));
        controller.pointer_move(at(90.0, 80.0), ms(t0, 30));
        assert!(controller.submenus().is_open());
    }

    #[test]
    fn moving_over_the_ring_selects() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        assert_eq!(controller.state(), ControllerState::NoSelection);

        let events = controller.pointer_move(at(180.0, 80.0), ms(t0, 10));
        assert_eq!(
            events,
            vec![MenuEvent::SelectionChanged {
                ring: RingId::Main,
                slot: 2,
                label: "Paste".to_string()
            }]
        );
        assert_eq!(controller.state(), ControllerState::ItemSelected);

        // same slot again changes nothing
        assert!(controller.pointer_move(at(185.0, 90.0), ms(t0, 20)).is_empty());
    }

    #[test]
    fn center_round_trip_opens_submenu_instantly() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        controller.pointer_move(at(90.0, 80.0), ms(t0, 10));
        assert!(controller.pointer_move(at(90.0, 10.0), ms(t0, 20)).is_empty());

        let events = controller.pointer_move(at(90.0, 80.0), ms(t0, 30));
        assert_eq!(
            events,
            vec![MenuEvent::SubmenuOpened {
                parent_slot: 1,
                depth: 1,
                items: ids(&["term", "more", "downloads"]),
            }]
        );
    }

    #[test]
    fn hover_waits_for_the_gesture_window() {
        let (mut controller, id, t0) = started(InteractionConfig::default());
        controller.pointer_move(at(90.0, 80.0), ms(t0, 100));

        assert!(controller.tick(id, SCREEN_CENTER, ms(t0, 400)).is_empty());
        assert!(controller.tick(id, SCREEN_CENTER, ms(t0, 799)).is_empty());
        let events = controller.tick(id, SCREEN_CENTER, ms(t0, 800));
        assert!(matches!(
            events.as_slice(),
            [MenuEvent::SubmenuOpened {
                parent_slot: 1,
                depth: 1,
                ..
            }]
        ));
    }

    #[test]
    fn leaving_the_slot_cancels_hover() {
        let (mut controller, id, t0) = started(InteractionConfig::default());
        controller.pointer_move(at(90.0, 80.0), ms(t0, 600));
        controller.pointer_move(at(0.0, 80.0), ms(t0, 700));
        assert!(controller.tick(id, SCREEN_CENTER, ms(t0, 2000)).is_empty());
        assert!(!controller.submenus().is_open());
    }

    #[test]
    fn submenu_ring_takes_priority_until_far_outside() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        open_apps(&mut controller, t0);

        let events = controller.pointer_move(at(0.0, 180.0), ms(t0, 40));
        assert_eq!(
            events,
            vec![MenuEvent::SelectionChanged {
                ring: RingId::Submenu,
                slot: 0,
                label: "Terminal".to_string()
            }]
        );
        assert_eq!(controller.state(), ControllerState::SubmenuHighlighted);

        // still inside the grace margin
        assert!(controller.pointer_move(at(0.0, 370.0), ms(t0, 50)).is_empty());
        assert!(controller.submenus().is_open());

        let events = controller.pointer_move(at(0.0, 371.0), ms(t0, 60));
        assert_eq!(events, vec![MenuEvent::SubmenuClosed]);
        assert_eq!(controller.submenus().depth(), 0);
        assert_eq!(controller.state(), ControllerState::ItemSelected);
    }

    #[test]
    fn submenu_closes_deep_in_the_center() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        open_apps(&mut controller, t0);

        assert!(controller.pointer_move(at(0.0, 40.0), ms(t0, 40)).is_empty());
        assert!(controller.submenus().is_open());
        assert_eq!(
            controller.pointer_move(at(0.0, 30.0), ms(t0, 50)),
            vec![MenuEvent::SubmenuClosed]
        );
    }

    #[test]
    fn selecting_another_main_slot_closes_submenu() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        open_apps(&mut controller, t0);
        let events = controller.pointer_move(at(180.0, 80.0), ms(t0, 40));
        assert_eq!(events[0], MenuEvent::SubmenuClosed);
        assert!(matches!(
            events[1],
            MenuEvent::SelectionChanged { slot: 2, .. }
        ));
    }

    #[test]
    fn click_target_is_resolved_at_release() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        controller.pointer_move(at(0.0, 80.0), ms(t0, 10));
        assert_eq!(controller.selected(), Some(0));

        // no move sample reached the controller between hovering Copy and the click on Paste
        assert!(controller.pointer_down(at(180.0, 80.0), ms(t0, 20)).is_empty());
        let events = controller.pointer_up(at(180.0, 80.0), ms(t0, 30));
        assert_eq!(activated(&events), Some("Paste"));
    }

    #[test]
    fn clicking_a_submenu_only_item_opens_it() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        controller.pointer_down(at(90.0, 80.0), ms(t0, 10));
        let events = controller.pointer_up(at(90.0, 80.0), ms(t0, 20));
        assert!(matches!(
            events.as_slice(),
            [MenuEvent::SubmenuOpened { parent_slot: 1, .. }]
        ));
        assert_eq!(activated(&events), None);
    }

    #[test]
    fn clicks_in_the_submenu_ring() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        open_apps(&mut controller, t0);

        controller.pointer_down(at(0.0, 180.0), ms(t0, 40));
        let events = controller.pointer_up(at(0.0, 180.0), ms(t0, 50));
        assert_eq!(activated(&events), Some("Terminal"));

        controller.pointer_down(at(120.0, 180.0), ms(t0, 60));
        let events = controller.pointer_up(at(120.0, 180.0), ms(t0, 70));
        assert_eq!(
            events,
            vec![
                MenuEvent::SubmenuClosed,
                MenuEvent::SubmenuOpened {
                    parent_slot: 1,
                    depth: 2,
                    items: ids(&["editor"]),
                },
            ]
        );
    }

    #[test]
    fn click_outside_every_ring_does_nothing() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        controller.pointer_down(at(0.0, 200.0), ms(t0, 10));
        assert!(controller.pointer_up(at(0.0, 200.0), ms(t0, 20)).is_empty());
        assert!(!controller.contains(at(0.0, 200.0)));
        assert!(controller.contains(at(0.0, 130.0)));
    }

    #[test]
    fn drag_commit_reports_the_new_order() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        controller.pointer_move(at(0.0, 80.0), ms(t0, 10));
        controller.pointer_down(at(0.0, 80.0), ms(t0, 20));

        let events = controller.pointer_move(at(180.0, 80.0), ms(t0, 30));
        assert_eq!(
            events,
            vec![
                MenuEvent::DragActivated {
                    ring: RingId::Main,
                    slot: 0
                },
                MenuEvent::ItemsSwapped {
                    ring: RingId::Main,
                    a: 0,
                    b: 2
                },
                MenuEvent::SelectionChanged {
                    ring: RingId::Main,
                    slot: 2,
                    label: "Copy".to_string()
                },
            ]
        );
        assert_eq!(controller.state(), ControllerState::Dragging);

        let events = controller.pointer_up(at(180.0, 80.0), ms(t0, 40));
        let order = ids(&["paste", "apps", "copy", "home"]);
        assert_eq!(
            events,
            vec![
                MenuEvent::DragFinished { ring: RingId::Main },
                MenuEvent::ReorderCommitted {
                    ring: RingId::Main,
                    path: Vec::new(),
                    order: order.clone(),
                },
            ]
        );
        assert_eq!(item_ids(controller.items()), order);
        assert_eq!(activated(&events), None);
    }

    #[test]
    fn drag_cancel_restores_order() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        let original = item_ids(controller.items());
        controller.pointer_down(at(0.0, 80.0), ms(t0, 20));
        controller.pointer_move(at(270.0, 80.0), ms(t0, 30));

        let events = controller.cancel_drag();
        assert_eq!(
            events,
            vec![
                MenuEvent::ItemsSwapped {
                    ring: RingId::Main,
                    a: 3,
                    b: 0
                },
                MenuEvent::DragCanceled { ring: RingId::Main },
            ]
        );
        assert_eq!(item_ids(controller.items()), original);
        assert!(controller.cancel_drag().is_empty());
    }

    #[test]
    fn main_drag_closes_submenu() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        open_apps(&mut controller, t0);
        controller.pointer_down(at(0.0, 80.0), ms(t0, 40));
        let events = controller.pointer_move(at(180.0, 80.0), ms(t0, 50));
        assert_eq!(events[0], MenuEvent::SubmenuClosed);
        assert!(!controller.submenus().is_open());
    }

    #[test]
    fn submenu_drag_reorders_children() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        open_apps(&mut controller, t0);
        controller.pointer_down(at(0.0, 180.0), ms(t0, 40));
        controller.pointer_move(at(240.0, 180.0), ms(t0, 50));
        let events = controller.pointer_up(at(240.0, 180.0), ms(t0, 60));

        assert_eq!(
            events.last(),
            Some(&MenuEvent::ReorderCommitted {
                ring: RingId::Submenu,
                path: vec![1],
                order: ids(&["downloads", "more", "term"]),
            })
        );
        assert_eq!(controller.items()[1].children[2].label, "Terminal");
    }

    #[test]
    fn input_is_gated_while_confirming() {
        let (mut controller, id, t0) = started(InteractionConfig::default());
        let (handle, events) = controller.request_confirmation("Delete item?");
        assert_eq!(
            events,
            vec![MenuEvent::ConfirmationRequested {
                handle,
                message: "Delete item?".to_string()
            }]
        );

        assert!(controller.pointer_move(at(180.0, 80.0), ms(t0, 10)).is_empty());
        assert!(controller.pointer_down(at(180.0, 80.0), ms(t0, 20)).is_empty());
        assert!(controller.pointer_up(at(180.0, 80.0), ms(t0, 30)).is_empty());
        assert!(controller.tick(id, SCREEN_CENTER, ms(t0, 40)).is_empty());
        assert_eq!(controller.selected(), None);

        assert_eq!(
            controller.resolve_confirmation(handle, true),
            vec![MenuEvent::ConfirmationResolved {
                handle,
                accepted: true
            }]
        );
        assert!(!controller.is_gated());
        assert_eq!(controller.pointer_move(at(180.0, 80.0), ms(t0, 50)).len(), 1);
    }

    #[test]
    fn newer_confirmation_refuses_the_older() {
        let (mut controller, _, _) = started(InteractionConfig::default());
        let (first, _) = controller.request_confirmation("one");
        let (second, events) = controller.request_confirmation("two");
        assert_eq!(
            events[0],
            MenuEvent::ConfirmationResolved {
                handle: first,
                accepted: false
            }
        );
        assert!(controller.resolve_confirmation(first, true).is_empty());
        assert_eq!(controller.dismiss_confirmation(second).len(), 1);
        assert!(!controller.is_gated());
    }

    #[test]
    fn closing_refuses_a_pending_confirmation() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        let (handle, _) = controller.request_confirmation("Delete item?");
        controller.set_context_menu_open(true);

        assert_eq!(
            controller.close_session(),
            vec![MenuEvent::ConfirmationResolved {
                handle,
                accepted: false
            }]
        );
        assert!(!controller.is_gated());
        assert!(controller.resolve_confirmation(handle, true).is_empty());

        controller.open_session(ms(t0, 100), SCREEN_CENTER, 1.0);
        assert_eq!(controller.pointer_move(at(180.0, 80.0), ms(t0, 110)).len(), 1);
        assert_eq!(controller.selected(), Some(2));
    }

    #[test]
    fn context_menu_gates_input() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        controller.set_context_menu_open(true);
        assert!(controller.pointer_move(at(180.0, 80.0), ms(t0, 10)).is_empty());
        controller.set_context_menu_open(false);
        assert!(!controller.pointer_move(at(180.0, 80.0), ms(t0, 20)).is_empty());
    }

    #[test]
    fn stale_tick_cannot_touch_a_new_session() {
        let (mut controller, first, t0) = started(InteractionConfig::default());
        controller.pointer_move(at(90.0, 80.0), ms(t0, 100));
        controller.close_session();
        assert!(controller.tick(first, SCREEN_CENTER, ms(t0, 900)).is_empty());

        let second = controller.open_session(ms(t0, 1000), SCREEN_CENTER, 1.0);
        assert_ne!(first, second);
        assert!(controller.tick(first, SCREEN_CENTER, ms(t0, 2000)).is_empty());
        assert!(controller.tick(second, SCREEN_CENTER, ms(t0, 2000)).is_empty());
        assert!(!controller.submenus().is_open());
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn input_without_a_session_is_ignored() {
        let mut controller = MenuController::new(InteractionConfig::default(), items());
        let now = Instant::now();
        assert!(controller.pointer_move(at(180.0, 80.0), now).is_empty());
        assert!(controller.pointer_down(at(180.0, 80.0), now).is_empty());
        assert!(controller.close_session().is_empty());
    }

    #[test]
    fn gesture_fires_once_inside_the_window() {
        let (mut controller, id, t0) = started(with_gestures());
        controller.pointer_move(at(180.0, 80.0), ms(t0, 10));
        let outside = Point::new(SCREEN_CENTER.x, SCREEN_CENTER.y + 200.0);

        assert!(controller.tick(id, outside, ms(t0, 50)).is_empty());
        let events = controller.tick(id, outside, ms(t0, 200));
        assert_eq!(activated(&events), Some("Paste"));
        assert!(controller.tick(id, outside, ms(t0, 210)).is_empty());
        assert!(controller.tick(id, outside, ms(t0, 600)).is_empty());
    }

    #[test]
    fn gesture_respects_dpi_scale() {
        let mut controller = MenuController::new(with_gestures(), items());
        let t0 = Instant::now();
        let id = controller.open_session(t0, SCREEN_CENTER, 2.0);
        controller.pointer_move(at(180.0, 80.0), ms(t0, 10));

        // 200 px on screen is still inside the main ring at 2x
        let inside = Point::new(SCREEN_CENTER.x, SCREEN_CENTER.y + 200.0);
        assert!(controller.tick(id, inside, ms(t0, 200)).is_empty());
        let outside = Point::new(SCREEN_CENTER.x, SCREEN_CENTER.y + 300.0);
        assert_eq!(
            activated(&controller.tick(id, outside, ms(t0, 250))),
            Some("Paste")
        );
    }

    #[test]
    fn gesture_on_submenu_item_opens_it() {
        let (mut controller, _, t0) = started(with_gestures());
        controller.pointer_move(at(90.0, 80.0), ms(t0, 10));
        let events = controller.pointer_move(at(90.0, 200.0), ms(t0, 200));
        assert!(matches!(
            events.as_slice(),
            [MenuEvent::SubmenuOpened { parent_slot: 1, .. }]
        ));
    }

    #[test]
    fn gesture_expires_after_the_limit() {
        let (mut controller, _, t0) = started(with_gestures());
        controller.pointer_move(at(180.0, 80.0), ms(t0, 10));
        assert!(controller.pointer_move(at(180.0, 200.0), ms(t0, 600)).is_empty());
        controller.pointer_move(at(180.0, 80.0), ms(t0, 700));
        assert!(controller.pointer_move(at(180.0, 200.0), ms(t0, 710)).is_empty());
    }

    #[test]
    fn gesture_disabled_by_default() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        controller.pointer_move(at(180.0, 80.0), ms(t0, 10));
        assert!(controller.pointer_move(at(180.0, 200.0), ms(t0, 200)).is_empty());
    }

    #[test]
    fn tick_previews_selection_while_gestures_are_armed() {
        let (mut controller, id, t0) = started(with_gestures());
        let left = Point::new(SCREEN_CENTER.x - 80.0, SCREEN_CENTER.y);
        assert_eq!(
            controller.tick(id, left, ms(t0, 50)),
            vec![MenuEvent::SelectionChanged {
                ring: RingId::Main,
                slot: 3,
                label: "Home".to_string()
            }]
        );
        // too close to the center to mean anything
        let near = Point::new(SCREEN_CENTER.x, SCREEN_CENTER.y - 10.0);
        assert!(controller.tick(id, near, ms(t0, 60)).is_empty());
    }

    #[test]
    fn nested_submenus_stop_at_max_depth() {
        let mut node = MenuItem::new("leaf").with_id("leaf");
        for level in (0..5).rev() {
            node = MenuItem::new(format!("level {level}"))
                .with_id(format!("l{level}"))
                .with_children(vec![node]);
        }
        let mut controller = MenuController::new(InteractionConfig::default(), vec![node]);
        controller.open_session(Instant::now(), SCREEN_CENTER, 1.0);

        for (level, expected) in [("l0", 1), ("l1", 2), ("l2", 3)] {
            let events = controller.open_submenu(&ItemId::from(level));
            assert!(events.iter().any(
                |e| matches!(e, MenuEvent::SubmenuOpened { depth, .. } if *depth == expected)
            ));
        }
        assert!(controller.open_submenu(&ItemId::from("l3")).is_empty());
        assert_eq!(controller.submenus().depth(), 3);

        assert_eq!(controller.go_back(), vec![MenuEvent::SubmenuClosed]);
        assert_eq!(controller.submenus().depth(), 0);
    }

    #[test]
    fn replacing_items_drops_session_state() {
        let (mut controller, _, t0) = started(InteractionConfig::default());
        open_apps(&mut controller, t0);
        let events = controller.set_items(vec![MenuItem::new("Only")]);
        assert_eq!(events, vec![MenuEvent::SubmenuClosed]);
        assert_eq!(controller.selected(), None);
        assert_eq!(controller.items().len(), 1);
    }
}
