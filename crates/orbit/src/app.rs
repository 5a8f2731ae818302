//! The UI loop. Owns the controller and handles one [`AppEvent`] at a time, to completion.

use crate::config::{self, Settings};
use crate::events::AppEvent;
use crate::menu::{MenuController, MenuEvent, MenuItem, Point};
use crate::profile::{self, ProfileSwitcher};
use crate::sys::launch::{self, LaunchError};
use crate::sys::ticker::Ticker;
use async_channel::{Receiver, Sender};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Screen pixels to menu-local coordinates for a menu centered on `anchor`.
pub fn to_local(screen: Point, anchor: Point, dpi_scale: f64, local_center: Point) -> Point {
    let scale = if dpi_scale > 0.0 { dpi_scale } else { 1.0 };
    let offset = screen.offset_from(anchor);
    Point::new(
        local_center.x + offset.x / scale,
        local_center.y + offset.y / scale,
    )
}

pub struct App {
    settings: Settings,
    config_path: Option<PathBuf>,
    controller: MenuController,
    switcher: ProfileSwitcher,
    visible: bool,
    anchor: Point,
    dpi_scale: f64,
    last_pointer: Point,
    ticker: Ticker,
    tx: Sender<AppEvent>,
}

impl App {
    pub fn new(settings: Settings, config_path: Option<PathBuf>, tx: Sender<AppEvent>) -> Self {
        let controller =
            MenuController::new(settings.interaction(), settings.active_profile().items.clone());
        Self {
            settings,
            config_path,
            controller,
            switcher: ProfileSwitcher::default(),
            visible: false,
            anchor: Point::default(),
            dpi_scale: 1.0,
            last_pointer: Point::default(),
            ticker: Ticker::default(),
            tx,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn controller(&self) -> &MenuController {
        &self.controller
    }

    pub fn set_dpi_scale(&mut self, dpi_scale: f64) {
        self.dpi_scale = dpi_scale;
    }

    pub async fn run(mut self, rx: Receiver<AppEvent>) {
        while let Ok(event) = rx.recv().await {
            self.update(event);
        }
        self.ticker.stop();
    }

    /// Handles one event and returns the menu events it produced.
    pub fn update(&mut self, event: AppEvent) -> Vec<MenuEvent> {
        self.update_at(event, Instant::now())
    }

    pub fn update_at(&mut self, event: AppEvent, now: Instant) -> Vec<MenuEvent> {
        let events = match event {
            AppEvent::Show(at) => {
                self.show(at.unwrap_or(self.last_pointer), now);
                Vec::new()
            }
            AppEvent::Hide => self.hide(),
            AppEvent::PointerMove(p) => {
                self.last_pointer = p;
                if !self.visible {
                    return Vec::new();
                }
                self.controller.pointer_move(self.local(p), now)
            }
            AppEvent::PointerDown(p) => {
                self.last_pointer = p;
                if !self.visible {
                    return Vec::new();
                }
                let local = self.local(p);
                if self.settings.close_on_outside_click
                    && !self.controller.is_gated()
                    && !self.controller.contains(local)
                {
                    self.hide()
                } else {
                    self.controller.pointer_down(local, now)
                }
            }
            AppEvent::PointerUp(p) => {
                self.last_pointer = p;
                if !self.visible {
                    return Vec::new();
                }
                self.controller.pointer_up(self.local(p), now)
            }
            AppEvent::CancelDrag => self.controller.cancel_drag(),
            AppEvent::Back => self.controller.go_back(),
            AppEvent::Tick(session) => self.controller.tick(session, self.last_pointer, now),
            AppEvent::Foreground(process) => return self.switch_profile(&process),
            AppEvent::Confirm(message) => {
                let (handle, events) = self.controller.request_confirmation(message);
                info!("Waiting on confirmation {handle}");
                events
            }
            AppEvent::Resolve(handle, accepted) => {
                self.controller.resolve_confirmation(handle, accepted)
            }
            AppEvent::Dismiss(handle) => self.controller.dismiss_confirmation(handle),
            AppEvent::ConfigReload => return self.reload_config(),
        };
        self.dispatch(events)
    }

    fn local(&self, screen: Point) -> Point {
        to_local(
            screen,
            self.anchor,
            self.dpi_scale,
            self.controller.config().local_center,
        )
    }

    fn show(&mut self, cursor: Point, now: Instant) {
        // ticks read the pointer before the next move arrives
        self.last_pointer = cursor;
        self.anchor = profile::menu_anchor(&self.settings.active_profile(), cursor);
        let session = self.controller.open_session(now, self.anchor, self.dpi_scale);
        self.visible = true;
        self.ticker.start(
            session,
            self.controller.config().gesture_tick,
            self.tx.clone(),
        );
    }

    fn hide(&mut self) -> Vec<MenuEvent> {
        self.ticker.stop();
        self.visible = false;
        self.controller.close_session()
    }

    fn dispatch(&mut self, events: Vec<MenuEvent>) -> Vec<MenuEvent> {
        let mut dispatched = Vec::with_capacity(events.len());
        for event in events {
            let activated = match &event {
                MenuEvent::ReorderCommitted { ring, path, .. } => {
                    debug!("Reordered {ring} ring at {path:?}");
                    self.settings.active_profile_mut().items = self.controller.items().to_vec();
                    self.persist();
                    None
                }
                MenuEvent::ItemActivated(item) => Some(item.clone()),
                other => {
                    debug!("{other:?}");
                    None
                }
            };
            dispatched.push(event);
            if let Some(item) = activated {
                self.run_item(&item, &mut dispatched);
            }
        }
        dispatched
    }

    fn run_item(&mut self, item: &MenuItem, dispatched: &mut Vec<MenuEvent>) {
        info!("Activated '{}'", item.label);
        if !item.keep_open {
            dispatched.extend(self.hide());
        }
        let Some(action) = &item.action else {
            return;
        };
        match launch::execute(action) {
            Ok(()) => {}
            Err(e @ LaunchError::Unsupported(_)) => warn!("'{}': {}", item.label, e),
            Err(e) => error!("Failed to launch '{}': {}", item.label, e),
        }
    }

    fn persist(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = config::save_settings(path, &self.settings) {
            error!("Failed to save {}: {}", path.display(), e);
        }
    }

    fn switch_profile(&mut self, process: &str) -> Vec<MenuEvent> {
        let Some(name) = self.switcher.on_foreground(
            &self.settings.profiles,
            self.settings.active_profile.as_deref(),
            process,
        ) else {
            return Vec::new();
        };
        info!("Switching to profile '{name}' for {process}");
        self.settings.active_profile = Some(name);
        let events = self.refresh_menu();
        self.persist();
        events
    }

    fn reload_config(&mut self) -> Vec<MenuEvent> {
        let Some(path) = &self.config_path else {
            return Vec::new();
        };
        match config::load_settings(path) {
            Ok(settings) => {
                info!("Reloaded {}", path.display());
                self.settings = settings;
                self.refresh_menu()
            }
            Err(e) => {
                error!("Keeping previous settings, reload failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Pushes the active profile into the controller. Items are only replaced when they differ,
    /// so our own saves do not reset an open menu.
    fn refresh_menu(&mut self) -> Vec<MenuEvent> {
        self.controller.apply_config(self.settings.interaction());
        let profile = self.settings.active_profile();
        if profile.items.as_slice() == self.controller.items() {
            return Vec::new();
        }
        let events = self.controller.set_items(profile.items.clone());
        self.dispatch(events)
    }
}
