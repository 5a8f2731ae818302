use crate::menu::geometry::{Point, RingMetrics};
use crate::menu::item::{Action, KeyCombo, MenuItem};
use crate::menu::{CENTER_RADIUS, INDICATOR_THICKNESS, RING_GAP, RING_THICKNESS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PROFILE_NAME: &str = "Default";
/// Foreground changes to our own process never switch profiles.
pub const OWN_PROCESS_NAME: &str = "orbit";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PositionMode {
    #[default]
    FollowMouse,
    /// Screen pixels.
    Fixed { x: f64, y: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub background_color: String,
    pub accent_color: String,
    pub indicator_thickness: f64,
    pub center_radius: f64,
    pub ring_thickness: f64,
    pub ring_gap: f64,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            background_color: "#1E1E1E".to_string(),
            accent_color: "#0078D4".to_string(),
            indicator_thickness: INDICATOR_THICKNESS,
            center_radius: CENTER_RADIUS,
            ring_thickness: RING_THICKNESS,
            ring_gap: RING_GAP,
        }
    }
}

impl Appearance {
    pub fn metrics(&self) -> RingMetrics {
        RingMetrics {
            center_radius: self.center_radius,
            ring_thickness: self.ring_thickness,
            ring_gap: self.ring_gap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Process name (or a path containing it) that activates this profile when it takes focus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_app: Option<String>,
    #[serde(default)]
    pub position: PositionMode,
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trigger_app: None,
            position: PositionMode::default(),
            appearance: Appearance::default(),
            items: Vec::new(),
        }
    }

    /// The profile used when nothing else is configured.
    pub fn fallback() -> Self {
        let item = |label: &str, icon: &str, action: Action| {
            MenuItem::new(label)
                .with_icon(icon)
                .with_action(action)
        };

        Self {
            items: vec![
                item("Copy", "edit-copy", Action::Shortcut(KeyCombo::new("Ctrl+C"))),
                item("Paste", "edit-paste", Action::Shortcut(KeyCombo::new("Ctrl+V"))),
                item(
                    "Terminal",
                    "utilities-terminal",
                    Action::Command("x-terminal-emulator".to_string()),
                ),
                item("Files", "system-file-manager", Action::LaunchPath(PathBuf::from("/"))),
                MenuItem::new("System")
                    .with_icon("preferences-system")
                    .with_children(vec![
                        item(
                            "Lock",
                            "system-lock-screen",
                            Action::Command("loginctl lock-session".to_string()),
                        ),
                        item(
                            "Suspend",
                            "system-suspend",
                            Action::Command("systemctl suspend".to_string()),
                        ),
                    ]),
            ],
            ..Self::new(DEFAULT_PROFILE_NAME)
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.trigger_app.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn is_triggered_by(&self, process: &str) -> bool {
        let process = process.to_lowercase();
        self.trigger_app
            .as_deref()
            .is_some_and(|t| !t.is_empty() && t.to_lowercase().contains(&process))
    }
}

/// Index of the profile named `active`, else the first profile.
pub fn resolve_active(profiles: &[Profile], active: Option<&str>) -> Option<usize> {
    active
        .and_then(|name| profiles.iter().position(|p| p.name == name))
        .or((!profiles.is_empty()).then_some(0))
}

/// Chooses the profile for a newly focused process. Returns the new profile name, only when it
/// differs from `active`.
#[derive(Debug, Clone)]
pub struct ProfileSwitcher {
    own_process: String,
}

impl Default for ProfileSwitcher {
    fn default() -> Self {
        Self::new(OWN_PROCESS_NAME)
    }
}

impl ProfileSwitcher {
    pub fn new(own_process: impl Into<String>) -> Self {
        Self {
            own_process: own_process.into(),
        }
    }

    pub fn on_foreground(
        &self,
        profiles: &[Profile],
        active: Option<&str>,
        process: &str,
    ) -> Option<String> {
        let process = process.trim();
        if process.is_empty() || process.eq_ignore_ascii_case(&self.own_process) {
            return None;
        }
        let current = resolve_active(profiles, active).map(|i| &profiles[i]);

        if let Some(matched) = profiles.iter().find(|p| p.is_triggered_by(process)) {
            return (current.map(|c| &c.name) != Some(&matched.name)).then(|| matched.name.clone());
        }

        // Leaving a triggering app goes back to the default profile. Manually chosen profiles
        // stay.
        let current = current.filter(|c| c.is_triggered())?;
        let fallback = profiles
            .iter()
            .find(|p| p.name == DEFAULT_PROFILE_NAME)
            .or_else(|| profiles.first())?;
        (fallback.name != current.name).then(|| fallback.name.clone())
    }
}

/// Where the menu center goes for a showing requested at `cursor`.
pub fn menu_anchor(profile: &Profile, cursor: Point) -> Point {
    match profile.position {
        PositionMode::FollowMouse => cursor,
        PositionMode::Fixed { x, y } => Point::new(x, y),
    }
}
