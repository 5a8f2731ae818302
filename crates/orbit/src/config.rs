use crate::events::AppEvent;
use crate::menu::timers::GestureWindow;
use crate::menu::{DragThresholds, GESTURE_WARMUP, InteractionConfig, LOCAL_CENTER};
use crate::profile::{self, DEFAULT_PROFILE_NAME, Profile};
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DragSettings {
    pub distance_threshold: f64,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "time_threshold_ms")]
    pub time_threshold: Duration,
}

impl Default for DragSettings {
    fn default() -> Self {
        let thresholds = DragThresholds::default();
        Self {
            distance_threshold: thresholds.distance,
            time_threshold: thresholds.time,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub enable_gesture_activation: bool,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "gesture_time_limit_ms")]
    pub gesture_time_limit: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "submenu_hover_delay_ms")]
    pub submenu_hover_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "gesture_tick_ms")]
    pub gesture_tick: Duration,
    pub max_submenu_depth: usize,
    pub close_on_outside_click: bool,
    pub submenu_grace_margin: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_profile: Option<String>,
    pub drag: DragSettings,
    pub profiles: Vec<Profile>,
}

impl Default for Settings {
    fn default() -> Self {
        let interaction = InteractionConfig::default();
        Self {
            enable_gesture_activation: interaction.enable_gesture_activation,
            gesture_time_limit: interaction.gesture.limit,
            submenu_hover_delay: interaction.submenu_hover_delay,
            gesture_tick: interaction.gesture_tick,
            max_submenu_depth: interaction.max_submenu_depth,
            close_on_outside_click: true,
            submenu_grace_margin: interaction.submenu_grace_margin,
            active_profile: Some(DEFAULT_PROFILE_NAME.to_string()),
            drag: DragSettings::default(),
            profiles: vec![Profile::fallback()],
        }
    }
}

impl Settings {
    pub fn active_profile(&self) -> Cow<'_, Profile> {
        match profile::resolve_active(&self.profiles, self.active_profile.as_deref()) {
            Some(index) => Cow::Borrowed(&self.profiles[index]),
            None => Cow::Owned(Profile::fallback()),
        }
    }

    /// The active profile, materialized into `profiles` if it was synthesized.
    pub fn active_profile_mut(&mut self) -> &mut Profile {
        let index = match profile::resolve_active(&self.profiles, self.active_profile.as_deref())
        {
            Some(index) => index,
            None => {
                self.profiles.push(Profile::fallback());
                0
            }
        };
        &mut self.profiles[index]
    }

    pub fn active_profile_name(&self) -> String {
        self.active_profile().name.clone()
    }

    pub fn interaction(&self) -> InteractionConfig {
        let appearance = &self.active_profile().appearance;
        InteractionConfig {
            metrics: appearance.metrics(),
            indicator_thickness: appearance.indicator_thickness,
            enable_gesture_activation: self.enable_gesture_activation,
            gesture: GestureWindow::new(GESTURE_WARMUP, self.gesture_time_limit),
            gesture_tick: self.gesture_tick,
            submenu_hover_delay: self.submenu_hover_delay,
            max_submenu_depth: self.max_submenu_depth,
            submenu_grace_margin: self.submenu_grace_margin,
            drag: DragThresholds {
                distance: self.drag.distance_threshold,
                time: self.drag.time_threshold,
            },
            local_center: LOCAL_CENTER,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "orbit", "orbit").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("ORBIT")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default(path: &Path) -> Settings {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Settings::default();
    }

    match load_settings(path) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Failed to load {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(settings)?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, contents)?;
    Ok(())
}

pub fn write_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(tx: Sender<AppEvent>, config_path: PathBuf) {
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("{}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch {}: {}", config_dir.display(), e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let touches_config = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) && event.paths.iter().any(|p| p == &config_path);

                if touches_config && tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::item::Action;
    use crate::profile::PositionMode;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("orbit-test-{}", uuid::Uuid::new_v4()))
            .join("config.toml")
    }

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert!(!settings.enable_gesture_activation);
        assert!(settings.close_on_outside_click);
        assert_eq!(settings.gesture_time_limit, Duration::from_millis(500));
        assert_eq!(settings.submenu_hover_delay, Duration::from_millis(300));
        assert_eq!(settings.max_submenu_depth, 3);
        assert_eq!(settings.drag.distance_threshold, 10.0);
        assert_eq!(settings.drag.time_threshold, Duration::from_millis(300));
        assert_eq!(settings.active_profile_name(), "Default");
        assert_eq!(settings.interaction(), InteractionConfig::default());
    }

    #[test]
    fn millisecond_fields_and_partial_tables() {
        let settings: Settings = serde_json::from_str(
            r#"{
                "enable_gesture_activation": true,
                "gesture_time_limit_ms": 800,
                "drag": { "time_threshold_ms": 150 },
                "profiles": [{ "name": "Work", "appearance": { "ring_thickness": 60 } }]
            }"#,
        )
        .unwrap();

        assert_eq!(settings.gesture_time_limit, Duration::from_millis(800));
        assert_eq!(settings.drag.time_threshold, Duration::from_millis(150));
        assert_eq!(settings.drag.distance_threshold, 10.0);

        // "Default" is not among the profiles, so the first one wins
        let interaction = settings.interaction();
        assert!(interaction.enable_gesture_activation);
        assert_eq!(interaction.gesture.limit, Duration::from_millis(800));
        assert_eq!(interaction.gesture.warmup, GESTURE_WARMUP);
        assert_eq!(interaction.metrics.ring_thickness, 60.0);
        assert_eq!(interaction.metrics.center_radius, 45.0);
    }

    #[test]
    fn empty_profile_list_synthesizes_default() {
        let mut settings = Settings {
            profiles: Vec::new(),
            ..Settings::default()
        };
        assert_eq!(settings.active_profile().name, "Default");
        assert!(settings.profiles.is_empty());

        settings.active_profile_mut().items.clear();
        assert_eq!(settings.profiles.len(), 1);
    }

    #[test]
    fn bundled_default_config_parses() {
        let settings: Settings = toml::from_str(DEFAULT_CONFIG).unwrap();
        let profile = settings.active_profile();
        assert_eq!(profile.name, "Default");
        assert_eq!(profile.position, PositionMode::FollowMouse);

        let labels: Vec<_> = profile.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["Copy", "Paste", "Terminal", "Files", "System"]);
        assert!(profile.items[4].is_submenu_only());
        assert_eq!(
            profile.items[2].action,
            Some(Action::Command("x-terminal-emulator".to_string()))
        );
    }

    #[test]
    fn saved_settings_load_back_with_stable_ids() {
        let path = scratch_path();
        let mut settings = Settings::default();
        settings.active_profile_mut().items.swap(0, 1);
        settings.active_profile_mut().position = PositionMode::Fixed { x: 100.0, y: 50.0 };

        save_settings(&path, &settings).unwrap();
        let loaded = load_settings(&path).unwrap();

        let ids = |s: &Settings| -> Vec<String> {
            s.active_profile().items.iter().map(|i| i.id.to_string()).collect()
        };
        assert_eq!(ids(&loaded), ids(&settings));
        assert_eq!(loaded.active_profile().items[0].label, "Paste");
        assert_eq!(
            loaded.active_profile().position,
            PositionMode::Fixed { x: 100.0, y: 50.0 }
        );

        let _ = fs_err::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = scratch_path();
        let settings = load_or_default(&path);
        assert_eq!(settings.active_profile().items.len(), 5);
    }

    #[test]
    fn default_config_is_not_overwritten() {
        let path = scratch_path();
        write_default_config(&path).unwrap();
        assert_eq!(fs_err::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        fs_err::write(&path, "max_submenu_depth = 1\n").unwrap();
        write_default_config(&path).unwrap();
        assert_eq!(load_settings(&path).unwrap().max_submenu_depth, 1);

        let _ = fs_err::remove_dir_all(path.parent().unwrap());
    }
}
