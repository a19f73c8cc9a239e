use bevy::prelude::*;
use bevy::window::{MonitorSelection, PresentMode, WindowMode};
use bevy::winit::UpdateMode;
use engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::tree::TreeCommand;

pub const SETTINGS_FILE_PATH: &str = "./magic_tree.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowModeSetting {
    #[default]
    Windowed,
    Fullscreen,
}

impl WindowModeSetting {
    pub fn to_bevy(self) -> WindowMode {
        match self {
            Self::Windowed => WindowMode::Windowed,
            Self::Fullscreen => WindowMode::BorderlessFullscreen(MonitorSelection::Current),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FpsLimitSetting {
    #[default]
    Default60,
    Monitor,
    Unlimited,
}

impl FpsLimitSetting {
    pub fn to_update_mode(self) -> UpdateMode {
        match self {
            Self::Default60 => UpdateMode::reactive(Duration::from_secs_f64(1.0 / 60.0)),
            Self::Monitor | Self::Unlimited => UpdateMode::Continuous,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionSetting {
    pub width: u32,
    pub height: u32,
}

impl Default for ResolutionSetting {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    pub window_mode: WindowModeSetting,
    pub resolution: ResolutionSetting,
    pub vsync: bool,
    pub fps_limit: FpsLimitSetting,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            window_mode: WindowModeSetting::Windowed,
            resolution: ResolutionSetting::default(),
            vsync: true,
            fps_limit: FpsLimitSetting::Default60,
        }
    }
}

/// `reduced_motion: None` defers to the environment, see [`crate::accessibility`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    pub reduced_motion: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingSettings {
    pub enabled: bool,
    pub theme: String,
}

impl Default for GreetingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: greeting::DEFAULT_THEME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub graphics: GraphicsSettings,
    pub motion: MotionSettings,
    pub engine: EngineConfig,
    pub greeting: GreetingSettings,
}

#[derive(Debug, Error)]
pub enum SettingsIoError {
    #[error("failed to read settings file: {0}")]
    Read(std::io::Error),
    #[error("failed to write settings file: {0}")]
    Write(std::io::Error),
    #[error("failed to decode YAML settings: {0}")]
    Deserialize(serde_yaml::Error),
    #[error("failed to encode YAML settings: {0}")]
    Serialize(serde_yaml::Error),
}

/// Current settings and the file they are saved to.
#[derive(Resource, Clone)]
pub struct SettingsResource {
    pub current: ViewerSettings,
    path: PathBuf,
}

impl SettingsResource {
    pub fn new(current: ViewerSettings) -> Self {
        Self::with_path(current, SETTINGS_FILE_PATH)
    }

    pub fn with_path(current: ViewerSettings, path: impl Into<PathBuf>) -> Self {
        Self {
            current,
            path: path.into(),
        }
    }

    pub fn save_to_disk(&self) -> Result<(), SettingsIoError> {
        write_settings_to_path(&self.current, &self.path)
    }
}

/// Keeps `magic_tree.yaml` in step with preferences changed from the overlay.
pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, persist_motion_preference);
    }
}

pub fn load_settings_or_default() -> ViewerSettings {
    let path = Path::new(SETTINGS_FILE_PATH);

    if !path.exists() {
        return ViewerSettings::default();
    }

    match load_settings_from_path(path) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!(
                "Failed to load settings from '{}': {}. Falling back to defaults.",
                SETTINGS_FILE_PATH, error
            );
            ViewerSettings::default()
        }
    }
}

pub fn ensure_settings_file_exists(settings: &ViewerSettings) -> Result<(), SettingsIoError> {
    let path = Path::new(SETTINGS_FILE_PATH);
    if path.exists() {
        return Ok(());
    }

    write_settings_to_path(settings, path)
}

pub fn present_mode_for(graphics: &GraphicsSettings) -> PresentMode {
    if matches!(graphics.fps_limit, FpsLimitSetting::Unlimited) || !graphics.vsync {
        PresentMode::AutoNoVsync
    } else {
        PresentMode::AutoVsync
    }
}

fn load_settings_from_path(path: &Path) -> Result<ViewerSettings, SettingsIoError> {
    let raw = fs::read_to_string(path).map_err(SettingsIoError::Read)?;
    serde_yaml::from_str::<ViewerSettings>(&raw).map_err(SettingsIoError::Deserialize)
}

fn write_settings_to_path(settings: &ViewerSettings, path: &Path) -> Result<(), SettingsIoError> {
    let encoded = serde_yaml::to_string(settings).map_err(SettingsIoError::Serialize)?;
    fs::write(path, encoded).map_err(SettingsIoError::Write)
}

fn persist_motion_preference(
    mut requests: MessageReader<TreeCommand>,
    mut settings: ResMut<SettingsResource>,
) {
    let Some(reduced) = requests
        .read()
        .filter_map(|request| match *request {
            TreeCommand::SetReducedMotion(reduced) => Some(reduced),
            TreeCommand::Toggle => None,
        })
        .last()
    else {
        return;
    };

    if settings.current.motion.reduced_motion == Some(reduced) {
        return;
    }

    settings.current.motion.reduced_motion = Some(reduced);
    if let Err(error) = settings.save_to_disk() {
        warn!("Failed to save motion preference: {}", error);
    }
}
