use bevy::app::PluginGroupBuilder;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::window::{WindowResizeConstraints, WindowResolution};
use bevy::winit::WinitSettings;

use crate::settings::{self, GraphicsSettings, ViewerSettings};

pub const WINDOW_TITLE: &str = "Magic Tree";

/// Smallest window that still fits the title, greeting and control bar.
const MIN_WINDOW_WIDTH: f32 = 640.0;
const MIN_WINDOW_HEIGHT: f32 = 480.0;

/// Timeline transitions are logged at debug by `engine`.
const LOG_FILTER: &str = "wgpu=error,naga=warn,engine=debug,greeting=info";

pub fn build_viewer_plugins(startup_settings: &ViewerSettings) -> PluginGroupBuilder {
    DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(viewer_window(&startup_settings.graphics)),
            ..Default::default()
        })
        .set(LogPlugin {
            filter: LOG_FILTER.to_string(),
            level: Level::INFO,
            ..Default::default()
        })
}

pub fn viewer_winit_settings(graphics: &GraphicsSettings) -> WinitSettings {
    let update_mode = graphics.fps_limit.to_update_mode();
    WinitSettings {
        focused_mode: update_mode,
        unfocused_mode: update_mode,
    }
}

fn viewer_window(graphics: &GraphicsSettings) -> Window {
    Window {
        title: WINDOW_TITLE.into(),
        resolution: WindowResolution::new(graphics.resolution.width, graphics.resolution.height),
        resize_constraints: WindowResizeConstraints {
            min_width: MIN_WINDOW_WIDTH,
            min_height: MIN_WINDOW_HEIGHT,
            ..Default::default()
        },
        mode: graphics.window_mode.to_bevy(),
        present_mode: settings::present_mode_for(graphics),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{FpsLimitSetting, ResolutionSetting, WindowModeSetting};
    use bevy::window::{PresentMode, WindowMode};
    use bevy::winit::UpdateMode;

    #[test]
    fn window_follows_graphics_settings() {
        let graphics = GraphicsSettings {
            resolution: ResolutionSetting {
                width: 1600,
                height: 900,
            },
            vsync: false,
            ..GraphicsSettings::default()
        };

        let window = viewer_window(&graphics);
        assert_eq!(window.title, WINDOW_TITLE);
        assert_eq!(window.resolution.physical_width(), 1600);
        assert_eq!(window.resolution.physical_height(), 900);
        assert_eq!(window.present_mode, PresentMode::AutoNoVsync);
        assert_eq!(window.mode, WindowMode::Windowed);
        assert_eq!(window.resize_constraints.min_width, MIN_WINDOW_WIDTH);
    }

    #[test]
    fn fullscreen_setting_reaches_the_window() {
        let graphics = GraphicsSettings {
            window_mode: WindowModeSetting::Fullscreen,
            ..GraphicsSettings::default()
        };
        assert!(matches!(
            viewer_window(&graphics).mode,
            WindowMode::BorderlessFullscreen(_)
        ));
    }

    #[test]
    fn winit_modes_follow_fps_limit() {
        let graphics = GraphicsSettings {
            fps_limit: FpsLimitSetting::Unlimited,
            ..GraphicsSettings::default()
        };
        let winit = viewer_winit_settings(&graphics);
        assert!(matches!(winit.focused_mode, UpdateMode::Continuous));
        assert!(matches!(winit.unfocused_mode, UpdateMode::Continuous));
    }
}
