use bevy::prelude::*;
use bevy::state::app::AppExtStates;
use bevy_egui::EguiPlugin;
use engine::EngineConfig;

use crate::accessibility;
use crate::app::plugins::{build_viewer_plugins, viewer_winit_settings};
use crate::app::state::OverlayState;
use crate::greeting_bridge::GreetingPlugin;
use crate::settings::{self, SettingsPlugin, SettingsResource, ViewerSettings};
use crate::tree::{TreeRenderPlugin, TreeSimulationPlugin};
use crate::ui::HudPlugin;

pub fn run_client_app() {
    let startup_settings = load_startup_settings();
    let engine_config = validated_engine_config(&startup_settings);
    let reduced_motion = accessibility::detect_reduced_motion(&startup_settings.motion);

    let mut app = App::new();
    app.insert_resource(SettingsResource::new(startup_settings.clone()))
        .add_plugins(build_viewer_plugins(&startup_settings))
        .insert_resource(viewer_winit_settings(&startup_settings.graphics))
        .add_plugins(EguiPlugin::default())
        .add_plugins(SettingsPlugin)
        .init_state::<OverlayState>()
        .add_plugins(TreeSimulationPlugin::new(engine_config, reduced_motion))
        .add_plugins(TreeRenderPlugin)
        .add_plugins(GreetingPlugin::from_settings(&startup_settings.greeting))
        .add_plugins(HudPlugin);

    app.run();
}

fn load_startup_settings() -> ViewerSettings {
    let startup_settings = settings::load_settings_or_default();
    if let Err(error) = settings::ensure_settings_file_exists(&startup_settings) {
        eprintln!(
            "Failed to ensure startup settings file '{}': {}",
            settings::SETTINGS_FILE_PATH,
            error
        );
    }
    startup_settings
}

fn validated_engine_config(startup_settings: &ViewerSettings) -> EngineConfig {
    match startup_settings.engine.validate() {
        Ok(()) => startup_settings.engine.clone(),
        Err(error) => {
            eprintln!(
                "Invalid engine settings in '{}': {}. Falling back to defaults.",
                settings::SETTINGS_FILE_PATH,
                error
            );
            EngineConfig::default()
        }
    }
}
