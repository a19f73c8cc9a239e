use crate::OverlayState;
use crate::greeting_bridge::GreetingText;
use crate::tree::{TreeCommand, TreePipelineSet, TreeTimeline};
use bevy::prelude::*;
use bevy_egui::input::EguiWantsInput;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use engine::AnimationState;

const TITLE_COLOR: egui::Color32 = egui::Color32::WHITE;
const SUBTITLE_COLOR: egui::Color32 = egui::Color32::from_rgba_premultiplied(153, 149, 110, 153);
const GREETING_GOLD: egui::Color32 = egui::Color32::from_rgb(255, 215, 0);
const GREETING_TEXT: egui::Color32 = egui::Color32::from_rgb(208, 240, 214);
const PANEL_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 0, 0, 96);

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            handle_keyboard_shortcuts.in_set(TreePipelineSet::Input),
        )
        .add_systems(
            EguiPrimaryContextPass,
            (
                draw_overlay.run_if(in_state(OverlayState::Visible)),
                draw_restore_button.run_if(in_state(OverlayState::Hidden)),
            ),
        );
    }
}

pub fn toggle_label(state: AnimationState) -> &'static str {
    match state {
        AnimationState::Scattered => "Play Animation",
        _ => "Replay",
    }
}

pub fn motion_label(reduced_motion: bool) -> &'static str {
    if reduced_motion {
        "Enable Motion"
    } else {
        "Reduce Motion"
    }
}

/// Shortcuts pressed this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutActions {
    pub toggle_tree: bool,
    pub toggle_overlay: bool,
}

/// Space toggles the tree and H the overlay, unless an egui widget has keyboard focus.
pub fn read_shortcuts(keys: &ButtonInput<KeyCode>, egui_has_keyboard: bool) -> ShortcutActions {
    if egui_has_keyboard {
        return ShortcutActions::default();
    }

    ShortcutActions {
        toggle_tree: keys.just_pressed(KeyCode::Space),
        toggle_overlay: keys.just_pressed(KeyCode::KeyH),
    }
}

pub fn handle_keyboard_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    egui_wants_input: Res<EguiWantsInput>,
    overlay: Res<State<OverlayState>>,
    mut next_overlay: ResMut<NextState<OverlayState>>,
    mut requests: MessageWriter<TreeCommand>,
) {
    let actions = read_shortcuts(&keys, egui_wants_input.wants_any_keyboard_input());

    if actions.toggle_tree {
        requests.write(TreeCommand::Toggle);
    }

    if actions.toggle_overlay {
        next_overlay.set(overlay.get().toggled());
    }
}

fn draw_overlay(
    mut contexts: EguiContexts,
    timeline: Res<TreeTimeline>,
    greeting: Res<GreetingText>,
    mut next_overlay: ResMut<NextState<OverlayState>>,
    mut requests: MessageWriter<TreeCommand>,
    mut theme_initialized: Local<bool>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    if !*theme_initialized {
        apply_overlay_theme(ctx);
        *theme_initialized = true;
    }

    let state = timeline.state();
    let reduced_motion = timeline.reduced_motion();

    egui::Area::new(egui::Id::new("tree_title"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(24.0, 24.0))
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new("Magic Tree")
                    .size(30.0)
                    .strong()
                    .color(TITLE_COLOR),
            );
            ui.label(
                egui::RichText::new("HOLIDAY EXPERIENCE")
                    .size(11.0)
                    .color(SUBTITLE_COLOR),
            );
        });

    egui::Area::new(egui::Id::new("tree_hide_ui"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-24.0, 24.0))
        .show(ctx, |ui| {
            if ui.add(egui::Button::new("Hide UI").frame(false)).clicked() {
                next_overlay.set(OverlayState::Hidden);
            }
        });

    if state == AnimationState::Revealed {
        egui::Area::new(egui::Id::new("tree_greeting"))
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .interactable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("Happy Holidays")
                            .size(64.0)
                            .color(GREETING_GOLD),
                    );
                    if !greeting.text.is_empty() {
                        ui.add_space(12.0);
                        ui.label(
                            egui::RichText::new(&greeting.text)
                                .size(20.0)
                                .color(GREETING_TEXT),
                        );
                    }
                });
            });
    }

    egui::TopBottomPanel::bottom("tree_controls")
        .resizable(false)
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.add_space(18.0);
                if ui
                    .add(egui::Button::new(motion_label(reduced_motion)).fill(PANEL_FILL))
                    .clicked()
                {
                    requests.write(TreeCommand::SetReducedMotion(!reduced_motion));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(18.0);
                    if ui
                        .add_sized(
                            egui::vec2(170.0, 40.0),
                            egui::Button::new(toggle_label(state)).fill(PANEL_FILL),
                        )
                        .clicked()
                    {
                        requests.write(TreeCommand::Toggle);
                    }
                });
            });
            ui.add_space(18.0);
        });
}

fn draw_restore_button(
    mut contexts: EguiContexts,
    mut next_overlay: ResMut<NextState<OverlayState>>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::Area::new(egui::Id::new("tree_show_ui"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
        .show(ctx, |ui| {
            if ui
                .add(egui::Button::new("Show UI").fill(PANEL_FILL))
                .clicked()
            {
                next_overlay.set(OverlayState::Visible);
            }
        });
}

fn apply_overlay_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(14.0, 8.0);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(18);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(18);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(18);
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeSimulationPlugin;
    use bevy::state::app::AppExtStates;
    use engine::EngineConfig;

    fn keyboard_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::state::app::StatesPlugin))
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<EguiWantsInput>()
            .init_state::<OverlayState>()
            .add_plugins(TreeSimulationPlugin::new(
                EngineConfig {
                    particle_count: 8,
                    ..EngineConfig::default()
                },
                true,
            ))
            .add_systems(
                Update,
                handle_keyboard_shortcuts.in_set(TreePipelineSet::Input),
            );
        app
    }

    #[test]
    fn labels_follow_state() {
        assert_eq!(toggle_label(AnimationState::Scattered), "Play Animation");
        assert_eq!(toggle_label(AnimationState::Morphing), "Replay");
        assert_eq!(toggle_label(AnimationState::Revealed), "Replay");
        assert_eq!(motion_label(false), "Reduce Motion");
        assert_eq!(motion_label(true), "Enable Motion");
    }

    #[test]
    fn focused_egui_widget_swallows_shortcuts() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::Space);
        keys.press(KeyCode::KeyH);

        assert_eq!(read_shortcuts(&keys, true), ShortcutActions::default());
        assert_eq!(
            read_shortcuts(&keys, false),
            ShortcutActions {
                toggle_tree: true,
                toggle_overlay: true,
            }
        );
    }

    #[test]
    fn space_toggles_the_tree() {
        let mut app = keyboard_app();
        app.update();
        assert_eq!(
            app.world().resource::<TreeTimeline>().state(),
            AnimationState::Revealed
        );

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Space);
        app.update();

        assert_eq!(
            app.world().resource::<TreeTimeline>().state(),
            AnimationState::Scattered
        );
    }

    fn tap(app: &mut App, key: KeyCode) {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(key);
        app.update();

        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.release(key);
        keys.clear();
        app.update();
    }

    fn overlay(app: &App) -> OverlayState {
        *app.world().resource::<State<OverlayState>>().get()
    }

    #[test]
    fn h_hides_and_restores_the_overlay() {
        let mut app = keyboard_app();
        app.update();
        assert_eq!(overlay(&app), OverlayState::Visible);

        tap(&mut app, KeyCode::KeyH);
        assert_eq!(overlay(&app), OverlayState::Hidden);

        tap(&mut app, KeyCode::KeyH);
        assert_eq!(overlay(&app), OverlayState::Visible);
    }
}
