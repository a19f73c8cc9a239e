use bevy::prelude::*;
use engine::{AnimationTimeline, EngineConfig, FrameClock, InstanceTransform, TreeEngine};

use super::{
    InstanceBuffer, ParticleInstance, TreeCamera, TreeCommand, TreeEngineState, TreeFrame,
    TreePipelineSet, TreeSceneEntity, TreeSettings, TreeTimeline, to_vec3,
};

/// Timeline, engine and instance transforms. Needs no renderer or assets.
pub struct TreeSimulationPlugin {
    config: EngineConfig,
    reduced_motion: bool,
}

impl TreeSimulationPlugin {
    pub fn new(config: EngineConfig, reduced_motion: bool) -> Self {
        Self {
            config,
            reduced_motion,
        }
    }
}

impl Plugin for TreeSimulationPlugin {
    fn build(&self, app: &mut App) {
        let timeline = AnimationTimeline::mount(self.reduced_motion, &self.config.timeline);
        info!(
            "Mounted tree timeline in {} (reduced motion: {})",
            timeline.state(),
            self.reduced_motion
        );

        app.insert_resource(TreeSettings(self.config.clone()))
            .insert_resource(TreeTimeline(timeline))
            .insert_resource(TreeEngineState(TreeEngine::new(&self.config)))
            .init_resource::<InstanceBuffer>()
            .init_resource::<TreeFrame>()
            .add_message::<TreeCommand>()
            .configure_sets(
                Update,
                (
                    TreePipelineSet::Input,
                    TreePipelineSet::Timeline,
                    TreePipelineSet::Simulate,
                    TreePipelineSet::Effects,
                    TreePipelineSet::Camera,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (apply_tree_commands, advance_timeline)
                    .chain()
                    .in_set(TreePipelineSet::Timeline),
            )
            .add_systems(
                Update,
                (simulate_tree_frame, apply_instance_transforms)
                    .chain()
                    .in_set(TreePipelineSet::Simulate),
            )
            .add_systems(Update, apply_camera_pose.in_set(TreePipelineSet::Camera))
            .add_systems(Last, teardown_tree_on_exit);
    }
}

pub fn apply_tree_commands(
    mut requests: MessageReader<TreeCommand>,
    mut timeline: ResMut<TreeTimeline>,
) {
    for request in requests.read() {
        match *request {
            TreeCommand::Toggle => {
                let next = timeline.0.toggle();
                info!("Manual toggle -> {}", next);
            }
            TreeCommand::SetReducedMotion(reduced) => {
                if timeline.0.reduced_motion() != reduced {
                    info!("Reduced motion {}", if reduced { "on" } else { "off" });
                }
                timeline.0.set_reduced_motion(reduced);
            }
        }
    }
}

/// Scheduled steps follow wall-clock time; virtual time clamps long frames.
pub fn advance_timeline(time: Res<Time<Real>>, mut timeline: ResMut<TreeTimeline>) {
    timeline.0.advance(time.delta());
}

pub fn simulate_tree_frame(
    time: Res<Time>,
    timeline: Res<TreeTimeline>,
    mut engine: ResMut<TreeEngineState>,
    mut instances: ResMut<InstanceBuffer>,
    mut frame: ResMut<TreeFrame>,
) {
    let clock = FrameClock::new(time.elapsed_secs(), time.delta_secs());
    let output = engine.0.frame(
        timeline.state(),
        timeline.reduced_motion(),
        clock,
        &mut *instances,
    );

    if let Some(output) = output {
        frame.0 = Some(output);
    }
}

pub fn apply_instance_transforms(
    instances: Res<InstanceBuffer>,
    mut particles: Query<(&ParticleInstance, &mut Transform)>,
) {
    if !instances.is_attached() {
        return;
    }

    for (instance, mut transform) in &mut particles {
        if let Some(source) = instances.buffer().transform(instance.0) {
            *transform = instance_to_transform(source);
        }
    }
}

pub fn apply_camera_pose(frame: Res<TreeFrame>, mut cameras: Query<&mut Transform, With<TreeCamera>>) {
    let Some(output) = frame.0.as_ref() else {
        return;
    };

    let eye = to_vec3(output.camera.eye());
    let look_at = to_vec3(output.camera.look_at);
    for mut transform in &mut cameras {
        *transform = Transform::from_translation(eye).looking_at(look_at, Vec3::Y);
    }
}

/// Cancels pending transitions and releases the scene once the app is exiting.
pub fn teardown_tree_on_exit(
    mut commands: Commands,
    mut exits: MessageReader<AppExit>,
    mut timeline: ResMut<TreeTimeline>,
    mut instances: ResMut<InstanceBuffer>,
    scene: Query<Entity, With<TreeSceneEntity>>,
) {
    if exits.read().next().is_none() {
        return;
    }

    timeline.0.cancel();
    instances.detach();
    let mut despawned = 0usize;
    for entity in &scene {
        commands.entity(entity).despawn();
        despawned += 1;
    }
    info!("Tree scene torn down ({} entities)", despawned);
}

pub fn instance_to_transform(source: &InstanceTransform) -> Transform {
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        source.rotation.x,
        source.rotation.y,
        source.rotation.z,
    );
    Transform {
        translation: to_vec3(source.translation),
        rotation,
        scale: Vec3::splat(source.scale),
    }
}
