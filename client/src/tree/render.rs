use bevy::light::{GlobalAmbientLight, NotShadowCaster};
use bevy::prelude::*;
use engine::Rgb;
use engine::field::{GOLD, LIGHT_GREEN};
use std::collections::HashMap;

use super::ribbons::{spawn_ribbons, update_ribbons};
use super::{
    InstanceBuffer, ParticleInstance, TreeCamera, TreeEngineState, TreePipelineSet,
    TreeSceneEntity, srgb, to_vec3,
};

const BACKGROUND: Color = Color::srgb(0.008, 0.016, 0.031);
const PARTICLE_RADIUS: f32 = 0.2;
const STAR_RADIUS: f32 = 0.25;
const STAR_POSITION: Vec3 = Vec3::new(0.0, 2.8, 0.0);

/// Meshes, materials, lights and camera for the tree.
pub struct TreeRenderPlugin;

impl Plugin for TreeRenderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(BACKGROUND))
            .insert_resource(GlobalAmbientLight {
                color: Color::WHITE,
                brightness: 60.0,
                ..default()
            })
            .add_systems(
                Startup,
                (
                    spawn_tree_camera,
                    spawn_tree_lights,
                    spawn_star,
                    spawn_tree_particles,
                    spawn_ribbons,
                ),
            )
            .add_systems(Update, update_ribbons.in_set(TreePipelineSet::Effects));
    }
}

/// Particle materials keyed by palette color.
#[derive(Default)]
pub(crate) struct ParticleMaterialCache {
    materials: HashMap<Rgb, Handle<StandardMaterial>>,
}

pub fn spawn_tree_particles(
    mut commands: Commands,
    engine: Res<TreeEngineState>,
    mut instances: ResMut<InstanceBuffer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut material_cache: Local<ParticleMaterialCache>,
) {
    if instances.is_attached() {
        return;
    }

    let field = engine.0.field();
    let mesh = meshes.add(Sphere::new(PARTICLE_RADIUS).mesh().uv(6, 4));

    for (index, particle) in field.iter().enumerate() {
        let material = material_cache
            .materials
            .entry(particle.color)
            .or_insert_with(|| materials.add(particle_material(particle.color)))
            .clone();

        commands.spawn((
            TreeSceneEntity,
            ParticleInstance(index),
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(to_vec3(particle.scattered_position))
                .with_scale(Vec3::splat(particle.base_scale)),
        ));
    }

    instances.attach(field.len());
    info!(
        "Spawned {} tree particles with {} materials",
        field.len(),
        material_cache.materials.len()
    );
}

fn particle_material(color: Rgb) -> StandardMaterial {
    let base = srgb(color);
    StandardMaterial {
        base_color: base,
        perceptual_roughness: 0.3,
        metallic: 0.6,
        emissive: base.to_linear() * 0.15,
        ..default()
    }
}

pub fn spawn_tree_camera(mut commands: Commands, engine: Res<TreeEngineState>) {
    commands.spawn((
        TreeSceneEntity,
        TreeCamera,
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, engine.0.camera_distance()).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Warm key light, green rim light, white fill.
pub fn spawn_tree_lights(mut commands: Commands) {
    commands.spawn((
        TreeSceneEntity,
        SpotLight {
            color: srgb(GOLD),
            intensity: 4_000_000.0,
            range: 40.0,
            outer_angle: 0.3,
            inner_angle: 0.1,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 10.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        TreeSceneEntity,
        SpotLight {
            color: srgb(LIGHT_GREEN),
            intensity: 2_500_000.0,
            range: 40.0,
            outer_angle: 0.5,
            inner_angle: 0.2,
            ..default()
        },
        Transform::from_xyz(-10.0, 5.0, -5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        TreeSceneEntity,
        PointLight {
            color: Color::WHITE,
            intensity: 500_000.0,
            range: 30.0,
            ..default()
        },
        Transform::from_xyz(0.0, -5.0, 5.0),
    ));
}

pub fn spawn_star(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Four sectors and two stacks make an octahedron.
    let mesh = meshes.add(Sphere::new(STAR_RADIUS).mesh().uv(4, 2));
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        emissive: LinearRgba::rgb(4.0, 4.0, 4.0),
        unlit: true,
        ..default()
    });

    commands
        .spawn((
            TreeSceneEntity,
            NotShadowCaster,
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(STAR_POSITION),
        ))
        .with_children(|parent| {
            parent.spawn(PointLight {
                color: Color::WHITE,
                intensity: 200_000.0,
                range: 5.0,
                ..default()
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeSimulationPlugin;
    use engine::EngineConfig;

    #[test]
    fn particles_spawn_once_with_shared_materials() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::asset::AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .add_plugins(TreeSimulationPlugin::new(
                EngineConfig {
                    particle_count: 120,
                    seed: Some(3),
                    ..EngineConfig::default()
                },
                true,
            ))
            .add_systems(Update, spawn_tree_particles);

        app.update();
        app.update();

        let mut query = app.world_mut().query::<&ParticleInstance>();
        assert_eq!(query.iter(app.world()).count(), 120);
        assert!(app.world().resource::<InstanceBuffer>().is_attached());
        assert!(app.world().resource::<Assets<StandardMaterial>>().len() <= 4);
    }
}
