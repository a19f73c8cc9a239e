use bevy::light::{NotShadowCaster, NotShadowReceiver};
use bevy::mesh::PrimitiveTopology;
use bevy::prelude::*;
use engine::Rgb;
use std::collections::VecDeque;

use super::{TreeFrame, TreeSceneEntity, TreeSettings, srgb, to_vec3};

/// Leading points kept per ribbon.
pub const RIBBON_HISTORY: usize = 32;
/// Width at the newest sample; older samples taper quadratically to zero.
pub const RIBBON_WIDTH: f32 = 0.4;
const HEAD_RADIUS: f32 = 0.05;

#[derive(Component)]
pub struct RibbonTrail {
    pub index: usize,
    pub color: Rgb,
    pub samples: VecDeque<Vec3>,
    mesh: Handle<Mesh>,
    head: Entity,
}

#[derive(Component)]
pub struct RibbonHead;

pub fn spawn_ribbons(
    mut commands: Commands,
    settings: Res<TreeSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let head_mesh = meshes.add(Sphere::new(HEAD_RADIUS).mesh().uv(8, 8));

    for (index, spec) in settings.0.ribbons.iter().enumerate() {
        let color = srgb(spec.color_hint);

        let head = commands
            .spawn((
                TreeSceneEntity,
                RibbonHead,
                NotShadowCaster,
                Mesh3d(head_mesh.clone()),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: color,
                    unlit: true,
                    ..default()
                })),
                Transform::IDENTITY,
                Visibility::Hidden,
            ))
            .id();

        let mesh = meshes.add(empty_ribbon_mesh());
        commands.spawn((
            TreeSceneEntity,
            RibbonTrail {
                index,
                color: spec.color_hint,
                samples: VecDeque::with_capacity(RIBBON_HISTORY),
                mesh: mesh.clone(),
                head,
            },
            NotShadowCaster,
            NotShadowReceiver,
            Mesh3d(mesh),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::WHITE,
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                double_sided: true,
                cull_mode: None,
                ..default()
            })),
            Transform::IDENTITY,
            Visibility::Hidden,
        ));
    }
}

/// Records each ribbon's leading point and rebuilds its mesh. Ribbons are
/// hidden and their history dropped whenever the frame carries no points.
pub fn update_ribbons(
    frame: Res<TreeFrame>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut trails: Query<(&mut RibbonTrail, &mut Visibility), Without<RibbonHead>>,
    mut heads: Query<(&mut Transform, &mut Visibility), With<RibbonHead>>,
) {
    let Some(output) = frame.0.as_ref() else {
        return;
    };

    for (mut trail, mut visibility) in &mut trails {
        let leading = output.ribbons.get(trail.index).copied().map(to_vec3);

        let Some(point) = leading else {
            trail.samples.clear();
            *visibility = Visibility::Hidden;
            if let Ok((_, mut head_visibility)) = heads.get_mut(trail.head) {
                *head_visibility = Visibility::Hidden;
            }
            continue;
        };

        push_ribbon_sample(&mut trail.samples, point);
        *visibility = Visibility::Inherited;

        if let Ok((mut head_transform, mut head_visibility)) = heads.get_mut(trail.head) {
            head_transform.translation = point;
            *head_visibility = Visibility::Inherited;
        }

        if let Some(mesh) = meshes.get_mut(&trail.mesh) {
            *mesh = build_ribbon_mesh(&trail.samples, RIBBON_WIDTH, trail.color);
        }
    }
}

pub fn push_ribbon_sample(samples: &mut VecDeque<Vec3>, point: Vec3) {
    if samples.len() >= RIBBON_HISTORY {
        samples.pop_front();
    }
    samples.push_back(point);
}

/// Flat strip through `samples` (oldest first), widened along +Y.
pub fn build_ribbon_mesh(samples: &VecDeque<Vec3>, width: f32, color: Rgb) -> Mesh {
    let sample_count = samples.len();
    if sample_count < 2 {
        return empty_ribbon_mesh();
    }

    let quad_count = sample_count - 1;
    let vertex_count = quad_count * 6;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(vertex_count);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(vertex_count);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(vertex_count);
    let mut colors: Vec<[f32; 4]> = Vec::with_capacity(vertex_count);

    let [r, g, b] = color.to_f32_array();
    let edges: Vec<(Vec3, Vec3, f32, [f32; 4])> = samples
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let t = i as f32 / quad_count as f32;
            let half = Vec3::Y * (width * t * t * 0.5);
            (*point - half, *point + half, t, [r, g, b, t])
        })
        .collect();

    for pair in edges.windows(2) {
        let (low0, high0, u0, c0) = pair[0];
        let (low1, high1, u1, c1) = pair[1];

        let face_normal = (low1 - low0).cross(high0 - low0).normalize_or_zero();
        let n: [f32; 3] = face_normal.into();

        positions.extend_from_slice(&[low0.into(), low1.into(), high1.into()]);
        normals.extend_from_slice(&[n, n, n]);
        uvs.extend_from_slice(&[[u0, 0.0], [u1, 0.0], [u1, 1.0]]);
        colors.extend_from_slice(&[c0, c1, c1]);

        positions.extend_from_slice(&[low0.into(), high1.into(), high0.into()]);
        normals.extend_from_slice(&[n, n, n]);
        uvs.extend_from_slice(&[[u0, 0.0], [u1, 1.0], [u0, 1.0]]);
        colors.extend_from_slice(&[c0, c1, c0]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh
}

fn empty_ribbon_mesh() -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, Vec::<[f32; 3]>::new());
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, Vec::<[f32; 3]>::new());
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, Vec::<[f32; 2]>::new());
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, Vec::<[f32; 4]>::new());
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::mesh::VertexAttributeValues;
    use engine::field::GOLD;

    fn samples(count: usize) -> VecDeque<Vec3> {
        (0..count)
            .map(|i| Vec3::new(i as f32, 0.0, 0.0))
            .collect()
    }

    fn positions(mesh: &Mesh) -> Vec<[f32; 3]> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(values)) => values.clone(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn history_is_bounded() {
        let mut history = VecDeque::new();
        for i in 0..(RIBBON_HISTORY + 10) {
            push_ribbon_sample(&mut history, Vec3::splat(i as f32));
        }
        assert_eq!(history.len(), RIBBON_HISTORY);
        assert_eq!(history.front(), Some(&Vec3::splat(10.0)));
    }

    #[test]
    fn short_history_builds_an_empty_mesh() {
        assert!(positions(&build_ribbon_mesh(&samples(1), 0.4, GOLD)).is_empty());
    }

    #[test]
    fn strip_has_two_triangles_per_segment() {
        let mesh = build_ribbon_mesh(&samples(5), 0.4, GOLD);
        assert_eq!(positions(&mesh).len(), 4 * 6);
    }

    #[test]
    fn width_tapers_from_head_to_tail() {
        let mesh = build_ribbon_mesh(&samples(3), 0.4, GOLD);
        let points = positions(&mesh);

        // The oldest sample collapses to a point.
        let oldest: Vec<f32> = points
            .iter()
            .filter(|p| p[0] == 0.0)
            .map(|p| p[1])
            .collect();
        assert!(oldest.iter().all(|y| y.abs() < 1e-6));

        // The newest sample spans the full width.
        let newest_top = points
            .iter()
            .filter(|p| p[0] == 2.0)
            .map(|p| p[1])
            .fold(f32::MIN, f32::max);
        assert!((newest_top - 0.2).abs() < 1e-6);
    }
}
