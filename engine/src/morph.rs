use crate::damping::damp;
use crate::field::{Particle, Rgb};
use crate::state::{AnimationState, FrameClock};
use glam::Vec3;
use std::f32::consts::PI;

pub const APPROACH_RATE: f32 = 1.5;
pub const RETREAT_RATE: f32 = 0.8;
pub const FORMED_THRESHOLD: f32 = 0.8;

const SHIMMER_FREQUENCY: f32 = 2.0;
const SHIMMER_AMPLITUDE: f32 = 0.02;
const TREE_SPIN_RATE: f32 = 0.1;
const DRIFT_AMPLITUDE: f32 = 0.01;
const SCALE_POP: f32 = 0.2;

/// Per-instance transform handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub translation: Vec3,
    pub scale: f32,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            scale: 1.0,
            rotation: Vec3::ZERO,
        }
    }
}

/// Narrow rendering interface the morph pass writes into.
pub trait InstanceSink {
    /// `false` while the backing render target does not exist yet; the frame is skipped.
    fn is_ready(&self) -> bool {
        true
    }

    fn set_instance_transform(&mut self, index: usize, transform: InstanceTransform);

    fn set_instance_color(&mut self, index: usize, color: Rgb);
}

/// Plain in-memory sink: one slot per particle.
#[derive(Debug, Clone, Default)]
pub struct TransformBuffer {
    transforms: Vec<InstanceTransform>,
    colors: Vec<Option<Rgb>>,
}

impl TransformBuffer {
    pub fn with_len(len: usize) -> Self {
        Self {
            transforms: vec![InstanceTransform::default(); len],
            colors: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    pub fn transform(&self, index: usize) -> Option<&InstanceTransform> {
        self.transforms.get(index)
    }

    pub fn color(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied().flatten()
    }

    fn ensure_slot(&mut self, index: usize) {
        if index >= self.transforms.len() {
            self.transforms
                .resize(index + 1, InstanceTransform::default());
            self.colors.resize(index + 1, None);
        }
    }
}

impl InstanceSink for TransformBuffer {
    fn set_instance_transform(&mut self, index: usize, transform: InstanceTransform) {
        self.ensure_slot(index);
        self.transforms[index] = transform;
    }

    fn set_instance_color(&mut self, index: usize, color: Rgb) {
        self.ensure_slot(index);
        self.colors[index] = Some(color);
    }
}

/// Owns the morph progress scalar and turns it into per-particle transforms.
#[derive(Debug, Clone)]
pub struct MorphController {
    progress: f32,
    approach_rate: f32,
    retreat_rate: f32,
    formed_threshold: f32,
}

impl Default for MorphController {
    fn default() -> Self {
        Self::new(APPROACH_RATE, RETREAT_RATE, FORMED_THRESHOLD)
    }
}

impl MorphController {
    pub fn new(approach_rate: f32, retreat_rate: f32, formed_threshold: f32) -> Self {
        Self {
            progress: 0.0,
            approach_rate,
            retreat_rate,
            formed_threshold,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Steps progress one frame toward the target implied by `state`.
    pub fn advance(&mut self, state: AnimationState, reduced_motion: bool, delta: f32) -> f32 {
        let target = state.morph_target();
        if reduced_motion {
            self.progress = target;
        } else {
            let rate = if state.is_formed() {
                self.approach_rate
            } else {
                self.retreat_rate
            };
            self.progress = damp(self.progress, target, rate, delta).clamp(0.0, 1.0);
        }
        self.progress
    }

    /// Advances progress and writes every particle's transform and color into `sink`.
    pub fn update<S: InstanceSink + ?Sized>(
        &mut self,
        particles: &[Particle],
        state: AnimationState,
        reduced_motion: bool,
        clock: FrameClock,
        sink: &mut S,
    ) -> f32 {
        let progress = self.advance(state, reduced_motion, clock.delta);
        for (index, particle) in particles.iter().enumerate() {
            let transform = self.instance_transform(particle, progress, clock.elapsed);
            sink.set_instance_transform(index, transform);
            sink.set_instance_color(index, particle.color);
        }
        progress
    }

    /// Blended position plus secondary motion for one particle at `progress`.
    pub fn instance_transform(
        &self,
        particle: &Particle,
        progress: f32,
        elapsed: f32,
    ) -> InstanceTransform {
        let mut position = particle
            .scattered_position
            .lerp(particle.formed_position, progress);

        if progress > self.formed_threshold {
            position.y += (elapsed * SHIMMER_FREQUENCY + particle.phase).sin() * SHIMMER_AMPLITUDE;
            position = rotate_about_y(position, elapsed * TREE_SPIN_RATE);
        } else {
            let t = elapsed * particle.speed + particle.phase;
            position.x += t.sin() * DRIFT_AMPLITUDE;
            position.y += t.cos() * DRIFT_AMPLITUDE;
            position.z += (elapsed * particle.speed * 0.5 + particle.phase).sin() * DRIFT_AMPLITUDE;
        }

        InstanceTransform {
            translation: position,
            scale: particle.base_scale + (progress * PI).sin() * SCALE_POP,
            rotation: Vec3::new(
                elapsed * particle.speed,
                elapsed * particle.speed * 0.5,
                0.0,
            ),
        }
    }
}

fn rotate_about_y(position: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(
        position.x * cos - position.z * sin,
        position.y,
        position.x * sin + position.z * cos,
    )
}
