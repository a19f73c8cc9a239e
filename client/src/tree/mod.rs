//! The magic tree scene: a headless simulation plugin that owns the engine
//! and timeline, and a render plugin that turns its output into meshes.

pub mod render;
pub mod ribbons;
pub mod simulation;

use bevy::prelude::*;
use engine::{
    AnimationState, AnimationTimeline, EngineConfig, FrameOutput, InstanceSink, InstanceTransform,
    Rgb, TransformBuffer, TreeEngine,
};

pub use render::TreeRenderPlugin;
pub use simulation::TreeSimulationPlugin;

/// Per-frame ordering of the scene systems.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TreePipelineSet {
    Input,
    Timeline,
    Simulate,
    Effects,
    Camera,
}

/// Requests coming from the keyboard and the overlay.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeCommand {
    Toggle,
    SetReducedMotion(bool),
}

#[derive(Resource, Debug)]
pub struct TreeTimeline(pub AnimationTimeline);

impl TreeTimeline {
    pub fn state(&self) -> AnimationState {
        self.0.state()
    }

    pub fn reduced_motion(&self) -> bool {
        self.0.reduced_motion()
    }
}

#[derive(Resource, Debug)]
pub struct TreeEngineState(pub TreeEngine);

#[derive(Resource, Clone, Debug)]
pub struct TreeSettings(pub EngineConfig);

/// Latest frame output; `None` until the first frame with attached instances.
#[derive(Resource, Default, Debug)]
pub struct TreeFrame(pub Option<FrameOutput>);

/// Instance data shared between the engine and the particle entities.
///
/// Detached until the particle entities exist, which makes the engine skip
/// its frame.
#[derive(Resource, Default, Debug)]
pub struct InstanceBuffer {
    buffer: TransformBuffer,
    attached: bool,
}

impl InstanceBuffer {
    pub fn attach(&mut self, len: usize) {
        self.buffer = TransformBuffer::with_len(len);
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.buffer = TransformBuffer::default();
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn buffer(&self) -> &TransformBuffer {
        &self.buffer
    }
}

impl InstanceSink for InstanceBuffer {
    fn is_ready(&self) -> bool {
        self.attached
    }

    fn set_instance_transform(&mut self, index: usize, transform: InstanceTransform) {
        self.buffer.set_instance_transform(index, transform);
    }

    fn set_instance_color(&mut self, index: usize, color: Rgb) {
        self.buffer.set_instance_color(index, color);
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleInstance(pub usize);

#[derive(Component)]
pub struct TreeCamera;

/// Everything the tree spawns; despawned together on exit.
#[derive(Component)]
pub struct TreeSceneEntity;

pub(crate) fn to_vec3(value: engine::glam::Vec3) -> Vec3 {
    Vec3::from_array(value.to_array())
}

pub(crate) fn srgb(color: Rgb) -> Color {
    Color::srgb_u8(color.r, color.g, color.b)
}
