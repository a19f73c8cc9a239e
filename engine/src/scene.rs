use crate::camera::{CameraPose, CameraRig};
use crate::config::EngineConfig;
use crate::field::ParticleField;
use crate::morph::{InstanceSink, MorphController};
use crate::state::{AnimationState, FrameClock};
use crate::trail::TrailEmitter;
use glam::Vec3;
use log::debug;

/// Everything a host needs from one frame besides the instance transforms.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub state: AnimationState,
    pub progress: f32,
    /// Ribbon leading points in ribbon order; empty under reduced motion.
    pub ribbons: Vec<Vec3>,
    pub camera: CameraPose,
}

/// Engine state carried from frame to frame.
///
/// Holds the generated field plus the only mutable scalars of the core: the
/// morph progress and the damped camera distance.
#[derive(Debug, Clone)]
pub struct TreeEngine {
    field: ParticleField,
    morph: MorphController,
    trails: TrailEmitter,
    camera: CameraRig,
}

impl TreeEngine {
    /// Generates the field and wires every component from `config`.
    pub fn new(config: &EngineConfig) -> Self {
        let field = match config.seed {
            Some(seed) => ParticleField::generate_seeded(config.particle_count, seed),
            None => ParticleField::generate(config.particle_count),
        };
        debug!(
            "Generated particle field: {} particles (seed {:?})",
            field.len(),
            config.seed
        );
        Self::with_field(field, config)
    }

    pub fn with_field(field: ParticleField, config: &EngineConfig) -> Self {
        Self {
            field,
            morph: MorphController::new(
                config.morph.approach_rate,
                config.morph.retreat_rate,
                config.morph.formed_threshold,
            ),
            trails: TrailEmitter::new(config.ribbons.clone()),
            camera: CameraRig::new(
                config.camera.initial_distance,
                config.camera.scattered_distance,
                config.camera.formed_distance,
                config.camera.rate,
            ),
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn trails(&self) -> &TrailEmitter {
        &self.trails
    }

    pub fn progress(&self) -> f32 {
        self.morph.progress()
    }

    pub fn camera_distance(&self) -> f32 {
        self.camera.distance()
    }

    /// Runs one frame: morph, ribbons, camera, all against the same `state`.
    ///
    /// Returns `None` without touching any component when `sink` is not ready.
    pub fn frame<S: InstanceSink + ?Sized>(
        &mut self,
        state: AnimationState,
        reduced_motion: bool,
        clock: FrameClock,
        sink: &mut S,
    ) -> Option<FrameOutput> {
        if !sink.is_ready() {
            return None;
        }

        let progress =
            self.morph
                .update(self.field.particles(), state, reduced_motion, clock, sink);
        let ribbons = self
            .trails
            .leading_points(state, reduced_motion, clock.elapsed);
        let camera = self
            .camera
            .update(state, reduced_motion, clock.elapsed, clock.delta);

        Some(FrameOutput {
            state,
            progress,
            ribbons,
            camera,
        })
    }
}
