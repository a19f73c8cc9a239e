//! Magic Tree animation core
//!
//! Deterministic per-frame math for the particle tree: the two target
//! configurations, the damped morph between them, the ribbon paths, the
//! camera rig and the timeline that drives everything.
//!
//! Nothing here touches a renderer, a clock or a thread. Hosts feed a
//! [`FrameClock`] and the current [`AnimationState`] into [`TreeEngine::frame`]
//! and receive transforms through the [`InstanceSink`] interface.

pub mod camera;
pub mod config;
pub mod damping;
pub mod field;
pub mod morph;
pub mod scene;
pub mod state;
pub mod timeline;
pub mod trail;

pub use glam;

pub use camera::{CameraPose, CameraRig};
pub use config::{CameraSettings, ConfigError, EngineConfig, MorphSettings};
pub use field::{Particle, ParticleField, Rgb};
pub use morph::{InstanceSink, InstanceTransform, MorphController, TransformBuffer};
pub use scene::{FrameOutput, TreeEngine};
pub use state::{AnimationState, FrameClock};
pub use timeline::{AnimationTimeline, ScheduledStep, TimelineSchedule};
pub use trail::{RibbonSpec, TrailEmitter};

/// Reference particle count of the tree.
pub const PARTICLE_COUNT: usize = 2000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_count_matches_default_config() {
        assert_eq!(EngineConfig::default().particle_count, PARTICLE_COUNT);
    }
}
