use crate::camera::{
    DISTANCE_RATE, FORMED_DISTANCE, INITIAL_DISTANCE, SCATTERED_DISTANCE,
};
use crate::morph::{APPROACH_RATE, FORMED_THRESHOLD, RETREAT_RATE};
use crate::timeline::TimelineSchedule;
use crate::trail::RibbonSpec;
use crate::PARTICLE_COUNT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_PARTICLES: usize = 100_000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("particle count must be between 1 and {max}, got {got}")]
    ParticleCount { got: usize, max: usize },
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("formed threshold must lie in [0, 1], got {0}")]
    Threshold(f32),
    #[error("ribbon {index} is invalid: {reason}")]
    Ribbon { index: usize, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphSettings {
    pub approach_rate: f32,
    pub retreat_rate: f32,
    pub formed_threshold: f32,
}

impl Default for MorphSettings {
    fn default() -> Self {
        Self {
            approach_rate: APPROACH_RATE,
            retreat_rate: RETREAT_RATE,
            formed_threshold: FORMED_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub initial_distance: f32,
    pub scattered_distance: f32,
    pub formed_distance: f32,
    pub rate: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            initial_distance: INITIAL_DISTANCE,
            scattered_distance: SCATTERED_DISTANCE,
            formed_distance: FORMED_DISTANCE,
            rate: DISTANCE_RATE,
        }
    }
}

/// Tunables of the animation core. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub particle_count: usize,
    /// Fixed seed for reproducible layouts; `None` draws from the thread RNG.
    pub seed: Option<u64>,
    pub morph: MorphSettings,
    pub camera: CameraSettings,
    pub timeline: TimelineSchedule,
    pub ribbons: Vec<RibbonSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            seed: None,
            morph: MorphSettings::default(),
            camera: CameraSettings::default(),
            timeline: TimelineSchedule::default(),
            ribbons: RibbonSpec::defaults(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 || self.particle_count > MAX_PARTICLES {
            return Err(ConfigError::ParticleCount {
                got: self.particle_count,
                max: MAX_PARTICLES,
            });
        }

        positive("morph.approach_rate", self.morph.approach_rate)?;
        positive("morph.retreat_rate", self.morph.retreat_rate)?;
        if !(0.0..=1.0).contains(&self.morph.formed_threshold) {
            return Err(ConfigError::Threshold(self.morph.formed_threshold));
        }

        positive("camera.initial_distance", self.camera.initial_distance)?;
        positive("camera.scattered_distance", self.camera.scattered_distance)?;
        positive("camera.formed_distance", self.camera.formed_distance)?;
        positive("camera.rate", self.camera.rate)?;

        for (index, ribbon) in self.ribbons.iter().enumerate() {
            if !(ribbon.radius.is_finite() && ribbon.radius > 0.0) {
                return Err(ConfigError::Ribbon {
                    index,
                    reason: "radius must be positive",
                });
            }
            if !(ribbon.speed.is_finite() && ribbon.phase_offset.is_finite()) {
                return Err(ConfigError::Ribbon {
                    index,
                    reason: "speed and phase offset must be finite",
                });
            }
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AnimationState;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config: EngineConfig = serde_yaml::from_str(
            r#"
particle_count: 500
seed: 42
camera:
  formed_distance: 7.5
"#,
        )
        .unwrap();

        assert_eq!(config.particle_count, 500);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.camera.formed_distance, 7.5);
        assert_eq!(config.camera.scattered_distance, SCATTERED_DISTANCE);
        assert_eq!(config.ribbons.len(), 3);
        assert_eq!(config.timeline.steps.len(), 3);
    }

    #[test]
    fn timeline_steps_parse_from_yaml() {
        let config: EngineConfig = serde_yaml::from_str(
            r#"
timeline:
  toggle_cancels_pending: true
  steps:
    - { at_ms: 200, state: morphing }
    - { at_ms: 900, state: revealed }
"#,
        )
        .unwrap();

        assert!(config.timeline.toggle_cancels_pending);
        assert_eq!(config.timeline.steps[1].state, AnimationState::Revealed);
        assert_eq!(config.timeline.steps[1].at_ms, 900);
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = EngineConfig::default();
        config.particle_count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ParticleCount { got: 0, .. })
        ));

        let mut config = EngineConfig::default();
        config.morph.retreat_rate = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "morph.retreat_rate",
                ..
            })
        ));

        let mut config = EngineConfig::default();
        config.morph.formed_threshold = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::Threshold(1.5)));

        let mut config = EngineConfig::default();
        config.ribbons[2].radius = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Ribbon { index: 2, .. })
        ));
    }
}
