use crate::damping::damp;
use crate::state::AnimationState;
use glam::Vec3;

pub const SCATTERED_DISTANCE: f32 = 14.0;
pub const FORMED_DISTANCE: f32 = 8.0;
pub const REDUCED_MOTION_DISTANCE: f32 = 9.0;
pub const DISTANCE_RATE: f32 = 0.8;
/// Default perspective viewport distance before the rig takes over.
pub const INITIAL_DISTANCE: f32 = 5.0;

const SWAY_X_FREQUENCY: f32 = 0.1;
const SWAY_X_AMPLITUDE: f32 = 0.5;
const SWAY_Y_FREQUENCY: f32 = 0.15;
const SWAY_Y_AMPLITUDE: f32 = 0.2;
const LOOK_AT: Vec3 = Vec3::new(0.0, 0.5, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub distance: f32,
    pub sway_x: f32,
    pub sway_y: f32,
    pub look_at: Vec3,
}

impl CameraPose {
    /// Camera position implied by the pose: swayed on X/Y, `distance` along +Z.
    pub fn eye(&self) -> Vec3 {
        Vec3::new(self.sway_x, self.sway_y, self.distance)
    }
}

/// Damps camera distance between the intro and close-up framings.
#[derive(Debug, Clone)]
pub struct CameraRig {
    distance: f32,
    scattered_distance: f32,
    formed_distance: f32,
    rate: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(INITIAL_DISTANCE, SCATTERED_DISTANCE, FORMED_DISTANCE, DISTANCE_RATE)
    }
}

impl CameraRig {
    pub fn new(initial: f32, scattered_distance: f32, formed_distance: f32, rate: f32) -> Self {
        Self {
            distance: initial,
            scattered_distance,
            formed_distance,
            rate,
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn target_distance(&self, state: AnimationState) -> f32 {
        if state.is_formed() {
            self.formed_distance
        } else {
            self.scattered_distance
        }
    }

    pub fn update(
        &mut self,
        state: AnimationState,
        reduced_motion: bool,
        elapsed: f32,
        delta: f32,
    ) -> CameraPose {
        if reduced_motion {
            self.distance = REDUCED_MOTION_DISTANCE;
            return CameraPose {
                distance: REDUCED_MOTION_DISTANCE,
                sway_x: 0.0,
                sway_y: 0.0,
                look_at: Vec3::ZERO,
            };
        }

        self.distance = damp(self.distance, self.target_distance(state), self.rate, delta);

        CameraPose {
            distance: self.distance,
            sway_x: (elapsed * SWAY_X_FREQUENCY).sin() * SWAY_X_AMPLITUDE,
            sway_y: (elapsed * SWAY_Y_FREQUENCY).cos() * SWAY_Y_AMPLITUDE,
            look_at: LOOK_AT,
        }
    }
}
