use crate::field::{GOLD, Rgb};
use crate::state::AnimationState;
use glam::Vec3;
use serde::{Deserialize, Serialize};

const ORBIT_SCALE: f32 = 2.0;
const SPIRAL_HALF_HEIGHT: f32 = 2.5;
const SPIRAL_TAPER: f32 = 0.5;
const SPIRAL_REFERENCE_RADIUS: f32 = 3.0;
const SPIRAL_WINDING: f32 = 3.0;

/// Static parameters of one ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RibbonSpec {
    pub radius: f32,
    pub speed: f32,
    pub color_hint: Rgb,
    pub phase_offset: f32,
}

impl RibbonSpec {
    pub const fn new(radius: f32, speed: f32, color_hint: Rgb, phase_offset: f32) -> Self {
        Self {
            radius,
            speed,
            color_hint,
            phase_offset,
        }
    }

    /// The three golden ribbons of the reference scene.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(3.0, 0.5, GOLD, 0.0),
            Self::new(3.5, 0.4, Rgb::new(0xF0, 0xE6, 0x8C), 2.0),
            Self::new(2.5, 0.6, Rgb::new(0xDA, 0xA5, 0x20), 4.0),
        ]
    }
}

/// Computes the leading point of each ribbon.
#[derive(Debug, Clone)]
pub struct TrailEmitter {
    ribbons: Vec<RibbonSpec>,
}

impl Default for TrailEmitter {
    fn default() -> Self {
        Self::new(RibbonSpec::defaults())
    }
}

impl TrailEmitter {
    pub fn new(ribbons: Vec<RibbonSpec>) -> Self {
        Self { ribbons }
    }

    pub fn ribbons(&self) -> &[RibbonSpec] {
        &self.ribbons
    }

    /// Orbit while scattered, bounded helix otherwise.
    pub fn path_point(spec: &RibbonSpec, state: AnimationState, elapsed: f32) -> Vec3 {
        let t = elapsed * spec.speed + spec.phase_offset;

        if state == AnimationState::Scattered {
            let reach = spec.radius * ORBIT_SCALE;
            return Vec3::new(t.sin() * reach, (t * 0.5).cos() * reach, t.cos() * reach);
        }

        let spiral_y = (t.sin() + 1.0) * SPIRAL_HALF_HEIGHT - SPIRAL_HALF_HEIGHT;
        let current_radius =
            (SPIRAL_HALF_HEIGHT - spiral_y) * SPIRAL_TAPER * (spec.radius / SPIRAL_REFERENCE_RADIUS);
        let winding = t * SPIRAL_WINDING;
        Vec3::new(
            winding.cos() * current_radius,
            spiral_y,
            winding.sin() * current_radius,
        )
    }

    /// One point per ribbon, in ribbon order. Empty under reduced motion.
    pub fn leading_points(
        &self,
        state: AnimationState,
        reduced_motion: bool,
        elapsed: f32,
    ) -> Vec<Vec3> {
        if reduced_motion {
            return Vec::new();
        }
        self.ribbons
            .iter()
            .map(|spec| Self::path_point(spec, state, elapsed))
            .collect()
    }
}
