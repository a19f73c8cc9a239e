use serde::{Deserialize, Serialize};

/// Discrete phase of the tree animation.
///
/// Variants are declared in progression order, so `Ord` follows the
/// timeline: `Scattered < Morphing < Formed < Revealed`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    #[default]
    Scattered,
    Morphing,
    Formed,
    Revealed,
}

impl AnimationState {
    pub const ALL: [Self; 4] = [Self::Scattered, Self::Morphing, Self::Formed, Self::Revealed];

    /// `true` for every state whose interpolation target is the formed tree.
    pub fn is_formed(self) -> bool {
        !matches!(self, Self::Scattered)
    }

    /// Morph progress this state pulls toward.
    pub fn morph_target(self) -> f32 {
        if self.is_formed() { 1.0 } else { 0.0 }
    }

    /// State reached by the manual toggle from `self`.
    pub fn toggled(self) -> Self {
        match self {
            Self::Formed | Self::Revealed => Self::Scattered,
            Self::Scattered | Self::Morphing => Self::Morphing,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Scattered => "Scattered",
            Self::Morphing => "Morphing",
            Self::Formed => "Formed",
            Self::Revealed => "Revealed",
        }
    }
}

impl std::fmt::Display for AnimationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-frame clock readings, both in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameClock {
    pub elapsed: f32,
    pub delta: f32,
}

impl FrameClock {
    pub fn new(elapsed: f32, delta: f32) -> Self {
        Self { elapsed, delta }
    }
}
