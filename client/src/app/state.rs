use bevy::prelude::*;

/// Whether the overlay is drawn. The scene keeps running either way.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum OverlayState {
    #[default]
    Visible,
    Hidden,
}

impl OverlayState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Visible => Self::Hidden,
            Self::Hidden => Self::Visible,
        }
    }
}
