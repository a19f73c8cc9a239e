#![allow(clippy::too_many_arguments, clippy::type_complexity)]

pub mod accessibility;
pub mod app;
pub mod greeting_bridge;
pub mod settings;
pub mod tree;
pub mod ui;

pub use app::state::OverlayState;
