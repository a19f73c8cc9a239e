//! Holiday greeting text for the magic tree viewer.
//!
//! The only remote call in the project: a single prompt to Gemini, shaped
//! into at most a couple of sentences. Failures are logged and surface as an
//! empty greeting so the viewer never blocks on them.

pub mod client;
pub mod config;
pub mod error;
pub mod gemini;

pub use client::{GreetingClient, GreetingFuture, GreetingSource, StaticGreeting};
pub use config::GreetingConfig;
pub use error::{GreetingError, Result};

pub const DEFAULT_THEME: &str = "Luxury Gold and Emerald Christmas";
