//! Reduced-motion preference.
//!
//! There is no portable OS query for it, so the settings file wins and the
//! `MAGIC_TREE_REDUCED_MOTION` variable is the fallback. Anything unreadable
//! means full motion.

use crate::settings::MotionSettings;

pub const REDUCED_MOTION_ENV: &str = "MAGIC_TREE_REDUCED_MOTION";

pub fn detect_reduced_motion(settings: &MotionSettings) -> bool {
    resolve_reduced_motion(
        settings.reduced_motion,
        std::env::var(REDUCED_MOTION_ENV).ok().as_deref(),
    )
}

pub fn resolve_reduced_motion(configured: Option<bool>, env_value: Option<&str>) -> bool {
    if let Some(value) = configured {
        return value;
    }

    env_value.and_then(parse_motion_flag).unwrap_or(false)
}

pub fn parse_motion_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "reduce" => Some(true),
        "0" | "false" | "no" | "off" | "no-preference" => Some(false),
        _ => None,
    }
}
