//! Runtime settings read from the environment.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `FREE_ROAM_FPS` | target frame rate | `DEFAULT_FPS` |
//! | `FREE_ROAM_PERSPECTIVE` | `first` or `third` | game's own |
//! | `FREE_ROAM_FILL` | `1`/`true` fills wall slices | map's own |
//! | `FREE_ROAM_NO_DELAY` | `1`/`true` ticks without sleeping | off |
//!
//! Unparseable values are ignored.

use std::env;

use crate::types::{CameraPerspective, DEFAULT_FPS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub fps: u32,
    pub perspective: Option<CameraPerspective>,
    pub fill: Option<bool>,
    pub no_delay: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            perspective: None,
            fill: None,
            no_delay: false,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fps = lookup("FREE_ROAM_FPS")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&fps| fps > 0)
            .unwrap_or(DEFAULT_FPS);

        let perspective = lookup("FREE_ROAM_PERSPECTIVE").and_then(|s| CameraPerspective::from_str(&s));

        let fill = lookup("FREE_ROAM_FILL").and_then(|s| parse_flag(&s));

        let no_delay = lookup("FREE_ROAM_NO_DELAY")
            .and_then(|s| parse_flag(&s))
            .unwrap_or(false);

        Self {
            fps,
            perspective,
            fill,
            no_delay,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
