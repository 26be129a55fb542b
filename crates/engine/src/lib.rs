//! Frame loop for the free-roam engine.
//!
//! [`GameEngine`] owns one [`Game`](crate::core::Game) and ticks it either in a
//! blocking loop at a fixed frame rate ([`GameEngine::run`]) or one tick per call
//! for hosts with their own frame callback ([`GameEngine::run_async`]).
//! [`EngineConfig`] reads the runtime knobs from the environment.

pub mod config;
pub mod engine;

pub use free_roam_core as core;
pub use free_roam_types as types;

pub use config::EngineConfig;
pub use engine::GameEngine;
