//! Terminal input for the engine.
//!
//! Maps `crossterm` key events onto the single [`InputKey`](crate::types::InputKey)
//! the game reads each tick, and provides an [`InputHandler`] that keeps a
//! direction key "held" between events, since most terminals never report key
//! releases.

pub mod handler;
pub mod map;

pub use free_roam_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, key_to_input, should_quit};
