//! Free Roam: a tiny first/third-person world on a 128x64 monochrome screen.
//!
//! This package re-exports the workspace crates under short names and adds the
//! built-in [`world`]: the player, guards and levels played by the `free-roam`
//! binary.

pub use free_roam_core as core;
pub use free_roam_engine as engine;
pub use free_roam_input as input;
pub use free_roam_term as term;
pub use free_roam_types as types;

pub mod world;
