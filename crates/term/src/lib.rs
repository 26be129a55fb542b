//! Terminal host for the engine.
//!
//! The engine draws on a 128x64 monochrome [`Canvas`](crate::core::Canvas). This
//! crate emulates that screen in a terminal: pixels are folded into half-block
//! cells on an amber backlight, and only changed cells are re-sent each frame.
//!
//! - [`fb`]: styled character-cell framebuffer
//! - [`screen_view`]: pure pixel-to-cell conversion
//! - [`renderer`]: crossterm output with diffing
//! - [`display`]: the `Canvas` implementation tying the three together

pub mod display;
pub mod fb;
pub mod renderer;
pub mod screen_view;

pub use free_roam_core as core;
pub use free_roam_types as types;

pub use display::TerminalDisplay;
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use screen_view::{ScreenView, Viewport};
