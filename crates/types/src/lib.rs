//! Shared types and constants for the free-roam engine.
//!
//! Everything in here is plain data with no rendering or I/O attached, so it can be
//! used from the core simulation, the terminal host and tests alike.
//!
//! # Screen
//!
//! The engine targets a tiny monochrome display:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SCREEN_WIDTH` | 128 | Framebuffer width in pixels |
//! | `SCREEN_HEIGHT` | 64 | Framebuffer height in pixels |
//! | `RENDER_HEIGHT` | 56 | Vertical extent used for wall slices |
//! | `RES_DIVIDER` | 2 | Column step of the raycasting sweep |
//! | `MAX_RENDER_DEPTH` | 12 | Grid steps before a ray gives up |
//!
//! # Camera
//!
//! Positions are in map cells. The camera is described by a position, a facing
//! direction and a camera plane perpendicular to it; the plane length sets the
//! field of view (`DEFAULT_PLANE_LENGTH` = 0.66, roughly 66 degrees).
//!
//! # Examples
//!
//! ```
//! use free_roam_types::{InputKey, TileType, Vector};
//!
//! let dir = Vector::new(1.0, 0.0);
//! assert_eq!(dir.perpendicular(), Vector::new(0.0, 1.0));
//!
//! assert!(TileType::Wall.is_solid());
//! assert!(!TileType::Teleport.is_solid());
//!
//! assert_eq!(InputKey::from_str("confirm"), Some(InputKey::Confirm));
//! ```

pub mod error;
pub mod vector;

pub use error::EngineError;
pub use vector::Vector;

use serde::{Deserialize, Serialize};

/// Framebuffer width in pixels.
pub const SCREEN_WIDTH: u16 = 128;

/// Framebuffer height in pixels.
pub const SCREEN_HEIGHT: u16 = 64;

/// Vertical extent of a wall slice at distance 1.
pub const RENDER_HEIGHT: u16 = 56;

/// Column step of the raycasting sweep (every other column is cast).
pub const RES_DIVIDER: usize = 2;

/// Maximum number of grid steps a ray takes before reporting no hit.
pub const MAX_RENDER_DEPTH: u32 = 12;

/// Largest map accepted by `DynamicMap`.
pub const MAX_MAP_WIDTH: u8 = 64;
pub const MAX_MAP_HEIGHT: u8 = 64;

/// Soft cap on explicit wall segments per map.
pub const MAX_WALLS: usize = 100;

/// Level slots per game.
pub const MAX_LEVELS: usize = 10;

/// Triangle budget of a single 3D sprite.
pub const MAX_TRIANGLES_PER_SPRITE: usize = 48;

/// Camera-space depth at or below which a projected vertex is rejected.
pub const NEAR_PLANE: f32 = 0.1;

/// Projection scale; matches half the screen width so one unit of camera-space x at
/// depth 1 spans half the screen.
pub const FOV_SCALE: f32 = 64.0;

/// Length of the camera plane for a freshly spawned camera.
pub const DEFAULT_PLANE_LENGTH: f32 = 0.66;

/// Eye height of a first-person camera.
pub const CAMERA_HEIGHT: f32 = 1.6;

/// Distance a synthesized third-person camera sits behind the player.
pub const THIRD_PERSON_DISTANCE: f32 = 3.0;

/// Eye height of a synthesized third-person camera.
pub const THIRD_PERSON_HEIGHT: f32 = 1.2;

/// Facing directions shorter than this are treated as degenerate.
pub const MIN_DIRECTION_LENGTH: f32 = 1e-3;

/// Replacement for an exactly-zero ray direction component.
pub const RAY_EPSILON: f32 = 1e-5;

/// Movement step and turn angle (radians) applied per key press.
pub const PLAYER_STEP: f32 = 0.2;

/// Default target frame rate of the engine loop.
pub const DEFAULT_FPS: u32 = 30;

/// A grid cell kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    #[default]
    Empty,
    Wall,
    Door,
    Teleport,
    EnemySpawn,
    ItemSpawn,
}

impl TileType {
    /// Walls and doors block rays and movement; everything else is open.
    pub fn is_solid(&self) -> bool {
        matches!(self, TileType::Wall | TileType::Door)
    }
}

/// The single "most recent key" the host hands to the game before each update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKey {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
    #[default]
    None,
}

impl InputKey {
    /// Parse a key name (case-insensitive).
    ///
    /// ```
    /// use free_roam_types::InputKey;
    ///
    /// assert_eq!(InputKey::from_str("UP"), Some(InputKey::Up));
    /// assert_eq!(InputKey::from_str("ok"), Some(InputKey::Confirm));
    /// assert_eq!(InputKey::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(InputKey::Up),
            "down" => Some(InputKey::Down),
            "left" => Some(InputKey::Left),
            "right" => Some(InputKey::Right),
            "confirm" | "ok" | "center" => Some(InputKey::Confirm),
            "cancel" | "back" => Some(InputKey::Cancel),
            "none" => Some(InputKey::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputKey::Up => "up",
            InputKey::Down => "down",
            InputKey::Left => "left",
            InputKey::Right => "right",
            InputKey::Confirm => "confirm",
            InputKey::Cancel => "cancel",
            InputKey::None => "none",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == InputKey::None
    }
}

/// Where the camera sits relative to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraPerspective {
    #[default]
    FirstPerson,
    ThirdPerson,
}

impl CameraPerspective {
    /// Accepts `first`/`third` with optional `-person` suffix.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "first" | "first-person" | "first_person" | "1" => Some(CameraPerspective::FirstPerson),
            "third" | "third-person" | "third_person" | "3" => Some(CameraPerspective::ThirdPerson),
            _ => None,
        }
    }
}

/// Entity type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Enemy,
    Icon,
    Npc,
    #[serde(rename = "prop_3d")]
    Prop3D,
}

/// Coarse behaviour state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityState {
    #[default]
    Idle,
    Moving,
    MovingToStart,
    MovingToEnd,
    Attacking,
    Attacked,
    Dead,
}

/// Who releases an entity.
///
/// - **Owned**: the level that holds it stops and drops it on removal or teardown.
/// - **Borrowed**: someone else (the session holding the player) keeps it alive; a
///   level only drops its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    #[default]
    Owned,
    Borrowed,
}

/// Canonical procedurally generated mesh shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sprite3DType {
    #[default]
    None,
    Humanoid,
    Tree,
    House,
    Pillar,
    Custom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_defaults() {
        assert_eq!(SCREEN_WIDTH, 128);
        assert_eq!(SCREEN_HEIGHT, 64);
        assert_eq!(RENDER_HEIGHT, 56);
        assert_eq!(MAX_RENDER_DEPTH, 12);
        assert!(RENDER_HEIGHT < SCREEN_HEIGHT);
    }

    #[test]
    fn only_walls_and_doors_are_solid() {
        let solid: Vec<TileType> = [
            TileType::Empty,
            TileType::Wall,
            TileType::Door,
            TileType::Teleport,
            TileType::EnemySpawn,
            TileType::ItemSpawn,
        ]
        .into_iter()
        .filter(|t| t.is_solid())
        .collect();
        assert_eq!(solid, vec![TileType::Wall, TileType::Door]);
    }

    #[test]
    fn input_key_names_roundtrip() {
        for key in [
            InputKey::Up,
            InputKey::Down,
            InputKey::Left,
            InputKey::Right,
            InputKey::Confirm,
            InputKey::Cancel,
            InputKey::None,
        ] {
            assert_eq!(InputKey::from_str(key.as_str()), Some(key));
        }
    }

    #[test]
    fn perspective_parsing() {
        assert_eq!(
            CameraPerspective::from_str("Third"),
            Some(CameraPerspective::ThirdPerson)
        );
        assert_eq!(
            CameraPerspective::from_str("first-person"),
            Some(CameraPerspective::FirstPerson)
        );
        assert_eq!(CameraPerspective::from_str("top-down"), None);
    }
}
