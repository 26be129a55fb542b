//! Core engine: raycast maps, 3D sprite meshes, entities, levels and the game
//! session.
//!
//! This crate has no dependency on any display, input device or clock. Drawing goes
//! through the [`Canvas`](canvas::Canvas) trait and input arrives as a single
//! [`InputKey`](free_roam_types::InputKey) stored in the [`GameContext`] before
//! each update, so everything here runs the same in the terminal host and in tests.
//!
//! # Module Structure
//!
//! - [`canvas`]: drawing surface trait, in-memory [`PixelBuffer`], 1-bit [`Bitmap`]
//! - [`map`]: tile grid, wall list and the column-by-column raycasting sweep
//! - [`camera`]: first- and third-person camera parameters
//! - [`sprite3d`]: procedurally generated triangle meshes
//! - [`projection`]: perspective projection and triangle scan conversion
//! - [`entity`]: game objects and their lifecycle hooks
//! - [`level`]: entity collection with update/collision/render passes
//! - [`game`]: level slots, switching, start/stop
//! - [`context`]: state shared with hooks in place of back-references
//! - [`snapshot`]: serializable level and entity views
//!
//! # Frame
//!
//! A tick is [`Game::update`] followed by [`Game::render`]:
//!
//! 1. every active entity in the current level runs its update hook, then gets one
//!    collision call per overlapping active entity;
//! 2. level switch and stop requests raised during the pass are applied;
//! 3. the canvas is cleared, the map is swept from the resolved camera, and each
//!    visible entity draws its flat sprite, its mesh and its render hook.
//!
//! # Example
//!
//! ```
//! use free_roam_core::{DynamicMap, Entity, Game, Level, PixelBuffer};
//! use free_roam_types::{CameraPerspective, EntityKind, Ownership, Vector};
//!
//! let mut game = Game::new("demo", Vector::new(16.0, 16.0), CameraPerspective::FirstPerson);
//! let map = DynamicMap::new("room", 16, 16, true, false);
//! let index = game.level_add(Level::new("room", Vector::new(16.0, 16.0)).with_map(map)).unwrap();
//!
//! let player = Entity::new("player", EntityKind::Player, Vector::new(8.0, 8.0), Vector::new(1.0, 1.0))
//!     .with_ownership(Ownership::Borrowed)
//!     .into_handle();
//!
//! game.start().unwrap();
//! let (level, ctx) = game.level_and_context(index).unwrap();
//! level.entity_add(player.clone(), ctx);
//!
//! let mut screen = PixelBuffer::screen();
//! game.update();
//! game.render(&mut screen, None);
//! assert!(screen.ink_count() > 0);
//!
//! game.stop();
//! assert!(!game.is_running());
//! ```

pub mod camera;
pub mod canvas;
pub mod context;
pub mod entity;
pub mod game;
pub mod level;
pub mod map;
pub mod projection;
pub mod snapshot;
pub mod sprite3d;

pub use free_roam_types as types;

pub use camera::CameraParams;
pub use canvas::{Bitmap, Canvas, Color, PixelBuffer, SpriteRef};
pub use context::{GameContext, LevelTarget, Scene};
pub use entity::{Entity, EntityBehavior, EntityHandle, EntityStats, HookSet};
pub use game::Game;
pub use level::Level;
pub use map::{DynamicMap, HitSide, RayHit, Wall};
pub use snapshot::{EntitySnapshot, LevelSnapshot};
pub use sprite3d::{Sprite3D, Triangle3D, Vertex3D};
