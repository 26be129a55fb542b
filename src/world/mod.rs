//! The playable world: a shared player, patrolling guards and three levels
//! (`Tutorial`, `First`, `Second`) chained together by teleport tiles.

pub mod guard;
pub mod levels;
pub mod player;

use log::info;

use crate::core::{EntityHandle, Game};
use crate::engine::EngineConfig;
use crate::types::{CameraPerspective, EngineError, Vector};

pub use guard::{guard, GuardBehavior};
pub use levels::{safe_spawn, WORLD_SIZE};
pub use player::{player, PlayerBehavior};

pub const GAME_NAME: &str = "Free Roam";

/// Build the game with all levels added. The returned handle is the player every
/// level borrows.
pub fn build_game(config: &EngineConfig) -> Result<(Game, EntityHandle), EngineError> {
    let perspective = config.perspective.unwrap_or(CameraPerspective::FirstPerson);
    let mut game = Game::new(GAME_NAME, WORLD_SIZE, perspective);
    let fill = config.fill.unwrap_or(false);

    let player = player(Vector::new(6.0, 6.0)).into_handle();
    levels::add_tutorial(&mut game, &player, fill)?;
    levels::add_first(&mut game, &player, fill)?;
    levels::add_second(&mut game, &player, fill)?;

    info!("built `{}` with {} levels", GAME_NAME, game.level_count());
    Ok((game, player))
}
