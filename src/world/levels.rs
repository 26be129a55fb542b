//! The three built-in levels.
//!
//! Each level owns its map, guards and props and borrows the shared player. On
//! start a level moves the player to its spawn point, facing east.

use std::f32::consts::FRAC_PI_4;
use std::rc::Rc;

use log::debug;

use crate::core::{DynamicMap, Entity, EntityHandle, Game, Level};
use crate::types::{EngineError, EntityKind, Sprite3DType, TileType, Vector, DEFAULT_PLANE_LENGTH};

use super::guard::guard;

/// Size of every level's world, in screen pixels.
pub const WORLD_SIZE: Vector = Vector::new(128.0, 64.0);

/// First candidate whose cell is open, or `fallback`.
pub fn safe_spawn(map: &DynamicMap, candidates: &[Vector], fallback: Vector) -> Vector {
    candidates
        .iter()
        .copied()
        .find(|&pos| !map.is_solid_at(pos))
        .unwrap_or(fallback)
}

/// A static mesh. `width` is the house width or pillar radius.
pub fn prop(name: &str, kind: Sprite3DType, position: Vector, height: f32, width: f32, rotation: f32) -> Entity {
    let mut entity = Entity::new(name, EntityKind::Prop3D, position, Vector::new(0.5, 0.5));
    entity.create_3d_sprite(kind, height, width, rotation);
    entity
}

pub fn tutorial_map(fill: bool) -> DynamicMap {
    let mut map = DynamicMap::new("tutorial", 12, 12, true, fill);
    map.add_vertical_wall(9, 3, 5, TileType::Wall);
    map.set_tile(10, 10, TileType::Teleport);
    map
}

pub fn first_map(fill: bool) -> DynamicMap {
    let mut map = DynamicMap::new("first", 24, 24, true, fill);
    map.add_room(1, 1, 11, 11, true);
    map.add_room(12, 1, 22, 11, true);
    map.add_room(1, 12, 22, 22, true);
    map.add_corridor(11, 6, 12, 6);
    map.add_corridor(17, 11, 17, 12);
    map.add_door(6, 11);
    map.set_tile(6, 12, TileType::Empty);
    map.set_tile(20, 20, TileType::Teleport);
    map
}

pub fn second_map(fill: bool) -> DynamicMap {
    let mut map = DynamicMap::new("second", 32, 32, true, fill);
    map.add_room(1, 1, 9, 9, true);
    map.add_room(12, 12, 24, 24, true);
    map.add_corridor(5, 9, 18, 12);
    map.add_vertical_wall(26, 2, 10, TileType::Wall);
    map.add_door(24, 18);
    map.set_tile(22, 22, TileType::Teleport);
    map
}

/// Add `map` as a level, put `player` in it and spawn `others`. Returns the slot.
fn add_level(
    game: &mut Game,
    name: &str,
    map: DynamicMap,
    spawn: Vector,
    player: &EntityHandle,
    others: Vec<Entity>,
) -> Result<usize, EngineError> {
    let spawned = Rc::clone(player);
    let level = Level::new(name, WORLD_SIZE).with_map(map).on_start(move |_| {
        let Ok(mut player) = spawned.try_borrow_mut() else {
            return;
        };
        player.position_set(spawn);
        player.set_direction(Vector::new(1.0, 0.0));
        player.set_plane(Vector::new(0.0, DEFAULT_PLANE_LENGTH));
        player.set_3d_sprite_rotation(0.0);
    });

    let index = game.level_add(level)?;
    let (level, ctx) = game
        .level_and_context(index)
        .ok_or(EngineError::EmptyLevelSlot(index))?;
    level.entity_add(Rc::clone(player), ctx);
    for entity in others {
        level.spawn(entity, ctx);
    }
    debug!("level `{}` built with {} entities", name, level.entity_count());
    Ok(index)
}

pub fn add_tutorial(game: &mut Game, player: &EntityHandle, fill: bool) -> Result<usize, EngineError> {
    let map = tutorial_map(fill);
    let spawn = safe_spawn(&map, &[Vector::new(6.0, 6.0)], Vector::new(2.5, 2.5));
    add_level(
        game,
        "Tutorial",
        map,
        spawn,
        player,
        vec![
            guard("Tutorial Guard 1", Vector::new(3.0, 7.0), Vector::new(9.0, 7.0), FRAC_PI_4),
            guard("Tutorial Guard 2", Vector::new(6.0, 2.0), Vector::new(1.5, 2.0), FRAC_PI_4),
            prop("Tutorial Tree", Sprite3DType::Tree, Vector::new(3.0, 10.0), 2.0, 0.0, 0.0),
        ],
    )
}

pub fn add_first(game: &mut Game, player: &EntityHandle, fill: bool) -> Result<usize, EngineError> {
    let map = first_map(fill);
    let spawn = safe_spawn(
        &map,
        &[Vector::new(6.0, 6.0), Vector::new(5.0, 4.0), Vector::new(16.0, 6.0)],
        Vector::new(6.0, 6.0),
    );
    add_level(
        game,
        "First",
        map,
        spawn,
        player,
        vec![
            guard("First Guard 1", Vector::new(4.0, 17.0), Vector::new(18.0, 17.0), 0.0),
            guard("First Guard 2", Vector::new(15.0, 4.0), Vector::new(15.0, 9.0), 0.0),
            prop("First House", Sprite3DType::House, Vector::new(19.0, 5.0), 2.0, 2.0, 0.0),
            prop("First Tree 1", Sprite3DType::Tree, Vector::new(4.0, 20.0), 2.0, 0.0, 0.0),
            prop("First Tree 2", Sprite3DType::Tree, Vector::new(9.0, 20.0), 2.5, 0.0, 0.0),
        ],
    )
}

pub fn add_second(game: &mut Game, player: &EntityHandle, fill: bool) -> Result<usize, EngineError> {
    let map = second_map(fill);
    let spawn = safe_spawn(
        &map,
        &[Vector::new(5.0, 5.0), Vector::new(3.0, 3.0), Vector::new(18.0, 18.0)],
        Vector::new(5.0, 5.0),
    );
    add_level(
        game,
        "Second",
        map,
        spawn,
        player,
        vec![
            guard("Second Guard 1", Vector::new(14.0, 18.0), Vector::new(22.0, 18.0), 0.0),
            guard("Second Guard 2", Vector::new(18.0, 14.0), Vector::new(18.0, 22.0), 0.0),
            prop("Second Pillar 1", Sprite3DType::Pillar, Vector::new(15.0, 15.0), 2.0, 0.3, 0.0),
            prop("Second Pillar 2", Sprite3DType::Pillar, Vector::new(21.0, 15.0), 2.0, 0.3, 0.0),
            prop("Second Tree", Sprite3DType::Tree, Vector::new(28.0, 6.0), 2.0, 0.0, 0.0),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_and_teleports_are_open() {
        let cases = [
            (tutorial_map(false), Vector::new(6.0, 6.0), Vector::new(10.5, 10.5)),
            (first_map(false), Vector::new(6.0, 6.0), Vector::new(20.5, 20.5)),
            (second_map(false), Vector::new(5.0, 5.0), Vector::new(22.5, 22.5)),
        ];
        for (map, spawn, teleport) in cases {
            assert!(!map.is_solid_at(spawn), "{} spawn", map.name());
            assert_eq!(map.tile_at(teleport), TileType::Teleport, "{}", map.name());
        }
    }

    #[test]
    fn corridors_open_the_room_walls() {
        let map = first_map(false);
        assert_eq!(map.get_tile(11, 6), TileType::Empty);
        assert_eq!(map.get_tile(12, 6), TileType::Empty);
        assert_eq!(map.get_tile(17, 12), TileType::Empty);
        assert_eq!(map.get_tile(6, 11), TileType::Door);
        assert_eq!(map.get_tile(6, 10), TileType::Empty);
        assert_eq!(map.get_tile(6, 12), TileType::Empty);

        let map = second_map(false);
        assert_eq!(map.get_tile(5, 9), TileType::Empty);
        assert_eq!(map.get_tile(18, 12), TileType::Empty);
    }

    #[test]
    fn safe_spawn_skips_walls() {
        let map = DynamicMap::new("box", 6, 6, true, false);
        let spawn = safe_spawn(&map, &[Vector::new(0.5, 0.5), Vector::new(2.5, 2.5)], Vector::ZERO);
        assert_eq!(spawn, Vector::new(2.5, 2.5));
        assert_eq!(safe_spawn(&map, &[], Vector::new(1.5, 1.5)), Vector::new(1.5, 1.5));
    }
}
