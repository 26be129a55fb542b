//! The player: turns and walks on direction keys, blocked by solid cells.

use log::{debug, info};

use crate::core::{Canvas, Color, Entity, EntityBehavior, EntityStats, GameContext, LevelTarget, Scene};
use crate::types::{
    CameraPerspective, EntityKind, EntityState, InputKey, Ownership, Sprite3DType, TileType, Vector,
    DEFAULT_PLANE_LENGTH, PLAYER_STEP,
};

/// Player mesh height in map units.
pub const PLAYER_HEIGHT: f32 = 1.8;

const HUD_BAR_X: i32 = 30;
const HUD_BAR_WIDTH: i32 = 40;

/// Damage per frame of contact, as a fraction of the enemy's strength.
const CONTACT_DAMAGE: f32 = 0.1;

#[derive(Debug, Default)]
pub struct PlayerBehavior;

impl PlayerBehavior {
    fn walk(entity: &mut Entity, scene: &mut Scene<'_>, step: f32) {
        let target = entity.position() + entity.direction() * step;
        if scene.is_blocked(target) {
            entity.set_state(EntityState::Idle);
            return;
        }
        entity.position_set(target);
        entity.set_state(EntityState::Moving);

        let on_teleport = scene
            .map
            .is_some_and(|map| map.tile_at(target) == TileType::Teleport);
        if on_teleport {
            info!("player reached a teleport at {:?}", target.cell());
            scene.ctx.request_level(LevelTarget::Next);
        }
    }

    fn turn(entity: &mut Entity, angle: f32) {
        let direction = entity.direction().rotated(angle);
        entity.set_direction(direction);
        entity.set_plane(entity.plane().rotated(angle));
        entity.set_3d_sprite_rotation(direction.y.atan2(direction.x));
    }
}

impl EntityBehavior for PlayerBehavior {
    fn start(&mut self, entity: &mut Entity, _ctx: &mut GameContext) {
        entity.set_state(EntityState::Idle);
    }

    fn update(&mut self, entity: &mut Entity, scene: &mut Scene<'_>) {
        if entity.state() == EntityState::Dead {
            return;
        }
        match scene.ctx.input {
            InputKey::Up => Self::walk(entity, scene, PLAYER_STEP),
            InputKey::Down => Self::walk(entity, scene, -PLAYER_STEP),
            InputKey::Left => Self::turn(entity, -PLAYER_STEP),
            InputKey::Right => Self::turn(entity, PLAYER_STEP),
            InputKey::Confirm => {
                scene.ctx.perspective = match scene.ctx.perspective {
                    CameraPerspective::FirstPerson => CameraPerspective::ThirdPerson,
                    CameraPerspective::ThirdPerson => CameraPerspective::FirstPerson,
                };
                debug!("perspective now {:?}", scene.ctx.perspective);
            }
            InputKey::Cancel => scene.ctx.request_stop(),
            InputKey::None => entity.set_state(EntityState::Idle),
        }
    }

    fn render(&mut self, entity: &mut Entity, canvas: &mut dyn Canvas, _ctx: &GameContext) {
        let stats = entity.stats();
        let ratio = if stats.max_health > 0.0 {
            (stats.health / stats.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        };
        canvas.draw_text(1, 57, &format!("HP {}", stats.health.max(0.0).round() as i32), Color::Black);
        canvas.draw_rect(HUD_BAR_X, 58, HUD_BAR_WIDTH + 2, 5, Color::Black);
        canvas.fill_rect(HUD_BAR_X + 1, 59, (ratio * HUD_BAR_WIDTH as f32) as i32, 3, Color::Black);
    }

    fn collision(&mut self, entity: &mut Entity, other: &Entity, ctx: &mut GameContext) {
        if other.kind() != EntityKind::Enemy || entity.state() == EntityState::Dead {
            return;
        }
        let stats = entity.stats_mut();
        stats.health -= other.stats().strength * CONTACT_DAMAGE;
        entity.set_state(EntityState::Attacked);

        if entity.stats().health <= 0.0 {
            info!("player was defeated, back to the first level");
            let max_health = entity.stats().max_health;
            entity.stats_mut().health = max_health;
            entity.set_state(EntityState::Idle);
            ctx.request_level(LevelTarget::Index(0));
        }
    }
}

/// The player entity, borrowed by every level it is added to.
pub fn player(position: Vector) -> Entity {
    let mut entity = Entity::new("Player", EntityKind::Player, position, Vector::new(0.5, 0.5))
        .with_ownership(Ownership::Borrowed)
        .with_direction(Vector::new(1.0, 0.0), Vector::new(0.0, DEFAULT_PLANE_LENGTH))
        .with_stats(EntityStats {
            speed: PLAYER_STEP,
            ..EntityStats::default()
        })
        .with_behavior(PlayerBehavior);
    entity.create_3d_sprite(Sprite3DType::Humanoid, PLAYER_HEIGHT, 0.0, 0.0);
    entity
}
