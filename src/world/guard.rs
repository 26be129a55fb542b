//! Guards walk back and forth between two points.

use log::trace;

use crate::core::{Entity, EntityBehavior, EntityStats, GameContext, Scene};
use crate::types::{EntityKind, EntityState, Ownership, Sprite3DType, Vector, DEFAULT_PLANE_LENGTH};

/// Distance a guard covers per update.
pub const GUARD_SPEED: f32 = 0.05;

pub const GUARD_HEIGHT: f32 = 1.7;

#[derive(Debug, Default)]
pub struct GuardBehavior;

impl GuardBehavior {
    fn face(entity: &mut Entity, heading: Vector) {
        let Some(direction) = heading.normalized() else {
            return;
        };
        entity.set_direction(direction);
        entity.set_plane(direction.perpendicular() * DEFAULT_PLANE_LENGTH);
        entity.set_3d_sprite_rotation(direction.y.atan2(direction.x));
    }

    fn turn_around(entity: &mut Entity) {
        let next = match entity.state() {
            EntityState::MovingToStart => EntityState::MovingToEnd,
            _ => EntityState::MovingToStart,
        };
        trace!("guard `{}`: now {:?}", entity.name(), next);
        entity.set_state(next);
    }
}

impl EntityBehavior for GuardBehavior {
    fn start(&mut self, entity: &mut Entity, _ctx: &mut GameContext) {
        if !matches!(entity.state(), EntityState::MovingToStart | EntityState::MovingToEnd) {
            entity.set_state(EntityState::MovingToEnd);
        }
    }

    fn update(&mut self, entity: &mut Entity, scene: &mut Scene<'_>) {
        let stats = entity.stats();
        let (target, speed) = match entity.state() {
            EntityState::MovingToStart => (stats.start_position, stats.speed),
            EntityState::MovingToEnd => (stats.end_position, stats.speed),
            _ => return,
        };

        let delta = target - entity.position();
        let distance = delta.length();
        if distance <= speed {
            entity.position_set(target);
            Self::turn_around(entity);
            return;
        }

        let next = entity.position() + delta * (speed / distance);
        if scene.is_blocked(next) {
            Self::turn_around(entity);
            return;
        }
        Self::face(entity, delta);
        entity.position_set(next);
    }
}

/// A humanoid enemy patrolling from `start` to `end` and back.
pub fn guard(name: impl Into<String>, start: Vector, end: Vector, rotation: f32) -> Entity {
    let mut entity = Entity::new(name, EntityKind::Enemy, start, Vector::new(0.5, 0.5))
        .with_ownership(Ownership::Owned)
        .with_stats(EntityStats {
            speed: GUARD_SPEED,
            start_position: start,
            end_position: end,
            ..EntityStats::default()
        })
        .with_behavior(GuardBehavior);
    entity.create_3d_sprite(Sprite3DType::Humanoid, GUARD_HEIGHT, 0.0, rotation);
    entity
}
