//! Plain-data views of a level, for code outside the core that wants to mirror or
//! sync entity state.

use serde::{Deserialize, Serialize};

use free_roam_types::{EntityKind, EntityState, Ownership, Sprite3DType, Vector};

use crate::entity::{Entity, EntityStats};
use crate::level::Level;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub name: String,
    pub kind: EntityKind,
    pub position: Vector,
    pub old_position: Vector,
    pub direction: Vector,
    pub plane: Vector,
    pub size: Vector,
    pub active: bool,
    pub visible: bool,
    pub ownership: Ownership,
    pub state: EntityState,
    pub stats: EntityStats,
    pub sprite: Option<String>,
    pub sprite_3d: Option<Sprite3DType>,
}

impl From<&Entity> for EntitySnapshot {
    fn from(entity: &Entity) -> Self {
        Self {
            name: entity.name().to_string(),
            kind: entity.kind(),
            position: entity.position(),
            old_position: entity.old_position(),
            direction: entity.direction(),
            plane: entity.plane(),
            size: entity.size(),
            active: entity.is_active(),
            visible: entity.is_visible(),
            ownership: entity.ownership(),
            state: entity.state(),
            stats: entity.stats().clone(),
            sprite: entity.sprite().map(|s| s.name().to_string()),
            sprite_3d: entity.sprite_3d().map(|s| s.kind()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub name: String,
    pub world_size: Vector,
    pub active: bool,
    pub map: Option<String>,
    pub entities: Vec<EntitySnapshot>,
}

impl LevelSnapshot {
    /// Entities currently borrowed elsewhere are left out.
    pub fn capture(level: &Level) -> Self {
        Self {
            name: level.name().to_string(),
            world_size: level.world_size(),
            active: level.is_active(),
            map: level.map().map(|m| m.name().to_string()),
            entities: level
                .entities()
                .iter()
                .filter_map(|h| h.try_borrow().ok().map(|e| EntitySnapshot::from(&*e)))
                .collect(),
        }
    }

    pub fn entity(&self, name: &str) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn active_count(&self) -> usize {
        self.entities.iter().filter(|e| e.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GameContext;

    #[test]
    fn snapshot_serializes_entities_in_order() {
        let mut ctx = GameContext::default();
        let mut level = Level::new("yard", Vector::new(8.0, 8.0));
        level.spawn(
            Entity::new("a", EntityKind::Npc, Vector::new(1.0, 2.0), Vector::new(1.0, 1.0)),
            &mut ctx,
        );
        level.spawn(
            Entity::new("b", EntityKind::Enemy, Vector::new(3.0, 4.0), Vector::new(1.0, 1.0)),
            &mut ctx,
        );

        let snap = level.snapshot();
        assert_eq!(snap.entities.len(), 2);
        assert_eq!(snap.active_count(), 2);
        assert_eq!(snap.entity("b").unwrap().position, Vector::new(3.0, 4.0));

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["entities"][0]["name"], "a");
        assert_eq!(json["entities"][0]["kind"], "npc");
        assert_eq!(json["entities"][1]["ownership"], "owned");
    }
}
