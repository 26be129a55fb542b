//! A level: a set of entities, an optional map, and the per-frame passes over them.
//!
//! Entities are started as soon as they are added. On removal or teardown the level
//! stops and releases [`Ownership::Owned`] entities; [`Ownership::Borrowed`] ones
//! (the player) are only unlinked.

use std::rc::Rc;

use log::{debug, warn};

use free_roam_types::{CameraPerspective, Ownership, Vector};

use crate::camera::CameraParams;
use crate::canvas::{pixel_of, Canvas, Color};
use crate::context::{GameContext, Scene};
use crate::entity::{Entity, EntityHandle};
use crate::map::DynamicMap;
use crate::snapshot::LevelSnapshot;

type LevelHook = Box<dyn FnMut(&mut GameContext)>;

pub struct Level {
    name: String,
    world_size: Vector,
    entities: Vec<EntityHandle>,
    map: Option<DynamicMap>,
    on_start: Option<LevelHook>,
    on_stop: Option<LevelHook>,
    active: bool,
}

impl std::fmt::Debug for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Level")
            .field("name", &self.name)
            .field("world_size", &self.world_size)
            .field("entities", &self.entities.len())
            .field("has_map", &self.map.is_some())
            .field("active", &self.active)
            .finish()
    }
}

impl Level {
    pub fn new(name: impl Into<String>, world_size: Vector) -> Self {
        Self {
            name: name.into(),
            world_size,
            entities: Vec::new(),
            map: None,
            on_start: None,
            on_stop: None,
            active: false,
        }
    }

    pub fn with_map(mut self, map: DynamicMap) -> Self {
        self.map = Some(map);
        self
    }

    /// Hook run whenever the level becomes the current one.
    pub fn on_start(mut self, hook: impl FnMut(&mut GameContext) + 'static) -> Self {
        self.on_start = Some(Box::new(hook));
        self
    }

    /// Hook run whenever the level stops being the current one.
    pub fn on_stop(mut self, hook: impl FnMut(&mut GameContext) + 'static) -> Self {
        self.on_stop = Some(Box::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world_size(&self) -> Vector {
        self.world_size
    }

    pub fn map(&self) -> Option<&DynamicMap> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut DynamicMap> {
        self.map.as_mut()
    }

    pub fn set_map(&mut self, map: Option<DynamicMap>) {
        self.map = map;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity(&self, index: usize) -> Option<&EntityHandle> {
        self.entities.get(index)
    }

    pub fn entities(&self) -> &[EntityHandle] {
        &self.entities
    }

    /// The first player entity, if one is present.
    pub fn player(&self) -> Option<EntityHandle> {
        self.entities
            .iter()
            .find(|h| h.try_borrow().is_ok_and(|e| e.is_player()))
            .cloned()
    }

    /// Append an entity, run its start hook and mark it active.
    pub fn entity_add(&mut self, handle: EntityHandle, ctx: &mut GameContext) {
        match handle.try_borrow_mut() {
            Ok(mut entity) => {
                entity.start(Some(ctx));
                entity.set_active(true);
            }
            Err(_) => {
                warn!("level `{}`: entity busy while being added", self.name);
                return;
            }
        }
        self.entities.push(handle);
    }

    /// Wrap `entity` in a handle, add it, and hand the handle back.
    pub fn spawn(&mut self, entity: Entity, ctx: &mut GameContext) -> EntityHandle {
        let handle = entity.into_handle();
        self.entity_add(handle.clone(), ctx);
        handle
    }

    /// Unlink `handle`, keeping the order of the rest. Owned entities are stopped
    /// first. Returns false when the entity is not in this level.
    pub fn entity_remove(&mut self, handle: &EntityHandle, ctx: &mut GameContext) -> bool {
        let Some(index) = self.entities.iter().position(|h| Rc::ptr_eq(h, handle)) else {
            return false;
        };
        let removed = self.entities.remove(index);
        release(&removed, ctx);
        true
    }

    /// Every other active entity whose rectangle overlaps `handle`'s.
    pub fn collision_list(&self, handle: &EntityHandle) -> Vec<EntityHandle> {
        let Ok(entity) = handle.try_borrow() else {
            return Vec::new();
        };
        self.entities
            .iter()
            .filter(|other| !Rc::ptr_eq(other, handle))
            .filter(|other| {
                other
                    .try_borrow()
                    .is_ok_and(|o| o.is_active() && entity.overlaps(&o))
            })
            .cloned()
            .collect()
    }

    /// Make the level current: run its start hook and re-activate its entities.
    pub fn start(&mut self, ctx: &mut GameContext) {
        self.active = true;
        if let Some(hook) = self.on_start.as_mut() {
            hook(ctx);
        }
        for handle in &self.entities {
            if let Ok(mut entity) = handle.try_borrow_mut() {
                entity.set_active(true);
            }
        }
        debug!("level `{}` started with {} entities", self.name, self.entities.len());
    }

    /// Run the stop hook and deactivate owned entities.
    pub fn stop(&mut self, ctx: &mut GameContext) {
        if let Some(hook) = self.on_stop.as_mut() {
            hook(ctx);
        }
        for handle in &self.entities {
            if let Ok(mut entity) = handle.try_borrow_mut() {
                if entity.ownership() == Ownership::Owned {
                    entity.set_active(false);
                }
            }
        }
        self.active = false;
        debug!("level `{}` stopped", self.name);
    }

    /// Teardown: stop and release owned entities, unlink borrowed ones.
    pub fn clear(&mut self, ctx: &mut GameContext) {
        for handle in self.entities.drain(..) {
            release(&handle, ctx);
        }
    }

    /// Update every active entity, then deliver one collision per overlapping
    /// entity.
    pub fn update(&mut self, ctx: &mut GameContext) {
        let map = self.map.as_ref();
        for handle in &self.entities {
            {
                let Ok(mut entity) = handle.try_borrow_mut() else {
                    continue;
                };
                if !entity.is_active() {
                    continue;
                }
                entity.update(&mut Scene::new(ctx, map));
                if !entity.is_active() {
                    continue;
                }
            }

            for other in self.collision_list(handle) {
                let (Ok(mut entity), Ok(other)) = (handle.try_borrow_mut(), other.try_borrow()) else {
                    continue;
                };
                entity.collision(&other, ctx);
            }
        }
    }

    /// Draw the level from the resolved camera.
    ///
    /// First person views from the player and ignores `camera`; the player's own
    /// mesh is not drawn. Third person uses `camera`, or one synthesized behind the
    /// player, and draws every mesh. Without any camera only flat sprites and
    /// entity render hooks are drawn.
    pub fn render(
        &self,
        canvas: &mut dyn Canvas,
        ctx: &GameContext,
        perspective: CameraPerspective,
        camera: Option<CameraParams>,
    ) {
        canvas.clear();

        let player = self.player();
        let player_view = player
            .as_ref()
            .and_then(|h| h.try_borrow().ok().map(|p| (p.position(), p.direction(), p.plane())));
        let view = match perspective {
            CameraPerspective::FirstPerson => {
                player_view.map(|(pos, dir, plane)| CameraParams::first_person(pos, dir, plane))
            }
            CameraPerspective::ThirdPerson => camera.or_else(|| {
                player_view.map(|(pos, dir, plane)| CameraParams::third_person(pos, dir, plane))
            }),
        };

        if let (Some(map), Some(view)) = (self.map.as_ref(), view.as_ref()) {
            map.render(view.height, canvas, view.position, view.direction, view.plane);
        }

        for handle in &self.entities {
            let Ok(mut entity) = handle.try_borrow_mut() else {
                continue;
            };
            if !entity.is_active() || !entity.is_visible() {
                continue;
            }

            if let Some(sprite) = entity.sprite() {
                let (x, y) = pixel_of(entity.position() - ctx.camera);
                canvas.draw_image(x, y, sprite, Color::Black);
            }

            if let Some(view) = view.as_ref() {
                let skip_own_mesh =
                    perspective == CameraPerspective::FirstPerson && entity.is_player();
                if !skip_own_mesh {
                    entity.render_3d_sprite(canvas, view.position, view.direction, view.plane, view.height);
                }
            }

            entity.render(canvas, ctx);
        }
    }

    pub fn snapshot(&self) -> LevelSnapshot {
        LevelSnapshot::capture(self)
    }
}

fn release(handle: &EntityHandle, ctx: &mut GameContext) {
    let Ok(mut entity) = handle.try_borrow_mut() else {
        return;
    };
    if entity.ownership() == Ownership::Owned {
        entity.stop(ctx);
        entity.set_active(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use free_roam_types::EntityKind;

    fn boxed(name: &str, x: f32, y: f32) -> Entity {
        Entity::new(name, EntityKind::Enemy, Vector::new(x, y), Vector::new(1.0, 1.0))
    }

    #[test]
    fn add_marks_entity_active() {
        let mut ctx = GameContext::default();
        let mut level = Level::new("test", Vector::new(10.0, 10.0));
        let handle = level.spawn(boxed("a", 0.0, 0.0), &mut ctx);
        assert!(handle.borrow().is_active());
        assert_eq!(level.entity_count(), 1);
    }

    #[test]
    fn collision_list_skips_self_and_inactive() {
        let mut ctx = GameContext::default();
        let mut level = Level::new("test", Vector::new(10.0, 10.0));
        let a = level.spawn(boxed("a", 0.0, 0.0), &mut ctx);
        let b = level.spawn(boxed("b", 0.5, 0.5), &mut ctx);
        let c = level.spawn(boxed("c", 0.2, 0.2), &mut ctx);
        level.spawn(boxed("far", 5.0, 5.0), &mut ctx);

        c.borrow_mut().set_active(false);
        let hits = level.collision_list(&a);
        assert_eq!(hits.len(), 1);
        assert!(Rc::ptr_eq(&hits[0], &b));
    }

    #[test]
    fn removing_unknown_entity_is_refused() {
        let mut ctx = GameContext::default();
        let mut level = Level::new("test", Vector::new(10.0, 10.0));
        level.spawn(boxed("a", 0.0, 0.0), &mut ctx);
        let stranger = boxed("b", 0.0, 0.0).into_handle();
        assert!(!level.entity_remove(&stranger, &mut ctx));
        assert_eq!(level.entity_count(), 1);
    }
}
