//! Game objects driven by a level.
//!
//! An [`Entity`] carries its own spatial state (position, facing, camera plane,
//! size), an optional flat sprite, an optional owned [`Sprite3D`] and gameplay
//! stats. Behaviour is plugged in through [`EntityBehavior`], either implemented
//! directly or assembled from closures with [`HookSet`].
//!
//! Levels hold entities as [`EntityHandle`]s so the player can be shared between
//! levels. Whether the level may release an entity is decided by its
//! [`Ownership`] tag alone.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::{error, trace};
use serde::{Deserialize, Serialize};

use free_roam_types::{
    EntityKind, EntityState, Ownership, Sprite3DType, Vector, DEFAULT_PLANE_LENGTH,
};

use crate::camera::CameraParams;
use crate::canvas::{Canvas, SpriteRef};
use crate::context::{GameContext, Scene};
use crate::projection;
use crate::sprite3d::Sprite3D;

/// Shared, mutable reference to an entity.
pub type EntityHandle = Rc<RefCell<Entity>>;

/// Numeric gameplay state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub health: f32,
    pub max_health: f32,
    pub strength: f32,
    pub speed: f32,
    pub level: u32,
    pub xp: f32,
    pub health_regen: f32,
    /// Seconds between attacks, and time since the last one.
    pub attack_timer: f32,
    pub elapsed_attack_timer: f32,
    /// Seconds between patrol steps, and time since the last one.
    pub move_timer: f32,
    pub elapsed_move_timer: f32,
    pub radius: f32,
    pub start_position: Vector,
    pub end_position: Vector,
}

impl Default for EntityStats {
    fn default() -> Self {
        Self {
            health: 100.0,
            max_health: 100.0,
            strength: 10.0,
            speed: 1.0,
            level: 1,
            xp: 0.0,
            health_regen: 0.0,
            attack_timer: 1.0,
            elapsed_attack_timer: 0.0,
            move_timer: 0.0,
            elapsed_move_timer: 0.0,
            radius: 0.5,
            start_position: Vector::ZERO,
            end_position: Vector::ZERO,
        }
    }
}

/// The five lifecycle operations a level drives. Every hook has an empty default.
pub trait EntityBehavior {
    /// Called once when the entity is added to a level.
    fn start(&mut self, _entity: &mut Entity, _ctx: &mut GameContext) {}

    /// Called before an owned entity is released.
    fn stop(&mut self, _entity: &mut Entity, _ctx: &mut GameContext) {}

    fn update(&mut self, _entity: &mut Entity, _scene: &mut Scene<'_>) {}

    /// Extra drawing after the level has drawn the entity's sprites.
    fn render(&mut self, _entity: &mut Entity, _canvas: &mut dyn Canvas, _ctx: &GameContext) {}

    /// Called once per overlapping entity after each update.
    fn collision(&mut self, _entity: &mut Entity, _other: &Entity, _ctx: &mut GameContext) {}
}

type ContextHook = Box<dyn FnMut(&mut Entity, &mut GameContext)>;
type UpdateHook = Box<dyn FnMut(&mut Entity, &mut Scene<'_>)>;
type RenderHook = Box<dyn FnMut(&mut Entity, &mut dyn Canvas, &GameContext)>;
type CollisionHook = Box<dyn FnMut(&mut Entity, &Entity, &mut GameContext)>;

/// An [`EntityBehavior`] built from up to five closures.
///
/// ```
/// use free_roam_core::entity::{Entity, HookSet};
/// use free_roam_types::{EntityKind, Vector};
///
/// let entity = Entity::new("coin", EntityKind::Icon, Vector::new(2.0, 2.0), Vector::new(1.0, 1.0))
///     .with_behavior(HookSet::new().on_update(|e, _scene| {
///         let p = e.position();
///         e.position_set(p + Vector::new(0.1, 0.0));
///     }));
/// assert!(entity.has_behavior());
/// ```
#[derive(Default)]
pub struct HookSet {
    start: Option<ContextHook>,
    stop: Option<ContextHook>,
    update: Option<UpdateHook>,
    render: Option<RenderHook>,
    collision: Option<CollisionHook>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(mut self, f: impl FnMut(&mut Entity, &mut GameContext) + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    pub fn on_stop(mut self, f: impl FnMut(&mut Entity, &mut GameContext) + 'static) -> Self {
        self.stop = Some(Box::new(f));
        self
    }

    pub fn on_update(mut self, f: impl FnMut(&mut Entity, &mut Scene<'_>) + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn on_render(
        mut self,
        f: impl FnMut(&mut Entity, &mut dyn Canvas, &GameContext) + 'static,
    ) -> Self {
        self.render = Some(Box::new(f));
        self
    }

    pub fn on_collision(
        mut self,
        f: impl FnMut(&mut Entity, &Entity, &mut GameContext) + 'static,
    ) -> Self {
        self.collision = Some(Box::new(f));
        self
    }
}

impl EntityBehavior for HookSet {
    fn start(&mut self, entity: &mut Entity, ctx: &mut GameContext) {
        if let Some(f) = self.start.as_mut() {
            f(entity, ctx);
        }
    }

    fn stop(&mut self, entity: &mut Entity, ctx: &mut GameContext) {
        if let Some(f) = self.stop.as_mut() {
            f(entity, ctx);
        }
    }

    fn update(&mut self, entity: &mut Entity, scene: &mut Scene<'_>) {
        if let Some(f) = self.update.as_mut() {
            f(entity, scene);
        }
    }

    fn render(&mut self, entity: &mut Entity, canvas: &mut dyn Canvas, ctx: &GameContext) {
        if let Some(f) = self.render.as_mut() {
            f(entity, canvas, ctx);
        }
    }

    fn collision(&mut self, entity: &mut Entity, other: &Entity, ctx: &mut GameContext) {
        if let Some(f) = self.collision.as_mut() {
            f(entity, other, ctx);
        }
    }
}

pub struct Entity {
    name: String,
    kind: EntityKind,
    position: Vector,
    old_position: Vector,
    direction: Vector,
    plane: Vector,
    size: Vector,
    sprite: Option<SpriteRef>,
    active: bool,
    visible: bool,
    ownership: Ownership,
    sprite_3d: Option<Sprite3D>,
    sprite_rotation: f32,
    sprite_scale: f32,
    state: EntityState,
    stats: EntityStats,
    behavior: Option<Box<dyn EntityBehavior>>,
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("position", &self.position)
            .field("direction", &self.direction)
            .field("active", &self.active)
            .field("ownership", &self.ownership)
            .field("state", &self.state)
            .field("has_3d_sprite", &self.sprite_3d.is_some())
            .finish_non_exhaustive()
    }
}

impl Entity {
    /// A visible, not yet active entity facing +x with the default camera plane.
    pub fn new(name: impl Into<String>, kind: EntityKind, position: Vector, size: Vector) -> Self {
        Self {
            name: name.into(),
            kind,
            position,
            old_position: position,
            direction: Vector::new(1.0, 0.0),
            plane: Vector::new(0.0, DEFAULT_PLANE_LENGTH),
            size,
            sprite: None,
            active: false,
            visible: true,
            ownership: Ownership::Owned,
            sprite_3d: None,
            sprite_rotation: 0.0,
            sprite_scale: 1.0,
            state: EntityState::Idle,
            stats: EntityStats::default(),
            behavior: None,
        }
    }

    pub fn with_behavior(mut self, behavior: impl EntityBehavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteRef) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    pub fn with_direction(mut self, direction: Vector, plane: Vector) -> Self {
        self.direction = direction;
        self.plane = plane;
        self
    }

    pub fn with_stats(mut self, stats: EntityStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn into_handle(self) -> EntityHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn old_position(&self) -> Vector {
        self.old_position
    }

    /// Move the entity, archiving the current position first. An owned 3D sprite
    /// follows immediately.
    pub fn position_set(&mut self, value: Vector) {
        self.old_position = self.position;
        self.position = value;
        if let Some(sprite) = self.sprite_3d.as_mut() {
            sprite.set_position(value);
        }
    }

    pub fn has_changed_position(&self) -> bool {
        self.position != self.old_position
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vector) {
        self.direction = direction;
    }

    pub fn plane(&self) -> Vector {
        self.plane
    }

    pub fn set_plane(&mut self, plane: Vector) {
        self.plane = plane;
    }

    pub fn size(&self) -> Vector {
        self.size
    }

    pub fn sprite(&self) -> Option<&SpriteRef> {
        self.sprite.as_ref()
    }

    pub fn set_sprite(&mut self, sprite: Option<SpriteRef>) {
        self.sprite = sprite;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn set_state(&mut self, state: EntityState) {
        self.state = state;
    }

    pub fn stats(&self) -> &EntityStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut EntityStats {
        &mut self.stats
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    /// Axis-aligned overlap of the two entities' rectangles (position is the
    /// top-left corner).
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.position.x < other.position.x + other.size.x
            && self.position.x + self.size.x > other.position.x
            && self.position.y < other.position.y + other.size.y
            && self.position.y + self.size.y > other.position.y
    }

    /// First-person view from this entity.
    pub fn camera(&self) -> CameraParams {
        CameraParams::first_person(self.position, self.direction, self.plane)
    }

    pub fn has_3d_sprite(&self) -> bool {
        self.sprite_3d.is_some()
    }

    pub fn sprite_3d(&self) -> Option<&Sprite3D> {
        self.sprite_3d.as_ref()
    }

    pub fn sprite_3d_mut(&mut self) -> Option<&mut Sprite3D> {
        self.sprite_3d.as_mut()
    }

    /// Replace any owned mesh with a freshly generated one.
    ///
    /// `width` is the house width or the pillar radius; humanoids and trees only use
    /// `height`. `Sprite3DType::None` just drops the current mesh, `Custom` starts an
    /// empty one to be filled with [`Sprite3D::add_triangle`].
    pub fn create_3d_sprite(&mut self, kind: Sprite3DType, height: f32, width: f32, rotation: f32) {
        self.destroy_3d_sprite();

        let position = self.position;
        let mut sprite = match kind {
            Sprite3DType::None => return,
            Sprite3DType::Humanoid => Sprite3D::humanoid(position, height, rotation),
            Sprite3DType::Tree => Sprite3D::tree(position, height),
            Sprite3DType::House => Sprite3D::house(position, width, height, rotation),
            Sprite3DType::Pillar => Sprite3D::pillar(position, height, width),
            Sprite3DType::Custom => {
                let mut sprite = Sprite3D::new();
                sprite.set_position(position);
                sprite.set_active(true);
                sprite
            }
        };
        sprite.set_rotation(rotation);
        sprite.set_scale(self.sprite_scale);
        self.sprite_rotation = rotation;

        trace!(
            "entity `{}`: created {:?} mesh with {} triangles",
            self.name,
            kind,
            sprite.triangle_count()
        );
        self.sprite_3d = Some(sprite);
    }

    /// Drop the owned mesh, if any.
    pub fn destroy_3d_sprite(&mut self) {
        self.sprite_3d = None;
    }

    pub fn sprite_3d_rotation(&self) -> f32 {
        self.sprite_rotation
    }

    pub fn set_3d_sprite_rotation(&mut self, rotation: f32) {
        self.sprite_rotation = rotation;
        if let Some(sprite) = self.sprite_3d.as_mut() {
            sprite.set_rotation(rotation);
        }
    }

    pub fn sprite_3d_scale(&self) -> f32 {
        self.sprite_scale
    }

    pub fn set_3d_sprite_scale(&mut self, scale: f32) {
        self.sprite_scale = scale;
        if let Some(sprite) = self.sprite_3d.as_mut() {
            sprite.set_scale(scale);
        }
    }

    /// Project the owned mesh for a camera at `position` looking along `direction`
    /// with eyes at `view_height`. Returns the number of triangles drawn.
    pub fn render_3d_sprite(
        &self,
        canvas: &mut dyn Canvas,
        position: Vector,
        direction: Vector,
        plane: Vector,
        view_height: f32,
    ) -> usize {
        match self.sprite_3d.as_ref() {
            Some(sprite) => projection::render_sprite(
                canvas,
                sprite,
                &CameraParams::new(position, direction, plane, view_height),
            ),
            None => 0,
        }
    }

    /// Run the start hook. Without a game context this logs and does nothing.
    pub fn start(&mut self, ctx: Option<&mut GameContext>) {
        let Some(ctx) = ctx else {
            error!("entity `{}`: start called without a game context", self.name);
            return;
        };
        self.with_behavior_hook(|behavior, entity| behavior.start(entity, ctx));
    }

    pub fn stop(&mut self, ctx: &mut GameContext) {
        self.with_behavior_hook(|behavior, entity| behavior.stop(entity, ctx));
    }

    pub fn update(&mut self, scene: &mut Scene<'_>) {
        self.with_behavior_hook(|behavior, entity| behavior.update(entity, scene));
    }

    pub fn render(&mut self, canvas: &mut dyn Canvas, ctx: &GameContext) {
        self.with_behavior_hook(|behavior, entity| behavior.render(entity, canvas, ctx));
    }

    pub fn collision(&mut self, other: &Entity, ctx: &mut GameContext) {
        self.with_behavior_hook(|behavior, entity| behavior.collision(entity, other, ctx));
    }

    // The behaviour is moved out for the duration of the call so it can borrow the
    // entity mutably.
    fn with_behavior_hook(&mut self, f: impl FnOnce(&mut dyn EntityBehavior, &mut Entity)) {
        if let Some(mut behavior) = self.behavior.take() {
            f(behavior.as_mut(), self);
            if self.behavior.is_none() {
                self.behavior = Some(behavior);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn entity() -> Entity {
        Entity::new("e", EntityKind::Enemy, Vector::new(1.0, 1.0), Vector::new(1.0, 1.0))
    }

    #[test]
    fn position_set_archives_previous_value() {
        let mut e = entity();
        assert!(!e.has_changed_position());

        e.position_set(Vector::new(2.0, 1.0));
        assert_eq!(e.old_position(), Vector::new(1.0, 1.0));
        assert!(e.has_changed_position());

        e.position_set(Vector::new(2.0, 1.0));
        assert!(!e.has_changed_position());
    }

    #[test]
    fn owned_mesh_follows_position() {
        let mut e = entity();
        e.create_3d_sprite(Sprite3DType::Humanoid, 1.8, 0.0, 0.0);
        e.position_set(Vector::new(4.0, 3.0));
        assert_eq!(e.sprite_3d().unwrap().position(), Vector::new(4.0, 3.0));
    }

    #[test]
    fn creating_a_mesh_replaces_the_old_one() {
        let mut e = entity();
        e.create_3d_sprite(Sprite3DType::Humanoid, 1.8, 0.0, 0.0);
        e.create_3d_sprite(Sprite3DType::Tree, 2.0, 0.0, 0.0);
        assert_eq!(e.sprite_3d().unwrap().kind(), Sprite3DType::Tree);

        e.destroy_3d_sprite();
        e.destroy_3d_sprite();
        assert!(!e.has_3d_sprite());

        e.create_3d_sprite(Sprite3DType::None, 1.0, 1.0, 0.0);
        assert!(!e.has_3d_sprite());
    }

    #[test]
    fn rotation_and_scale_forward_to_mesh() {
        let mut e = entity();
        e.set_3d_sprite_scale(2.0);
        e.create_3d_sprite(Sprite3DType::Pillar, 3.0, 0.3, 0.0);
        assert_eq!(e.sprite_3d().unwrap().scale(), 2.0);

        e.set_3d_sprite_rotation(1.5);
        assert_eq!(e.sprite_3d().unwrap().rotation(), 1.5);
        assert_eq!(e.sprite_3d_rotation(), 1.5);
    }

    #[test]
    fn start_without_context_is_a_no_op() {
        let started = Rc::new(Cell::new(0));
        let counter = started.clone();
        let mut e = entity().with_behavior(HookSet::new().on_start(move |_, _| {
            counter.set(counter.get() + 1);
        }));

        e.start(None);
        assert_eq!(started.get(), 0);

        e.start(Some(&mut GameContext::default()));
        assert_eq!(started.get(), 1);
        assert!(e.has_behavior());
    }

    #[test]
    fn overlap_is_strict() {
        let a = entity();
        let mut b = entity();
        b.position_set(Vector::new(1.5, 1.5));
        assert!(a.overlaps(&b));

        b.position_set(Vector::new(2.0, 1.0));
        assert!(!a.overlaps(&b));
    }
}
