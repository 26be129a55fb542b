//! Integration tests for level and game lifecycles

use std::cell::Cell;
use std::rc::Rc;

use free_roam::core::{Entity, Game, GameContext, HookSet, Level, LevelTarget};
use free_roam::types::{CameraPerspective, EngineError, EntityKind, Ownership, Vector};

fn counted(name: &str, position: Vector, starts: Rc<Cell<u32>>, stops: Rc<Cell<u32>>) -> Entity {
    Entity::new(name, EntityKind::Npc, position, Vector::new(1.0, 1.0)).with_behavior(
        HookSet::new()
            .on_start(move |_, _| starts.set(starts.get() + 1))
            .on_stop(move |_, _| stops.set(stops.get() + 1)),
    )
}

fn bumper(name: &str, position: Vector, hits: Rc<Cell<u32>>) -> Entity {
    Entity::new(name, EntityKind::Npc, position, Vector::new(1.0, 1.0))
        .with_behavior(HookSet::new().on_collision(move |_, _, _| hits.set(hits.get() + 1)))
}

#[test]
fn test_entity_add_starts_and_remove_stops_owned() {
    let mut ctx = GameContext::default();
    let mut level = Level::new("l", Vector::new(8.0, 8.0));
    let (starts, stops) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));

    let a = level.spawn(counted("a", Vector::ZERO, starts.clone(), stops.clone()), &mut ctx);
    let b = level.spawn(counted("b", Vector::new(4.0, 4.0), starts.clone(), stops.clone()), &mut ctx);
    assert_eq!(starts.get(), 2);
    assert!(a.borrow().is_active());

    assert!(level.entity_remove(&a, &mut ctx));
    assert_eq!(stops.get(), 1);
    assert!(!a.borrow().is_active());
    assert!(!level.entity_remove(&a, &mut ctx));

    assert_eq!(level.entity_count(), 1);
    assert!(Rc::ptr_eq(level.entity(0).unwrap(), &b));
}

#[test]
fn test_borrowed_entity_survives_clear() {
    let mut ctx = GameContext::default();
    let mut level = Level::new("l", Vector::new(8.0, 8.0));
    let (starts, stops) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));

    let player = counted("p", Vector::ZERO, starts.clone(), stops.clone())
        .with_ownership(Ownership::Borrowed)
        .into_handle();
    level.entity_add(Rc::clone(&player), &mut ctx);
    level.spawn(counted("n", Vector::new(3.0, 3.0), starts.clone(), stops.clone()), &mut ctx);

    level.clear(&mut ctx);
    assert_eq!(level.entity_count(), 0);
    assert_eq!(stops.get(), 1);
    assert_eq!(Rc::strong_count(&player), 1);
    assert!(player.borrow().is_active());
}

#[test]
fn test_each_overlap_delivers_one_collision_per_update() {
    let mut ctx = GameContext::default();
    let mut level = Level::new("l", Vector::new(8.0, 8.0));
    let (hits_a, hits_b, hits_c) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));

    level.spawn(bumper("a", Vector::new(1.0, 1.0), hits_a.clone()), &mut ctx);
    level.spawn(bumper("b", Vector::new(1.5, 1.5), hits_b.clone()), &mut ctx);
    level.spawn(bumper("c", Vector::new(5.0, 5.0), hits_c.clone()), &mut ctx);

    level.update(&mut ctx);
    assert_eq!((hits_a.get(), hits_b.get(), hits_c.get()), (1, 1, 0));

    level.update(&mut ctx);
    assert_eq!((hits_a.get(), hits_b.get(), hits_c.get()), (2, 2, 0));
}

#[test]
fn test_touching_edges_do_not_collide() {
    let mut ctx = GameContext::default();
    let mut level = Level::new("l", Vector::new(8.0, 8.0));
    let hits = Rc::new(Cell::new(0));

    level.spawn(bumper("a", Vector::new(1.0, 1.0), hits.clone()), &mut ctx);
    level.spawn(bumper("b", Vector::new(2.0, 1.0), hits.clone()), &mut ctx);
    level.update(&mut ctx);
    assert_eq!(hits.get(), 0);
}

/// Level whose start and stop hooks bump their own counters.
fn tracked_level(name: &str) -> (Level, Rc<Cell<u32>>, Rc<Cell<u32>>) {
    let (starts, stops) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
    let (s, t) = (starts.clone(), stops.clone());
    let level = Level::new(name, Vector::new(8.0, 8.0))
        .on_start(move |_| s.set(s.get() + 1))
        .on_stop(move |_| t.set(t.get() + 1));
    (level, starts, stops)
}

#[test]
fn test_switching_stops_old_level_and_starts_new() {
    let mut game = Game::new("g", Vector::new(8.0, 8.0), CameraPerspective::FirstPerson);
    let (zero, zero_starts, zero_stops) = tracked_level("zero");
    let (one, one_starts, one_stops) = tracked_level("one");
    game.level_add(zero).unwrap();
    game.level_add(one).unwrap();

    let guard = {
        let (level, ctx) = game.level_and_context(0).unwrap();
        level.spawn(
            Entity::new("guard", EntityKind::Enemy, Vector::new(2.0, 2.0), Vector::new(1.0, 1.0)),
            ctx,
        )
    };

    game.start().unwrap();
    assert_eq!((zero_starts.get(), zero_stops.get()), (1, 0));

    game.level_switch(1).unwrap();
    assert_eq!((zero_starts.get(), zero_stops.get()), (1, 1));
    assert_eq!((one_starts.get(), one_stops.get()), (1, 0));
    assert!(!game.level(0).unwrap().is_active());
    assert!(game.level(1).unwrap().is_active());
    assert!(!guard.borrow().is_active());

    game.level_switch_by_name("zero").unwrap();
    assert_eq!(game.current_index(), Some(0));
    assert_eq!((one_starts.get(), one_stops.get()), (1, 1));
    assert_eq!((zero_starts.get(), zero_stops.get()), (2, 1));
    assert!(game.level(0).unwrap().is_active());
    assert!(!game.level(1).unwrap().is_active());
    assert!(guard.borrow().is_active());
}

#[test]
fn test_bad_switches_leave_current_level_alone() {
    let mut game = Game::new("g", Vector::new(8.0, 8.0), CameraPerspective::FirstPerson);
    game.level_add(Level::new("only", Vector::new(8.0, 8.0))).unwrap();
    game.start().unwrap();

    assert!(matches!(game.level_switch(3), Err(EngineError::EmptyLevelSlot(3))));
    assert!(matches!(
        game.level_switch(99),
        Err(EngineError::LevelIndexOutOfRange { index: 99, .. })
    ));
    assert!(matches!(
        game.level_switch_by_name("missing"),
        Err(EngineError::LevelNotFound(_))
    ));
    assert_eq!(game.current_index(), Some(0));
    assert!(game.current_level().unwrap().is_active());
}

#[test]
fn test_requests_from_hooks_apply_after_update() {
    let mut game = Game::new("g", Vector::new(8.0, 8.0), CameraPerspective::FirstPerson);
    game.level_add(Level::new("a", Vector::new(8.0, 8.0))).unwrap();
    game.level_add(Level::new("b", Vector::new(8.0, 8.0))).unwrap();
    game.start().unwrap();

    {
        let (level, ctx) = game.level_and_context(0).unwrap();
        level.spawn(
            Entity::new("switch", EntityKind::Npc, Vector::ZERO, Vector::new(1.0, 1.0)).with_behavior(
                HookSet::new().on_update(|_, scene| scene.ctx.request_level(LevelTarget::Name("b".into()))),
            ),
            ctx,
        );
    }

    game.update();
    assert_eq!(game.current_index(), Some(1));
    assert_eq!(game.context().level_index(), Some(1));
    assert_eq!(game.context().frame(), 1);
}

#[test]
fn test_stop_is_idempotent_and_drop_is_safe() {
    let stops = Rc::new(Cell::new(0));
    {
        let mut game = Game::new("g", Vector::new(8.0, 8.0), CameraPerspective::FirstPerson);
        let t = stops.clone();
        game.level_add(Level::new("a", Vector::new(8.0, 8.0)).on_stop(move |_| t.set(t.get() + 1)))
            .unwrap();
        game.start().unwrap();
        game.stop();
        game.stop();
        assert!(!game.is_running());
    }
    assert_eq!(stops.get(), 1);
}
