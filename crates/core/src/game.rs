//! A play session: a fixed set of level slots, the current level, and the shared
//! [`GameContext`].
//!
//! Only one level is ever active. Switching stops the current level before the
//! target starts. Level switch and stop requests raised by hooks during an update
//! are applied once the update pass is over.

use log::{debug, info, warn};

use free_roam_types::{CameraPerspective, EngineError, InputKey, Vector, MAX_LEVELS};

use crate::camera::CameraParams;
use crate::canvas::Canvas;
use crate::context::{GameContext, LevelTarget};
use crate::level::Level;

#[derive(Debug)]
pub struct Game {
    name: String,
    levels: [Option<Level>; MAX_LEVELS],
    current: Option<usize>,
    ctx: GameContext,
    is_active: bool,
}

impl Game {
    pub fn new(name: impl Into<String>, world_size: Vector, perspective: CameraPerspective) -> Self {
        Self {
            name: name.into(),
            levels: std::array::from_fn(|_| None),
            current: None,
            ctx: GameContext::new(world_size, perspective),
            is_active: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    pub fn perspective(&self) -> CameraPerspective {
        self.ctx.perspective
    }

    pub fn set_perspective(&mut self, perspective: CameraPerspective) {
        self.ctx.perspective = perspective;
    }

    pub fn world_size(&self) -> Vector {
        self.ctx.world_size
    }

    pub fn set_input(&mut self, key: InputKey) {
        self.ctx.input = key;
    }

    /// Started and not yet stopped.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Cleared by [`Game::stop`] or by a stop request from a hook.
    pub fn is_running(&self) -> bool {
        self.ctx.is_running()
    }

    /// Place `level` in the first free slot and return its index.
    pub fn level_add(&mut self, level: Level) -> Result<usize, EngineError> {
        let Some(index) = self.levels.iter().position(Option::is_none) else {
            warn!("game `{}`: no free slot for level `{}`", self.name, level.name());
            return Err(EngineError::LevelSlotsFull { capacity: MAX_LEVELS });
        };
        debug!("game `{}`: level `{}` added at slot {}", self.name, level.name(), index);
        self.levels[index] = Some(level);
        Ok(index)
    }

    /// Take a level out of its slot, stopping it first if it is current. The level
    /// keeps its entities; call [`Level::clear`] to release them.
    pub fn level_remove(&mut self, index: usize) -> Result<Level, EngineError> {
        self.check_index(index)?;
        if self.current == Some(index) {
            if let Some(level) = self.levels[index].as_mut() {
                level.stop(&mut self.ctx);
            }
            self.current = None;
            self.ctx.set_level_index(None);
        }
        self.levels[index].take().ok_or(EngineError::EmptyLevelSlot(index))
    }

    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)?.as_ref()
    }

    pub fn level_mut(&mut self, index: usize) -> Option<&mut Level> {
        self.levels.get_mut(index)?.as_mut()
    }

    /// A level together with the session context, for adding entities to a level
    /// that already sits in a slot.
    pub fn level_and_context(&mut self, index: usize) -> Option<(&mut Level, &mut GameContext)> {
        let level = self.levels.get_mut(index)?.as_mut()?;
        Some((level, &mut self.ctx))
    }

    pub fn level_count(&self) -> usize {
        self.levels.iter().flatten().count()
    }

    pub fn level_index_by_name(&self, name: &str) -> Option<usize> {
        self.levels
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|l| l.name() == name))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.level(self.current?)
    }

    pub fn current_level_mut(&mut self) -> Option<&mut Level> {
        let index = self.current?;
        self.level_mut(index)
    }

    /// Stop the current level, then make `index` current and start it. Switching to
    /// the current level restarts it.
    pub fn level_switch(&mut self, index: usize) -> Result<(), EngineError> {
        self.check_index(index)?;
        if self.levels[index].is_none() {
            return Err(EngineError::EmptyLevelSlot(index));
        }

        if let Some(level) = self.current.and_then(|i| self.levels[i].as_mut()) {
            level.stop(&mut self.ctx);
        }

        self.current = Some(index);
        self.ctx.set_level_index(Some(index));
        if let Some(level) = self.levels[index].as_mut() {
            info!("game `{}`: switching to level `{}`", self.name, level.name());
            level.start(&mut self.ctx);
        }
        Ok(())
    }

    pub fn level_switch_by_name(&mut self, name: &str) -> Result<(), EngineError> {
        match self.level_index_by_name(name) {
            Some(index) => self.level_switch(index),
            None => {
                warn!("game `{}`: no level named `{}`", self.name, name);
                Err(EngineError::LevelNotFound(name.to_string()))
            }
        }
    }

    /// Start the session on the current level, or on the first occupied slot when
    /// none has been chosen yet. Calling it again while active does nothing.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.is_active {
            return Ok(());
        }
        let first = self
            .levels
            .iter()
            .position(Option::is_some)
            .ok_or(EngineError::NoLevels)?;

        self.is_active = true;
        self.ctx.set_running(true);
        if self.current.is_none() {
            self.level_switch(first)?;
        }
        info!("game `{}` started", self.name);
        Ok(())
    }

    /// Stop the current level and release every level with its owned entities.
    /// Does nothing once the game has been stopped.
    pub fn stop(&mut self) {
        if !self.is_active && self.level_count() == 0 {
            return;
        }

        if let Some(level) = self.current.and_then(|i| self.levels[i].as_mut()) {
            level.stop(&mut self.ctx);
        }
        for slot in self.levels.iter_mut() {
            if let Some(mut level) = slot.take() {
                level.clear(&mut self.ctx);
            }
        }

        self.current = None;
        self.ctx.set_level_index(None);
        self.ctx.set_running(false);
        self.is_active = false;
        info!("game `{}` stopped", self.name);
    }

    /// One update pass over the current level, then any switch or stop requested
    /// during it.
    pub fn update(&mut self) {
        if let Some(level) = self.current.and_then(|i| self.levels[i].as_mut()) {
            level.update(&mut self.ctx);
        }
        self.ctx.advance_frame();
        self.apply_requests();
    }

    /// Draw the current level. `camera` overrides the synthesized third-person
    /// camera and is ignored in first person.
    pub fn render(&self, canvas: &mut dyn Canvas, camera: Option<CameraParams>) {
        match self.current_level() {
            Some(level) => level.render(canvas, &self.ctx, self.ctx.perspective, camera),
            None => canvas.clear(),
        }
    }

    fn apply_requests(&mut self) {
        if let Some(target) = self.ctx.take_level_request() {
            let result = match target {
                LevelTarget::Index(index) => self.level_switch(index),
                LevelTarget::Name(name) => self.level_switch_by_name(&name),
                LevelTarget::Next => match self.next_level_index() {
                    Some(index) => self.level_switch(index),
                    None => Err(EngineError::NoLevels),
                },
            };
            if let Err(err) = result {
                warn!("game `{}`: level switch failed: {}", self.name, err);
            }
        }

        if self.ctx.take_stop_request() {
            debug!("game `{}`: stop requested", self.name);
            self.ctx.set_running(false);
        }
    }

    fn next_level_index(&self) -> Option<usize> {
        let start = self.current.map_or(0, |i| i + 1);
        (0..MAX_LEVELS)
            .map(|offset| (start + offset) % MAX_LEVELS)
            .find(|&i| self.levels[i].is_some())
    }

    fn check_index(&self, index: usize) -> Result<(), EngineError> {
        if index >= MAX_LEVELS {
            return Err(EngineError::LevelIndexOutOfRange {
                index,
                capacity: MAX_LEVELS,
            });
        }
        Ok(())
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_with(names: &[&str]) -> Game {
        let mut game = Game::new("test", Vector::new(16.0, 16.0), CameraPerspective::FirstPerson);
        for name in names {
            game.level_add(Level::new(*name, Vector::new(16.0, 16.0))).unwrap();
        }
        game
    }

    #[test]
    fn slots_fill_up() {
        let mut game = game_with(&[]);
        for i in 0..MAX_LEVELS {
            assert_eq!(game.level_add(Level::new(format!("l{i}"), Vector::ZERO)).unwrap(), i);
        }
        assert!(matches!(
            game.level_add(Level::new("extra", Vector::ZERO)),
            Err(EngineError::LevelSlotsFull { capacity: MAX_LEVELS })
        ));
    }

    #[test]
    fn start_without_levels_fails() {
        let mut game = game_with(&[]);
        assert!(matches!(game.start(), Err(EngineError::NoLevels)));
        assert!(!game.is_running());
    }

    #[test]
    fn start_picks_first_level_and_is_idempotent() {
        let mut game = game_with(&["a", "b"]);
        game.start().unwrap();
        game.start().unwrap();
        assert_eq!(game.current_index(), Some(0));
        assert!(game.is_running());
        assert!(game.level(0).unwrap().is_active());
        assert!(!game.level(1).unwrap().is_active());
    }

    #[test]
    fn switch_errors() {
        let mut game = game_with(&["a"]);
        assert!(matches!(
            game.level_switch(MAX_LEVELS),
            Err(EngineError::LevelIndexOutOfRange { .. })
        ));
        assert!(matches!(game.level_switch(3), Err(EngineError::EmptyLevelSlot(3))));
        assert!(matches!(
            game.level_switch_by_name("nowhere"),
            Err(EngineError::LevelNotFound(_))
        ));
    }

    #[test]
    fn next_wraps_around_occupied_slots() {
        let mut game = game_with(&["a", "b", "c"]);
        game.start().unwrap();
        game.level_remove(1).unwrap();

        game.context_mut().request_level(LevelTarget::Next);
        game.update();
        assert_eq!(game.current_index(), Some(2));

        game.context_mut().request_level(LevelTarget::Next);
        game.update();
        assert_eq!(game.current_index(), Some(0));
    }

    #[test]
    fn stop_request_clears_running_after_update() {
        let mut game = game_with(&["a"]);
        game.start().unwrap();
        game.context_mut().request_stop();
        assert!(game.is_running());
        game.update();
        assert!(!game.is_running());
        assert!(game.is_active());

        game.stop();
        assert!(!game.is_active());
        assert_eq!(game.level_count(), 0);
    }
}
