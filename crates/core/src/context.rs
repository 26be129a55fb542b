//! Per-session state handed to every hook.
//!
//! Levels and entities never hold a reference back to their game. Whatever they need
//! to read (input, perspective, world size) or ask for (a level switch, a stop) goes
//! through [`GameContext`], which the game passes down on each call and inspects
//! after the update pass.

use free_roam_types::{CameraPerspective, InputKey, Vector};

use crate::map::DynamicMap;

/// Which level a switch request points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelTarget {
    Index(usize),
    Name(String),
    /// The next occupied slot after the current one, wrapping around.
    Next,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameContext {
    /// Most recent key, set by the host before each update.
    pub input: InputKey,
    pub perspective: CameraPerspective,
    pub world_size: Vector,
    /// Offset subtracted from flat sprite positions when drawing.
    pub camera: Vector,
    running: bool,
    frame: u64,
    level_index: Option<usize>,
    level_request: Option<LevelTarget>,
    stop_requested: bool,
}

impl GameContext {
    pub fn new(world_size: Vector, perspective: CameraPerspective) -> Self {
        Self {
            input: InputKey::None,
            perspective,
            world_size,
            camera: Vector::ZERO,
            running: false,
            frame: 0,
            level_index: None,
            level_request: None,
            stop_requested: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Number of completed update passes.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn advance_frame(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    /// Slot index of the level being played, if any.
    pub fn level_index(&self) -> Option<usize> {
        self.level_index
    }

    pub(crate) fn set_level_index(&mut self, index: Option<usize>) {
        self.level_index = index;
    }

    /// Ask the game to switch level once the current update pass finishes. A later
    /// request in the same pass replaces an earlier one.
    pub fn request_level(&mut self, target: LevelTarget) {
        self.level_request = Some(target);
    }

    pub fn pending_level(&self) -> Option<&LevelTarget> {
        self.level_request.as_ref()
    }

    pub(crate) fn take_level_request(&mut self) -> Option<LevelTarget> {
        self.level_request.take()
    }

    /// Ask the game to stop running at the end of the current update pass.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    pub(crate) fn take_stop_request(&mut self) -> bool {
        std::mem::take(&mut self.stop_requested)
    }
}

impl Default for GameContext {
    fn default() -> Self {
        Self::new(Vector::ZERO, CameraPerspective::default())
    }
}

/// What an entity's update hook can see: the session context plus the level map,
/// read-only.
pub struct Scene<'a> {
    pub ctx: &'a mut GameContext,
    pub map: Option<&'a DynamicMap>,
}

impl<'a> Scene<'a> {
    pub fn new(ctx: &'a mut GameContext, map: Option<&'a DynamicMap>) -> Self {
        Self { ctx, map }
    }

    /// True when `position` is inside a solid map cell. Without a map nothing is
    /// solid.
    pub fn is_blocked(&self, position: Vector) -> bool {
        self.map.is_some_and(|map| map.is_solid_at(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_taken_once() {
        let mut ctx = GameContext::default();
        ctx.request_level(LevelTarget::Index(2));
        ctx.request_level(LevelTarget::Name("First".into()));
        ctx.request_stop();

        assert_eq!(ctx.take_level_request(), Some(LevelTarget::Name("First".into())));
        assert_eq!(ctx.take_level_request(), None);
        assert!(ctx.take_stop_request());
        assert!(!ctx.take_stop_request());
    }

    #[test]
    fn scene_without_map_blocks_nothing() {
        let mut ctx = GameContext::default();
        let scene = Scene::new(&mut ctx, None);
        assert!(!scene.is_blocked(Vector::new(1.0, 1.0)));
    }
}
