//! The tick loop around one [`Game`].

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::EngineConfig;
use crate::core::{Canvas, Game};
use crate::types::{EngineError, InputKey};

/// Owns a game and drives update, render and present at a target frame rate.
///
/// Dropping the engine (or calling [`GameEngine::stop`]) releases the game.
#[derive(Debug)]
pub struct GameEngine {
    game: Option<Game>,
    fps: u32,
}

impl GameEngine {
    pub fn new(game: Game, fps: u32) -> Self {
        Self {
            game: Some(game),
            fps: fps.max(1),
        }
    }

    /// Apply `config` to `game` and wrap it.
    pub fn with_config(mut game: Game, config: &EngineConfig) -> Self {
        if let Some(perspective) = config.perspective {
            game.set_perspective(perspective);
        }
        Self::new(game, config.fps)
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }

    pub fn has_game(&self) -> bool {
        self.game.is_some()
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut Game> {
        self.game.as_mut()
    }

    /// Start the game if needed, then tick until its running flag clears, then
    /// release it. `poll_input` is called once per tick for the current key.
    pub fn run(
        &mut self,
        canvas: &mut dyn Canvas,
        mut poll_input: impl FnMut() -> InputKey,
    ) -> Result<(), EngineError> {
        let frame = self.frame_duration();
        let Some(game) = self.game.as_mut() else {
            warn!("engine: run called without a game");
            return Ok(());
        };
        if !game.is_active() {
            game.start()?;
        }
        info!("engine: running `{}` at {} fps", game.name(), self.fps);

        while game.is_running() {
            let tick = Instant::now();
            game.set_input(poll_input());
            game.update();
            game.render(canvas, None);
            canvas.present()?;
            thread::sleep(frame.saturating_sub(tick.elapsed()));
        }

        self.stop(canvas);
        Ok(())
    }

    /// Exactly one tick, for hosts that own the frame callback. Sleeps out the rest
    /// of the frame only when `delay` is set. Returns whether the game is still
    /// running; once it is not, the game has been released.
    pub fn run_async(
        &mut self,
        canvas: &mut dyn Canvas,
        input: InputKey,
        delay: bool,
    ) -> Result<bool, EngineError> {
        let frame = self.frame_duration();
        let Some(game) = self.game.as_mut() else {
            return Ok(false);
        };
        if !game.is_active() {
            game.start()?;
        }

        let tick = Instant::now();
        game.set_input(input);
        game.update();
        game.render(canvas, None);
        canvas.present()?;

        if !game.is_running() {
            self.stop(canvas);
            return Ok(false);
        }
        if delay {
            thread::sleep(frame.saturating_sub(tick.elapsed()));
        }
        Ok(true)
    }

    /// Stop and release the game, then clear and present the canvas so the display
    /// goes blank. Without a game this does nothing.
    pub fn stop(&mut self, canvas: &mut dyn Canvas) {
        let Some(mut game) = self.game.take() else {
            return;
        };
        game.stop();
        canvas.clear();
        if let Err(err) = canvas.present() {
            warn!("engine: could not present the cleared screen: {}", err);
        }
        debug!("engine: released `{}`", game.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::core::{Color, Entity, HookSet, Level, PixelBuffer};
    use crate::types::{CameraPerspective, EntityKind, Vector};

    fn game(stops: Rc<Cell<u32>>) -> Game {
        let mut game = Game::new("engine", Vector::new(8.0, 8.0), CameraPerspective::FirstPerson);
        game.level_add(Level::new("only", Vector::new(8.0, 8.0)).on_stop(move |_| stops.set(stops.get() + 1)))
            .unwrap();
        game
    }

    /// An entity that asks the game to stop after `ticks` updates.
    fn stopper(ticks: u64) -> Entity {
        Entity::new("stopper", EntityKind::Npc, Vector::ZERO, Vector::new(1.0, 1.0)).with_behavior(
            HookSet::new().on_update(move |_, scene| {
                if scene.ctx.frame() + 1 >= ticks {
                    scene.ctx.request_stop();
                }
            }),
        )
    }

    #[test]
    fn stop_twice_releases_once() {
        let stops = Rc::new(Cell::new(0));
        let mut engine = GameEngine::new(game(stops.clone()), 30);
        let mut canvas = PixelBuffer::new(8, 8);
        engine.game_mut().unwrap().start().unwrap();

        engine.stop(&mut canvas);
        assert!(!engine.has_game());
        assert_eq!(stops.get(), 1);

        engine.stop(&mut canvas);
        assert!(!engine.has_game());
        assert_eq!(stops.get(), 1);
    }

    /// Pixel buffer that counts presents and remembers the ink shown by the last one.
    struct Recorder {
        pixels: PixelBuffer,
        presents: u32,
        shown_ink: usize,
    }

    impl Canvas for Recorder {
        fn width(&self) -> u16 {
            self.pixels.width()
        }

        fn height(&self) -> u16 {
            self.pixels.height()
        }

        fn clear(&mut self) {
            self.pixels.clear();
        }

        fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
            self.pixels.draw_pixel(x, y, color);
        }

        fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color) {
            self.pixels.draw_text(x, y, text, color);
        }

        fn present(&mut self) -> Result<(), EngineError> {
            self.presents += 1;
            self.shown_ink = self.pixels.ink_count();
            Ok(())
        }
    }

    #[test]
    fn stop_presents_the_blank_screen_once() {
        let stops = Rc::new(Cell::new(0));
        let mut engine = GameEngine::new(game(stops), 30);
        let mut screen = Recorder {
            pixels: PixelBuffer::new(8, 8),
            presents: 0,
            shown_ink: 0,
        };
        screen.draw_pixel(1, 1, Color::Black);
        screen.present().unwrap();
        assert_eq!(screen.shown_ink, 1);

        engine.stop(&mut screen);
        assert_eq!(screen.presents, 2);
        assert_eq!(screen.shown_ink, 0);

        engine.stop(&mut screen);
        assert_eq!(screen.presents, 2);
    }

    #[test]
    fn run_ends_when_a_hook_requests_stop() {
        let stops = Rc::new(Cell::new(0));
        let mut engine = GameEngine::new(game(stops.clone()), 1000);
        {
            let game = engine.game_mut().unwrap();
            game.start().unwrap();
            let (level, ctx) = game.level_and_context(0).unwrap();
            level.spawn(stopper(3), ctx);
        }

        let mut polls = 0;
        let mut canvas = PixelBuffer::new(8, 8);
        engine
            .run(&mut canvas, || {
                polls += 1;
                InputKey::None
            })
            .unwrap();

        assert_eq!(polls, 3);
        assert!(!engine.has_game());
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn run_async_ticks_once_per_call() {
        let stops = Rc::new(Cell::new(0));
        let mut engine = GameEngine::new(game(stops.clone()), 30);
        {
            let game = engine.game_mut().unwrap();
            game.start().unwrap();
            let (level, ctx) = game.level_and_context(0).unwrap();
            level.spawn(stopper(2), ctx);
        }
        let mut canvas = PixelBuffer::new(8, 8);

        assert!(engine.run_async(&mut canvas, InputKey::Up, false).unwrap());
        assert_eq!(engine.game().unwrap().context().frame(), 1);
        assert_eq!(engine.game().unwrap().context().input, InputKey::Up);

        assert!(!engine.run_async(&mut canvas, InputKey::None, false).unwrap());
        assert!(!engine.has_game());
        assert!(!engine.run_async(&mut canvas, InputKey::None, false).unwrap());
    }

    #[test]
    fn run_without_levels_reports_error() {
        let mut engine = GameEngine::new(
            Game::new("empty", Vector::ZERO, CameraPerspective::FirstPerson),
            30,
        );
        let mut canvas = PixelBuffer::new(8, 8);
        assert!(matches!(
            engine.run(&mut canvas, || InputKey::None),
            Err(EngineError::NoLevels)
        ));
    }
}
