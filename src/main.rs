//! Terminal runner (default binary).
//!
//! Drives the built-in world on an emulated 128x64 screen. Arrow keys or WASD
//! move, Enter toggles the camera, Esc leaves the game, `q` quits at once.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::info;

use free_roam::engine::{EngineConfig, GameEngine};
use free_roam::input::{should_quit, InputHandler};
use free_roam::term::TerminalDisplay;
use free_roam::world::build_game;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = EngineConfig::from_env();
    let mut display = TerminalDisplay::new();
    display.enter()?;

    let result = run(&mut display, &config);

    // Always try to restore terminal state.
    let _ = display.exit();
    result
}

fn run(display: &mut TerminalDisplay, config: &EngineConfig) -> Result<()> {
    let (game, _player) = build_game(config)?;
    let mut engine = GameEngine::with_config(game, config);
    let frame = engine.frame_duration();
    let mut input = InputHandler::new();

    let mut last_tick = Instant::now();
    loop {
        let timeout = if config.no_delay {
            Duration::ZERO
        } else {
            frame.saturating_sub(last_tick.elapsed())
        };

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            if let Some(game) = engine.game_mut() {
                                game.context_mut().request_stop();
                            }
                        }
                        input.handle_key_press(key.code);
                    }
                    KeyEventKind::Release => input.handle_key_release(key.code),
                },
                Event::Resize(w, h) => display.resize(w, h),
                _ => {}
            }
        }

        if !config.no_delay && last_tick.elapsed() < frame {
            continue;
        }
        last_tick = Instant::now();

        display.set_status(engine.game().map(status_line));
        if !engine.run_async(display, input.current(), false)? {
            break;
        }
    }

    info!("left the game");
    Ok(())
}

fn status_line(game: &free_roam::core::Game) -> String {
    let level = game.current_level().map_or("-", |level| level.name());
    format!("{level}  {:?}  frame {}", game.perspective(), game.context().frame())
}
