//! Held-key latch for terminal environments.
//!
//! A direction key stays held until its release event arrives or, on terminals that
//! never send releases, until no key has been seen for a short timeout. Confirm and
//! Cancel fire once per press.

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use crate::map::key_to_input;
use crate::types::InputKey;

// Terminal auto-repeat typically re-sends a held key every 30-50ms after an initial
// delay of ~250ms; the timeout must bridge that initial gap.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 300;

/// Tracks the key the game should see on the next tick.
#[derive(Debug, Clone)]
pub struct InputHandler {
    held: Option<InputKey>,
    pressed: Option<InputKey>,
    last_key_time: Instant,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            held: None,
            pressed: None,
            last_key_time: Instant::now(),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Record a key press. Returns the engine key when the press starts something
    /// new (a fresh direction, or a one-shot key).
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<InputKey> {
        let key = key_to_input(code)?;
        match key {
            InputKey::Up | InputKey::Down | InputKey::Left | InputKey::Right => {
                self.last_key_time = Instant::now();
                if self.held == Some(key) {
                    None
                } else {
                    self.held = Some(key);
                    Some(key)
                }
            }
            InputKey::Confirm | InputKey::Cancel => {
                self.pressed = Some(key);
                Some(key)
            }
            InputKey::None => None,
        }
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if let Some(key) = key_to_input(code) {
            if self.held == Some(key) {
                self.held = None;
            }
        }
    }

    /// The key for this tick. A pending one-shot key wins over a held direction and
    /// is consumed.
    pub fn current(&mut self) -> InputKey {
        let timeout = Duration::from_millis(self.key_release_timeout_ms as u64);
        if self.held.is_some() && self.last_key_time.elapsed() > timeout {
            self.held = None;
        }

        self.pressed
            .take()
            .or(self.held)
            .unwrap_or(InputKey::None)
    }

    pub fn reset(&mut self) {
        self.held = None;
        self.pressed = None;
        self.last_key_time = Instant::now();
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
