//! Keyboard state shared by the native and web front ends
//!
//! Direction keys are level-triggered (held). Retry and quit are one-shot:
//! a press is latched until the next tick consumes it.

use crate::sim::TickInput;

/// Logical game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Retry,
    Quit,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value. Arrows and WASD steer, R retries,
    /// Q quits.
    pub fn from_web_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "r" | "R" => Some(Key::Retry),
            "q" | "Q" => Some(Key::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    retry: bool,
    quit: bool,
    close: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.set(key, true);
    }

    /// Releasing a one-shot key does not cancel a latched press
    pub fn release(&mut self, key: Key) {
        match key {
            Key::Retry | Key::Quit => {}
            _ => self.set(key, false),
        }
    }

    /// The window (or tab) asked to close
    pub fn request_close(&mut self) {
        self.close = true;
    }

    /// Forget everything held, e.g. when focus is lost
    pub fn clear_held(&mut self) {
        self.up = false;
        self.down = false;
        self.left = false;
        self.right = false;
    }

    /// Snapshot for the next tick; one-shot keys are consumed
    pub fn take_input(&mut self) -> TickInput {
        let input = TickInput {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
            retry: self.retry,
            quit: self.quit,
            close: self.close,
        };
        self.retry = false;
        self.quit = false;
        input
    }

    fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Up => self.up = down,
            Key::Down => self.down = down,
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Retry => self.retry = down,
            Key::Quit => self.quit = down,
        }
    }
}
