//! Keyboard tracking
//!
//! Raw key events become a persistent pressed-keys record. Movement keys are
//! level-triggered (true while held). Casting is an edge trigger: the state
//! machine consumes it once per tick with [`PressedKeys::take_cast`].

use serde::{Deserialize, Serialize};

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Escape,
    /// Resume/restart key on overlay screens
    Space,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            "ArrowUp" | "Up" => Some(Key::Up),
            "Escape" | "Esc" => Some(Key::Escape),
            " " | "Spacebar" => Some(Key::Space),
            _ => None,
        }
    }

    /// Parse a legacy `KeyboardEvent.keyCode`
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            37 => Some(Key::Left),
            39 => Some(Key::Right),
            38 => Some(Key::Up),
            27 => Some(Key::Escape),
            32 => Some(Key::Space),
            _ => None,
        }
    }
}

/// Current key-down state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressedKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub esc: bool,
    /// Cast request (shift), cleared once a fireball is spawned
    pub cast: bool,
}

impl PressedKeys {
    /// Apply a key-down event
    pub fn key_down(&mut self, key: Option<Key>, shift: bool) {
        if let Some(flag) = key.and_then(|k| self.flag_mut(k)) {
            *flag = true;
        }
        if shift {
            self.cast = true;
        }
    }

    /// Apply a key-up event
    pub fn key_up(&mut self, key: Option<Key>, shift: bool) {
        if let Some(flag) = key.and_then(|k| self.flag_mut(k)) {
            *flag = false;
        }
        if shift {
            self.cast = false;
        }
    }

    /// Consume a pending cast request
    pub fn take_cast(&mut self) -> bool {
        std::mem::take(&mut self.cast)
    }

    fn flag_mut(&mut self, key: Key) -> Option<&mut bool> {
        match key {
            Key::Left => Some(&mut self.left),
            Key::Right => Some(&mut self.right),
            Key::Up => Some(&mut self.up),
            Key::Escape => Some(&mut self.esc),
            Key::Space => None,
        }
    }
}
