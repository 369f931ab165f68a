//! Input vocabulary the simulation understands

use serde::{Deserialize, Serialize};

/// Keys the game reacts to. Front ends map everything else away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    R,
    M,
    Escape,
}

/// Directional keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl HeldKeys {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        up: false,
        down: false,
    };

    /// Update from a key transition (non-directional keys are ignored)
    pub fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Up => self.up = down,
            Key::Down => self.down = down,
            _ => {}
        }
    }
}

/// Discrete events delivered in order within a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A key was pressed this tick
    KeyDown(Key),
    /// The recurring wave timer fired
    SpawnWave,
    /// Window closed / quit requested
    Quit,
}
