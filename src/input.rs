//! Input sources
//!
//! The frame driver asks an [`InputSource`] for one [`TickInput`] per frame.
//! Front ends translate their own key codes into [`Key`] before it gets here.

use std::collections::VecDeque;

use crate::sim::{HeldKeys, InputEvent, Key, SessionState, TickInput};

/// Produces the input for each frame
pub trait InputSource {
    /// Input for the next tick. `state` is the session as it stands before
    /// the tick runs.
    fn poll(&mut self, state: &SessionState) -> TickInput;
}

/// Replays a fixed list of frames, then idles (or quits, if asked to)
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<TickInput>,
    quit_when_done: bool,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            quit_when_done: false,
        }
    }

    /// Send `Quit` once the script runs out
    pub fn quit_when_done(mut self) -> Self {
        self.quit_when_done = true;
        self
    }

    /// Append a frame that presses `key`
    pub fn press(mut self, key: Key) -> Self {
        self.frames.push_back(TickInput::press(key));
        self
    }

    /// Append `frames` frames holding `held`
    pub fn hold(mut self, held: HeldKeys, frames: usize) -> Self {
        self.frames
            .extend(std::iter::repeat_n(TickInput::held(held), frames));
        self
    }

    /// Append `frames` empty frames
    pub fn idle(self, frames: usize) -> Self {
        self.hold(HeldKeys::NONE, frames)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _state: &SessionState) -> TickInput {
        match self.frames.pop_front() {
            Some(frame) => frame,
            None if self.quit_when_done => TickInput {
                held: HeldKeys::NONE,
                events: vec![InputEvent::Quit],
            },
            None => TickInput::default(),
        }
    }
}

/// Collects key transitions from an event-driven front end (browser
/// listeners) and hands them out once per tick
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HeldKeys,
    pending: Vec<InputEvent>,
}

impl KeyboardState {
    pub fn key_down(&mut self, key: Key, repeat: bool) {
        self.held.set(key, true);
        if !repeat {
            self.pending.push(InputEvent::KeyDown(key));
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.set(key, false);
    }

    /// Drop held keys, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held = HeldKeys::NONE;
    }
}

impl InputSource for KeyboardState {
    fn poll(&mut self, _state: &SessionState) -> TickInput {
        TickInput {
            held: self.held,
            events: std::mem::take(&mut self.pending),
        }
    }
}

/// Map a DOM `KeyboardEvent.key` value to a game key
pub fn key_from_dom(key: &str) -> Option<Key> {
    match key {
        "ArrowLeft" => Some(Key::Left),
        "ArrowRight" => Some(Key::Right),
        "ArrowUp" => Some(Key::Up),
        "ArrowDown" => Some(Key::Down),
        " " | "Spacebar" => Some(Key::Space),
        "r" | "R" => Some(Key::R),
        "m" | "M" => Some(Key::M),
        "Escape" | "Esc" => Some(Key::Escape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Spawner;

    fn state() -> SessionState {
        SessionState::new(0, Spawner::default())
    }

    #[test]
    fn test_script_replays_in_order_then_idles() {
        let left = HeldKeys {
            left: true,
            ..HeldKeys::NONE
        };
        let mut input = ScriptedInput::default().press(Key::Space).hold(left, 2);
        let state = state();

        assert_eq!(input.poll(&state), TickInput::press(Key::Space));
        assert_eq!(input.poll(&state).held, left);
        assert_eq!(input.poll(&state).held, left);
        assert_eq!(input.remaining(), 0);
        assert_eq!(input.poll(&state), TickInput::default());
    }

    #[test]
    fn test_script_can_quit_when_done() {
        let mut input = ScriptedInput::default().idle(1).quit_when_done();
        let state = state();
        assert!(input.poll(&state).events.is_empty());
        assert_eq!(input.poll(&state).events, vec![InputEvent::Quit]);
    }

    #[test]
    fn test_keyboard_tracks_held_and_drains_presses() {
        let mut keys = KeyboardState::default();
        let state = state();

        keys.key_down(Key::Right, false);
        keys.key_down(Key::Right, true);
        keys.key_down(Key::Space, false);

        let first = keys.poll(&state);
        assert!(first.held.right);
        assert_eq!(
            first.events,
            vec![InputEvent::KeyDown(Key::Right), InputEvent::KeyDown(Key::Space)]
        );

        // Held keys persist, presses don't
        let second = keys.poll(&state);
        assert!(second.held.right);
        assert!(second.events.is_empty());

        keys.key_up(Key::Right);
        assert!(!keys.poll(&state).held.right);
    }

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(key_from_dom("ArrowLeft"), Some(Key::Left));
        assert_eq!(key_from_dom(" "), Some(Key::Space));
        assert_eq!(key_from_dom("R"), Some(Key::R));
        assert_eq!(key_from_dom("Escape"), Some(Key::Escape));
        assert_eq!(key_from_dom("q"), None);
    }
}
