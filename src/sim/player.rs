//! The player's car
//!
//! Two control modes:
//! - Normal: held arrow keys move the car, never across the playable edges.
//! - Slippery: after hitting oil the car drifts sideways for a fixed number of
//!   frames, ignoring input. The drift is not clamped to the playable band.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::input::HeldKeys;
use super::rect::Rect;
use crate::assets::Sprite;
use crate::consts::*;

/// The player entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub sprite: Sprite,
    /// Movement speed in px/frame
    pub speed: i32,
    /// Skidding on oil
    pub slippery: bool,
    /// Lateral drift while skidding (-1, 0 or +1)
    pub slide_dir: i32,
    /// Frames spent in the current skid
    pub slide_count: u32,
    /// Skid length in frames
    pub slide_duration: u32,
}

impl Player {
    /// New player centered on the screen
    pub fn new(sprite: Sprite, size: IVec2) -> Self {
        Self {
            rect: Rect::from_center(IVec2::new(MID_X, SCREEN_HEIGHT / 2), size),
            sprite,
            speed: PLAYER_SPEED,
            slippery: false,
            slide_dir: 0,
            slide_count: 0,
            slide_duration: SLIDE_DURATION,
        }
    }

    /// Enter or leave slippery mode. Re-entering keeps the running countdown.
    pub fn set_slippery(&mut self, state: bool) {
        self.slippery = state;
    }

    /// Advance one frame
    pub fn advance<R: Rng>(&mut self, held: HeldKeys, rng: &mut R) {
        if self.slippery {
            self.slide(rng);
        } else {
            self.steer(held);
        }
    }

    /// Normal-mode movement: each axis independently, suppressed at the edges
    fn steer(&mut self, held: HeldKeys) {
        let speed = self.speed;
        if held.right && self.rect.right() + speed <= PLAYABLE_MAX_X {
            self.rect.pos.x += speed;
        }
        if held.left && self.rect.left() - speed >= PLAYABLE_MIN_X {
            self.rect.pos.x -= speed;
        }
        if held.down && self.rect.bottom() + speed <= SCREEN_HEIGHT {
            self.rect.pos.y += speed;
        }
        if held.up && self.rect.top() - speed >= 0 {
            self.rect.pos.y -= speed;
        }
    }

    /// Slippery-mode drift
    fn slide<R: Rng>(&mut self, rng: &mut R) {
        self.slide_count += 1;
        if self.slide_count.is_multiple_of(SLIDE_TURN_INTERVAL) {
            self.slide_dir = if rng.random_bool(0.5) { 1 } else { -1 };
        }
        self.rect.pos.x += self.speed * self.slide_dir;

        if self.slide_count >= self.slide_duration {
            self.slide_count = 0;
            self.slippery = false;
        }

        // Recomputed after the flag update: the frame that ends the skid
        // already sees the recovered speed.
        self.speed = if self.slippery {
            SLIPPERY_SPEED
        } else {
            RECOVERED_SPEED
        };
    }
}
