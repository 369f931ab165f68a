//! Collision detection and scoring
//!
//! Player footprint against every live member of each collection, using
//! axis-aligned rectangle overlap. All overlaps in a frame are resolved in one
//! pass: traffic, then oil, then fuel, then score and the game-over check.
//! Health is only checked at the end, so fuel picked up on the frame of a
//! crash still counts.

use super::state::{GameEvent, Scene, SessionState};
use crate::consts::*;

/// What one resolver pass found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResult {
    /// Traffic cars removed by a crash
    pub traffic_hits: usize,
    /// Oil slicks driven over
    pub oil_hits: usize,
    /// Fuel cans collected
    pub fuel_hits: usize,
}

impl CollisionResult {
    pub fn crashed(&self) -> bool {
        self.traffic_hits > 0
    }
}

/// Resolve one Play frame after all entities have advanced
pub fn resolve(state: &mut SessionState) -> CollisionResult {
    let mut result = CollisionResult::default();

    let Some(player) = state.player.as_mut() else {
        return result;
    };
    let footprint = player.rect;

    // Traffic in either direction is instant death
    result.traffic_hits = state.world.traffic_left.remove_colliding(&footprint)
        + state.world.traffic_right.remove_colliding(&footprint);
    if result.crashed() {
        state.health = 0;
    }

    result.oil_hits = state.world.oil.remove_colliding(&footprint);
    if result.oil_hits > 0 {
        player.set_slippery(true);
        state.health = (state.health - OIL_DAMAGE).max(0);
    }

    result.fuel_hits = state.world.fuel.remove_colliding(&footprint);
    if result.fuel_hits > 0 {
        state.health = (state.health + FUEL_HEAL).min(MAX_HEALTH);
    }

    if result.crashed() {
        log::debug!("Crash at {:?}", footprint.pos);
        state.push_event(GameEvent::Crash);
    }
    if result.oil_hits > 0 {
        log::debug!("Skid: health {}", state.health);
        state.push_event(GameEvent::Skid);
    }
    if result.fuel_hits > 0 {
        log::debug!("Refuel: health {}", state.health);
        state.push_event(GameEvent::Refuel);
    }

    state.score += SCORE_PER_FRAME;

    if state.health <= 0 {
        log::info!("Game over, final score {}", state.display_score());
        state.set_scene(Scene::GameOver);
    }

    result
}
