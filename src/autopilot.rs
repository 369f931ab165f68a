//! Demo driver
//!
//! An [`InputSource`] that plays the game by itself: starts from the menu,
//! steers away from traffic and oil, drifts toward fuel, restarts a set number
//! of times after a crash and then quits. Used by the native binary, which has
//! no keyboard.

use crate::consts::*;
use crate::input::InputSource;
use crate::sim::{HeldKeys, Key, Rect, Scene, SessionState, TickInput};

/// How far above and below the car threats are considered (px)
const LOOKAHEAD: i32 = 160;
/// Lateral shift tried for each steering choice (px)
const STEER_SHIFT: i32 = 40;

const TRAFFIC_COST: i32 = 100;
const OIL_COST: i32 = 15;
const FUEL_BONUS: i32 = 5;
/// Leaving the playable band is never worth it
const EDGE_COST: i32 = 10_000;

#[derive(Debug, Clone)]
pub struct Autopilot {
    restarts_left: u32,
    car: usize,
}

impl Autopilot {
    /// Drive `restarts` extra sessions after the first crash, with car `car`
    pub fn new(restarts: u32, car: usize) -> Self {
        Self {
            restarts_left: restarts,
            car,
        }
    }

    fn menu(&self, state: &SessionState) -> TickInput {
        let target = self.car % CAR_VARIANTS;
        if state.selected_car != target {
            return TickInput::press(Key::Right);
        }
        TickInput::press(Key::Space)
    }

    fn game_over(&mut self) -> TickInput {
        if self.restarts_left > 0 {
            self.restarts_left -= 1;
            log::info!("Autopilot restarting ({} left)", self.restarts_left);
            TickInput::press(Key::R)
        } else {
            log::info!("Autopilot done");
            TickInput::press(Key::Escape)
        }
    }

    fn drive(&self, state: &SessionState) -> TickInput {
        let Some(player) = &state.player else {
            return TickInput::default();
        };
        if player.slippery {
            return TickInput::default();
        }

        let mut best = (0, steering_cost(state, player.rect, 0));
        for dir in [-1, 1] {
            let cost = steering_cost(state, player.rect, dir);
            if cost < best.1 {
                best = (dir, cost);
            }
        }

        let mut held = HeldKeys::NONE;
        match best.0 {
            -1 => held.left = true,
            1 => held.right = true,
            _ => {}
        }

        // Drift back toward the vertical middle so both traffic streams stay visible
        let center_y = player.rect.center().y;
        if center_y < SCREEN_HEIGHT / 2 - STEER_SHIFT {
            held.down = true;
        } else if center_y > SCREEN_HEIGHT / 2 + STEER_SHIFT {
            held.up = true;
        }

        TickInput::held(held)
    }
}

/// Cost of steering in `dir` (-1, 0, +1): what the car would run into
fn steering_cost(state: &SessionState, car: Rect, dir: i32) -> i32 {
    let shifted = Rect::new(car.left() + dir * STEER_SHIFT, car.top(), car.width(), car.height());
    if shifted.left() < PLAYABLE_MIN_X || shifted.right() > PLAYABLE_MAX_X {
        return EDGE_COST;
    }

    let zone = Rect::new(
        shifted.left(),
        shifted.top() - LOOKAHEAD,
        shifted.width(),
        shifted.height() + 2 * LOOKAHEAD,
    );
    let hits = |group: &crate::sim::EntityGroup| -> i32 {
        group.iter().filter(|e| e.rect.intersects(&zone)).count() as i32
    };

    let world = &state.world;
    (hits(&world.traffic_left) + hits(&world.traffic_right)) * TRAFFIC_COST
        + hits(&world.oil) * OIL_COST
        - hits(&world.fuel) * FUEL_BONUS
}

impl InputSource for Autopilot {
    fn poll(&mut self, state: &SessionState) -> TickInput {
        match state.scene {
            Scene::Menu => self.menu(state),
            Scene::Play => self.drive(state),
            Scene::GameOver => self.game_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Sprite;
    use crate::sim::{Entity, EntityKind, Spawner, tick};

    fn playing() -> SessionState {
        let mut state = SessionState::new(3, Spawner::default());
        state.reset();
        state.world.clear();
        state.set_scene(Scene::Play);
        state
    }

    fn place(state: &mut SessionState, kind: EntityKind, dx: i32, dy: i32) {
        let car = state.player.as_ref().map(|p| p.rect).unwrap_or_default();
        let id = state.world.next_id();
        let (sprite, group) = match kind {
            EntityKind::TrafficLeft => (Sprite::Car(2), &mut state.world.traffic_left),
            EntityKind::TrafficRight => (Sprite::Car(2), &mut state.world.traffic_right),
            EntityKind::Oil => (Sprite::Oil, &mut state.world.oil),
            EntityKind::Fuel => (Sprite::Fuel, &mut state.world.fuel),
            EntityKind::LaneMarker => (Sprite::Arrow, &mut state.world.markers),
        };
        group.add(Entity::new(
            id,
            kind,
            Rect::new(car.left() + dx, car.top() + dy, 50, 50),
            1,
            sprite,
        ));
    }

    #[test]
    fn test_menu_selects_car_then_starts() {
        let mut pilot = Autopilot::new(0, 2);
        let mut state = SessionState::new(1, Spawner::default());
        assert_eq!(pilot.poll(&state), TickInput::press(Key::Right));
        state.selected_car = 2;
        assert_eq!(pilot.poll(&state), TickInput::press(Key::Space));
    }

    #[test]
    fn test_game_over_restarts_then_quits() {
        let mut pilot = Autopilot::new(1, 0);
        let mut state = playing();
        state.set_scene(Scene::GameOver);

        assert_eq!(pilot.poll(&state), TickInput::press(Key::R));
        assert_eq!(pilot.restarts_left, 0);
        assert_eq!(pilot.poll(&state), TickInput::press(Key::Escape));
    }

    #[test]
    fn test_empty_road_no_steering() {
        let mut pilot = Autopilot::new(0, 0);
        let state = playing();
        assert_eq!(pilot.poll(&state).held, HeldKeys::NONE);
    }

    #[test]
    fn test_steers_away_from_traffic_ahead() {
        let mut pilot = Autopilot::new(0, 0);
        let mut state = playing();
        // Car coming down, slightly left of center
        place(&mut state, EntityKind::TrafficLeft, -20, -120);

        let held = pilot.poll(&state).held;
        assert!(held.right && !held.left);
    }

    #[test]
    fn test_steers_toward_fuel() {
        let mut pilot = Autopilot::new(0, 0);
        let mut state = playing();
        let width = state.player.as_ref().map(|p| p.rect.width()).unwrap_or(0);
        place(&mut state, EntityKind::Fuel, width + 10, -100);

        let held = pilot.poll(&state).held;
        assert!(held.right);
    }

    #[test]
    fn test_never_steers_out_of_band() {
        let mut pilot = Autopilot::new(0, 0);
        let mut state = playing();
        if let Some(player) = state.player.as_mut() {
            player.rect.pos.x = PLAYABLE_MIN_X + 5;
        }
        // Threat to the right, but left is off the road
        place(&mut state, EntityKind::Oil, 20, -60);

        let held = pilot.poll(&state).held;
        assert!(!held.left);
    }

    #[test]
    fn test_demo_session_ends_with_quit() {
        let mut pilot = Autopilot::new(1, 0);
        let mut state = SessionState::new(77, Spawner::default());
        let mut frames = 0;
        while state.running && frames < 200_000 {
            let mut input = pilot.poll(&state);
            // Waves every 120 frames as the driver would
            if frames % 120 == 119 {
                input.events.push(crate::sim::InputEvent::SpawnWave);
            }
            tick(&mut state, &input);
            frames += 1;

            // Force the run to end quickly once driving
            if state.scene == Scene::Play && state.score > 5.0 {
                state.health = 1;
                let car = state.player.as_ref().map(|p| p.rect).unwrap_or_default();
                let id = state.world.next_id();
                state
                    .world
                    .oil
                    .add(Entity::new(id, EntityKind::Oil, car, 0, Sprite::Oil));
            }
        }
        assert!(!state.running);
        assert_eq!(state.sessions, 2);
    }
}
