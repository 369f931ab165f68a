//! Session state and core simulation types
//!
//! Everything that changes during a run lives in `SessionState`, passed by
//! reference into the tick, collision and render code.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::group::EntityGroup;
use super::player::Player;
use super::spawner::Spawner;
use crate::consts::*;

/// Active scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scene {
    /// Car selection (initial)
    #[default]
    Menu,
    /// Driving
    Play,
    /// Run ended, waiting for restart/menu/quit
    GameOver,
}

/// Things that happened during a tick, drained by the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player hit traffic
    Crash,
    /// Player hit oil
    Skid,
    /// Player picked up fuel
    Refuel,
    /// A new wave entered the road
    WaveSpawned,
    /// Health, score and the road were reset
    SessionReset,
    SceneChanged { from: Scene, to: Scene },
    /// Quit requested
    Quit,
}

/// All scrolling entities, one group per kind
#[derive(Debug, Clone, Default)]
pub struct World {
    pub traffic_left: EntityGroup,
    pub traffic_right: EntityGroup,
    pub oil: EntityGroup,
    pub fuel: EntityGroup,
    pub markers: EntityGroup,
    next_id: u32,
}

impl World {
    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Advance every group one frame
    pub fn advance_all(&mut self) {
        self.traffic_left.advance_all();
        self.traffic_right.advance_all();
        self.oil.advance_all();
        self.fuel.advance_all();
        self.markers.advance_all();
    }

    pub fn clear(&mut self) {
        self.traffic_left.clear();
        self.traffic_right.clear();
        self.oil.clear();
        self.fuel.clear();
        self.markers.clear();
    }

    /// Total live entities
    pub fn len(&self) -> usize {
        self.traffic_left.len()
            + self.traffic_right.len()
            + self.oil.len()
            + self.fuel.len()
            + self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Source of every random draw in the simulation
    pub rng: Pcg32,
    pub scene: Scene,
    /// Car variant chosen in the menu
    pub selected_car: usize,
    /// Present once the first session has been started
    pub player: Option<Player>,
    /// 0..=MAX_HEALTH
    pub health: i32,
    /// Fractional score (displayed truncated)
    pub score: f64,
    pub world: World,
    pub spawner: Spawner,
    /// Cleared when quit is requested
    pub running: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Sessions started since launch
    pub sessions: u32,
    events: Vec<GameEvent>,
}

impl SessionState {
    /// Fresh state in the menu
    pub fn new(seed: u64, spawner: Spawner) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            scene: Scene::Menu,
            selected_car: 0,
            player: None,
            health: MAX_HEALTH,
            score: 0.0,
            world: World::default(),
            spawner,
            running: true,
            time_ticks: 0,
            sessions: 0,
            events: Vec::new(),
        }
    }

    /// Start a new session: clear the road, new player, full health, first wave
    pub fn reset(&mut self) {
        self.world.clear();
        self.player = Some(self.spawner.spawn_player(self.selected_car));
        self.health = MAX_HEALTH;
        self.score = 0.0;
        self.sessions += 1;
        self.spawn_wave();
        self.push_event(GameEvent::SessionReset);
        log::info!(
            "Session {} started with car {}",
            self.sessions,
            self.selected_car
        );
    }

    /// Spawn one wave
    pub fn spawn_wave(&mut self) {
        self.spawner.spawn_wave(&mut self.rng, &mut self.world);
        self.push_event(GameEvent::WaveSpawned);
    }

    /// Switch scenes, recording the transition
    pub fn set_scene(&mut self, to: Scene) {
        let from = self.scene;
        if from == to {
            return;
        }
        self.scene = to;
        self.push_event(GameEvent::SceneChanged { from, to });
        log::info!("Scene {:?} -> {:?}", from, to);
    }

    /// Step the car selection by `delta`, wrapping around
    pub fn cycle_car(&mut self, delta: isize) {
        let count = self.spawner.car_variants() as isize;
        self.selected_car = (self.selected_car as isize + delta).rem_euclid(count) as usize;
    }

    /// Score as shown on screen
    pub fn display_score(&self) -> u64 {
        self.score as u64
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events recorded since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
