//! No Brake - a top-down arcade driving game
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, collisions, scenes)
//! - `renderer`: Draw-call recording and the WebGPU pipeline
//! - `driver`: Fixed-rate frame loop tying sim, input, audio and rendering
//! - `assets`: Sprite/sound catalog
//! - `settings`: Data-driven configuration

pub mod assets;
pub mod audio;
pub mod autopilot;
pub mod driver;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use assets::{AssetCatalog, AssetError, Sprite};
pub use driver::FrameDriver;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Screen dimensions (pixels)
    pub const SCREEN_WIDTH: i32 = 1200;
    pub const SCREEN_HEIGHT: i32 = 800;

    /// Fixed frame rate
    pub const FPS: u32 = 80;
    /// Tick period in milliseconds (12.5 ms at 80 Hz)
    pub const TICK_MS: f64 = 1000.0 / FPS as f64;

    /// Margins where no obstacles spawn
    pub const EDGE_MARGIN: i32 = 100;
    pub const PLAYABLE_MIN_X: i32 = EDGE_MARGIN;
    pub const PLAYABLE_MAX_X: i32 = SCREEN_WIDTH - EDGE_MARGIN;
    pub const MID_X: i32 = SCREEN_WIDTH / 2;

    /// Wave timer
    pub const SPAWN_INTERVAL_MS: f64 = 1500.0;
    /// Default number of lane arrows per wave
    pub const ARROW_COUNT: usize = 10;

    /// Health and scoring
    pub const MAX_HEALTH: i32 = 100;
    pub const OIL_DAMAGE: i32 = 5;
    pub const FUEL_HEAL: i32 = 5;
    pub const SCORE_PER_FRAME: f64 = 0.1;

    /// Player movement (px/frame)
    pub const PLAYER_SPEED: i32 = 3;
    pub const SLIPPERY_SPEED: i32 = 2;
    pub const RECOVERED_SPEED: i32 = 4;
    /// Slide length and how often the drift direction is re-rolled (frames)
    pub const SLIDE_DURATION: u32 = 30;
    pub const SLIDE_TURN_INTERVAL: u32 = 10;

    /// Oil, fuel and lane arrows all scroll at road speed
    pub const HAZARD_SPEED: i32 = 2;
    /// Traffic speed range (inclusive)
    pub const TRAFFIC_MIN_SPEED: i32 = 1;
    pub const TRAFFIC_MAX_SPEED: i32 = 3;

    /// Number of selectable car variants
    pub const CAR_VARIANTS: usize = 8;

    /// Background music volume
    pub const MUSIC_VOLUME: f32 = 0.4;
}
