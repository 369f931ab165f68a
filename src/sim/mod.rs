//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order within each group)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod group;
pub mod input;
pub mod player;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, resolve};
pub use entity::{Entity, EntityKind};
pub use group::EntityGroup;
pub use input::{HeldKeys, InputEvent, Key};
pub use player::Player;
pub use rect::Rect;
pub use spawner::{Footprints, Spawner, arrow_positions};
pub use state::{GameEvent, Scene, SessionState, World};
pub use tick::{TickInput, handle_event, tick};
