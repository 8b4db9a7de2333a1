//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per `tick` call, no clocks
//! - Seeded RNG only
//! - Stable iteration order (shapes sorted by id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod particle;
pub mod shape;
pub mod state;
pub mod stick;
pub mod tick;

pub use collision::{resolve_collisions, resolve_particle_pair};
pub use particle::Particle;
pub use shape::{Cell, Shape, ShapeKind};
pub use state::{GameEvent, GamePhase, GameState, RngState};
pub use stick::Stick;
pub use tick::{TickInput, clear_rows, lock_active, tick};
