//! Jelly Drop - soft-body falling blocks
//!
//! Core modules:
//! - `sim`: Deterministic simulation (Verlet particles, sticks, shapes, lock/clear)
//! - `settings`: Board, physics and rules configuration
//! - `renderer`: Presentation adapters (vertex batches, ASCII canvas)

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{BoardSettings, PhysicsSettings, RulesSettings, Settings, SettingsError};

/// Simulation vector type (f64 so repeated rotations stay exact)
pub type Vec2 = glam::DVec2;

/// Default configuration constants
pub mod consts {
    /// Board dimensions in cells
    pub const BOARD_COLS: u32 = 10;
    pub const BOARD_ROWS: u32 = 16;
    /// Cell edge length in board units
    pub const CELL_SIZE: f64 = 35.0;

    /// Downward acceleration added to every particle each sub-step
    pub const GRAVITY: f64 = 0.15;
    /// Air friction applied to implicit velocity each sub-step
    pub const FRICTION: f64 = 0.98;
    /// Horizontal velocity kept when a particle is clamped to the floor
    pub const GROUND_FRICTION: f64 = 0.7;
    /// Horizontal velocity reflected off the side walls
    pub const WALL_BOUNCE: f64 = 0.3;
    /// Structural stick stiffness (cross sticks use half)
    pub const STIFFNESS: f64 = 0.4;
    /// Sub-steps per tick (also the constraint iteration count)
    pub const ITERATIONS: u32 = 5;
    pub const PARTICLE_RADIUS: f64 = 4.0;
    pub const PARTICLE_MASS: f64 = 1.0;

    /// Minimum separation between particles of different shapes
    pub const COLLISION_DISTANCE: f64 = 15.0;
    /// Relative-velocity damping applied to the active particle on contact
    pub const COLLISION_DAMPING: f64 = 0.1;

    /// Offset applied per tick while a movement key is held
    pub const INPUT_FORCE: f64 = 1.5;

    /// Rest rule: per-particle speed limit and floor margin
    pub const REST_SPEED: f64 = 0.3;
    pub const REST_FLOOR_MARGIN: f64 = 10.0;
    /// Timer rule: total speed limit, frames and floor contact band
    pub const LOCK_VELOCITY: f64 = 2.0;
    pub const LOCK_FRAMES: u32 = 40;
    pub const FLOOR_BAND: f64 = 5.0;

    /// Particles a band must exceed to clear
    pub const CLEAR_THRESHOLD: usize = 25;
    /// Score awarded per cleared band
    pub const CLEAR_POINTS: u64 = 100;
}

/// Rotate `point` about `center` by `angle` radians
#[inline]
pub fn rotate_about(point: Vec2, center: Vec2, angle: f64) -> Vec2 {
    center + Vec2::from_angle(angle).rotate(point - center)
}
