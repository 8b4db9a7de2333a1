//! Simulation settings
//!
//! One immutable configuration object handed to `GameState::new` and threaded
//! to every component that needs a constant. Loadable from JSON; any section
//! or field left out falls back to the defaults in `crate::consts`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Board geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub cols: u32,
    pub rows: u32,
    pub cell_size: f64,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            cols: BOARD_COLS,
            rows: BOARD_ROWS,
            cell_size: CELL_SIZE,
        }
    }
}

impl BoardSettings {
    /// Board width in units (`cols * cell_size`)
    pub fn width(&self) -> f64 {
        self.cols as f64 * self.cell_size
    }

    /// Board height in units (`rows * cell_size`)
    pub fn height(&self) -> f64 {
        self.rows as f64 * self.cell_size
    }
}

/// Solver constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: f64,
    pub friction: f64,
    pub ground_friction: f64,
    pub wall_bounce: f64,
    pub stiffness: f64,
    /// Sub-steps per tick
    pub iterations: u32,
    pub particle_radius: f64,
    pub particle_mass: f64,
    pub collision_distance: f64,
    pub collision_damping: f64,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            ground_friction: GROUND_FRICTION,
            wall_bounce: WALL_BOUNCE,
            stiffness: STIFFNESS,
            iterations: ITERATIONS,
            particle_radius: PARTICLE_RADIUS,
            particle_mass: PARTICLE_MASS,
            collision_distance: COLLISION_DISTANCE,
            collision_damping: COLLISION_DAMPING,
        }
    }
}

/// Input, lock and scoring rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesSettings {
    pub input_force: f64,
    pub rest_speed: f64,
    pub rest_floor_margin: f64,
    pub lock_velocity: f64,
    pub lock_frames: u32,
    pub floor_band: f64,
    pub clear_threshold: usize,
    pub clear_points: u64,
}

impl Default for RulesSettings {
    fn default() -> Self {
        Self {
            input_force: INPUT_FORCE,
            rest_speed: REST_SPEED,
            rest_floor_margin: REST_FLOOR_MARGIN,
            lock_velocity: LOCK_VELOCITY,
            lock_frames: LOCK_FRAMES,
            floor_band: FLOOR_BAND,
            clear_threshold: CLEAR_THRESHOLD,
            clear_points: CLEAR_POINTS,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: BoardSettings,
    pub physics: PhysicsSettings,
    pub rules: RulesSettings,
}

/// Why a configuration was rejected
#[derive(Debug)]
pub enum SettingsError {
    /// The JSON could not be parsed into settings
    Parse(serde_json::Error),
    /// A field holds a value the solver cannot run with
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Parse(e) => write!(f, "failed to parse settings: {e}"),
            SettingsError::Invalid { field, reason } => {
                write!(f, "invalid setting `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), SettingsError> {
    if ok {
        Ok(())
    } else {
        Err(SettingsError::Invalid { field, reason })
    }
}

fn unit_interval(v: f64) -> bool {
    v > 0.0 && v <= 1.0
}

impl Settings {
    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the solver cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let b = &self.board;
        check(b.cols > 0, "board.cols", "must be at least 1")?;
        check(b.rows > 0, "board.rows", "must be at least 1")?;
        check(b.cell_size > 0.0, "board.cell_size", "must be positive")?;

        let p = &self.physics;
        check(p.iterations > 0, "physics.iterations", "must be at least 1")?;
        check(unit_interval(p.friction), "physics.friction", "must be in (0, 1]")?;
        check(
            unit_interval(p.ground_friction),
            "physics.ground_friction",
            "must be in (0, 1]",
        )?;
        check(unit_interval(p.stiffness), "physics.stiffness", "must be in (0, 1]")?;
        check(
            (0.0..=1.0).contains(&p.wall_bounce),
            "physics.wall_bounce",
            "must be in [0, 1]",
        )?;
        check(p.gravity.is_finite(), "physics.gravity", "must be finite")?;
        check(p.particle_radius > 0.0, "physics.particle_radius", "must be positive")?;
        check(
            p.collision_distance > 0.0,
            "physics.collision_distance",
            "must be positive",
        )?;
        check(
            p.collision_damping >= 0.0,
            "physics.collision_damping",
            "must not be negative",
        )?;

        let r = &self.rules;
        check(r.input_force >= 0.0, "rules.input_force", "must not be negative")?;
        check(r.lock_velocity > 0.0, "rules.lock_velocity", "must be positive")?;
        Ok(())
    }

    /// Load settings from a JSON file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| Self::from_json(&json).map_err(|e| e.to_string()));

        match parsed {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }
}
