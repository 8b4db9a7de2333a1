//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here, so a cloned state replays
//! identically under the same inputs.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::shape::{Shape, ShapeKind};
use crate::Vec2;
use crate::settings::Settings;

/// Coarse phase of the active shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active shape receiving input and full physics
    Falling,
    /// Active shape slow enough that the lock timer is running
    Settling,
    /// No active shape (only between a lock and the next spawn)
    Idle,
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShapeSpawned { id: u32, kind: ShapeKind },
    ShapeLocked { id: u32, kind: ShapeKind },
    /// A band `[top, top + height)` exceeded the occupancy threshold
    RowCleared { top: f64, particles: usize },
    ScoreChanged { score: u64, delta: u64 },
}

/// Spawn RNG state: one PCG stream per spawn keeps this two plain integers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Draw a uniformly random shape kind and advance to the next stream
    pub fn next_kind(&mut self) -> ShapeKind {
        let mut rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        ShapeKind::ALL[rng.random_range(0..ShapeKind::ALL.len())]
    }
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Fixed for the lifetime of the state
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    /// All shapes, settled and active (sorted by id)
    pub shapes: Vec<Shape>,
    /// Id of the falling shape, if any
    pub active: Option<u32>,
    pub score: u64,
    /// Consecutive slow ticks of the active shape
    pub lock_timer: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Bands cleared so far
    pub rows_cleared: u32,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a world with one freshly spawned shape
    pub fn new(settings: Settings, seed: u64) -> Self {
        if let Err(e) = settings.validate() {
            log::warn!("Running with invalid settings: {}", e);
        }
        let mut state = Self::empty(settings, seed);
        state.spawn();
        state
    }

    /// Create a world with no shapes at all
    pub fn empty(settings: Settings, seed: u64) -> Self {
        Self {
            settings,
            seed,
            rng_state: RngState::new(seed),
            shapes: Vec::new(),
            active: None,
            score: 0,
            lock_timer: 0,
            time_ticks: 0,
            rows_cleared: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Board width in units
    pub fn width(&self) -> f64 {
        self.settings.board.width()
    }

    /// Board height in units
    pub fn height(&self) -> f64 {
        self.settings.board.height()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn phase(&self) -> GamePhase {
        match (self.active, self.lock_timer) {
            (None, _) => GamePhase::Idle,
            (Some(_), 0) => GamePhase::Falling,
            (Some(_), _) => GamePhase::Settling,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Lattice origin for new shapes: centred, two cells above the board
    pub fn spawn_origin(&self) -> Vec2 {
        let cell = self.settings.board.cell_size;
        Vec2::new(self.width() / 2.0 - cell, -cell * 2.0)
    }

    /// Spawn a random shape and make it active
    pub fn spawn(&mut self) -> u32 {
        let kind = self.rng_state.next_kind();
        self.spawn_kind(kind)
    }

    /// Spawn a shape of `kind` at the spawn origin and make it active.
    ///
    /// Any previously active shape is settled first.
    pub fn spawn_kind(&mut self, kind: ShapeKind) -> u32 {
        let origin = self.spawn_origin();
        self.insert_active(kind, origin)
    }

    /// Add a shape of `kind` at `origin` as the active shape
    pub fn insert_active(&mut self, kind: ShapeKind, origin: Vec2) -> u32 {
        if let Some(previous) = self.active_shape_mut() {
            previous.settled = true;
        }
        let id = self.next_entity_id();
        self.shapes.push(Shape::spawn(id, kind, origin, &self.settings));
        self.active = Some(id);
        self.lock_timer = 0;
        self.events.push(GameEvent::ShapeSpawned { id, kind });
        log::debug!("Spawned {:?} shape {}", kind, id);
        id
    }

    /// Add an already-settled shape (used to set up boards)
    pub fn insert_settled(&mut self, mut shape: Shape) -> u32 {
        let id = self.next_entity_id();
        shape.id = id;
        shape.settled = true;
        self.shapes.push(shape);
        id
    }

    /// Index of the active shape in `shapes`
    pub fn active_index(&self) -> Option<usize> {
        let id = self.active?;
        self.shapes.iter().position(|s| s.id == id)
    }

    pub fn active_shape(&self) -> Option<&Shape> {
        self.active_index().map(|i| &self.shapes[i])
    }

    pub fn active_shape_mut(&mut self) -> Option<&mut Shape> {
        self.active_index().map(|i| &mut self.shapes[i])
    }

    /// Total particles across all shapes
    pub fn particle_count(&self) -> usize {
        self.shapes.iter().map(|s| s.particles.len()).sum()
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
