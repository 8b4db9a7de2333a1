//! Fixed-step simulation tick
//!
//! One call advances the world by one frame: input, `iterations` physics
//! sub-steps, settle check, then lock / line clear / spawn.

use super::collision::resolve_collisions;
use super::particle::Particle;
use super::shape::Shape;
use super::state::{GameEvent, GameState};
use crate::Vec2;
use crate::settings::PhysicsSettings;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held: push the active shape left every tick
    pub left: bool,
    /// Held: push the active shape right every tick
    pub right: bool,
    /// Held: push the active shape down every tick
    pub soft_drop: bool,
    /// Edge-triggered: the driver sets this for exactly one tick per press
    pub rotate: bool,
    /// Idle/demo mode - autopilot steers the active shape
    pub idle_mode: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.active_index().is_none() {
        state.active = None;
        state.spawn();
    }

    let input = if input.idle_mode {
        autopilot(state, input)
    } else {
        input.clone()
    };

    state.time_ticks += 1;

    apply_input(state, &input);
    let contacts = step_physics(state);
    if should_lock(state, contacts) {
        lock_active(state);
    }
}

/// Steer toward a column picked from the shape id while airborne.
///
/// Held directions are released once the shape is within a cell of the floor
/// or of another shape, leaving the lock rules to settle it.
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = TickInput {
        left: false,
        right: false,
        soft_drop: false,
        ..input.clone()
    };
    let Some(active) = state.active_index() else {
        return input;
    };
    let shape = &state.shapes[active];
    let (Some(lowest), Some((min_x, max_x)), Some(vel)) =
        (shape.lowest_y(), shape.x_extent(), shape.mean_velocity())
    else {
        return input;
    };

    let cell = state.settings.board.cell_size;
    if lowest > state.height() - cell || near_other_shapes(state, active, cell) {
        return input;
    }

    let dx = autopilot_target(state, shape) - (min_x + max_x) / 2.0;
    let tolerance = cell * 0.25;
    // Cap the approach speed so the shape can coast to a stop near the target
    let coast = dx.abs() / 60.0;

    input.left = dx < -tolerance && vel.x > -coast;
    input.right = dx > tolerance && vel.x < coast;
    input.soft_drop = dx.abs() <= tolerance && vel.y < cell * 0.25;
    input
}

/// Horizontal target for the shape's bounding-box center, kept reachable
/// for the shape's width
fn autopilot_target(state: &GameState, shape: &Shape) -> f64 {
    let board = &state.settings.board;
    let hash = shape.id.wrapping_mul(2654435761);
    let column = (hash >> 16) % board.cols.max(1);
    let target = (column as f64 + 0.5) * board.cell_size;

    let half = match shape.x_extent() {
        Some((min_x, max_x)) => (max_x - min_x) / 2.0 + state.settings.physics.particle_radius,
        None => 0.0,
    };
    target.max(half).min((state.width() - half).max(half))
}

/// True if any particle of another shape is within `reach` of the shape at `active`
fn near_other_shapes(state: &GameState, active: usize, reach: f64) -> bool {
    let reach_sq = reach * reach;
    let shape = &state.shapes[active];
    state
        .shapes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != active)
        .flat_map(|(_, other)| &other.particles)
        .any(|o| {
            shape
                .particles
                .iter()
                .any(|p| p.pos.distance_squared(o.pos) < reach_sq)
        })
}

/// Rotation first, then the held directions as velocity kicks
fn apply_input(state: &mut GameState, input: &TickInput) {
    let force = state.settings.rules.input_force;
    let Some(shape) = state.active_shape_mut() else {
        return;
    };

    if input.rotate {
        shape.rotate();
    }
    if input.left {
        shape.nudge(Vec2::new(-force, 0.0));
    }
    if input.right {
        shape.nudge(Vec2::new(force, 0.0));
    }
    if input.soft_drop {
        shape.nudge(Vec2::new(0.0, force));
    }
}

/// Integrate, bound and relax one shape for a single sub-step
fn step_shape(shape: &mut Shape, width: f64, height: f64, physics: &PhysicsSettings) {
    for p in &mut shape.particles {
        p.integrate(physics);
        p.constrain_bounds(width, height, physics);
    }
    for stick in &shape.sticks {
        stick.relax(&mut shape.particles);
    }
}

/// Run all sub-steps; returns the active shape's contact count
fn step_physics(state: &mut GameState) -> u32 {
    let physics = state.settings.physics;
    let (width, height) = (state.width(), state.height());
    let active = state.active_index();

    let mut contacts = 0;
    for _ in 0..physics.iterations {
        for shape in &mut state.shapes {
            step_shape(shape, width, height, &physics);
        }
        if let Some(i) = active {
            contacts += resolve_collisions(&mut state.shapes, i, &physics);
        }
    }
    contacts
}

/// Settle check for the active shape.
///
/// Locks at once when every particle is nearly still and the shape is on the
/// floor; otherwise after `lock_frames` slow ticks while resting on the floor
/// or on another shape.
fn should_lock(state: &mut GameState, contacts: u32) -> bool {
    let rules = state.settings.rules;
    let height = state.height();
    let Some(shape) = state.active_shape() else {
        return false;
    };
    let Some(lowest) = shape.lowest_y() else {
        // Nothing left to simulate
        return true;
    };

    if shape.max_speed() <= rules.rest_speed && lowest > height - rules.rest_floor_margin {
        return true;
    }

    let slow = shape.total_speed() < rules.lock_velocity;
    let supported = lowest >= height - rules.floor_band || contacts > 0;

    if slow {
        state.lock_timer += 1;
    } else {
        state.lock_timer = 0;
    }
    state.lock_timer > rules.lock_frames && supported
}

/// Freeze the active shape, clear full bands and spawn the next shape
pub fn lock_active(state: &mut GameState) {
    let Some(i) = state.active_index() else {
        return;
    };
    let shape = &mut state.shapes[i];
    shape.settled = true;
    let (id, kind) = (shape.id, shape.kind);

    state.active = None;
    state.lock_timer = 0;
    state.events.push(GameEvent::ShapeLocked { id, kind });
    log::debug!("Locked {:?} shape {} at tick {}", kind, id, state.time_ticks);

    clear_rows(state);
    state.spawn();
}

#[inline]
fn in_band(p: &Particle, top: f64, band: f64) -> bool {
    !p.pinned && p.pos.y >= top && p.pos.y < top + band
}

/// Scan one-cell bands bottom-up and remove every band over the threshold.
///
/// Each band is counted after the removals of the bands below it and scores
/// on its own. Returns the number of bands cleared.
pub fn clear_rows(state: &mut GameState) -> u32 {
    let band = state.settings.board.cell_size;
    let threshold = state.settings.rules.clear_threshold;
    let points = state.settings.rules.clear_points;

    let mut cleared = 0;
    let mut top = state.height() - band;
    while top > 0.0 {
        let count: usize = state
            .shapes
            .iter()
            .map(|s| s.particles.iter().filter(|p| in_band(p, top, band)).count())
            .sum();

        if count > threshold {
            for shape in &mut state.shapes {
                let doomed: Vec<bool> =
                    shape.particles.iter().map(|p| in_band(p, top, band)).collect();
                shape.remove_particles(&doomed);
            }
            state.score += points;
            state.rows_cleared += 1;
            cleared += 1;
            state.events.push(GameEvent::RowCleared { top, particles: count });
            state.events.push(GameEvent::ScoreChanged {
                score: state.score,
                delta: points,
            });
            log::info!("Cleared band at y={} ({} particles), score {}", top, count, state.score);
        }
        top -= band;
    }

    if cleared > 0 {
        state.shapes.retain(|s| !s.is_empty());
        if state.active_index().is_none() {
            state.active = None;
        }
    }
    cleared
}
