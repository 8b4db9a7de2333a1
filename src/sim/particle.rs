//! Verlet point masses
//!
//! Velocity is never stored: it is `pos - old_pos`, so anything that rewrites
//! `old_pos` (friction, wall bounce, rotation) is a velocity change.

use serde::{Deserialize, Serialize};

use crate::Vec2;
use crate::settings::PhysicsSettings;

/// A point mass owned by a shape's particle arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Position one sub-step ago
    pub old_pos: Vec2,
    pub radius: f64,
    /// Carried for future force scaling; the solver is mass-agnostic
    pub mass: f64,
    /// Excluded from integration, bounds and stick correction
    pub pinned: bool,
}

impl Particle {
    /// A particle at rest at `pos`
    pub fn new(pos: Vec2, radius: f64, mass: f64) -> Self {
        Self {
            pos,
            old_pos: pos,
            radius,
            mass,
            pinned: false,
        }
    }

    /// Implicit velocity
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.pos - self.old_pos
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity().length()
    }

    /// One Verlet step: damp the implicit velocity, then add gravity
    pub fn integrate(&mut self, physics: &PhysicsSettings) {
        if self.pinned {
            return;
        }
        let vel = self.velocity() * physics.friction;
        self.old_pos = self.pos;
        self.pos += vel;
        self.pos.y += physics.gravity;
    }

    /// Clamp into the well and rewrite `old_pos.x` for friction or bounce.
    ///
    /// The floor only touches `old_pos.x`; vertical velocity is whatever the
    /// clamp leaves behind.
    pub fn constrain_bounds(&mut self, width: f64, height: f64, physics: &PhysicsSettings) {
        if self.pinned {
            return;
        }
        let r = self.radius;

        if self.pos.y > height - r {
            self.pos.y = height - r;
            let vx = (self.pos.x - self.old_pos.x) * physics.ground_friction;
            self.old_pos.x = self.pos.x - vx;
        }

        if self.pos.x < r {
            self.pos.x = r;
            let vx = (self.pos.x - self.old_pos.x) * -physics.wall_bounce;
            self.old_pos.x = self.pos.x - vx;
        }

        if self.pos.x > width - r {
            self.pos.x = width - r;
            let vx = (self.pos.x - self.old_pos.x) * -physics.wall_bounce;
            self.old_pos.x = self.pos.x - vx;
        }
    }
}
