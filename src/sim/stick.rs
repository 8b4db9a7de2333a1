//! Distance constraints between two particles of the same shape

use serde::{Deserialize, Serialize};

use super::particle::Particle;

/// Keeps two particles near a fixed rest length.
///
/// Endpoints are indices into the owning shape's particle arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stick {
    pub a: usize,
    pub b: usize,
    pub rest_length: f64,
    pub stiffness: f64,
}

impl Stick {
    /// Create a stick whose rest length is the current endpoint distance
    pub fn new(particles: &[Particle], a: usize, b: usize, stiffness: f64) -> Self {
        Self {
            a,
            b,
            rest_length: particles[a].pos.distance(particles[b].pos),
            stiffness,
        }
    }

    /// True if this stick touches particle `i`
    #[inline]
    pub fn touches(&self, i: usize) -> bool {
        self.a == i || self.b == i
    }

    /// One relaxation pass: move both unpinned endpoints half the correction
    pub fn relax(&self, particles: &mut [Particle]) {
        if self.a == self.b || self.a >= particles.len() || self.b >= particles.len() {
            return;
        }
        let delta = particles[self.b].pos - particles[self.a].pos;
        let dist = delta.length();
        if dist == 0.0 {
            return;
        }
        let percent = (self.rest_length - dist) / dist * 0.5 * self.stiffness;
        let offset = delta * percent;

        let pa = &mut particles[self.a];
        if !pa.pinned {
            pa.pos -= offset;
        }
        let pb = &mut particles[self.b];
        if !pb.pinned {
            pb.pos += offset;
        }
    }
}
