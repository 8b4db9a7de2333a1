//! Inter-shape contact resolution
//!
//! Particles of the active shape are pushed out of every other shape's
//! particles. There is no contact constraint: running this once per sub-step
//! alongside stick relaxation is enough for shapes to rest on each other.

use super::particle::Particle;
use super::shape::Shape;
use crate::settings::PhysicsSettings;

/// Separate one active particle from one static particle.
///
/// Both move half the penetration along the contact normal (the static one
/// only if unpinned), then the active particle's velocity relative to the
/// other is damped. Returns true if the pair was in contact.
pub fn resolve_particle_pair(
    active: &mut Particle,
    other: &mut Particle,
    physics: &PhysicsSettings,
) -> bool {
    let min_dist = physics.collision_distance;
    let d = active.pos - other.pos;
    let dist_sq = d.length_squared();
    if dist_sq >= min_dist * min_dist || dist_sq <= 0.0 {
        return false;
    }

    let dist = dist_sq.sqrt();
    let normal = d / dist;
    let push = normal * ((min_dist - dist) * 0.5);
    active.pos += push;
    if !other.pinned {
        other.pos -= push;
    }

    let rel_vel = active.velocity() - other.velocity();
    active.pos -= rel_vel * physics.collision_damping;
    true
}

/// Resolve the shape at `active` against every other shape.
///
/// Returns the number of particle contacts; an out-of-range index is a no-op.
pub fn resolve_collisions(shapes: &mut [Shape], active: usize, physics: &PhysicsSettings) -> u32 {
    if active >= shapes.len() {
        return 0;
    }
    let (before, rest) = shapes.split_at_mut(active);
    let Some((current, after)) = rest.split_first_mut() else {
        return 0;
    };

    let mut contacts = 0;
    for other in before.iter_mut().chain(after.iter_mut()) {
        for p1 in current.particles.iter_mut() {
            for p2 in other.particles.iter_mut() {
                if resolve_particle_pair(p1, p2, physics) {
                    contacts += 1;
                }
            }
        }
    }
    contacts
}
