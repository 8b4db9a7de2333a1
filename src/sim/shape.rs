//! Jelly polyomino bodies
//!
//! A shape is a lattice of particles (one per distinct cell corner) held
//! together by perimeter sticks and softer diagonal sticks.

use std::collections::{HashMap, HashSet};
use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use super::particle::Particle;
use super::stick::Stick;
use crate::settings::Settings;
use crate::{Vec2, rotate_about};

/// Unit-cell offset inside a shape (x right, y down)
pub type Cell = (i32, i32);

/// The seven tetromino kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    /// Spawn order for the RNG
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Cell layout in spawn orientation
    pub fn cells(&self) -> &'static [Cell; 4] {
        match self {
            ShapeKind::O => &[(0, 0), (1, 0), (0, 1), (1, 1)],
            ShapeKind::I => &[(0, 0), (0, 1), (0, 2), (0, 3)],
            ShapeKind::T => &[(0, 0), (1, 0), (2, 0), (1, 1)],
            ShapeKind::L => &[(0, 0), (0, 1), (0, 2), (1, 2)],
            ShapeKind::J => &[(1, 0), (1, 1), (1, 2), (0, 2)],
            ShapeKind::S => &[(1, 0), (2, 0), (0, 1), (1, 1)],
            ShapeKind::Z => &[(0, 0), (1, 0), (1, 1), (2, 1)],
        }
    }

    /// Display colour as 0xRRGGBB
    pub fn rgb(&self) -> u32 {
        match self {
            ShapeKind::I => 0x00f0f0,
            ShapeKind::O => 0xf0f000,
            ShapeKind::T => 0xa000f0,
            ShapeKind::S => 0x00f000,
            ShapeKind::Z => 0xf00000,
            ShapeKind::J => 0x0000f0,
            ShapeKind::L => 0xf0a000,
        }
    }

    /// Display colour as linear RGBA floats
    pub fn color(&self) -> [f32; 4] {
        let rgb = self.rgb();
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    pub fn letter(&self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::T => 'T',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
        }
    }
}

/// A soft polyomino body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub id: u32,
    pub kind: ShapeKind,
    pub particles: Vec<Particle>,
    pub sticks: Vec<Stick>,
    /// Locked into the static pile; never reactivated
    pub settled: bool,
}

impl Shape {
    /// Build a shape of `kind` with its lattice origin at `origin`
    pub fn spawn(id: u32, kind: ShapeKind, origin: Vec2, settings: &Settings) -> Self {
        Self::assemble(id, kind, kind.cells(), origin, settings)
    }

    /// Build a lattice body from an arbitrary cell list.
    ///
    /// Corners shared between cells become one particle and edges shared
    /// between cells become one stick.
    pub fn assemble(
        id: u32,
        kind: ShapeKind,
        cells: &[Cell],
        origin: Vec2,
        settings: &Settings,
    ) -> Self {
        let cell_size = settings.board.cell_size;
        let physics = &settings.physics;

        let mut particles = Vec::new();
        let mut corners: HashMap<Cell, usize> = HashMap::new();
        for &(cx, cy) in cells {
            for corner in [(cx, cy), (cx + 1, cy), (cx + 1, cy + 1), (cx, cy + 1)] {
                corners.entry(corner).or_insert_with(|| {
                    let pos = origin + Vec2::new(corner.0 as f64, corner.1 as f64) * cell_size;
                    let (radius, mass) = (physics.particle_radius, physics.particle_mass);
                    particles.push(Particle::new(pos, radius, mass));
                    particles.len() - 1
                });
            }
        }

        let mut sticks = Vec::new();
        let mut linked: HashSet<(usize, usize)> = HashSet::new();
        let mut link = |a: usize, b: usize, stiffness: f64| {
            if linked.insert((a.min(b), a.max(b))) {
                sticks.push(Stick::new(&particles, a, b, stiffness));
            }
        };
        for &(cx, cy) in cells {
            let tl = corners[&(cx, cy)];
            let tr = corners[&(cx + 1, cy)];
            let br = corners[&(cx + 1, cy + 1)];
            let bl = corners[&(cx, cy + 1)];

            link(tl, tr, physics.stiffness);
            link(tr, br, physics.stiffness);
            link(br, bl, physics.stiffness);
            link(bl, tl, physics.stiffness);
            // Cross bracing, softer so the cell can shear
            link(tl, br, physics.stiffness * 0.5);
            link(tr, bl, physics.stiffness * 0.5);
        }

        Self {
            id,
            kind,
            particles,
            sticks,
            settled: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn color(&self) -> [f32; 4] {
        self.kind.color()
    }

    /// Mean particle position, `None` for an empty shape
    pub fn centroid(&self) -> Option<Vec2> {
        if self.particles.is_empty() {
            return None;
        }
        let sum: Vec2 = self.particles.iter().map(|p| p.pos).sum();
        Some(sum / self.particles.len() as f64)
    }

    /// Largest y (closest to the floor)
    pub fn lowest_y(&self) -> Option<f64> {
        self.particles.iter().map(|p| p.pos.y).reduce(f64::max)
    }

    /// Leftmost and rightmost particle x
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        let min = self.particles.iter().map(|p| p.pos.x).reduce(f64::min)?;
        let max = self.particles.iter().map(|p| p.pos.x).reduce(f64::max)?;
        Some((min, max))
    }

    /// Mean implicit velocity, `None` for an empty shape
    pub fn mean_velocity(&self) -> Option<Vec2> {
        if self.particles.is_empty() {
            return None;
        }
        let sum: Vec2 = self.particles.iter().map(Particle::velocity).sum();
        Some(sum / self.particles.len() as f64)
    }

    /// Sum of particle speeds
    pub fn total_speed(&self) -> f64 {
        self.particles.iter().map(Particle::speed).sum()
    }

    /// Fastest particle speed (0 for an empty shape)
    pub fn max_speed(&self) -> f64 {
        self.particles.iter().map(Particle::speed).fold(0.0, f64::max)
    }

    /// Quarter turn about the centroid, carrying each particle's velocity along
    pub fn rotate(&mut self) {
        let Some(center) = self.centroid() else {
            return;
        };
        for p in &mut self.particles {
            let new_pos = rotate_about(p.pos, center, FRAC_PI_2);
            let rot_vel = rotate_about(p.velocity(), Vec2::ZERO, FRAC_PI_2);
            p.pos = new_pos;
            p.old_pos = new_pos - rot_vel;
        }
    }

    /// Rigid shift of both positions; velocity is untouched
    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.particles {
            p.pos += delta;
            p.old_pos += delta;
        }
    }

    /// Shift current positions only, which Verlet reads as a velocity kick
    pub fn nudge(&mut self, delta: Vec2) {
        for p in &mut self.particles {
            p.pos += delta;
        }
    }

    /// Remove the particles flagged in `doomed` and every stick touching them.
    ///
    /// Surviving sticks are re-indexed to the compacted arena. Returns the
    /// number of particles removed.
    pub fn remove_particles(&mut self, doomed: &[bool]) -> usize {
        let mut remap = Vec::with_capacity(self.particles.len());
        let mut next = 0;
        for i in 0..self.particles.len() {
            if doomed.get(i).copied().unwrap_or(false) {
                remap.push(None);
            } else {
                remap.push(Some(next));
                next += 1;
            }
        }
        let removed = self.particles.len() - next;
        if removed == 0 {
            return 0;
        }

        self.sticks.retain_mut(|s| match (remap[s.a], remap[s.b]) {
            (Some(a), Some(b)) => {
                s.a = a;
                s.b = b;
                true
            }
            _ => false,
        });
        let mut i = 0;
        self.particles.retain(|_| {
            let keep = remap[i].is_some();
            i += 1;
            keep
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::default()
    }

    fn assert_unique_sticks(shape: &Shape) {
        let mut seen = HashSet::new();
        for s in &shape.sticks {
            assert_ne!(s.a, s.b);
            assert!(seen.insert((s.a.min(s.b), s.a.max(s.b))), "duplicate stick {:?}", s);
        }
    }

    #[test]
    fn test_single_cell_lattice() {
        let shape = Shape::assemble(1, ShapeKind::O, &[(0, 0)], Vec2::ZERO, &settings());
        assert_eq!(shape.particles.len(), 4);
        assert_eq!(shape.sticks.len(), 6);
        assert_unique_sticks(&shape);

        let cross: Vec<_> = shape.sticks.iter().filter(|s| s.stiffness < 0.4).collect();
        assert_eq!(cross.len(), 2);
        for s in cross {
            assert_eq!(s.stiffness, 0.2);
            assert!((s.rest_length - 35.0 * 2f64.sqrt()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_o_shares_corners_and_edges() {
        let shape = Shape::spawn(1, ShapeKind::O, Vec2::ZERO, &settings());
        assert_eq!(shape.particles.len(), 9);
        assert_eq!(shape.sticks.len(), 20);
        assert_unique_sticks(&shape);
    }

    #[test]
    fn test_i_has_ten_particles() {
        let shape = Shape::spawn(1, ShapeKind::I, Vec2::new(100.0, -70.0), &settings());
        assert_eq!(shape.particles.len(), 10);
        assert_eq!(shape.sticks.len(), 21);
        assert_unique_sticks(&shape);
        assert_eq!(shape.particles[0].pos, Vec2::new(100.0, -70.0));
        assert_eq!(shape.lowest_y(), Some(-70.0 + 4.0 * 35.0));
    }

    #[test]
    fn test_every_kind_assembles_connected_lattice() {
        for kind in ShapeKind::ALL {
            let shape = Shape::spawn(1, kind, Vec2::ZERO, &settings());
            assert!(shape.particles.len() >= 8, "{kind:?}");
            assert_unique_sticks(&shape);
            for (i, _) in shape.particles.iter().enumerate() {
                assert!(
                    shape.sticks.iter().any(|s| s.touches(i)),
                    "{kind:?} particle {i} unlinked"
                );
            }
            assert_eq!(shape.max_speed(), 0.0);
        }
    }

    #[test]
    fn test_colors_from_kind() {
        assert_eq!(ShapeKind::I.rgb(), 0x00f0f0);
        assert_eq!(ShapeKind::Z.color(), [240.0 / 255.0, 0.0, 0.0, 1.0]);
        assert_eq!(ShapeKind::L.letter(), 'L');
    }

    #[test]
    fn test_four_rotations_restore_positions_and_velocity() {
        let mut shape = Shape::spawn(1, ShapeKind::L, Vec2::new(120.0, 40.0), &settings());
        for (i, p) in shape.particles.iter_mut().enumerate() {
            p.old_pos = p.pos - Vec2::new(0.5 + i as f64 * 0.1, -1.25);
        }
        let before = shape.particles.clone();

        for _ in 0..4 {
            shape.rotate();
        }

        for (p, q) in shape.particles.iter().zip(&before) {
            assert!((p.pos - q.pos).length() < 1e-6);
            assert!((p.velocity() - q.velocity()).length() < 1e-6);
        }
    }

    #[test]
    fn test_rotation_turns_velocity_with_shape() {
        let mut shape = Shape::spawn(1, ShapeKind::I, Vec2::new(100.0, 100.0), &settings());
        for p in &mut shape.particles {
            p.old_pos = p.pos - Vec2::new(2.0, 0.0);
        }
        let center = shape.centroid().unwrap();
        shape.rotate();

        assert!((shape.centroid().unwrap() - center).length() < 1e-9);
        for p in &shape.particles {
            assert!((p.velocity() - Vec2::new(0.0, 2.0)).length() < 1e-9);
        }
        // Vertical I is now horizontal
        let ys: Vec<f64> = shape.particles.iter().map(|p| p.pos.y).collect();
        let top = ys.iter().cloned().fold(f64::MAX, f64::min);
        let spread = ys.iter().cloned().fold(f64::MIN, f64::max) - top;
        assert!((spread - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_empty_is_noop() {
        let mut shape = Shape::assemble(1, ShapeKind::O, &[], Vec2::ZERO, &settings());
        assert!(shape.is_empty());
        assert_eq!(shape.centroid(), None);
        shape.rotate();
        assert!(shape.is_empty());
    }

    #[test]
    fn test_extent_and_mean_velocity() {
        let mut shape = Shape::spawn(1, ShapeKind::T, Vec2::new(20.0, 0.0), &settings());
        assert_eq!(shape.x_extent(), Some((20.0, 125.0)));
        assert_eq!(shape.mean_velocity(), Some(Vec2::ZERO));

        shape.nudge(Vec2::new(1.5, -3.0));
        let vel = shape.mean_velocity().unwrap();
        assert!((vel - Vec2::new(1.5, -3.0)).length() < 1e-12);

        let mut empty = shape.clone();
        empty.remove_particles(&vec![true; empty.particles.len()]);
        assert_eq!(empty.x_extent(), None);
        assert_eq!(empty.mean_velocity(), None);
    }

    #[test]
    fn test_translate_preserves_velocity_and_nudge_adds_it() {
        let mut shape = Shape::spawn(1, ShapeKind::T, Vec2::ZERO, &settings());
        shape.translate(Vec2::new(10.0, -5.0));
        assert_eq!(shape.particles[0].pos, Vec2::new(10.0, -5.0));
        assert_eq!(shape.total_speed(), 0.0);

        shape.nudge(Vec2::new(1.5, 0.0));
        for p in &shape.particles {
            assert_eq!(p.velocity(), Vec2::new(1.5, 0.0));
        }
    }

    #[test]
    fn test_remove_particles_reindexes_sticks() {
        // Vertical I: rows of two particles at y = 0, 35, ..., 140
        let mut shape = Shape::spawn(1, ShapeKind::I, Vec2::ZERO, &settings());
        let doomed: Vec<bool> = shape.particles.iter().map(|p| p.pos.y == 140.0).collect();

        assert_eq!(shape.remove_particles(&doomed), 2);
        assert_eq!(shape.particles.len(), 8);
        // The bottom cell loses its bottom edge, both sides and both diagonals
        assert_eq!(shape.sticks.len(), 21 - 5);
        for s in &shape.sticks {
            assert!(s.a < 8 && s.b < 8);
            let len = shape.particles[s.a].pos.distance(shape.particles[s.b].pos);
            assert!((len - s.rest_length).abs() < 1e-9);
        }
        assert_eq!(shape.remove_particles(&[false; 8]), 0);
    }
}
