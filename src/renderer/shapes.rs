//! Geometry generation for jelly shapes

use super::vertex::{Vertex, colors};
use crate::Vec2;
use crate::sim::Shape;

/// Radius of the dot drawn at each particle
pub const PARTICLE_DOT_RADIUS: f32 = 2.0;

#[inline]
fn vertex(p: Vec2, color: [f32; 4]) -> Vertex {
    let p = p.as_vec2();
    Vertex::new(p.x, p.y, color)
}

/// Line list: two vertices per stick, in the shape's color
pub fn stick_lines(shape: &Shape) -> Vec<Vertex> {
    let color = shape.color();
    let mut vertices = Vec::with_capacity(shape.sticks.len() * 2);
    for stick in &shape.sticks {
        let (Some(a), Some(b)) = (shape.particles.get(stick.a), shape.particles.get(stick.b)) else {
            continue;
        };
        vertices.push(vertex(a.pos, color));
        vertices.push(vertex(b.pos, color));
    }
    vertices
}

/// Triangle list: one quad (two triangles) per particle dot
pub fn particle_dots(shape: &Shape, radius: f32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(shape.particles.len() * 6);
    for p in &shape.particles {
        let c = p.pos.as_vec2();
        let (x0, x1) = (c.x - radius, c.x + radius);
        let (y0, y1) = (c.y - radius, c.y + radius);

        vertices.push(Vertex::new(x0, y0, colors::PARTICLE));
        vertices.push(Vertex::new(x1, y0, colors::PARTICLE));
        vertices.push(Vertex::new(x1, y1, colors::PARTICLE));

        vertices.push(Vertex::new(x0, y0, colors::PARTICLE));
        vertices.push(Vertex::new(x1, y1, colors::PARTICLE));
        vertices.push(Vertex::new(x0, y1, colors::PARTICLE));
    }
    vertices
}

/// Line list outlining the well: left wall, floor, right wall
pub fn well_outline(width: f32, height: f32) -> Vec<Vertex> {
    let c = colors::WELL_WALL;
    vec![
        Vertex::new(0.0, 0.0, c),
        Vertex::new(0.0, height, c),
        Vertex::new(0.0, height, c),
        Vertex::new(width, height, c),
        Vertex::new(width, height, c),
        Vertex::new(width, 0.0, c),
    ]
}
