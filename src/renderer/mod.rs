//! Presentation adapters
//!
//! The simulation never draws. A frontend implements `RenderSink` and is
//! handed every shape once per frame by `render`.

pub mod ascii;
pub mod shapes;
pub mod vertex;

pub use ascii::AsciiCanvas;
pub use vertex::Vertex;

use crate::sim::{GameState, Shape};

/// Receives one frame of board geometry
pub trait RenderSink {
    /// Start a frame for a board of `width` x `height` units
    fn begin_frame(&mut self, width: f64, height: f64);
    fn draw_shape(&mut self, shape: &Shape);
    fn end_frame(&mut self) {}
}

/// Draw every shape (in id order) into `sink`
pub fn render<S: RenderSink + ?Sized>(state: &GameState, sink: &mut S) {
    sink.begin_frame(state.width(), state.height());
    for shape in &state.shapes {
        sink.draw_shape(shape);
    }
    sink.end_frame();
}

/// CPU-side vertex buffers ready for upload to a GPU backend
#[derive(Debug, Default, Clone)]
pub struct VertexBatch {
    /// Line list: well outline and sticks
    pub lines: Vec<Vertex>,
    /// Triangle list: particle dots
    pub triangles: Vec<Vertex>,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes of the line buffer
    pub fn line_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lines)
    }

    /// Raw bytes of the triangle buffer
    pub fn triangle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}

impl RenderSink for VertexBatch {
    fn begin_frame(&mut self, width: f64, height: f64) {
        self.lines.clear();
        self.triangles.clear();
        self.lines
            .extend(shapes::well_outline(width as f32, height as f32));
    }

    fn draw_shape(&mut self, shape: &Shape) {
        self.lines.extend(shapes::stick_lines(shape));
        self.triangles
            .extend(shapes::particle_dots(shape, shapes::PARTICLE_DOT_RADIUS));
    }
}
