//! Text rendering of the board, one character per cell

use std::fmt;

use super::RenderSink;
use crate::sim::Shape;

const EMPTY: char = '.';

/// Rasterises particles onto a cols x rows character grid.
///
/// A cell shows the kind letter of the last shape with a particle inside it;
/// particles above the board are not drawn.
#[derive(Debug, Clone)]
pub struct AsciiCanvas {
    cols: usize,
    rows: usize,
    cell_w: f64,
    cell_h: f64,
    cells: Vec<char>,
}

impl AsciiCanvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cell_w: 1.0,
            cell_h: 1.0,
            cells: vec![EMPTY; cols * rows],
        }
    }

    /// Character at (col, row), row 0 at the top
    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    /// Number of non-empty cells in `row`
    pub fn filled_in_row(&self, row: usize) -> usize {
        (0..self.cols)
            .filter(|&c| self.get(c, row).is_some_and(|ch| ch != EMPTY))
            .count()
    }
}

impl RenderSink for AsciiCanvas {
    fn begin_frame(&mut self, width: f64, height: f64) {
        self.cells.fill(EMPTY);
        self.cell_w = width / self.cols.max(1) as f64;
        self.cell_h = height / self.rows.max(1) as f64;
    }

    fn draw_shape(&mut self, shape: &Shape) {
        let letter = shape.kind.letter();
        for p in &shape.particles {
            if p.pos.x < 0.0 || p.pos.y < 0.0 {
                continue;
            }
            let col = (p.pos.x / self.cell_w) as usize;
            let row = (p.pos.y / self.cell_h) as usize;
            if col < self.cols && row < self.rows {
                self.cells[row * self.cols + col] = letter;
            }
        }
    }
}

impl fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            let line: String = row.iter().collect();
            writeln!(f, "|{line}|")?;
        }
        write!(f, "+{}+", "-".repeat(self.cols))
    }
}
