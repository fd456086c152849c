#![forbid(unsafe_code)]

//! Character-cell rasterizer.
//!
//! [`Grid::render`] walks a surface depth-first from the root and paints
//! each attached node at its rounded position: text nodes write their text
//! left to right, particles write a single dot whose weight follows
//! `opacity * scale`. Later nodes paint over earlier ones.
//!
//! Each grapheme keeps only its base character; wide graphemes occupy two
//! cells.

use std::fmt;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::surface::{NodeId, NodeKind, Surface};

/// Below this opacity a node is not drawn.
const MIN_VISIBLE: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Glyph(char),
    /// Right half of a wide glyph.
    Continuation,
}

/// A fixed-size grid of character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    /// Blank grid.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width as usize * height as usize],
        }
    }

    /// Rasterize `surface` into a fresh grid.
    #[must_use]
    pub fn render(surface: &dyn Surface, width: u16, height: u16) -> Self {
        let mut grid = Self::new(width, height);
        grid.paint(surface);
        grid
    }

    /// Clear and repaint from `surface`.
    pub fn paint(&mut self, surface: &dyn Surface) {
        self.cells.fill(Cell::Empty);
        let mut stack: Vec<NodeId> = vec![surface.root()];
        while let Some(node) = stack.pop() {
            self.paint_node(surface, node);
            let mut children = surface.children(node);
            children.reverse();
            stack.extend(children);
        }
    }

    fn paint_node(&mut self, surface: &dyn Surface, node: NodeId) {
        let (Some(kind), Some(style)) = (surface.kind(node), surface.style(node)) else {
            return;
        };
        if style.opacity < MIN_VISIBLE {
            return;
        }
        let (x, y) = style.position();
        let (col, row) = (x.round() as i32, y.round() as i32);
        match kind {
            NodeKind::Container => {}
            NodeKind::Text => {
                let Some(text) = surface.text(node) else {
                    return;
                };
                let mut col = col;
                for grapheme in text.graphemes(true) {
                    let width = grapheme.width().max(1) as i32;
                    if let Some(ch) = grapheme.chars().next() {
                        self.put(col, row, Cell::Glyph(ch));
                        if width == 2 {
                            self.put(col + 1, row, Cell::Continuation);
                        }
                    }
                    col += width;
                }
            }
            NodeKind::Particle => {
                let weight = style.opacity * style.scale;
                self.put(col, row, Cell::Glyph(particle_glyph(weight)));
            }
        }
    }

    fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return;
        }
        let idx = row as usize * self.width as usize + col as usize;
        self.cells[idx] = cell;
    }

    /// Width in cells.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in cells.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Character at `(col, row)`; `' '` for blank or continuation cells.
    #[must_use]
    pub fn char_at(&self, col: u16, row: u16) -> Option<char> {
        if col >= self.width || row >= self.height {
            return None;
        }
        match self.cells[row as usize * self.width as usize + col as usize] {
            Cell::Glyph(ch) => Some(ch),
            Cell::Empty | Cell::Continuation => Some(' '),
        }
    }

    /// One row as a string, trailing blanks trimmed.
    #[must_use]
    pub fn row(&self, row: u16) -> String {
        if row >= self.height {
            return String::new();
        }
        let start = row as usize * self.width as usize;
        let mut line: String = self.cells[start..start + self.width as usize]
            .iter()
            .filter_map(|cell| match cell {
                Cell::Empty => Some(' '),
                Cell::Glyph(ch) => Some(*ch),
                Cell::Continuation => None,
            })
            .collect();
        line.truncate(line.trim_end().len());
        line
    }

    /// Every row, top to bottom.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.height).map(|r| self.row(r)).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self.lines();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

fn particle_glyph(weight: f32) -> char {
    if weight > 0.66 {
        '●'
    } else if weight > 0.33 {
        '•'
    } else {
        '·'
    }
}
