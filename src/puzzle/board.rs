//! 8x8 board, cell geometry and line segments
//!
//! Cells live in one arena; rows and columns are index lists into it. Each
//! cell carries its committed state plus a draw state that is rebuilt every
//! tick so hover and pending-clear highlights never leak into game state.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use crate::consts::{BOARD_CELLS, BOARD_FILL};
use crate::render::{Canvas, Colour};

/// Cell state, committed or drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    #[default]
    Empty,
    /// Part of a piece that has not been placed yet
    Piece,
    /// A dragged piece would land here
    #[serde(rename = "pending")]
    Hover,
    Placed,
    /// Segment is about to clear
    Full,
}

impl CellState {
    pub fn fill(&self) -> Option<Colour> {
        match self {
            CellState::Empty => None,
            CellState::Piece => Some(Colour::Green),
            CellState::Hover => Some(Colour::DodgerBlue),
            CellState::Placed => Some(Colour::Blue),
            CellState::Full => Some(Colour::Red),
        }
    }
}

/// Canvas-derived sizes, recomputed on resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub canvas: Vec2,
    pub square_size: f32,
}

impl Layout {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            canvas: Vec2::new(width, height),
            square_size: width.min(height) * BOARD_FILL / BOARD_CELLS as f32,
        }
    }

    /// Top-left of the board: centered horizontally, a fifth of the spare
    /// height from the top
    pub fn board_origin(&self) -> Vec2 {
        let board = self.square_size * BOARD_CELLS as f32;
        Vec2::new((self.canvas.x - board) / 2.0, (self.canvas.y - board) / 5.0)
    }

    /// Cell center lies on or inside the canvas
    pub fn in_bounds(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.canvas.x && p.y >= 0.0 && p.y <= self.canvas.y
    }
}

/// One grid square: a coordinate plus a pixel offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub coord: IVec2,
    pub offset: Vec2,
}

impl Tile {
    pub fn new(coord: IVec2, offset: Vec2) -> Self {
        Self { coord, offset }
    }

    /// Top-left corner
    #[inline]
    pub fn origin(&self, size: f32) -> Vec2 {
        self.coord.as_vec2() * size + self.offset
    }

    #[inline]
    pub fn center(&self, size: f32) -> Vec2 {
        self.origin(size) + Vec2::splat(size / 2.0)
    }

    /// Strictly inside
    pub fn contains(&self, p: Vec2, size: f32) -> bool {
        let min = self.origin(size);
        p.x > min.x && p.x < min.x + size && p.y > min.y && p.y < min.y + size
    }

    /// Own center lies inside `other`
    pub fn overlaps(&self, other: &Tile, size: f32) -> bool {
        other.contains(self.center(size), size)
    }

    /// Any own corner lies strictly inside `other`
    pub fn touches(&self, other: &Tile, size: f32) -> bool {
        let min = self.origin(size);
        [
            min,
            min + Vec2::new(size, 0.0),
            min + Vec2::new(0.0, size),
            min + Vec2::splat(size),
        ]
        .into_iter()
        .any(|corner| other.contains(corner, size))
    }

    pub fn draw(&self, canvas: &mut impl Canvas, size: f32, state: CellState) {
        let min = self.origin(size);
        canvas.stroke_rect(min, Vec2::splat(size), 1.0);
        if let Some(colour) = state.fill() {
            canvas.fill_rect(min, Vec2::splat(size), colour);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub tile: Tile,
    pub state: CellState,
    pub draw_state: CellState,
}

/// A row or column: indices into the board's cell arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub cells: [usize; BOARD_CELLS],
}

impl Segment {
    /// Every cell committed as placed
    pub fn is_full(&self, cells: &[Cell]) -> bool {
        self.cells.iter().all(|&i| cells[i].state == CellState::Placed)
    }

    /// Every cell placed or highlighted; previews a clear before release
    pub fn is_pending_full(&self, cells: &[Cell]) -> bool {
        self.cells.iter().all(|&i| {
            let cell = &cells[i];
            cell.state == CellState::Placed
                || cell.draw_state == CellState::Hover
                || cell.draw_state == CellState::Full
        })
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    /// Column-major: index = x * BOARD_CELLS + y
    cells: Vec<Cell>,
    rows: Vec<Segment>,
    columns: Vec<Segment>,
}

impl Board {
    pub fn new(layout: &Layout) -> Self {
        let n = BOARD_CELLS;
        let origin = layout.board_origin();

        let mut cells = Vec::with_capacity(n * n);
        for x in 0..n {
            for y in 0..n {
                cells.push(Cell {
                    tile: Tile::new(IVec2::new(x as i32, y as i32), origin),
                    state: CellState::Empty,
                    draw_state: CellState::Empty,
                });
            }
        }

        let rows = (0..n)
            .map(|y| Segment {
                cells: std::array::from_fn(|x| Self::index(x, y)),
            })
            .collect();
        let columns = (0..n)
            .map(|x| Segment {
                cells: std::array::from_fn(|y| Self::index(x, y)),
            })
            .collect();

        Self {
            cells,
            rows,
            columns,
        }
    }

    #[inline]
    pub fn index(x: usize, y: usize) -> usize {
        x * BOARD_CELLS + y
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        &self.cells[Self::index(x, y)]
    }

    pub fn cell_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        &mut self.cells[Self::index(x, y)]
    }

    pub fn cell_at_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }

    /// Rows first, then columns
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.rows.iter().chain(self.columns.iter())
    }

    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells.iter().map(|c| c.tile)
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }

    /// Move every cell to the layout's board origin
    pub fn align(&mut self, layout: &Layout) {
        let origin = layout.board_origin();
        for cell in &mut self.cells {
            cell.tile.offset = origin;
        }
    }

    /// Board cells under each piece square, in piece order. `None` if any
    /// square misses the board or lands on a placed cell.
    pub fn empty_cells_under(&self, piece: &Piece, size: f32) -> Option<Vec<usize>> {
        piece
            .tiles()
            .map(|square| {
                let index = self
                    .cells
                    .iter()
                    .position(|cell| square.overlaps(&cell.tile, size))?;
                (self.cells[index].state != CellState::Placed).then_some(index)
            })
            .collect()
    }

    /// Draw state mirrors committed state
    pub fn reset_draw_states(&mut self) {
        for cell in &mut self.cells {
            cell.draw_state = cell.state;
        }
    }

    /// Commit cells as placed
    pub fn place(&mut self, indices: &[usize]) {
        for &i in indices {
            self.cells[i].state = CellState::Placed;
        }
    }

    pub fn mark_hover(&mut self, indices: &[usize]) {
        for &i in indices {
            self.cells[i].draw_state = CellState::Hover;
        }
    }

    /// Highlight every segment that would be full after the hovered drops
    pub fn highlight_pending_segments(&mut self) {
        for segment in self.rows.iter().chain(self.columns.iter()) {
            if segment.is_pending_full(&self.cells) {
                for &i in &segment.cells {
                    self.cells[i].draw_state = CellState::Full;
                }
            }
        }
    }

    /// Empty every full segment. All full segments are found before any is
    /// cleared, so a crossing row and column both count. Returns how many
    /// were cleared.
    pub fn clear_full_segments(&mut self) -> u32 {
        let full: Vec<[usize; BOARD_CELLS]> = self
            .segments()
            .filter(|s| s.is_full(&self.cells))
            .map(|s| s.cells)
            .collect();

        for segment in &full {
            for &i in segment {
                self.cells[i].state = CellState::Empty;
            }
        }
        full.len() as u32
    }

    pub fn draw(&self, canvas: &mut impl Canvas, size: f32) {
        for cell in &self.cells {
            cell.tile.draw(canvas, size, cell.draw_state);
        }
    }
}
