//! Block-placement puzzle on an 8x8 board

pub mod board;
pub mod game;
pub mod piece;
pub mod save;

pub use board::{Board, Cell, CellState, Layout, Segment, Tile};
pub use game::{PuzzleEvent, PuzzleGame};
pub use piece::Piece;
pub use save::SavedGame;
