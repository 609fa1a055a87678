//! Saved puzzle document
//!
//! JSON shape: `{ board: { squares: [{ state }] }, pieces: [{ coords: [{x, y}],
//! dx, dy }], score }`. Only committed cell states are stored.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::board::{Board, CellState};
use super::piece::Piece;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub board: SavedBoard,
    pub pieces: Vec<SavedPiece>,
    #[serde(default)]
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBoard {
    pub squares: Vec<SavedSquare>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedSquare {
    pub state: CellState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCoord {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPiece {
    pub coords: Vec<SavedCoord>,
    #[serde(default)]
    pub dx: f32,
    #[serde(default)]
    pub dy: f32,
}

impl SavedGame {
    pub fn capture(board: &Board, pieces: &[Piece], score: u64) -> Self {
        Self {
            board: SavedBoard {
                squares: board
                    .cells()
                    .iter()
                    .map(|c| SavedSquare { state: c.state })
                    .collect(),
            },
            pieces: pieces.iter().map(SavedPiece::from).collect(),
            score,
        }
    }

    /// Copy stored states onto `board`; extra or missing squares are ignored
    pub fn restore_board(&self, board: &mut Board) {
        for (index, square) in self.board.squares.iter().enumerate() {
            if let Some(cell) = board.cell_at_mut(index) {
                cell.state = square.state;
                cell.draw_state = square.state;
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl From<&Piece> for SavedPiece {
    fn from(piece: &Piece) -> Self {
        Self {
            coords: piece
                .coords
                .iter()
                .map(|c| SavedCoord { x: c.x, y: c.y })
                .collect(),
            dx: piece.offset.x,
            dy: piece.offset.y,
        }
    }
}

impl SavedPiece {
    pub fn to_piece(&self, id: u32) -> Piece {
        let mut piece = Piece::new(id, self.coords.iter().map(|c| IVec2::new(c.x, c.y)).collect());
        piece.move_to(Vec2::new(self.dx, self.dy));
        piece
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::board::Layout;

    #[test]
    fn test_json_shape() {
        let board = Board::new(&Layout::new(800.0, 800.0));
        let mut piece = Piece::new(4, vec![IVec2::ZERO, IVec2::new(1, 0)]);
        piece.move_to(Vec2::new(10.0, 20.0));

        let json = SavedGame::capture(&board, &[piece], 3).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["score"], 3);
        assert_eq!(value["board"]["squares"].as_array().unwrap().len(), 64);
        assert_eq!(value["board"]["squares"][0]["state"], "empty");
        assert_eq!(value["pieces"][0]["coords"][1]["x"], 1);
        assert_eq!(value["pieces"][0]["dx"], 10.0);
    }

    #[test]
    fn test_restore_ignores_short_boards() {
        let mut board = Board::new(&Layout::new(800.0, 800.0));
        let saved = SavedGame {
            board: SavedBoard {
                squares: vec![SavedSquare {
                    state: CellState::Placed,
                }],
            },
            pieces: vec![],
            score: 0,
        };
        saved.restore_board(&mut board);
        assert_eq!(board.cell(0, 0).state, CellState::Placed);
        assert_eq!(board.count(CellState::Placed), 1);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(SavedGame::from_json("{\"board\": 5}").is_err());
        assert!(SavedGame::from_json("").is_err());
    }
}
