//! Block-placement puzzle: drag pieces onto the board, clear full lines
//!
//! The game never fails. Invalid drops leave the piece where it was
//! released, a piece that cannot be repositioned stays put, and a missing or
//! corrupt save starts a fresh game.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::board::{Board, Layout, Tile};
use super::piece::{Piece, generate_coords, size_for_score};
use super::save::SavedGame;
use crate::consts::{MAX_PLACEMENT_ATTEMPTS, PIECE_COUNT};
use crate::input::{InputEvent, InputKind};
use crate::persistence::{KeyValueStore, Storage};
use crate::render::Canvas;

/// Storage namespace for this game
pub const STORAGE_NAMESPACE: &str = "tetrish";
pub const GAME_STATE_KEY: &str = "gamestate";
pub const HIGH_SCORE_KEY: &str = "highscore";

/// Notifications for the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleEvent {
    /// Values for the `score` and `highscore` labels
    ScoreChanged { score: u64, high_score: u64 },
    SegmentsCleared(u32),
    PiecePlaced { id: u32 },
    /// Board or pieces changed in a way worth saving
    StateChanged,
}

/// An in-progress drag
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOperation {
    piece_id: u32,
    drag_start: Vec2,
    piece_start: Vec2,
}

#[derive(Debug, Clone)]
pub struct PuzzleGame {
    layout: Layout,
    pub board: Board,
    /// Pending pieces, oldest first
    pub pieces: Vec<Piece>,
    pub score: u64,
    pub high_score: u64,
    drag: Option<DragOperation>,
    rng: Pcg32,
    events: Vec<PuzzleEvent>,
    next_piece_id: u32,
}

impl PuzzleGame {
    /// Fresh game with a full hand of pieces
    pub fn new(layout: Layout, seed: u64) -> Self {
        let mut game = Self::with_pieces(layout, seed, Vec::new());
        game.deal();
        game.update_scores();
        game
    }

    /// Empty board with exactly `pieces`, positioned as given
    pub fn with_pieces(layout: Layout, seed: u64, pieces: Vec<Piece>) -> Self {
        let next_piece_id = pieces
            .iter()
            .map(|p| p.id.saturating_add(1))
            .max()
            .unwrap_or(1);
        Self {
            board: Board::new(&layout),
            layout,
            pieces,
            score: 0,
            high_score: 0,
            drag: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_piece_id,
        }
    }

    /// Rebuild a game from a saved document
    pub fn from_saved(layout: Layout, seed: u64, saved: &SavedGame) -> Self {
        let mut game = Self::with_pieces(layout, seed, Vec::new());
        saved.restore_board(&mut game.board);
        game.score = saved.score;
        for stored in &saved.pieces {
            let id = game.next_id();
            game.pieces.push(stored.to_piece(id));
        }

        if game.pieces.is_empty() {
            game.deal();
        } else {
            game.adjust_piece_placement();
        }
        game.update_scores();
        game
    }

    /// Load the saved game and high score, falling back to a fresh game
    pub fn load<S: KeyValueStore>(layout: Layout, seed: u64, storage: &Storage<S>) -> Self {
        let high_score = storage.read_numeric(HIGH_SCORE_KEY, 0.0).max(0.0) as u64;
        let json = storage.read(GAME_STATE_KEY, "");

        let mut game = if json.is_empty() {
            log::info!("No saved puzzle, starting fresh");
            Self::new(layout, seed)
        } else {
            match SavedGame::from_json(&json) {
                Ok(saved) => {
                    log::info!("Loaded puzzle with score {}", saved.score);
                    Self::from_saved(layout, seed, &saved)
                }
                Err(e) => {
                    log::warn!("Discarding unreadable puzzle save: {}", e);
                    Self::new(layout, seed)
                }
            }
        };

        game.high_score = game.high_score.max(high_score);
        game.update_scores();
        game
    }

    /// Write the game state and high score
    pub fn save<S: KeyValueStore>(&self, storage: &mut Storage<S>) {
        match self.to_saved().to_json() {
            Ok(json) => storage.store(GAME_STATE_KEY, &json),
            Err(e) => log::warn!("Failed to serialize puzzle: {}", e),
        }
        storage.store(HIGH_SCORE_KEY, &self.high_score.to_string());
    }

    pub fn to_saved(&self) -> SavedGame {
        SavedGame::capture(&self.board, &self.pieces, self.score)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Take queued notifications, oldest first
    pub fn take_events(&mut self) -> Vec<PuzzleEvent> {
        std::mem::take(&mut self.events)
    }

    /// New board, zero score, new pieces
    pub fn restart(&mut self) {
        self.board = Board::new(&self.layout);
        self.score = 0;
        self.pieces.clear();
        self.drag = None;
        self.deal();

        self.update_scores();
        self.events.push(PuzzleEvent::StateChanged);
        log::info!("Puzzle restarted");
    }

    /// One logic tick: rebuild highlights, then clear full lines
    pub fn tick(&mut self) {
        let size = self.layout.square_size;
        self.board.reset_draw_states();

        for piece in &self.pieces {
            if let Some(cells) = self.board.empty_cells_under(piece, size) {
                self.board.mark_hover(&cells);
            }
        }

        self.board.highlight_pending_segments();

        let cleared = self.board.clear_full_segments();
        if cleared > 0 {
            self.score += cleared as u64;
            log::debug!("Cleared {} segments, score {}", cleared, self.score);
            self.events.push(PuzzleEvent::SegmentsCleared(cleared));
            self.update_scores();
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        let size = self.layout.square_size;
        self.board.draw(canvas, size);
        for piece in &self.pieces {
            piece.draw(canvas, size);
        }
    }

    /// Route a pointer event to the drag handlers
    pub fn handle_input(&mut self, event: &InputEvent) {
        match event.kind {
            InputKind::Start => {
                self.start_drag(event.pos);
            }
            InputKind::Move => self.continue_drag(event.pos),
            InputKind::End => {
                self.end_drag();
            }
        }
    }

    /// Pick up the first piece under `pos`
    pub fn start_drag(&mut self, pos: Vec2) -> bool {
        let size = self.layout.square_size;
        let Some(piece) = self.pieces.iter().find(|p| p.contains(pos, size)) else {
            return false;
        };
        self.drag = Some(DragOperation {
            piece_id: piece.id,
            drag_start: pos,
            piece_start: piece.offset,
        });
        true
    }

    pub fn continue_drag(&mut self, pos: Vec2) {
        let Some(drag) = self.drag else {
            return;
        };
        if let Some(piece) = self.pieces.iter_mut().find(|p| p.id == drag.piece_id) {
            piece.move_to(drag.piece_start + (pos - drag.drag_start));
        }
    }

    /// Drop the dragged piece. Returns true if it was placed.
    pub fn end_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        let Some(index) = self.pieces.iter().position(|p| p.id == drag.piece_id) else {
            return false;
        };
        let Some(cells) = self
            .board
            .empty_cells_under(&self.pieces[index], self.layout.square_size)
        else {
            return false;
        };

        self.board.place(&cells);
        let piece = self.pieces.remove(index);
        self.events.push(PuzzleEvent::PiecePlaced { id: piece.id });

        self.add_random_piece();
        self.adjust_piece_placement();
        self.events.push(PuzzleEvent::StateChanged);
        true
    }

    /// Canvas changed size: rescale the board and keep pieces on screen
    pub fn resize(&mut self, layout: Layout) {
        self.layout = layout;
        self.board.align(&self.layout);
        self.adjust_piece_placement();
    }

    /// Append a random piece sized by the current score
    pub fn add_random_piece(&mut self) {
        let count = size_for_score(&mut self.rng, self.score);
        let coords = generate_coords(&mut self.rng, count);
        let id = self.next_id();
        let mut piece = Piece::new(id, coords);
        piece.move_random(&mut self.rng, &self.layout);
        self.pieces.push(piece);
    }

    /// Move pieces that touch the board, each other, or the canvas edge.
    /// Newest pieces move first. Returns how many are still blocked.
    pub fn adjust_piece_placement(&mut self) -> usize {
        let mut stuck = 0;
        for i in (0..self.pieces.len()).rev() {
            let obstacles: Vec<Tile> = self
                .board
                .tiles()
                .chain(
                    self.pieces
                        .iter()
                        .enumerate()
                        .filter(|&(j, _)| j != i)
                        .flat_map(|(_, p)| p.tiles()),
                )
                .collect();

            if !self.pieces[i].blocked_by(&obstacles, &self.layout) {
                continue;
            }

            let mut placed = false;
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                self.pieces[i].move_random(&mut self.rng, &self.layout);
                if !self.pieces[i].blocked_by(&obstacles, &self.layout) {
                    placed = true;
                    break;
                }
            }

            if !placed {
                log::debug!(
                    "Piece {} still blocked after {} attempts",
                    self.pieces[i].id,
                    MAX_PLACEMENT_ATTEMPTS
                );
                stuck += 1;
            }
        }
        stuck
    }

    fn deal(&mut self) {
        for _ in 0..PIECE_COUNT {
            self.add_random_piece();
        }
        self.adjust_piece_placement();
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_piece_id;
        self.next_piece_id = self.next_piece_id.saturating_add(1);
        id
    }

    fn update_scores(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        self.events.push(PuzzleEvent::ScoreChanged {
            score: self.score,
            high_score: self.high_score,
        });
    }
}
