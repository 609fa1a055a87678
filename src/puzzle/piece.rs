//! Polyomino pieces and their random generation

use glam::{IVec2, Vec2};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::board::{CellState, Layout, Tile};
use crate::render::Canvas;

/// Keep new pieces away from the outer tenth of the canvas
const SPAWN_MARGIN: f32 = 0.9;

const CARDINALS: [IVec2; 4] = [IVec2::X, IVec2::Y, IVec2::NEG_X, IVec2::NEG_Y];

/// A pending piece: grid offsets plus a free pixel offset
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub id: u32,
    pub coords: Vec<IVec2>,
    pub offset: Vec2,
}

impl Piece {
    pub fn new(id: u32, coords: Vec<IVec2>) -> Self {
        Self {
            id,
            coords,
            offset: Vec2::ZERO,
        }
    }

    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.coords.iter().map(|&c| Tile::new(c, self.offset))
    }

    pub fn contains(&self, p: Vec2, size: f32) -> bool {
        self.tiles().any(|t| t.contains(p, size))
    }

    pub fn move_to(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Jump somewhere inside the central 80% of the canvas
    pub fn move_random(&mut self, rng: &mut impl Rng, layout: &Layout) {
        let w = layout.canvas.x;
        let h = layout.canvas.y;
        let x = between(rng, w * SPAWN_MARGIN, w * (1.0 - SPAWN_MARGIN));
        let y = between(rng, h * SPAWN_MARGIN, h * (1.0 - SPAWN_MARGIN));
        self.move_to(Vec2::new(x, y));
    }

    /// Any square touches an obstacle or has its center off the canvas
    pub fn blocked_by(&self, obstacles: &[Tile], layout: &Layout) -> bool {
        let size = layout.square_size;
        self.tiles().any(|square| {
            !layout.in_bounds(square.center(size))
                || obstacles.iter().any(|other| square.touches(other, size))
        })
    }

    pub fn draw(&self, canvas: &mut impl Canvas, size: f32) {
        for tile in self.tiles() {
            tile.draw(canvas, size, CellState::Piece);
        }
    }
}

/// Uniform in [min, max) without requiring min < max
pub fn between(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Larger pieces become likelier as the score grows
pub fn size_for_score(rng: &mut impl Rng, score: u64) -> usize {
    let chance = between(rng, 0.0, score as f32 + 30.0);
    if chance < 5.0 {
        3
    } else if chance < 30.0 {
        4
    } else if chance < 50.0 {
        5
    } else {
        6
    }
}

/// Grow a connected shape from the origin one random neighbour at a time
pub fn generate_coords(rng: &mut impl Rng, count: usize) -> Vec<IVec2> {
    let mut coords = vec![IVec2::ZERO];
    while coords.len() < count {
        let (Some(&from), Some(&step)) = (coords.choose(rng), CARDINALS.choose(rng)) else {
            break;
        };
        let next = from + step;
        if !coords.contains(&next) {
            coords.push(next);
        }
    }
    coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn connected(coords: &[IVec2]) -> bool {
        let set: HashSet<IVec2> = coords.iter().copied().collect();
        let mut seen = HashSet::from([IVec2::ZERO]);
        let mut stack = vec![IVec2::ZERO];
        while let Some(c) = stack.pop() {
            for step in CARDINALS {
                let n = c + step;
                if set.contains(&n) && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen.len() == set.len()
    }

    #[test]
    fn test_size_for_score_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        for score in [0, 10, 100, 10_000] {
            for _ in 0..200 {
                let n = size_for_score(&mut rng, score);
                assert!((3..=6).contains(&n));
            }
        }
    }

    #[test]
    fn test_low_score_never_gives_six() {
        // chance < 30 at score 0
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..500 {
            assert!(size_for_score(&mut rng, 0) <= 4);
        }
    }

    #[test]
    fn test_move_random_stays_in_central_band() {
        let mut rng = Pcg32::seed_from_u64(1);
        let layout = Layout::new(1000.0, 500.0);
        let mut piece = Piece::new(1, vec![IVec2::ZERO]);
        for _ in 0..100 {
            piece.move_random(&mut rng, &layout);
            assert!(piece.offset.x >= 100.0 && piece.offset.x <= 900.0);
            assert!(piece.offset.y >= 50.0 && piece.offset.y <= 450.0);
        }
    }

    #[test]
    fn test_contains_and_tiles() {
        let mut piece = Piece::new(1, vec![IVec2::ZERO, IVec2::new(0, 1)]);
        piece.move_to(Vec2::new(100.0, 100.0));
        assert!(piece.contains(Vec2::new(105.0, 125.0), 20.0));
        assert!(!piece.contains(Vec2::new(125.0, 105.0), 20.0));
        assert_eq!(piece.tiles().count(), 2);
    }

    #[test]
    fn test_blocked_by_bounds_and_obstacles() {
        let layout = Layout::new(400.0, 400.0);
        let size = layout.square_size;
        let mut piece = Piece::new(1, vec![IVec2::ZERO]);

        piece.move_to(Vec2::new(10.0, 10.0));
        assert!(!piece.blocked_by(&[], &layout));

        piece.move_to(Vec2::new(-size, 10.0));
        assert!(piece.blocked_by(&[], &layout));

        piece.move_to(Vec2::new(10.0, 10.0));
        let obstacle = Tile::new(IVec2::ZERO, Vec2::new(20.0, 20.0));
        assert!(piece.blocked_by(&[obstacle], &layout));
    }

    proptest! {
        #[test]
        fn prop_generated_shape_is_exact_unique_and_connected(
            seed in any::<u64>(),
            count in 1usize..=8,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let coords = generate_coords(&mut rng, count);
            prop_assert_eq!(coords.len(), count);
            let unique: HashSet<_> = coords.iter().collect();
            prop_assert_eq!(unique.len(), count);
            prop_assert_eq!(coords[0], IVec2::ZERO);
            prop_assert!(connected(&coords));
        }
    }
}
