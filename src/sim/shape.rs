//! Circle and square shapes with pairwise overlap tests
//!
//! A circle's `size` is its radius, a square's `size` is its half-side.
//! Squares are axis-aligned.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::distance;
use crate::render::{Canvas, Colour};

/// Shape variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Circle,
    Square,
}

/// A positioned, coloured shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub center: Vec2,
    pub size: f32,
    pub colour: Colour,
}

impl Shape {
    pub fn new(kind: ShapeKind, center: Vec2, size: f32, colour: Colour) -> Self {
        Self {
            kind,
            center,
            size,
            colour,
        }
    }

    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self::new(ShapeKind::Circle, center, radius, Colour::default())
    }

    pub fn square(center: Vec2, half_side: f32) -> Self {
        Self::new(ShapeKind::Square, center, half_side, Colour::default())
    }

    #[inline]
    pub fn left_edge(&self) -> f32 {
        self.center.x - self.size
    }

    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.center.x + self.size
    }

    #[inline]
    pub fn top_edge(&self) -> f32 {
        self.center.y - self.size
    }

    #[inline]
    pub fn bottom_edge(&self) -> f32 {
        self.center.y + self.size
    }

    pub fn distance_to(&self, other: &Shape) -> f32 {
        distance(self.center, other.center)
    }

    /// Overlap test dispatched on the pair of kinds
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (self.kind, other.kind) {
            (ShapeKind::Circle, ShapeKind::Circle) => circle_overlaps_circle(self, other),
            (ShapeKind::Square, ShapeKind::Square) => square_overlaps_square(self, other),
            (ShapeKind::Square, ShapeKind::Circle) => square_overlaps_circle(self, other),
            (ShapeKind::Circle, ShapeKind::Square) => square_overlaps_circle(other, self),
        }
    }

    /// Draw with `camera` subtracted from the position
    pub fn draw(&self, canvas: &mut impl Canvas, camera: Vec2) {
        let center = self.center - camera;
        match self.kind {
            ShapeKind::Circle => canvas.fill_circle(center, self.size, self.colour),
            ShapeKind::Square => canvas.fill_rect(
                center - Vec2::splat(self.size),
                Vec2::splat(self.size * 2.0),
                self.colour,
            ),
        }
    }
}

/// Sum of radii strictly greater than the center distance
pub fn circle_overlaps_circle(a: &Shape, b: &Shape) -> bool {
    a.size + b.size > a.distance_to(b)
}

/// Boxes strictly intersect on both axes
pub fn square_overlaps_square(a: &Shape, b: &Shape) -> bool {
    a.left_edge() < b.right_edge()
        && a.top_edge() < b.bottom_edge()
        && b.left_edge() < a.right_edge()
        && b.top_edge() < a.bottom_edge()
}

/// Nearest point on the square to the circle center, within half the
/// circle's size.
pub fn square_overlaps_circle(square: &Shape, circle: &Shape) -> bool {
    let nearest = Vec2::new(
        circle.center.x.clamp(square.left_edge(), square.right_edge()),
        circle.center.y.clamp(square.top_edge(), square.bottom_edge()),
    );
    distance(circle.center, nearest) <= circle.size / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_circle_overlap_boundary() {
        let a = Shape::circle(Vec2::ZERO, 10.0);
        let touching = Shape::circle(Vec2::new(14.99, 0.0), 5.0);
        let apart = Shape::circle(Vec2::new(15.01, 0.0), 5.0);
        let exact = Shape::circle(Vec2::new(15.0, 0.0), 5.0);

        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
        // Equality is not an overlap
        assert!(!a.overlaps(&exact));
    }

    #[test]
    fn test_square_overlap_is_strict() {
        let a = Shape::square(Vec2::ZERO, 5.0);
        let sharing_edge = Shape::square(Vec2::new(10.0, 0.0), 5.0);
        let inside = Shape::square(Vec2::new(9.0, 9.0), 5.0);
        let diagonal_corner = Shape::square(Vec2::new(10.0, 10.0), 5.0);

        assert!(!a.overlaps(&sharing_edge));
        assert!(a.overlaps(&inside));
        assert!(!a.overlaps(&diagonal_corner));
    }

    #[test]
    fn test_square_circle_uses_half_radius() {
        let square = Shape::square(Vec2::ZERO, 5.0);
        // Circle center 4 units from the right edge, radius 6: a true
        // geometric overlap, but outside half the radius.
        let circle = Shape::circle(Vec2::new(9.0, 0.0), 6.0);
        assert!(!square.overlaps(&circle));
        assert!(!circle.overlaps(&square));

        let closer = Shape::circle(Vec2::new(8.0, 0.0), 6.0);
        assert!(square.overlaps(&closer));
        assert!(closer.overlaps(&square));
    }

    #[test]
    fn test_circle_inside_square() {
        let square = Shape::square(Vec2::ZERO, 50.0);
        let circle = Shape::circle(Vec2::new(10.0, -20.0), 1.0);
        assert!(square.overlaps(&circle));
    }

    #[test]
    fn test_edges() {
        let s = Shape::square(Vec2::new(10.0, 20.0), 3.0);
        assert_eq!(s.left_edge(), 7.0);
        assert_eq!(s.right_edge(), 13.0);
        assert_eq!(s.top_edge(), 17.0);
        assert_eq!(s.bottom_edge(), 23.0);
    }

    #[test]
    fn test_draw_offsets_by_camera() {
        use crate::render::{CommandList, DrawCommand};

        let mut canvas = CommandList::new(100.0, 100.0);
        let square = Shape::new(ShapeKind::Square, Vec2::new(10.0, 10.0), 2.0, Colour::Black);
        square.draw(&mut canvas, Vec2::new(5.0, 0.0));
        assert_eq!(
            canvas.commands,
            vec![DrawCommand::FillRect {
                min: Vec2::new(3.0, 8.0),
                size: Vec2::new(4.0, 4.0),
                colour: Colour::Black,
            }]
        );
    }

    fn any_kind() -> impl Strategy<Value = ShapeKind> {
        prop_oneof![Just(ShapeKind::Circle), Just(ShapeKind::Square)]
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ka in any_kind(),
            kb in any_kind(),
            ax in -100.0f32..100.0,
            ay in -100.0f32..100.0,
            bx in -100.0f32..100.0,
            by in -100.0f32..100.0,
            sa in 0.1f32..50.0,
            sb in 0.1f32..50.0,
        ) {
            let a = Shape::new(ka, Vec2::new(ax, ay), sa, Colour::Red);
            let b = Shape::new(kb, Vec2::new(bx, by), sb, Colour::Blue);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
