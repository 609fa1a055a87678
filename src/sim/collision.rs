//! Collision detection and elastic response between entities
//!
//! Every response is the 1D elastic collision along a contact normal; the
//! shape kinds only decide how that normal is chosen.

use glam::Vec2;

use super::entity::Entity;
use super::shape::ShapeKind;

/// Impulse applied by a resolved collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal from the first body toward the second (zero if the
    /// centers coincide)
    pub normal: Vec2,
    /// Impulse magnitude per unit of opposing mass
    pub impulse: f32,
}

/// Overlap check followed by collision response.
///
/// Touching wakes both entities even when collisions are disabled for one
/// of them. Returns the contact if velocities were changed.
pub fn check_interaction(a: &mut Entity, b: &mut Entity) -> Option<Contact> {
    if !a.active && !b.active {
        return None;
    }

    if !a.overlaps(b) {
        return None;
    }

    a.active = true;
    b.active = true;

    handle_collision(a, b)
}

/// Dispatch the response on the pair of shape kinds
pub fn handle_collision(a: &mut Entity, b: &mut Entity) -> Option<Contact> {
    if !a.collision || !b.collision {
        return None;
    }

    match (a.kind, b.kind) {
        (ShapeKind::Circle, ShapeKind::Circle) => resolve_circles(a, b),
        (ShapeKind::Square, ShapeKind::Square) => resolve_squares(a, b),
        (ShapeKind::Square, ShapeKind::Circle) => resolve_square_circle(a, b),
        (ShapeKind::Circle, ShapeKind::Square) => resolve_square_circle(b, a),
    }
}

/// Normal along the line between centers
pub fn resolve_circles(a: &mut Entity, b: &mut Entity) -> Option<Contact> {
    let normal = (b.pos - a.pos).normalize_or_zero();
    apply_impulse(a, b, normal)
}

/// Normal along the axis of greater separation; equal separations keep
/// both axes.
pub fn resolve_squares(a: &mut Entity, b: &mut Entity) -> Option<Contact> {
    let mut d = b.pos - a.pos;
    let (abs_x, abs_y) = (d.x.abs(), d.y.abs());
    if abs_x > abs_y {
        d.y = 0.0;
    }
    if abs_y > abs_x {
        d.x = 0.0;
    }
    apply_impulse(a, b, d.normalize_or_zero())
}

/// A square at least as large as the circle responds like a square,
/// otherwise the pair responds like two circles.
pub fn resolve_square_circle(square: &mut Entity, circle: &mut Entity) -> Option<Contact> {
    if square.size >= circle.size {
        resolve_squares(square, circle)
    } else {
        resolve_circles(circle, square)
    }
}

fn apply_impulse(a: &mut Entity, b: &mut Entity, normal: Vec2) -> Option<Contact> {
    let mut speed = (a.vel - b.vel).dot(normal);

    // Already separating
    if speed < 0.0 {
        return None;
    }

    // Resting contact still needs a push apart
    if speed == 0.0 {
        speed = 1.0;
    }

    let impulse = 2.0 * speed / (a.mass + b.mass);
    a.vel -= impulse * b.mass * normal;
    b.vel += impulse * a.mass * normal;

    Some(Contact { normal, impulse })
}
