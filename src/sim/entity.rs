//! Kinematic entity
//!
//! Position/velocity/acceleration integrator with velocity-proportional
//! friction. Steering helpers only ever write acceleration; `integrate`
//! consumes it and restores the gravity baseline.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::env::Environment;
use super::shape::{Shape, ShapeKind};
use crate::consts::ENTITY_SIZE;
use crate::render::{Canvas, Colour};
use crate::{distance, polar_to_cartesian};

/// Held movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Directions {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Directions {
    pub fn is_empty(&self) -> bool {
        !(self.left || self.right || self.up || self.down)
    }
}

/// A moving body in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: ShapeKind,
    /// Radius for circles, half-side for squares
    pub size: f32,
    pub colour: Colour,
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    pub mass: f32,
    pub force: f32,
    pub friction: f32,
    /// Inactive entities are not integrated until something touches them
    pub active: bool,
    /// Locked entities never move
    pub locked: bool,
    /// Whether collisions change this entity's velocity
    pub collision: bool,
}

impl Entity {
    pub fn new(id: u32, kind: ShapeKind, env: &Environment) -> Self {
        Self {
            id,
            kind,
            size: ENTITY_SIZE,
            colour: Colour::Red,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            mass: env.mass,
            force: env.force,
            friction: env.friction,
            active: true,
            locked: false,
            collision: true,
        }
    }

    /// The entity's shape at its current position
    pub fn shape(&self) -> Shape {
        Shape::new(self.kind, self.pos, self.size, self.colour)
    }

    /// Acceleration produced by the driving force (F = m * a)
    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.force / self.mass
    }

    pub fn distance_to(&self, other: &Entity) -> f32 {
        distance(self.pos, other.pos)
    }

    pub fn overlaps(&self, other: &Entity) -> bool {
        self.shape().overlaps(&other.shape())
    }

    /// Advance one tick
    pub fn integrate(&mut self, env: &Environment) {
        if !self.active || self.locked {
            return;
        }

        self.accel += self.vel * self.friction;
        self.vel += self.accel;
        self.pos += self.vel + 0.5 * self.accel;

        self.accel = Vec2::new(0.0, env.gravity);
    }

    /// Accelerate along held directions; diagonals keep the same magnitude.
    /// Up is negative y (canvas coordinates).
    pub fn move_in_direction(&mut self, directions: Directions) {
        let a = self.acceleration();
        if directions.left {
            self.accel.x = -a;
        }
        if directions.right {
            self.accel.x = a;
        }
        if directions.up {
            self.accel.y = -a;
        }
        if directions.down {
            self.accel.y = a;
        }

        if self.accel.x != 0.0 && self.accel.y != 0.0 {
            self.accel *= std::f32::consts::FRAC_1_SQRT_2;
        }
    }

    pub fn move_at_angle(&mut self, radians: f32) {
        self.accel = polar_to_cartesian(self.acceleration(), radians);
    }

    /// `percent` scales the driving acceleration (0..=1 from a joystick)
    pub fn move_at_angle_with_percent(&mut self, radians: f32, percent: f32) {
        self.accel = polar_to_cartesian(self.acceleration() * percent, radians);
    }

    pub fn move_towards_point(&mut self, target: Vec2) {
        let d = target - self.pos;
        self.move_at_angle(d.y.atan2(d.x));
    }

    pub fn move_towards(&mut self, other: &Entity) {
        self.move_towards_point(other.pos);
    }

    pub fn draw(&self, canvas: &mut impl Canvas, camera: Vec2) {
        self.shape().draw(canvas, camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> Entity {
        Entity::new(1, ShapeKind::Circle, &Environment::default())
    }

    #[test]
    fn test_new_copies_environment() {
        let env = Environment {
            mass: 3.0,
            force: 6.0,
            ..Default::default()
        };
        let e = Entity::new(7, ShapeKind::Square, &env);
        assert_eq!(e.id, 7);
        assert_eq!(e.kind, ShapeKind::Square);
        assert_eq!(e.size, ENTITY_SIZE);
        assert_eq!(e.acceleration(), 2.0);
        assert!(e.active && e.collision && !e.locked);
    }

    #[test]
    fn test_integrate_at_rest_does_not_move() {
        let mut e = entity();
        e.pos = Vec2::new(12.0, -4.0);
        e.integrate(&Environment::default());
        assert_eq!(e.pos, Vec2::new(12.0, -4.0));
        assert_eq!(e.vel, Vec2::ZERO);
    }

    #[test]
    fn test_integrate_applies_friction_and_half_step() {
        let mut e = entity();
        e.vel = Vec2::new(1.0, 0.0);
        e.integrate(&Environment::default());

        // accel = -0.08, vel = 0.92, pos = 0.92 + 0.5 * -0.08
        assert!((e.vel.x - 0.92).abs() < 1e-6);
        assert!((e.pos.x - 0.88).abs() < 1e-6);
        assert_eq!(e.accel, Vec2::ZERO);
    }

    #[test]
    fn test_integrate_resets_to_gravity() {
        let env = Environment {
            gravity: 0.25,
            ..Default::default()
        };
        let mut e = Entity::new(1, ShapeKind::Circle, &env);
        e.accel = Vec2::new(3.0, 3.0);
        e.integrate(&env);
        assert_eq!(e.accel, Vec2::new(0.0, 0.25));
    }

    #[test]
    fn test_inactive_or_locked_skip_integration() {
        let env = Environment::default();
        let mut e = entity();
        e.vel = Vec2::new(5.0, 5.0);
        e.accel = Vec2::new(1.0, 1.0);

        e.active = false;
        e.integrate(&env);
        assert_eq!(e.pos, Vec2::ZERO);
        assert_eq!(e.accel, Vec2::new(1.0, 1.0));

        e.active = true;
        e.locked = true;
        e.integrate(&env);
        assert_eq!(e.pos, Vec2::ZERO);
    }

    #[test]
    fn test_move_in_direction_diagonal_keeps_magnitude() {
        let mut e = entity();
        e.move_in_direction(Directions {
            right: true,
            down: true,
            ..Default::default()
        });
        assert!((e.accel.length() - e.acceleration()).abs() < 1e-6);
        assert!(e.accel.x > 0.0 && e.accel.y > 0.0);

        let mut e = entity();
        e.move_in_direction(Directions {
            up: true,
            ..Default::default()
        });
        assert_eq!(e.accel, Vec2::new(0.0, -0.5));
    }

    #[test]
    fn test_move_at_angle_with_percent() {
        let mut e = entity();
        e.move_at_angle_with_percent(0.0, 0.5);
        assert!((e.accel.x - 0.25).abs() < 1e-6);
        assert!(e.accel.y.abs() < 1e-6);
    }

    #[test]
    fn test_move_towards() {
        let mut e = entity();
        let mut target = entity();
        target.pos = Vec2::new(0.0, 10.0);
        e.move_towards(&target);
        assert!(e.accel.x.abs() < 1e-6);
        assert!((e.accel.y - 0.5).abs() < 1e-6);
        assert_eq!(e.distance_to(&target), 10.0);
    }

    #[test]
    fn test_directions_is_empty() {
        assert!(Directions::default().is_empty());
        assert!(!Directions {
            left: true,
            ..Default::default()
        }
        .is_empty());
    }
}
