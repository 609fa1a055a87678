//! Fixed-tick entity world
//!
//! One tick scans every unordered pair once and integrates each entity
//! right after its own row of the scan. Integration is interleaved, so
//! later rows see already-moved earlier entities.

use glam::Vec2;

use super::collision::check_interaction;
use super::entity::Entity;
use super::env::Environment;
use super::shape::ShapeKind;
use crate::input::Joystick;
use crate::render::Canvas;

/// Analog steering applied to the player for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Steering direction (radians)
    pub tilt_angle: f32,
    /// Steering strength (0..=1)
    pub tilt_percentage: f32,
}

impl From<&Joystick> for TickInput {
    fn from(joystick: &Joystick) -> Self {
        Self {
            tilt_angle: joystick.tilt_angle,
            tilt_percentage: joystick.tilt_percentage,
        }
    }
}

/// Flat collection of entities sharing one environment
#[derive(Debug, Clone)]
pub struct World {
    pub env: Environment,
    pub entities: Vec<Entity>,
    /// Entity steered by the joystick and drawn last
    pub player: Option<u32>,
    /// Center the view on the player when drawing
    pub follow_player: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
}

impl World {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            entities: Vec::new(),
            player: None,
            follow_player: false,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Create an entity with the world's environment defaults and add it
    pub fn spawn(&mut self, kind: ShapeKind, pos: Vec2) -> &mut Entity {
        let id = self.next_entity_id();
        let mut entity = Entity::new(id, kind, &self.env);
        entity.pos = pos;
        self.add_entity(entity)
    }

    pub fn add_entity(&mut self, entity: Entity) -> &mut Entity {
        self.next_id = self.next_id.max(entity.id.saturating_add(1));
        self.entities.push(entity);
        let last = self.entities.len() - 1;
        &mut self.entities[last]
    }

    /// Remove by id, keeping the order of the rest
    pub fn remove_entity(&mut self, id: u32) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        if self.player == Some(id) {
            self.player = None;
        }
        Some(self.entities.remove(index))
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.entity(id))
    }

    /// Advance one tick
    pub fn tick(&mut self, input: &TickInput) {
        self.tick_with(input, |_, _| {});
    }

    /// Advance one tick, calling `behaviour` on each entity just before it
    /// is integrated (after the player has been steered).
    pub fn tick_with<F>(&mut self, input: &TickInput, mut behaviour: F)
    where
        F: FnMut(&mut Entity, &Environment),
    {
        let n = self.entities.len();
        for i in 0..n {
            let (head, tail) = self.entities.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                check_interaction(a, b);
            }

            if self.player == Some(a.id) {
                a.move_at_angle_with_percent(input.tilt_angle, input.tilt_percentage);
            }
            behaviour(a, &self.env);
            a.integrate(&self.env);
        }
        self.time_ticks += 1;
    }

    /// Draw offset for the follow camera
    pub fn camera(&self, canvas: &impl Canvas) -> Vec2 {
        match (self.follow_player, self.player()) {
            (true, Some(player)) => {
                player.pos - Vec2::new(canvas.width() / 2.0, canvas.height() / 2.0)
            }
            _ => Vec2::ZERO,
        }
    }

    /// Draw every entity, then the joystick, then the player on top
    pub fn draw(&self, canvas: &mut impl Canvas, joystick: Option<&Joystick>) {
        let camera = self.camera(canvas);
        for entity in &self.entities {
            entity.draw(canvas, camera);
        }

        if let Some(joystick) = joystick {
            joystick.draw(canvas);
        }

        if let Some(player) = self.player() {
            player.draw(canvas, camera);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}
