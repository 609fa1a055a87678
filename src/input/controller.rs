//! Keyboard and pointer/touch normalisation
//!
//! Host event handlers call into [`Controller`]; it updates the joystick
//! immediately and queues an [`InputEvent`] for every pointer lifecycle
//! step so other consumers (the puzzle drag) can drain them.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::joystick::{Joystick, JoystickConfig};
use crate::sim::Directions;

/// Pointer lifecycle step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    Start,
    Move,
    End,
}

/// A pointer event in absolute canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: InputKind,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct Controller {
    keys_pressed: HashSet<String>,
    pub joystick: Joystick,
    events: Vec<InputEvent>,
}

impl Controller {
    pub fn new(config: JoystickConfig) -> Self {
        Self {
            keys_pressed: HashSet::new(),
            joystick: Joystick::new(config),
            events: Vec::new(),
        }
    }

    /// `key` is a DOM `KeyboardEvent.key` value
    pub fn key_down(&mut self, key: &str) {
        self.keys_pressed.insert(key.to_string());
        self.joystick.handle_directions(self.key_directions());
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys_pressed.remove(key);
        self.joystick.handle_directions(self.key_directions());
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.keys_pressed.contains(key)
    }

    /// WASD/arrow directions with opposite pairs cancelled
    pub fn key_directions(&self) -> Directions {
        let held = |a: &str, b: &str| self.is_pressed(a) || self.is_pressed(b);
        let mut directions = Directions {
            up: held("ArrowUp", "w"),
            left: held("ArrowLeft", "a"),
            down: held("ArrowDown", "s"),
            right: held("ArrowRight", "d"),
        };

        if directions.left && directions.right {
            directions.left = false;
            directions.right = false;
        }
        if directions.up && directions.down {
            directions.up = false;
            directions.down = false;
        }

        directions
    }

    /// Mouse down or first touch
    pub fn input_start(&mut self, pos: Vec2) {
        self.events.push(InputEvent {
            kind: InputKind::Start,
            pos,
        });
        self.joystick.begin(pos);
    }

    pub fn input_move(&mut self, pos: Vec2) {
        self.events.push(InputEvent {
            kind: InputKind::Move,
            pos,
        });
        self.joystick.handle_input_move(pos);
    }

    /// Mouse up or touch end; carries no position
    pub fn input_end(&mut self) {
        self.events.push(InputEvent {
            kind: InputKind::End,
            pos: Vec2::ZERO,
        });
        self.joystick.reset();
    }

    /// Take every queued pointer event, oldest first
    pub fn drain_events(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }
}
