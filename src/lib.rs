//! Canvas Arcade - shared core for two small canvas games
//!
//! Core modules:
//! - `sim`: Shapes, kinematic entities, collisions and the fixed-tick world
//! - `input`: Keyboard/pointer controller and the virtual joystick
//! - `puzzle`: 8x8 block-placement board, pieces and line clearing
//! - `render`: Immediate-mode shape drawing
//! - `persistence`: Namespaced key/value storage
//! - `settings`: Tunables with defaults

pub mod input;
pub mod persistence;
pub mod puzzle;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logic tick period in milliseconds
    pub const UPDATE_DELAY_MS: u32 = 10;

    /// Board is BOARD_CELLS x BOARD_CELLS
    pub const BOARD_CELLS: usize = 8;
    /// Fraction of the smaller canvas dimension used by the board
    pub const BOARD_FILL: f32 = 0.9;
    /// Pending pieces offered at once
    pub const PIECE_COUNT: usize = 3;
    /// Random repositions tried before a piece is left where it is
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Joystick knob travel limit
    pub const JOYSTICK_MAX_LENGTH: f32 = 30.0;
    /// Pointer displacement multiplier
    pub const JOYSTICK_SENSITIVITY: f32 = 0.5;
    /// Synthetic drag distance produced by a held direction key
    pub const KEY_DRAG_DISTANCE: f32 = 100.0;
    /// Fixed joystick anchor distance from the bottom-left corner
    pub const JOYSTICK_ANCHOR_OFFSET: f32 = 60.0;

    /// Default entity size (circle radius / square half-side)
    pub const ENTITY_SIZE: f32 = 10.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
