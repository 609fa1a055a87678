//! Virtual analog stick
//!
//! Pointer drags and held direction keys both become a knob displacement
//! clamped to `max_length`; the tilt angle and percentage derived from it
//! drive the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::cartesian_to_polar;
use crate::consts::*;
use crate::render::{Canvas, Colour};
use crate::sim::Directions;

const BASE_RADIUS: f32 = 20.0;
const KNOB_RADIUS: f32 = 10.0;

/// Joystick tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoystickConfig {
    /// Knob travel limit
    pub max_length: f32,
    /// Pointer displacement multiplier
    pub sensitivity: f32,
    /// Draw at the drag origin instead of the bottom-left corner
    pub draw_at_input: bool,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            max_length: JOYSTICK_MAX_LENGTH,
            sensitivity: JOYSTICK_SENSITIVITY,
            draw_at_input: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Joystick {
    /// Disabled joysticks ignore input and are not drawn
    pub enabled: bool,
    /// A pointer drag is in progress
    pub input_active: bool,
    /// Where the current drag started
    pub start: Vec2,
    /// Knob displacement (length <= max_length)
    pub offset: Vec2,
    pub tilt_angle: f32,
    /// Displacement as a fraction of max_length
    pub tilt_percentage: f32,
    pub config: JoystickConfig,
}

impl Joystick {
    pub fn new(config: JoystickConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Start a pointer drag at `pos`
    pub fn begin(&mut self, pos: Vec2) {
        self.input_active = true;
        self.start = pos;
    }

    pub fn handle_input_move(&mut self, pos: Vec2) {
        if !self.input_active {
            return;
        }
        self.process_change((pos - self.start) * self.config.sensitivity);
    }

    /// Held keys act as a drag far past the travel limit
    pub fn handle_directions(&mut self, directions: Directions) {
        let mut delta = Vec2::ZERO;
        if directions.up {
            delta.y = -KEY_DRAG_DISTANCE;
        }
        if directions.down {
            delta.y = KEY_DRAG_DISTANCE;
        }
        if directions.left {
            delta.x = -KEY_DRAG_DISTANCE;
        }
        if directions.right {
            delta.x = KEY_DRAG_DISTANCE;
        }
        self.process_change(delta);
    }

    /// Apply a raw displacement, clamping it to the travel limit
    pub fn process_change(&mut self, delta: Vec2) {
        if !self.enabled {
            return;
        }

        if delta == Vec2::ZERO {
            self.reset();
            return;
        }

        let max = self.config.max_length;
        let (length, angle) = cartesian_to_polar(delta);
        if length < max {
            self.offset = delta;
            self.tilt_percentage = length / max;
        } else {
            self.offset = delta / length * max;
            self.tilt_percentage = 1.0;
        }
        self.tilt_angle = angle;
    }

    pub fn reset(&mut self) {
        self.input_active = false;
        self.offset = Vec2::ZERO;
        self.tilt_angle = 0.0;
        self.tilt_percentage = 0.0;
    }

    /// Base, stem and knob
    pub fn draw(&self, canvas: &mut impl Canvas) {
        if !self.enabled {
            return;
        }

        let base = if self.config.draw_at_input {
            self.start
        } else {
            Vec2::new(JOYSTICK_ANCHOR_OFFSET, canvas.height() - JOYSTICK_ANCHOR_OFFSET)
        };
        let knob = base + self.offset;

        canvas.fill_circle(base, BASE_RADIUS, Colour::White);
        canvas.stroke_circle(base, BASE_RADIUS, 4.0);

        canvas.line(base, knob, 8.0);

        canvas.fill_circle(knob, KNOB_RADIUS, Colour::Red);
        canvas.stroke_circle(knob, KNOB_RADIUS, 4.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CommandList, DrawCommand};
    use proptest::prelude::*;

    fn enabled() -> Joystick {
        Joystick {
            enabled: true,
            ..Joystick::new(JoystickConfig::default())
        }
    }

    #[test]
    fn test_small_drag_is_proportional() {
        let mut js = enabled();
        js.begin(Vec2::new(100.0, 100.0));
        js.handle_input_move(Vec2::new(110.0, 100.0));

        assert_eq!(js.offset, Vec2::new(5.0, 0.0));
        assert!((js.tilt_percentage - 5.0 / 30.0).abs() < 1e-6);
        assert_eq!(js.tilt_angle, 0.0);
    }

    #[test]
    fn test_large_drag_is_clamped() {
        let mut js = enabled();
        js.begin(Vec2::ZERO);
        js.handle_input_move(Vec2::new(0.0, 400.0));

        assert!((js.offset - Vec2::new(0.0, 30.0)).length() < 1e-5);
        assert_eq!(js.tilt_percentage, 1.0);
        assert!((js.tilt_angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_move_without_begin_is_ignored() {
        let mut js = enabled();
        js.handle_input_move(Vec2::new(50.0, 50.0));
        assert_eq!(js.offset, Vec2::ZERO);
    }

    #[test]
    fn test_disabled_ignores_changes() {
        let mut js = Joystick::new(JoystickConfig::default());
        js.begin(Vec2::ZERO);
        js.handle_input_move(Vec2::new(10.0, 0.0));
        assert_eq!(js.offset, Vec2::ZERO);
        assert_eq!(js.tilt_percentage, 0.0);
    }

    #[test]
    fn test_zero_change_resets() {
        let mut js = enabled();
        js.begin(Vec2::new(10.0, 10.0));
        js.handle_input_move(Vec2::new(30.0, 10.0));
        assert!(js.tilt_percentage > 0.0);

        js.handle_input_move(Vec2::new(10.0, 10.0));
        assert!(!js.input_active);
        assert_eq!(js.offset, Vec2::ZERO);
        assert_eq!(js.tilt_percentage, 0.0);
    }

    #[test]
    fn test_diagonal_keys_clamp_to_max() {
        let mut js = enabled();
        js.handle_directions(Directions {
            left: true,
            down: true,
            ..Default::default()
        });
        assert!((js.offset.length() - 30.0).abs() < 1e-4);
        assert!((js.tilt_angle - 3.0 * std::f32::consts::FRAC_PI_4).abs() < 1e-6);

        js.handle_directions(Directions::default());
        assert_eq!(js.tilt_percentage, 0.0);
    }

    #[test]
    fn test_draw_anchor() {
        let mut js = enabled();
        js.begin(Vec2::new(40.0, 40.0));

        let mut canvas = CommandList::new(300.0, 200.0);
        js.draw(&mut canvas);
        assert_eq!(canvas.commands.len(), 5);
        assert_eq!(
            canvas.commands[0],
            DrawCommand::FillCircle {
                center: Vec2::new(40.0, 40.0),
                radius: 20.0,
                colour: Colour::White,
            }
        );

        js.config.draw_at_input = false;
        let mut canvas = CommandList::new(300.0, 200.0);
        js.draw(&mut canvas);
        assert_eq!(
            canvas.commands[0],
            DrawCommand::FillCircle {
                center: Vec2::new(60.0, 140.0),
                radius: 20.0,
                colour: Colour::White,
            }
        );

        js.enabled = false;
        let mut canvas = CommandList::new(300.0, 200.0);
        js.draw(&mut canvas);
        assert!(canvas.commands.is_empty());
    }

    proptest! {
        #[test]
        fn prop_displacement_never_exceeds_max(
            sx in -1000.0f32..1000.0,
            sy in -1000.0f32..1000.0,
            x in -10000.0f32..10000.0,
            y in -10000.0f32..10000.0,
        ) {
            let mut js = enabled();
            js.begin(Vec2::new(sx, sy));
            js.handle_input_move(Vec2::new(x, y));
            prop_assert!(js.offset.length() <= js.config.max_length + 1e-3);
            prop_assert!(js.tilt_percentage <= 1.0);
        }
    }
}
