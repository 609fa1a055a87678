//! Input layer
//!
//! Keyboard, mouse and touch all funnel into one [`Controller`], which owns
//! the virtual [`Joystick`].

pub mod controller;
pub mod joystick;

pub use controller::{Controller, InputEvent, InputKind};
pub use joystick::{Joystick, JoystickConfig};
