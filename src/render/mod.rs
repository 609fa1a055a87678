//! Immediate-mode shape drawing
//!
//! Game code draws through the [`Canvas`] trait. On the web the backend is a
//! 2D canvas context; everywhere else [`CommandList`] records the calls so a
//! frame can be inspected.

#[cfg(target_arch = "wasm32")]
mod canvas2d;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2d;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fixed palette shared by both games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Colour {
    #[default]
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
    Brown,
    Black,
    White,
    DodgerBlue,
}

impl Colour {
    /// Colours an entity may be randomly assigned
    pub const ENTITY: [Colour; 6] = [
        Colour::Red,
        Colour::Green,
        Colour::Blue,
        Colour::Yellow,
        Colour::Purple,
        Colour::Orange,
    ];

    /// CSS colour name
    pub fn as_css(&self) -> &'static str {
        match self {
            Colour::Red => "red",
            Colour::Green => "green",
            Colour::Blue => "blue",
            Colour::Yellow => "yellow",
            Colour::Purple => "purple",
            Colour::Orange => "orange",
            Colour::Brown => "brown",
            Colour::Black => "black",
            Colour::White => "white",
            Colour::DodgerBlue => "dodgerblue",
        }
    }
}

/// Drawing surface
pub trait Canvas {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Clear the whole surface
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Vec2, radius: f32, colour: Colour);

    /// Circle outline in the default stroke colour (black)
    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32);

    fn fill_rect(&mut self, min: Vec2, size: Vec2, colour: Colour);

    /// Rectangle outline in the default stroke colour (black)
    fn stroke_rect(&mut self, min: Vec2, size: Vec2, line_width: f32);

    fn line(&mut self, from: Vec2, to: Vec2, line_width: f32);
}

/// A recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillCircle { center: Vec2, radius: f32, colour: Colour },
    StrokeCircle { center: Vec2, radius: f32, line_width: f32 },
    FillRect { min: Vec2, size: Vec2, colour: Colour },
    StrokeRect { min: Vec2, size: Vec2, line_width: f32 },
    Line { from: Vec2, to: Vec2, line_width: f32 },
}

/// Canvas that records every call instead of rasterising
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Number of filled circles/rects drawn with the given colour
    pub fn fills_with(&self, colour: Colour) -> usize {
        self.commands
            .iter()
            .filter(|c| match c {
                DrawCommand::FillCircle { colour: c, .. } | DrawCommand::FillRect { colour: c, .. } => {
                    *c == colour
                }
                _ => false,
            })
            .count()
    }
}

impl Canvas for CommandList {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, colour: Colour) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            colour,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            line_width,
        });
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, colour: Colour) {
        self.commands.push(DrawCommand::FillRect { min, size, colour });
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            min,
            size,
            line_width,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, line_width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            line_width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_recording() {
        let mut canvas = CommandList::new(100.0, 50.0);
        canvas.fill_circle(Vec2::ZERO, 5.0, Colour::Red);
        canvas.clear();
        assert_eq!(canvas.commands, vec![DrawCommand::Clear]);
        assert_eq!(canvas.width(), 100.0);
        assert_eq!(canvas.height(), 50.0);
    }

    #[test]
    fn test_fills_with_counts_by_colour() {
        let mut canvas = CommandList::new(100.0, 100.0);
        canvas.fill_circle(Vec2::ZERO, 5.0, Colour::Red);
        canvas.fill_rect(Vec2::ZERO, Vec2::ONE, Colour::Red);
        canvas.fill_rect(Vec2::ZERO, Vec2::ONE, Colour::Blue);
        canvas.stroke_rect(Vec2::ZERO, Vec2::ONE, 1.0);
        assert_eq!(canvas.fills_with(Colour::Red), 2);
        assert_eq!(canvas.fills_with(Colour::Blue), 1);
        assert_eq!(canvas.fills_with(Colour::Green), 0);
    }

    #[test]
    fn test_css_names() {
        assert_eq!(Colour::DodgerBlue.as_css(), "dodgerblue");
        assert_eq!(Colour::default().as_css(), "red");
    }
}
