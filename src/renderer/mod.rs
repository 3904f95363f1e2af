//! Rendering module
//!
//! The simulation never touches a graphics API. Levels and artists issue
//! primitive draw calls into a `RenderSink`; the platform layer records them
//! into a `DisplayList` and hands finished frames to its painter.

pub mod artist;

use glam::Vec2;

pub use artist::{AnimationArtist, Artist, CircleArtist, PlayMode, RectArtist, TextArtist};

/// RGBA, each channel in 0..=1
pub type Color = [f32; 4];

pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.0, 0.0, 0.0, 1.0];
    pub const BREAKOUT_BACKGROUND: Color = [0.55, 0.55, 0.78, 1.0];
    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
    pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];
    pub const GREEN: Color = [0.0, 1.0, 0.0, 1.0];
    pub const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
    pub const CYAN: Color = [0.0, 1.0, 1.0, 1.0];
    pub const HUD: Color = [1.0, 1.0, 0.0, 1.0];
}

/// Primitive drawing surface. Positions are object centers except for text,
/// which is anchored at its baseline start.
pub trait RenderSink {
    fn fill_rect(&mut self, center: Vec2, size: Vec2, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn draw_text(&mut self, pos: Vec2, text: &str, size: f32, color: Color);
    fn draw_image(&mut self, image: &str, center: Vec2, size: Vec2);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        center: Vec2,
        size: Vec2,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
    },
    Image {
        image: String,
        center: Vec2,
        size: Vec2,
    },
}

/// One recorded frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every text string in the frame, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl RenderSink for DisplayList {
    fn fill_rect(&mut self, center: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect {
            center,
            size,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_text(&mut self, pos: Vec2, text: &str, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            size,
            color,
        });
    }

    fn draw_image(&mut self, image: &str, center: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::Image {
            image: image.to_string(),
            center,
            size,
        });
    }
}
