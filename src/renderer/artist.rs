//! Artists: per-object drawing strategies
//!
//! An artist is attached to a game object and draws it at the object's
//! current position. Artists hold only presentation state.

use std::sync::Arc;

use glam::Vec2;

use super::{Color, RenderSink};
use crate::assets::Animation;

/// Rough glyph aspect used to size text without a font backend
const GLYPH_WIDTH_RATIO: f32 = 0.6;

pub trait Artist {
    fn draw(&mut self, pos: Vec2, game_time: f32, sink: &mut dyn RenderSink);
}

#[derive(Debug, Clone)]
pub struct CircleArtist {
    pub radius: f32,
    pub color: Color,
}

impl Artist for CircleArtist {
    fn draw(&mut self, pos: Vec2, _game_time: f32, sink: &mut dyn RenderSink) {
        sink.fill_circle(pos, self.radius, self.color);
    }
}

#[derive(Debug, Clone)]
pub struct RectArtist {
    pub size: Vec2,
    pub color: Color,
}

impl Artist for RectArtist {
    fn draw(&mut self, pos: Vec2, _game_time: f32, sink: &mut dyn RenderSink) {
        sink.fill_rect(pos, self.size, self.color);
    }
}

/// Text centered on the object position
#[derive(Debug, Clone)]
pub struct TextArtist {
    pub text: String,
    pub size: f32,
    pub color: Color,
}

impl TextArtist {
    pub fn new(text: impl Into<String>, size: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            size,
            color,
        }
    }

    /// Estimated extent of the rendered string
    pub fn extent(&self) -> Vec2 {
        let glyphs = self.text.chars().count() as f32;
        Vec2::new(glyphs * self.size * GLYPH_WIDTH_RATIO, self.size)
    }
}

impl Artist for TextArtist {
    fn draw(&mut self, pos: Vec2, _game_time: f32, sink: &mut dyn RenderSink) {
        let extent = self.extent();
        let origin = Vec2::new(pos.x - extent.x / 2.0, pos.y + extent.y / 2.0);
        sink.draw_text(origin, &self.text, self.size, self.color);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    /// Wrap around to the first frame
    Loop,
    /// Stop on the last frame
    Forward,
    /// Start on the last frame and stop on the first
    Backward,
}

/// Steps through animation frames by their show times.
#[derive(Debug, Clone)]
pub struct AnimationArtist {
    anim: Arc<Animation>,
    mode: PlayMode,
    /// Drawn size: largest frame times scale
    size: Vec2,
    frame: usize,
    frame_started: f32,
}

impl AnimationArtist {
    pub fn new(anim: Arc<Animation>, t0: f32, mode: PlayMode, scale: f32) -> Self {
        let size = anim.max_size() * scale;
        let frame = match mode {
            PlayMode::Backward => anim.frames.len().saturating_sub(1),
            PlayMode::Loop | PlayMode::Forward => 0,
        };
        Self {
            anim,
            mode,
            size,
            frame,
            frame_started: t0,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn current_frame(&self) -> usize {
        self.frame
    }

    fn advance(&mut self, game_time: f32) {
        let count = self.anim.frames.len();
        let Some(current) = self.anim.frames.get(self.frame) else {
            return;
        };
        if game_time - self.frame_started < current.duration {
            return;
        }

        let next = match self.mode {
            PlayMode::Loop => Some((self.frame + 1) % count),
            PlayMode::Forward => (self.frame + 1 < count).then_some(self.frame + 1),
            PlayMode::Backward => self.frame.checked_sub(1),
        };
        if let Some(next) = next {
            self.frame = next;
            self.frame_started = game_time;
        }
    }
}

impl Artist for AnimationArtist {
    fn draw(&mut self, pos: Vec2, game_time: f32, sink: &mut dyn RenderSink) {
        self.advance(game_time);
        if let Some(frame) = self.anim.frames.get(self.frame) {
            sink.draw_image(&frame.image, pos, self.size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Frame;
    use crate::renderer::{DisplayList, DrawCommand};

    fn three_frames() -> Arc<Animation> {
        let frame = |name: &str, w: f32| Frame {
            image: name.to_string(),
            size: Vec2::new(w, 10.0),
            duration: 0.5,
        };
        Arc::new(Animation {
            name: "test".into(),
            frames: vec![frame("a", 10.0), frame("b", 20.0), frame("c", 16.0)],
        })
    }

    #[test]
    fn test_size_uses_largest_frame() {
        let artist = AnimationArtist::new(three_frames(), 0.0, PlayMode::Loop, 2.0);
        assert_eq!(artist.size(), Vec2::new(40.0, 20.0));
    }

    #[test]
    fn test_loop_wraps() {
        let mut artist = AnimationArtist::new(three_frames(), 0.0, PlayMode::Loop, 1.0);
        let mut sink = DisplayList::new();
        for t in [0.5, 1.0, 1.5] {
            artist.draw(Vec2::ZERO, t, &mut sink);
        }
        assert_eq!(artist.current_frame(), 0);
    }

    #[test]
    fn test_forward_holds_last_frame() {
        let mut artist = AnimationArtist::new(three_frames(), 0.0, PlayMode::Forward, 1.0);
        let mut sink = DisplayList::new();
        for t in [0.5, 1.0, 1.5, 2.0] {
            artist.draw(Vec2::ZERO, t, &mut sink);
        }
        assert_eq!(artist.current_frame(), 2);
        assert!(matches!(
            sink.commands.last(),
            Some(DrawCommand::Image { image, .. }) if image == "c"
        ));
    }

    #[test]
    fn test_backward_stops_on_first_frame() {
        let mut artist = AnimationArtist::new(three_frames(), 0.0, PlayMode::Backward, 1.0);
        assert_eq!(artist.current_frame(), 2);
        let mut sink = DisplayList::new();
        for t in [0.5, 1.0, 1.5] {
            artist.draw(Vec2::ZERO, t, &mut sink);
        }
        assert_eq!(artist.current_frame(), 0);
    }

    #[test]
    fn test_empty_animation_draws_nothing() {
        let anim = Arc::new(Animation {
            name: "empty".into(),
            frames: Vec::new(),
        });
        let mut artist = AnimationArtist::new(anim, 0.0, PlayMode::Loop, 1.0);
        let mut sink = DisplayList::new();
        artist.draw(Vec2::ZERO, 3.0, &mut sink);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_text_extent_scales_with_glyphs() {
        let text = TextArtist::new("Aua", 20.0, [1.0; 4]);
        let extent = text.extent();
        assert!((extent.x - 36.0).abs() < 1e-4);
        assert_eq!(extent.y, 20.0);
    }
}
