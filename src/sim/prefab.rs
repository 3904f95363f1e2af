//! Constructors for the common object kinds
//!
//! Each builder pairs an artist with a matching collider so drawn and
//! tested extents agree.

use std::sync::Arc;

use glam::Vec2;

use super::collider::Collider;
use super::object::{GameObject, ObjectTag};
use crate::assets::Animation;
use crate::renderer::{AnimationArtist, CircleArtist, Color, PlayMode, RectArtist, TextArtist};

/// Solid disc with a circle collider
pub fn circle_body(
    id: impl Into<String>,
    tag: ObjectTag,
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    color: Color,
) -> GameObject {
    GameObject::new(id, tag, pos, vel)
        .with_collider(Collider::circle("body", radius))
        .with_artist(CircleArtist { radius, color })
}

/// Solid rectangle with a rect collider
pub fn rect_body(
    id: impl Into<String>,
    tag: ObjectTag,
    pos: Vec2,
    vel: Vec2,
    size: Vec2,
    color: Color,
) -> GameObject {
    GameObject::new(id, tag, pos, vel)
        .with_collider(Collider::rect("body", size.x, size.y))
        .with_artist(RectArtist { size, color })
}

/// Text centered on `pos`. With `solid`, a rect collider covers the
/// estimated text extent.
#[allow(clippy::too_many_arguments)]
pub fn text(
    id: impl Into<String>,
    tag: ObjectTag,
    pos: Vec2,
    vel: Vec2,
    content: &str,
    size: f32,
    color: Color,
    solid: bool,
) -> GameObject {
    let artist = TextArtist::new(content, size, color);
    let extent = artist.extent();
    let obj = GameObject::new(id, tag, pos, vel).with_artist(artist);
    if solid {
        obj.with_collider(Collider::rect("text", extent.x, extent.y))
    } else {
        obj
    }
}

/// Animated sprite with a rect collider sized to the largest frame times `scale`
#[allow(clippy::too_many_arguments)]
pub fn animated(
    id: impl Into<String>,
    tag: ObjectTag,
    pos: Vec2,
    vel: Vec2,
    scale: f32,
    anim: Arc<Animation>,
    t0: f32,
    mode: PlayMode,
) -> GameObject {
    let artist = AnimationArtist::new(anim, t0, mode, scale);
    let size = artist.size();
    GameObject::new(id, tag, pos, vel)
        .with_collider(Collider::rect("sprite", size.x, size.y))
        .with_artist(artist)
}
