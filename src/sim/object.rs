//! Game objects
//!
//! A game object is a tagged bundle of kinematic state, colliders, an
//! optional controller and an optional artist. While inactive it is frozen:
//! kinematic setters are ignored and it is neither updated nor drawn.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collider::Collider;
use super::controller::{ObjectController, Setting};
use super::playground::Playground;
use crate::error::EngineError;
use crate::renderer::{Artist, RenderSink};

/// Id of the player-controlled object
pub const EGO_ID: &str = "ego";

/// Role of an object in level logic. Queries select by tag, never by id text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectTag {
    Player,
    Enemy,
    PlayerShot,
    EnemyShot,
    Collectable,
    Obstacle,
    Decoration,
    Effect,
    Brick,
    Ball,
}

/// Position and velocity, captured for tentative moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub pos: Vec2,
    pub vel: Vec2,
}

pub struct GameObject {
    id: String,
    tag: ObjectTag,
    pos: Vec2,
    vel: Vec2,
    active: bool,
    colliders: Vec<Collider>,
    controller: Option<Box<dyn ObjectController>>,
    artist: Option<Box<dyn Artist>>,
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("pos", &self.pos)
            .field("vel", &self.vel)
            .field("active", &self.active)
            .field("colliders", &self.colliders)
            .field("controller", &self.controller.as_ref().map(|c| c.name()))
            .finish_non_exhaustive()
    }
}

impl GameObject {
    pub fn new(id: impl Into<String>, tag: ObjectTag, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id: id.into(),
            tag,
            pos,
            vel,
            active: true,
            colliders: Vec::new(),
            controller: None,
            artist: None,
        }
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.colliders.push(collider);
        self
    }

    pub fn with_controller(mut self, controller: impl ObjectController + 'static) -> Self {
        self.controller = Some(Box::new(controller));
        self
    }

    pub fn with_artist(mut self, artist: impl Artist + 'static) -> Self {
        self.artist = Some(Box::new(artist));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> ObjectTag {
        self.tag
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        if self.active {
            self.pos = pos;
        }
    }

    pub fn set_vel(&mut self, vel: Vec2) {
        if self.active {
            self.vel = vel;
        }
    }

    pub fn set_x(&mut self, x: f32) {
        self.set_pos(Vec2::new(x, self.pos.y));
    }

    pub fn set_y(&mut self, y: f32) {
        self.set_pos(Vec2::new(self.pos.x, y));
    }

    pub fn set_vx(&mut self, vx: f32) {
        self.set_vel(Vec2::new(vx, self.vel.y));
    }

    pub fn set_vy(&mut self, vy: f32) {
        self.set_vel(Vec2::new(self.vel.x, vy));
    }

    /// Move by velocity over `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.set_pos(self.pos + self.vel * dt);
    }

    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            pos: self.pos,
            vel: self.vel,
        }
    }

    pub fn restore(&mut self, snapshot: Kinematics) {
        self.set_pos(snapshot.pos);
        self.set_vel(snapshot.vel);
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn add_collider(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    /// True if any collider of `self` overlaps any collider of `other`.
    ///
    /// Fails when the two objects carry a shape pairing with no overlap test.
    pub fn collision_detection(&self, other: &GameObject) -> Result<bool, EngineError> {
        for mine in &self.colliders {
            for theirs in &other.colliders {
                if mine.collides_with(self.pos, theirs, other.pos)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    pub fn set_controller(&mut self, controller: Box<dyn ObjectController>) {
        self.controller = Some(controller);
    }

    pub fn set_artist(&mut self, artist: Box<dyn Artist>) {
        self.artist = Some(artist);
    }

    pub fn controller_name(&self) -> Option<&'static str> {
        self.controller.as_ref().map(|c| c.name())
    }

    /// Run the controller for one tick. Inactive objects are skipped.
    pub fn update(&mut self, pg: &mut Playground) -> Result<(), EngineError> {
        if !self.active {
            return Ok(());
        }
        let Some(mut controller) = self.controller.take() else {
            return Ok(());
        };
        let result = controller.update(self, pg);
        self.controller = Some(controller);
        result
    }

    /// Apply a typed setting to this object's controller.
    pub fn configure(&mut self, setting: Setting) -> Result<(), EngineError> {
        let Some(controller) = self.controller.as_mut() else {
            return Err(EngineError::UnsupportedSetting {
                controller: "none",
                setting: setting.name(),
            });
        };
        let name = controller.name();
        match controller.configurable() {
            Some(target) => target.apply(setting),
            None => Err(EngineError::UnsupportedSetting {
                controller: name,
                setting: setting.name(),
            }),
        }
    }

    pub fn draw(&mut self, game_time: f32, sink: &mut dyn RenderSink) {
        if !self.active {
            return;
        }
        let pos = self.pos;
        if let Some(artist) = self.artist.as_mut() {
            artist.draw(pos, game_time, sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::controller::LimitedTime;

    fn dot(id: &str, x: f32, y: f32) -> GameObject {
        GameObject::new(id, ObjectTag::Decoration, Vec2::new(x, y), Vec2::ZERO)
            .with_collider(Collider::circle("c", 2.0))
    }

    #[test]
    fn test_inactive_object_is_frozen() {
        let mut obj = GameObject::new("o", ObjectTag::Enemy, Vec2::new(5.0, 5.0), Vec2::ONE);
        obj.set_active(false);
        obj.set_pos(Vec2::new(100.0, 100.0));
        obj.set_vx(42.0);
        obj.advance(1.0);
        assert_eq!(obj.pos(), Vec2::new(5.0, 5.0));
        assert_eq!(obj.vel(), Vec2::ONE);

        obj.set_active(true);
        obj.set_y(0.0);
        assert_eq!(obj.pos(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_collision_detection_any_pair() {
        let a = dot("a", 0.0, 0.0).with_collider(Collider::circle("far", 1.0).with_offset(Vec2::new(30.0, 0.0)));
        let b = dot("b", 31.0, 0.0);
        assert!(a.collision_detection(&b).unwrap());
        assert!(!dot("c", 0.0, 0.0).collision_detection(&b).unwrap());
    }

    #[test]
    fn test_no_colliders_never_collide() {
        let bare = GameObject::new("bare", ObjectTag::Effect, Vec2::ZERO, Vec2::ZERO);
        assert!(!bare.collision_detection(&dot("a", 0.0, 0.0)).unwrap());
    }

    #[test]
    fn test_configure_routes_to_controller() {
        let mut obj = dot("shot", 0.0, 0.0).with_controller(LimitedTime::new(0.0, 1.0));
        obj.configure(Setting::Duration(4.0)).unwrap();
        assert_eq!(
            obj.configure(Setting::Speed(1.0)),
            Err(EngineError::UnsupportedSetting {
                controller: "limited_time",
                setting: "speed",
            })
        );
    }

    #[test]
    fn test_draw_uses_artist_while_active() {
        use crate::renderer::{CircleArtist, DisplayList, colors};

        let mut obj = dot("a", 3.0, 4.0);
        let mut list = DisplayList::new();
        obj.draw(0.0, &mut list);
        assert!(list.is_empty());

        obj.set_artist(Box::new(CircleArtist {
            radius: 2.0,
            color: colors::WHITE,
        }));
        obj.draw(0.0, &mut list);
        assert_eq!(list.len(), 1);

        obj.set_active(false);
        obj.draw(0.0, &mut list);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_configure_without_controller() {
        let mut obj = dot("a", 0.0, 0.0);
        assert!(matches!(
            obj.configure(Setting::Period(1.0)),
            Err(EngineError::UnsupportedSetting { controller: "none", .. })
        ));
    }
}
