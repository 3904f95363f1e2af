//! Player-driven controller
//!
//! Key semantics: pressing a movement key sets velocity along that axis and
//! zeroes the other; releasing a key stops the object only if it is the most
//! recently pressed movement key. Fire is rate limited and never counts as
//! the pressed key. Before moving, every `MoveGuard` may veto the step.

use glam::Vec2;

use super::{Configurable, LimitedTime, ObjectController, Setting, unsupported};
use crate::audio::SoundCue;
use crate::consts::{EGO_SPEED, ENEMY_SHOT_LIFETIME, FIRE_INTERVAL, SHOT_SPEED};
use crate::error::EngineError;
use crate::platform::input::{Key, KeyEvent, KeyState};
use crate::renderer::colors;
use crate::sim::flags::names;
use crate::sim::object::{GameObject, ObjectTag};
use crate::sim::playground::{GameEvent, Playground};
use crate::sim::prefab;

const SHOT_SIZE: Vec2 = Vec2::new(4.0, 12.0);

/// Half extents of the controlled body, for boundary checks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub half: Vec2,
}

impl Extent {
    pub fn radius(r: f32) -> Self {
        Self { half: Vec2::splat(r) }
    }

    pub fn rect(width: f32, height: f32) -> Self {
        Self {
            half: Vec2::new(width, height) * 0.5,
        }
    }
}

/// Veto on a planned move for this tick
pub trait MoveGuard {
    fn blocks(&self, obj: &mut GameObject, pg: &Playground) -> Result<bool, EngineError>;
}

/// Stops the object before its body would cross the playground edge.
#[derive(Debug, Clone, Copy)]
pub struct BoundsGuard {
    pub extent: Extent,
}

impl MoveGuard for BoundsGuard {
    fn blocks(&self, obj: &mut GameObject, pg: &Playground) -> Result<bool, EngineError> {
        let next = obj.pos() + obj.vel() * pg.timestep();
        let half = self.extent.half;
        let size = pg.size();
        Ok(next.x + half.x >= size.x
            || next.x - half.x < 0.0
            || next.y + half.y >= size.y
            || next.y - half.y < 0.0)
    }
}

/// Stops the object if its next step would touch an `Obstacle`.
///
/// Moves tentatively, tests, then restores the saved kinematics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObstacleGuard;

impl MoveGuard for ObstacleGuard {
    fn blocks(&self, obj: &mut GameObject, pg: &Playground) -> Result<bool, EngineError> {
        let saved = obj.kinematics();
        obj.advance(pg.timestep());

        let mut hit = false;
        for id in pg.collect_objects(ObjectTag::Obstacle, false) {
            if pg.require(&id)?.collision_detection(obj)? {
                hit = true;
                break;
            }
        }
        obj.restore(saved);
        Ok(hit)
    }
}

pub struct EgoController {
    speed: f32,
    fire_interval: f32,
    fires: bool,
    last_shot_at: Option<f32>,
    pressed: Option<Key>,
    guards: Vec<Box<dyn MoveGuard>>,
}

impl EgoController {
    fn with_guard(extent: Extent) -> Self {
        Self {
            speed: EGO_SPEED,
            fire_interval: FIRE_INTERVAL,
            fires: true,
            last_shot_at: None,
            pressed: None,
            guards: vec![Box::new(BoundsGuard { extent })],
        }
    }

    /// Round body of the given radius, bounded by the playground.
    pub fn with_radius(radius: f32) -> Self {
        Self::with_guard(Extent::radius(radius))
    }

    /// Rectangular body, bounded by the playground.
    pub fn with_extent(width: f32, height: f32) -> Self {
        Self::with_guard(Extent::rect(width, height))
    }

    /// Round body that also refuses to move into obstacles.
    pub fn collision_aware(radius: f32) -> Self {
        Self::with_radius(radius).with_move_guard(ObstacleGuard)
    }

    pub fn with_move_guard(mut self, guard: impl MoveGuard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub fn without_fire(mut self) -> Self {
        self.fires = false;
        self
    }

    pub fn pressed_key(&self) -> Option<Key> {
        self.pressed
    }

    fn handle_key(&mut self, event: KeyEvent, obj: &mut GameObject, pg: &mut Playground) -> Result<(), EngineError> {
        match event.state {
            KeyState::Released => {
                if self.pressed == Some(event.key) {
                    obj.set_vel(Vec2::ZERO);
                    self.pressed = None;
                }
            }
            KeyState::Pressed if event.key == Key::Fire => {
                if self.fires {
                    self.fire(obj, pg)?;
                }
            }
            KeyState::Pressed if event.key.is_movement() => {
                self.pressed = Some(event.key);
                let s = self.speed;
                let vel = match event.key {
                    Key::Left => Vec2::new(-s, 0.0),
                    Key::Right => Vec2::new(s, 0.0),
                    Key::Up => Vec2::new(0.0, -s),
                    Key::Down => Vec2::new(0.0, s),
                    _ => Vec2::ZERO,
                };
                obj.set_vel(vel);
            }
            KeyState::Pressed => {}
        }
        Ok(())
    }

    fn fire(&mut self, obj: &GameObject, pg: &mut Playground) -> Result<(), EngineError> {
        let now = pg.game_time();
        if self
            .last_shot_at
            .is_some_and(|last| now - last < self.fire_interval)
        {
            return Ok(());
        }
        self.last_shot_at = Some(now);

        let n = pg.level_int_or(names::NEXT_SHOT, 0)?;
        pg.set_level_flag(names::NEXT_SHOT, n + 1);

        let shot = prefab::rect_body(
            format!("simpleShot{n}"),
            ObjectTag::PlayerShot,
            obj.pos(),
            Vec2::new(0.0, -SHOT_SPEED),
            SHOT_SIZE,
            colors::CYAN,
        )
        .with_controller(LimitedTime::new(now, ENEMY_SHOT_LIFETIME));

        log::trace!("Shot {} fired at {now:.2}", shot.id());
        pg.add_object(shot);
        pg.emit(GameEvent::Sound(SoundCue::Laser));
        Ok(())
    }
}

impl ObjectController for EgoController {
    fn name(&self) -> &'static str {
        "ego"
    }

    fn update(&mut self, obj: &mut GameObject, pg: &mut Playground) -> Result<(), EngineError> {
        for event in pg.take_key_events() {
            self.handle_key(event, obj, pg)?;
        }

        let mut blocked = false;
        for guard in &self.guards {
            if guard.blocks(obj, pg)? {
                blocked = true;
                break;
            }
        }
        if blocked {
            obj.set_vel(Vec2::ZERO);
        }

        obj.advance(pg.timestep());
        Ok(())
    }

    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }
}

impl Configurable for EgoController {
    fn apply(&mut self, setting: Setting) -> Result<(), EngineError> {
        match setting {
            Setting::Speed(v) => self.speed = v,
            Setting::FireInterval(v) => self.fire_interval = v,
            other => return Err(unsupported("ego", other)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::input::InputBatch;
    use crate::sim::collider::Collider;

    const DT: f32 = 0.01;

    fn setup() -> Playground {
        let mut pg = Playground::new(3);
        pg.prepare("test");
        pg.set_timestep(DT);
        pg.add_object_now(
            prefab::circle_body("ego", ObjectTag::Player, Vec2::new(350.0, 350.0), Vec2::ZERO, 15.0, colors::RED)
                .with_controller(EgoController::collision_aware(15.0)),
        );
        pg
    }

    fn tick_with(pg: &mut Playground, events: &[KeyEvent]) {
        let mut batch = InputBatch::default();
        batch.keys.extend(events.iter().copied());
        pg.process_input(batch);
        pg.update_objects();
    }

    fn ego_vel(pg: &Playground) -> Vec2 {
        pg.object("ego").unwrap().vel()
    }

    #[test]
    fn test_last_pressed_key_wins() {
        let mut pg = setup();
        tick_with(
            &mut pg,
            &[KeyEvent::pressed(Key::Left), KeyEvent::pressed(Key::Right)],
        );
        assert_eq!(ego_vel(&pg), Vec2::new(EGO_SPEED, 0.0));
        assert!(pg.object("ego").unwrap().pos().x > 350.0);
    }

    #[test]
    fn test_release_only_stops_for_pressed_key() {
        let mut pg = setup();
        tick_with(
            &mut pg,
            &[KeyEvent::pressed(Key::Left), KeyEvent::pressed(Key::Right)],
        );

        tick_with(&mut pg, &[KeyEvent::released(Key::Left)]);
        assert_eq!(ego_vel(&pg), Vec2::new(EGO_SPEED, 0.0));

        tick_with(&mut pg, &[KeyEvent::released(Key::Right)]);
        assert_eq!(ego_vel(&pg), Vec2::ZERO);
    }

    #[test]
    fn test_fire_does_not_replace_pressed_key() {
        let mut pg = setup();
        tick_with(
            &mut pg,
            &[KeyEvent::pressed(Key::Up), KeyEvent::pressed(Key::Fire)],
        );
        tick_with(&mut pg, &[KeyEvent::released(Key::Fire)]);
        assert_eq!(ego_vel(&pg), Vec2::new(0.0, -EGO_SPEED));
        assert_eq!(pg.collect_objects(ObjectTag::PlayerShot, false).len(), 1);
        assert_eq!(pg.drain_events(), vec![GameEvent::Sound(SoundCue::Laser)]);
    }

    #[test]
    fn test_fire_is_rate_limited() {
        let mut pg = setup();
        tick_with(
            &mut pg,
            &[KeyEvent::pressed(Key::Fire), KeyEvent::pressed(Key::Fire)],
        );
        assert_eq!(pg.collect_objects(ObjectTag::PlayerShot, false).len(), 1);

        pg.set_game_time(FIRE_INTERVAL + 0.01);
        tick_with(&mut pg, &[KeyEvent::pressed(Key::Fire)]);
        assert_eq!(pg.collect_objects(ObjectTag::PlayerShot, false).len(), 2);
        assert_eq!(pg.level_int(names::NEXT_SHOT).unwrap(), 2);
    }

    #[test]
    fn test_stops_at_playground_edge() {
        let mut pg = setup();
        pg.require_mut("ego").unwrap().set_pos(Vec2::new(16.0, 350.0));
        tick_with(&mut pg, &[KeyEvent::pressed(Key::Left)]);
        let ego = pg.object("ego").unwrap();
        assert_eq!(ego.vel(), Vec2::ZERO);
        assert_eq!(ego.pos().x, 16.0);
    }

    #[test]
    fn test_obstacle_blocks_and_position_is_restored() {
        let mut pg = setup();
        pg.add_object_now(
            GameObject::new("wall", ObjectTag::Obstacle, Vec2::new(370.0, 350.0), Vec2::ZERO)
                .with_collider(Collider::rect("wall", 4.0, 100.0)),
        );
        // 18 px from the wall center now, 15.8 px after one 2.2 px step
        pg.require_mut("ego").unwrap().set_pos(Vec2::new(352.0, 350.0));
        let start = pg.object("ego").unwrap().pos();

        tick_with(&mut pg, &[KeyEvent::pressed(Key::Right)]);
        let ego = pg.object("ego").unwrap();
        assert_eq!(ego.vel(), Vec2::ZERO);
        assert_eq!(ego.pos(), start);
    }

    #[test]
    fn test_configure_speed() {
        let mut pg = setup();
        pg.require_mut("ego")
            .unwrap()
            .configure(Setting::Speed(100.0))
            .unwrap();
        tick_with(&mut pg, &[KeyEvent::pressed(Key::Down)]);
        assert_eq!(ego_vel(&pg), Vec2::new(0.0, 100.0));
    }
}
