use super::{Configurable, ObjectController, Setting, unsupported};
use crate::error::EngineError;
use crate::sim::object::{EGO_ID, GameObject};
use crate::sim::playground::Playground;

/// Height above the bottom edge where a mine levels off
const MINE_FLOOR_OFFSET: f32 = 10.0;

/// Descends, then rolls sideways toward where the player was when it
/// landed. The direction is chosen once.
#[derive(Debug, Clone, Copy)]
pub struct Mine {
    line_speed: f32,
    direction: Option<f32>,
}

impl Mine {
    pub fn new(line_speed: f32) -> Self {
        Self {
            line_speed,
            direction: None,
        }
    }
}

impl ObjectController for Mine {
    fn name(&self) -> &'static str {
        "mine"
    }

    fn update(&mut self, obj: &mut GameObject, pg: &mut Playground) -> Result<(), EngineError> {
        if obj.pos().y >= pg.height() - MINE_FLOOR_OFFSET {
            let direction = match self.direction {
                Some(d) => d,
                None => {
                    let ego_x = pg.require(EGO_ID)?.pos().x;
                    let d = if ego_x > obj.pos().x { 1.0 } else { -1.0 };
                    self.direction = Some(d);
                    d
                }
            };
            obj.set_vy(0.0);
            obj.set_vx(direction * self.line_speed);
        }

        let x = obj.pos().x;
        if x < 0.0 || x > pg.width() {
            log::debug!("Mine '{}' left the playground", obj.id());
            pg.delete_object(obj.id());
        }

        obj.advance(pg.timestep());
        Ok(())
    }

    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }
}

impl Configurable for Mine {
    fn apply(&mut self, setting: Setting) -> Result<(), EngineError> {
        match setting {
            Setting::LineSpeed(v) => {
                self.line_speed = v;
                Ok(())
            }
            other => Err(unsupported("mine", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::object::ObjectTag;
    use glam::Vec2;

    fn mine_at(pg: &mut Playground, x: f32, y: f32) {
        pg.add_object_now(
            GameObject::new("mine", ObjectTag::EnemyShot, Vec2::new(x, y), Vec2::new(0.0, 40.0))
                .with_controller(Mine::new(50.0)),
        );
    }

    #[test]
    fn test_mine_heads_toward_player_once() {
        let mut pg = Playground::new(1);
        pg.set_timestep(0.1);
        pg.add_object_now(GameObject::new(EGO_ID, ObjectTag::Player, Vec2::new(600.0, 650.0), Vec2::ZERO));
        mine_at(&mut pg, 300.0, 695.0);

        pg.update_objects();
        assert_eq!(pg.object("mine").unwrap().vel(), Vec2::new(50.0, 0.0));

        // the player moving away does not change the chosen direction
        pg.require_mut(EGO_ID).unwrap().set_x(10.0);
        pg.update_objects();
        assert_eq!(pg.object("mine").unwrap().vel().x, 50.0);
    }

    #[test]
    fn test_mine_without_player_faults() {
        let mut pg = Playground::new(1);
        mine_at(&mut pg, 300.0, 695.0);
        pg.update_objects();
        assert!(pg.is_faulted("mine"));
        assert!(pg.object("mine").is_some());
    }

    #[test]
    fn test_mine_deleted_off_side() {
        let mut pg = Playground::new(1);
        pg.add_object_now(GameObject::new(EGO_ID, ObjectTag::Player, Vec2::new(0.0, 650.0), Vec2::ZERO));
        mine_at(&mut pg, -1.0, 100.0);
        pg.update_objects();
        assert!(pg.object("mine").is_none());
    }
}
