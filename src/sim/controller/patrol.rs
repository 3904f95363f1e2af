//! Enemy movement: side-to-side patrol and periodic reversal

use super::{Configurable, ObjectController, Setting, unsupported};
use crate::consts::ESCAPE_PENALTY;
use crate::error::EngineError;
use crate::sim::flags::names;
use crate::sim::object::GameObject;
use crate::sim::playground::Playground;

/// Turns around near the side edges and costs points on reaching the bottom.
#[derive(Debug, Clone, Copy)]
pub struct Patrol {
    pub penalty: i64,
}

impl Default for Patrol {
    fn default() -> Self {
        Self {
            penalty: ESCAPE_PENALTY,
        }
    }
}

impl ObjectController for Patrol {
    fn name(&self) -> &'static str {
        "patrol"
    }

    fn update(&mut self, obj: &mut GameObject, pg: &mut Playground) -> Result<(), EngineError> {
        let width = pg.width();
        let (pos, vel) = (obj.pos(), obj.vel());

        if (pos.x > width * 0.9 && vel.x > 0.0) || (pos.x < width * 0.1 && vel.x < 0.0) {
            obj.set_vx(-vel.x);
        }

        if pos.y >= pg.height() {
            log::debug!("'{}' escaped at the bottom", obj.id());
            pg.delete_object(obj.id());
            pg.add_to_global(names::POINTS, -self.penalty)?;
        }

        obj.advance(pg.timestep());
        Ok(())
    }
}

/// Inverts horizontal velocity each time `(t - start) mod period` wraps,
/// then runs the inner controller.
#[derive(Debug, Clone)]
pub struct PeriodicReversal<C> {
    inner: C,
    start: f32,
    period: f32,
    last_phase: f32,
}

impl<C: ObjectController> PeriodicReversal<C> {
    pub fn new(inner: C, start: f32, period: f32) -> Self {
        Self {
            inner,
            start,
            period,
            last_phase: -1.0,
        }
    }
}

impl<C: ObjectController> ObjectController for PeriodicReversal<C> {
    fn name(&self) -> &'static str {
        "periodic_reversal"
    }

    fn update(&mut self, obj: &mut GameObject, pg: &mut Playground) -> Result<(), EngineError> {
        let phase = (pg.game_time() - self.start).rem_euclid(self.period);
        if phase < self.last_phase {
            obj.set_vx(-obj.vel().x);
        }
        self.last_phase = phase;
        self.inner.update(obj, pg)
    }

    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }
}

impl<C: ObjectController> Configurable for PeriodicReversal<C> {
    fn apply(&mut self, setting: Setting) -> Result<(), EngineError> {
        match setting {
            Setting::Period(p) if p > 0.0 => {
                self.period = p;
                Ok(())
            }
            other => Err(unsupported("periodic_reversal", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::object::ObjectTag;
    use glam::Vec2;

    fn enemy(pg: &mut Playground, x: f32, y: f32, vx: f32) {
        pg.add_object_now(
            GameObject::new("enemy", ObjectTag::Enemy, Vec2::new(x, y), Vec2::new(vx, 0.0))
                .with_controller(Patrol::default()),
        );
    }

    #[test]
    fn test_patrol_turns_at_edges() {
        let mut pg = Playground::new(1);
        pg.set_timestep(0.01);
        enemy(&mut pg, 650.0, 100.0, 60.0);
        pg.update_objects();
        assert_eq!(pg.object("enemy").unwrap().vel().x, -60.0);

        pg.require_mut("enemy").unwrap().set_x(50.0);
        pg.update_objects();
        assert_eq!(pg.object("enemy").unwrap().vel().x, 60.0);
    }

    #[test]
    fn test_patrol_escape_costs_points() {
        let mut pg = Playground::new(1);
        pg.set_global_flag(names::POINTS, 1000_i64);
        enemy(&mut pg, 300.0, 700.0, 0.0);
        pg.update_objects();
        assert!(pg.object("enemy").is_none());
        assert_eq!(pg.global_int(names::POINTS).unwrap(), 800);
    }

    #[test]
    fn test_reversal_on_phase_wrap() {
        let mut pg = Playground::new(1);
        pg.set_timestep(0.1);
        pg.add_object_now(
            GameObject::new("zz", ObjectTag::Enemy, Vec2::new(350.0, 100.0), Vec2::new(10.0, 0.0))
                .with_controller(PeriodicReversal::new(Patrol::default(), 0.0, 0.5)),
        );

        let mut flips = 0;
        let mut last_vx = 10.0;
        for step in 0..=10 {
            pg.set_game_time(step as f32 * 0.1);
            pg.update_objects();
            let vx = pg.object("zz").unwrap().vel().x;
            if vx != last_vx {
                flips += 1;
            }
            last_vx = vx;
        }
        // wraps at roughly 0.5 and 1.0
        assert_eq!(flips, 2);
    }

    #[test]
    fn test_reversal_period_setting() {
        let mut obj = GameObject::new("zz", ObjectTag::Enemy, Vec2::ZERO, Vec2::ZERO)
            .with_controller(PeriodicReversal::new(Patrol::default(), 0.0, 0.5));
        assert!(obj.configure(Setting::Period(0.25)).is_ok());
        assert!(obj.configure(Setting::Period(0.0)).is_err());
    }
}
