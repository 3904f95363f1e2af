//! Decorative and short-lived object behavior

use super::{Configurable, ObjectController, Setting, out_of_bounds, unsupported};
use crate::error::EngineError;
use crate::sim::object::GameObject;
use crate::sim::playground::Playground;

/// Falls and wraps back to the top once it reaches the bottom edge.
#[derive(Debug, Clone, Copy)]
pub struct FallingStar {
    pub radius: f32,
}

/// Row a wrapped star restarts on
const STAR_RESTART_Y: f32 = 10.0;

impl Default for FallingStar {
    fn default() -> Self {
        Self { radius: 3.0 }
    }
}

impl ObjectController for FallingStar {
    fn name(&self) -> &'static str {
        "falling_star"
    }

    fn update(&mut self, obj: &mut GameObject, pg: &mut Playground) -> Result<(), EngineError> {
        if obj.pos().y + self.radius >= pg.height() {
            obj.set_y(STAR_RESTART_Y);
        }
        obj.advance(pg.timestep());
        Ok(())
    }
}

/// Moves, and removes its object once it leaves the playground or outlives
/// `duration` seconds after `born`.
#[derive(Debug, Clone, Copy)]
pub struct LimitedTime {
    born: f32,
    duration: f32,
}

impl LimitedTime {
    pub fn new(born: f32, duration: f32) -> Self {
        Self { born, duration }
    }
}

impl ObjectController for LimitedTime {
    fn name(&self) -> &'static str {
        "limited_time"
    }

    fn update(&mut self, obj: &mut GameObject, pg: &mut Playground) -> Result<(), EngineError> {
        obj.advance(pg.timestep());
        if out_of_bounds(obj, pg) || pg.game_time() - self.born > self.duration {
            pg.delete_object(obj.id());
        }
        Ok(())
    }

    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }
}

impl Configurable for LimitedTime {
    fn apply(&mut self, setting: Setting) -> Result<(), EngineError> {
        match setting {
            Setting::Duration(d) => {
                self.duration = d;
                Ok(())
            }
            other => Err(unsupported("limited_time", other)),
        }
    }
}
