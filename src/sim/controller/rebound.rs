use super::{Configurable, ObjectController, Setting, unsupported};
use crate::error::EngineError;
use crate::sim::object::GameObject;
use crate::sim::playground::Playground;

/// Ball motion: moves and reflects off all four playground edges.
#[derive(Debug, Clone, Copy)]
pub struct Rebound {
    radius: f32,
    speed_scale: f32,
}

impl Rebound {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            speed_scale: 1.0,
        }
    }
}

impl ObjectController for Rebound {
    fn name(&self) -> &'static str {
        "rebound"
    }

    fn update(&mut self, obj: &mut GameObject, pg: &mut Playground) -> Result<(), EngineError> {
        let (pos, mut vel) = (obj.pos(), obj.vel());
        let r = self.radius;

        if (pos.x - r <= 0.0 && vel.x < 0.0) || (pos.x + r >= pg.width() && vel.x > 0.0) {
            vel.x = -vel.x;
        }
        if (pos.y - r <= 0.0 && vel.y < 0.0) || (pos.y + r >= pg.height() && vel.y > 0.0) {
            vel.y = -vel.y;
        }
        obj.set_vel(vel);
        obj.advance(pg.timestep() * self.speed_scale);
        Ok(())
    }

    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }
}

impl Configurable for Rebound {
    fn apply(&mut self, setting: Setting) -> Result<(), EngineError> {
        match setting {
            Setting::Speed(scale) => {
                self.speed_scale = scale;
                Ok(())
            }
            other => Err(unsupported("rebound", other)),
        }
    }
}
