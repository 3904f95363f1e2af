//! Object controllers: per-object behavior run once per tick
//!
//! A controller receives its owning object and the playground it lives in.
//! Behaviors compose: wrappers such as `PeriodicReversal` add to an inner
//! controller, and `EgoController` consults a list of `MoveGuard`s.

mod ego;
mod mine;
mod patrol;
mod rebound;
mod timed;

pub use ego::{BoundsGuard, EgoController, Extent, MoveGuard, ObstacleGuard};
pub use mine::Mine;
pub use patrol::{Patrol, PeriodicReversal};
pub use rebound::Rebound;
pub use timed::{FallingStar, LimitedTime};

use super::object::GameObject;
use super::playground::Playground;
use crate::error::EngineError;

pub trait ObjectController {
    /// Short name used in logs and setting errors
    fn name(&self) -> &'static str;

    fn update(&mut self, obj: &mut GameObject, pg: &mut Playground) -> Result<(), EngineError>;

    /// Typed settings this controller accepts, if any
    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        None
    }
}

/// A typed, named tuning value applied to a controller at runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting {
    Speed(f32),
    FireInterval(f32),
    Period(f32),
    Duration(f32),
    LineSpeed(f32),
}

impl Setting {
    pub fn name(&self) -> &'static str {
        match self {
            Setting::Speed(_) => "speed",
            Setting::FireInterval(_) => "fire_interval",
            Setting::Period(_) => "period",
            Setting::Duration(_) => "duration",
            Setting::LineSpeed(_) => "line_speed",
        }
    }
}

pub trait Configurable {
    fn apply(&mut self, setting: Setting) -> Result<(), EngineError>;
}

fn unsupported(controller: &'static str, setting: Setting) -> EngineError {
    EngineError::UnsupportedSetting {
        controller,
        setting: setting.name(),
    }
}

/// True when `pos` lies outside the playground rectangle. The far edges
/// already count as outside.
pub(crate) fn out_of_bounds(obj: &GameObject, pg: &Playground) -> bool {
    let pos = obj.pos();
    pos.x < 0.0 || pos.y < 0.0 || pos.x >= pg.width() || pos.y >= pg.height()
}
