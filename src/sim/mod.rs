//! Simulation module
//!
//! World state and per-object behavior. This module has no platform
//! dependencies:
//! - Timestep supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (by object id)
//! - Drawing goes through `RenderSink` only

pub mod collider;
pub mod controller;
pub mod flags;
pub mod object;
pub mod playground;
pub mod prefab;

pub use collider::{Collider, Shape};
pub use controller::{Configurable, ObjectController, Setting};
pub use flags::{FlagScope, FlagStore, FlagValue};
pub use object::{EGO_ID, GameObject, Kinematics, ObjectTag};
pub use playground::{GameEvent, Playground};
