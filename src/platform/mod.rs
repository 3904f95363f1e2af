//! Platform abstraction layer
//!
//! Boundary between the simulation and whatever hosts it:
//! - Input events (buffered, swapped per tick)
//! - UI commands (single slot, poll and acknowledge)
//! - Frame presentation (paint thread with back-pressure)

pub mod command;
pub mod frame;
pub mod headless;
pub mod input;

pub use command::{Command, CommandSlot};
pub use frame::{FrameGate, FramePresenter, Painter, Presenter};
pub use headless::HeadlessPainter;
pub use input::{InputBatch, InputEvent, InputQueue, Key, KeyEvent, KeyState};
