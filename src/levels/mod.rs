//! Levels: game rules on top of the shared playground
//!
//! A level owns no objects itself. It populates the playground on
//! `prepare`, inspects and mutates it once per tick in `apply_game_logic`,
//! and draws the background and HUD in `draw_level`.

pub mod breakout;
pub mod reactions;
pub mod shooter;

use glam::Vec2;

pub use breakout::BreakoutLevel;
pub use reactions::{MultiHit, ShooterReactions, StandardReactions};
pub use shooter::{ShooterLevel, ShooterRules};

use crate::assets::AssetLoader;
use crate::error::EngineError;
use crate::highscores::ScoreStore;
use crate::renderer::RenderSink;
use crate::sim::Playground;

/// Boundary services a level may need while preparing or playing
pub struct Services {
    pub scores: Box<dyn ScoreStore>,
    pub assets: Box<dyn AssetLoader>,
}

impl Services {
    pub fn new(scores: impl ScoreStore + 'static, assets: impl AssetLoader + 'static) -> Self {
        Self {
            scores: Box::new(scores),
            assets: Box::new(assets),
        }
    }
}

pub trait Level {
    fn name(&self) -> &str;

    /// Canvas size this level is laid out for
    fn preferred_size(&self) -> Vec2;

    /// Reset the playground for this level and create its initial objects.
    fn prepare(&mut self, pg: &mut Playground, services: &mut Services) -> Result<(), EngineError>;

    /// Level rules for one tick, run after all objects have updated.
    fn apply_game_logic(
        &mut self,
        pg: &mut Playground,
        services: &mut Services,
    ) -> Result<(), EngineError>;

    fn level_finished(&self) -> bool;

    fn game_over(&self) -> bool;

    /// Background and HUD, drawn before the objects.
    fn draw_level(&self, pg: &Playground, sink: &mut dyn RenderSink);
}

/// The shooter campaign in play order
pub fn shooter_campaign() -> Vec<Box<dyn Level>> {
    vec![
        Box::new(ShooterLevel::new(ShooterRules::level1(), StandardReactions)),
        Box::new(ShooterLevel::new(ShooterRules::hit_twice(), MultiHit::new(2))),
        Box::new(ShooterLevel::new(ShooterRules::zigzag(), StandardReactions)),
        Box::new(ShooterLevel::new(
            ShooterRules::taunt(),
            MultiHit::new(2).with_taunt("Aua"),
        )),
        Box::new(ShooterLevel::new(ShooterRules::boss(), MultiHit::new(10))),
    ]
}

/// The breakout campaign
pub fn breakout_campaign() -> Vec<Box<dyn Level>> {
    vec![Box::new(BreakoutLevel::new())]
}
