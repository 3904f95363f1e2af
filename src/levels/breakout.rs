//! Breakout: a paddle, a ball and a small brick wall
//!
//! No lives and no score. The level is finished once every brick is gone.

use glam::Vec2;

use super::{Level, Services};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::error::EngineError;
use crate::renderer::{RenderSink, colors};
use crate::sim::controller::{EgoController, Rebound};
use crate::sim::{EGO_ID, ObjectTag, Playground, prefab};

pub const BALL_ID: &str = "ball1";

const BALL_RADIUS: f32 = 5.0;
const PADDLE_SIZE: Vec2 = Vec2::new(80.0, 10.0);
const BRICK_SIZE: Vec2 = Vec2::new(56.0, 26.0);
/// Grid pitch including the gap between bricks
const BRICK_PITCH: Vec2 = Vec2::new(65.0, 35.0);
const BRICK_ORIGIN: Vec2 = Vec2::new(235.0, 40.0);
const BRICK_ROWS: usize = 3;
const BRICK_COLUMNS: usize = 3;
/// How far the ball is pushed off the paddle on contact
const PADDLE_PUSH: f32 = 2.0 * BALL_RADIUS;

#[derive(Debug, Default)]
pub struct BreakoutLevel {
    done: bool,
}

impl BreakoutLevel {
    pub fn new() -> Self {
        Self::default()
    }

    fn ball_hits_brick(pg: &mut Playground, brick: &str) -> Result<(), EngineError> {
        let ball = pg.require_mut(BALL_ID)?;
        let vy = ball.vel().y;
        ball.set_vy(-vy);
        pg.delete_object(brick);
        log::debug!("Brick '{brick}' removed");
        Ok(())
    }

    fn ball_hits_paddle(pg: &mut Playground) -> Result<(), EngineError> {
        let paddle_y = pg.require(EGO_ID)?.pos().y;
        let ball = pg.require_mut(BALL_ID)?;
        let y = ball.pos().y;
        ball.set_y(if y < paddle_y { y - PADDLE_PUSH } else { y + PADDLE_PUSH });
        let vy = ball.vel().y;
        ball.set_vy(-vy);
        log::trace!("Ball bounces off the paddle");
        Ok(())
    }
}

fn brick_position(row: usize, column: usize) -> Vec2 {
    BRICK_ORIGIN + Vec2::new(column as f32, row as f32) * BRICK_PITCH
}

impl Level for BreakoutLevel {
    fn name(&self) -> &str {
        "breakout"
    }

    fn preferred_size(&self) -> Vec2 {
        Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    fn prepare(&mut self, pg: &mut Playground, _services: &mut Services) -> Result<(), EngineError> {
        pg.prepare(self.name());
        self.done = false;

        for row in 0..BRICK_ROWS {
            for column in 0..BRICK_COLUMNS {
                pg.add_object_now(prefab::rect_body(
                    format!("brick{row}/{column}"),
                    ObjectTag::Brick,
                    brick_position(row, column),
                    Vec2::ZERO,
                    BRICK_SIZE,
                    colors::BLUE,
                ));
            }
        }
        pg.add_object_now(
            prefab::rect_body(
                EGO_ID,
                ObjectTag::Player,
                Vec2::new(350.0, 550.0),
                Vec2::ZERO,
                PADDLE_SIZE,
                colors::BLUE,
            )
            .with_controller(EgoController::with_extent(PADDLE_SIZE.x, PADDLE_SIZE.y).without_fire()),
        );
        pg.add_object_now(
            prefab::circle_body(
                BALL_ID,
                ObjectTag::Ball,
                Vec2::new(350.0, 350.0),
                Vec2::new(100.0, 100.0),
                BALL_RADIUS,
                colors::RED,
            )
            .with_controller(Rebound::new(BALL_RADIUS)),
        );
        log::info!("Breakout prepared with {} bricks", BRICK_ROWS * BRICK_COLUMNS);
        Ok(())
    }

    fn apply_game_logic(
        &mut self,
        pg: &mut Playground,
        _services: &mut Services,
    ) -> Result<(), EngineError> {
        let bricks = pg.collect_objects(ObjectTag::Brick, false);
        if bricks.is_empty() {
            if !self.done {
                log::info!("All bricks cleared");
                self.done = true;
            }
            return Ok(());
        }

        for brick in &bricks {
            if pg.collides(BALL_ID, brick)? {
                Self::ball_hits_brick(pg, brick)?;
            }
        }
        if pg.collides(EGO_ID, BALL_ID)? {
            Self::ball_hits_paddle(pg)?;
        }
        Ok(())
    }

    fn level_finished(&self) -> bool {
        self.done
    }

    fn game_over(&self) -> bool {
        false
    }

    fn draw_level(&self, pg: &Playground, sink: &mut dyn RenderSink) {
        let size = pg.size();
        sink.fill_rect(size / 2.0, size, colors::BREAKOUT_BACKGROUND);
        if pg.is_paused() {
            sink.draw_text(Vec2::new(30.0, 400.0), "Game paused", 50.0, colors::RED);
        }
    }
}
