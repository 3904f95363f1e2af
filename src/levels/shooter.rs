//! Arcade shooter level
//!
//! Phase machine kept in level flags:
//! `start -> starting -> init -> playing{std, dying}`. The level ends when
//! no enemy is left (finished) or the last life is lost (game over).
//! Variants differ only in their `ShooterRules` and `ShooterReactions`.

use std::sync::Arc;

use glam::Vec2;

use super::reactions::{ShooterReactions, persist_highscore};
use super::{Level, Services};
use crate::assets::Animation;
use crate::consts::{
    COLLECT_COUNT, COLLECT_SCALE, COLLECT_SPEED_Y, DYING_INTERVAL, EGO_RADIUS, ENEMY_COUNT,
    ENEMY_FIRE_FACTOR, ENEMY_SCALE, ENEMY_SHOT_LIFETIME, ENEMY_SHOT_SPEED, ENEMY_SPEED_X,
    ENEMY_SPEED_Y, LEVEL_INIT_TIME, MINE_SPEED, READY_TEXT_DURATION, READY_TEXT_SPEED, STAR_COUNT,
    STAR_SPEED, START_LIVES,
};
use crate::error::EngineError;
use crate::renderer::{PlayMode, RenderSink, colors};
use crate::sim::controller::{EgoController, FallingStar, LimitedTime, Mine, Patrol, PeriodicReversal};
use crate::sim::flags::names;
use crate::sim::{EGO_ID, FlagValue, GameObject, ObjectTag, Playground, prefab};

pub const ENEMY_ANIMATION: &str = "sweetAlien";
pub const COLLECT_ANIMATION: &str = "heart";
pub const OBSTACLE_ID: &str = "obstacleRect";
const READY_TEXT_ID: &str = "ready?";

/// Coarse level phase, stored as text in the `gameStatus` level flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Start,
    Starting,
    Init,
    Playing,
}

impl GameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Start => "start",
            GameStatus::Starting => "starting",
            GameStatus::Init => "init",
            GameStatus::Playing => "playing",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "start" => Some(GameStatus::Start),
            "starting" => Some(GameStatus::Starting),
            "init" => Some(GameStatus::Init),
            "playing" => Some(GameStatus::Playing),
            _ => None,
        }
    }
}

/// Sub-phase of `Playing`, stored in the `detailedStatus` level flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailedStatus {
    Std,
    Dying,
}

impl DetailedStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DetailedStatus::Std => "std",
            DetailedStatus::Dying => "dying",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "std" => Some(DetailedStatus::Std),
            "dying" => Some(DetailedStatus::Dying),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyMotion {
    /// Bounce between the side margins, drift down
    Patrol,
    /// Patrol, plus a forced horizontal reversal every `period` seconds
    ZigZag { period: f32 },
}

/// Everything that tells one shooter variant from another
#[derive(Debug, Clone, PartialEq)]
pub struct ShooterRules {
    pub name: String,
    pub startup_message: String,
    pub enemies: usize,
    pub collectables: usize,
    /// Upper bound of the random initial enemy speed per axis
    pub enemy_speed: Vec2,
    pub enemy_scale: f32,
    pub motion: EnemyMotion,
    /// Fire probability per enemy per second
    pub fire_factor: f32,
    /// Shots head for the player instead of falling straight down
    pub aimed_shots: bool,
    /// Enemies enter from the top center heading down
    pub boss_entry: bool,
    /// Place an obstacle the player cannot pass
    pub obstacle: bool,
    /// Mine drop probability per enemy per second
    pub mine_factor: f32,
}

impl ShooterRules {
    pub fn level1() -> Self {
        Self {
            name: "level1".into(),
            startup_message: "Get ready for level 1!".into(),
            enemies: ENEMY_COUNT,
            collectables: COLLECT_COUNT,
            enemy_speed: Vec2::new(ENEMY_SPEED_X, ENEMY_SPEED_Y),
            enemy_scale: ENEMY_SCALE,
            motion: EnemyMotion::Patrol,
            fire_factor: ENEMY_FIRE_FACTOR,
            aimed_shots: false,
            boss_entry: false,
            obstacle: false,
            mine_factor: 0.0,
        }
    }

    pub fn hit_twice() -> Self {
        Self {
            name: "hitTwice".into(),
            startup_message: "2 shots at alien required!!!".into(),
            enemies: 10,
            obstacle: true,
            ..Self::level1()
        }
    }

    pub fn zigzag() -> Self {
        Self {
            name: "zigzag".into(),
            startup_message: "Get ready for level 3!!!".into(),
            motion: EnemyMotion::ZigZag { period: 0.5 },
            ..Self::level1()
        }
    }

    pub fn taunt() -> Self {
        Self {
            name: "taunt".into(),
            startup_message: "Now it gets sour!".into(),
            ..Self::level1()
        }
    }

    pub fn boss() -> Self {
        Self {
            name: "boss".into(),
            startup_message: "BOSS LEVEL!".into(),
            enemies: 1,
            enemy_speed: Vec2::new(ENEMY_SPEED_X, ENEMY_SPEED_Y) * 2.0,
            enemy_scale: ENEMY_SCALE * 3.0,
            fire_factor: 1.5,
            aimed_shots: true,
            boss_entry: true,
            mine_factor: 0.2,
            ..Self::level1()
        }
    }
}

/// Per-run state the reactions may touch
#[derive(Debug)]
pub struct ShooterState {
    pub rules: ShooterRules,
    pub lost: bool,
    pub done: bool,
    pub start_time: f32,
    enemy_anim: Option<Arc<Animation>>,
    collect_anim: Option<Arc<Animation>>,
}

pub struct ShooterLevel<R> {
    state: ShooterState,
    reactions: R,
}

impl<R: ShooterReactions> ShooterLevel<R> {
    pub fn new(rules: ShooterRules, reactions: R) -> Self {
        Self {
            state: ShooterState {
                rules,
                lost: false,
                done: false,
                start_time: 0.0,
                enemy_anim: None,
                collect_anim: None,
            },
            reactions,
        }
    }

    pub fn state(&self) -> &ShooterState {
        &self.state
    }

    fn setup_initial_state(&mut self, pg: &mut Playground) {
        let t = pg.game_time();
        let size = pg.size();
        log::debug!("{}: start -> starting", self.state.rules.name);
        pg.set_level_flag(names::GAME_STATUS, GameStatus::Starting.as_str());

        create_stars(pg);
        pg.add_object(create_ego(size));
        pg.add_object(
            prefab::text(
                READY_TEXT_ID,
                ObjectTag::Effect,
                Vec2::new(size.x / 2.0, 0.0),
                Vec2::new(0.0, READY_TEXT_SPEED),
                &self.state.rules.startup_message,
                50.0,
                colors::RED,
                false,
            )
            .with_controller(LimitedTime::new(t, READY_TEXT_DURATION)),
        );
        if self.state.rules.obstacle {
            pg.add_object(prefab::rect_body(
                OBSTACLE_ID,
                ObjectTag::Obstacle,
                Vec2::new(600.0, 300.0),
                Vec2::ZERO,
                Vec2::new(20.0, 100.0),
                colors::RED,
            ));
        }
    }

    fn create_enemies(&mut self, pg: &mut Playground) {
        let rules = &self.state.rules;
        let anim = self
            .state
            .enemy_anim
            .clone()
            .unwrap_or_else(|| Arc::new(Animation::placeholder(ENEMY_ANIMATION, Vec2::splat(40.0))));
        let t = pg.game_time();
        let (w, h) = (pg.width(), pg.height());

        for i in 0..rules.enemies {
            let (pos, vel) = if rules.boss_entry {
                let vx = 2.0 * (pg.random() - 0.5) * rules.enemy_speed.x;
                (Vec2::new(w / 2.0, 10.0), Vec2::new(vx, 50.0))
            } else {
                let x = pg.random() * w;
                let y = pg.random() * h / 3.0;
                let vx = 2.0 * (pg.random() - 0.5) * rules.enemy_speed.x;
                let vy = pg.random() * rules.enemy_speed.y;
                (Vec2::new(x, y), Vec2::new(vx, vy))
            };
            let body = prefab::animated(
                format!("enemy{i}"),
                ObjectTag::Enemy,
                pos,
                vel,
                rules.enemy_scale,
                Arc::clone(&anim),
                t,
                PlayMode::Loop,
            );
            let enemy = match rules.motion {
                EnemyMotion::Patrol => body.with_controller(Patrol::default()),
                EnemyMotion::ZigZag { period } => {
                    body.with_controller(PeriodicReversal::new(Patrol::default(), t, period))
                }
            };
            pg.add_object(enemy);
        }
    }

    fn create_collectables(&mut self, pg: &mut Playground) {
        let anim = self
            .state
            .collect_anim
            .clone()
            .unwrap_or_else(|| Arc::new(Animation::placeholder(COLLECT_ANIMATION, Vec2::splat(60.0))));
        let t = pg.game_time();
        let (w, h) = (pg.width(), pg.height());

        for i in 0..self.state.rules.collectables {
            let x = pg.random() * w;
            let y = pg.random() * h / 3.0;
            let vy = pg.random() * COLLECT_SPEED_Y;
            pg.add_object(
                prefab::animated(
                    format!("collect{i}"),
                    ObjectTag::Collectable,
                    Vec2::new(x, y),
                    Vec2::new(0.0, vy),
                    COLLECT_SCALE,
                    Arc::clone(&anim),
                    t,
                    PlayMode::Loop,
                )
                .with_controller(Patrol::default()),
            );
        }
    }

    fn playing(&mut self, pg: &mut Playground, services: &mut Services) -> Result<(), EngineError> {
        let enemies = pg.collect_objects(ObjectTag::Enemy, false);
        if enemies.is_empty() {
            if !self.state.done {
                log::info!("{}: all enemies gone, level finished", self.state.rules.name);
                persist_highscore(pg, services)?;
                self.state.done = true;
            }
            return Ok(());
        }

        let shots = pg.collect_objects(ObjectTag::PlayerShot, true);
        for enemy in &enemies {
            if pg.collides(EGO_ID, enemy)? {
                self.reactions.enemy_contact(pg, enemy)?;
            }
            for shot in &shots {
                if pg.collides(enemy, shot)? {
                    self.reactions.enemy_hit(pg, enemy, shot)?;
                }
            }
        }

        for collect in pg.collect_objects(ObjectTag::Collectable, false) {
            if pg.collides(EGO_ID, &collect)? {
                self.reactions.collectable_touched(pg, &collect)?;
            }
        }

        for enemy in &enemies {
            self.maybe_fire(pg, enemy)?;
            self.maybe_drop_mine(pg, enemy)?;
        }

        // only the first hit of a tick counts
        for shot in pg.collect_objects(ObjectTag::EnemyShot, true) {
            if pg.collides(EGO_ID, &shot)? {
                self.reactions.player_hit(&mut self.state, pg, services, &shot)?;
                break;
            }
        }
        Ok(())
    }

    fn maybe_fire(&mut self, pg: &mut Playground, enemy: &str) -> Result<(), EngineError> {
        let chance = self.state.rules.fire_factor * pg.timestep();
        if pg.random() >= chance {
            return Ok(());
        }
        let n = pg.level_int_or(names::ENEMY_SHOT_COUNTER, 0)? + 1;
        pg.set_level_flag(names::ENEMY_SHOT_COUNTER, n);

        let pos = pg.require(enemy)?.pos();
        let t = pg.game_time();
        let id = format!("enemyShot{n}");
        let shot = if self.state.rules.aimed_shots {
            let target = pg.require(EGO_ID)?.pos();
            let vel = (target - pos).normalize_or_zero() * ENEMY_SHOT_SPEED;
            prefab::text(id, ObjectTag::EnemyShot, pos, vel, "*", 20.0, colors::GREEN, true)
        } else {
            let vel = Vec2::new(0.0, ENEMY_SHOT_SPEED);
            prefab::text(id, ObjectTag::EnemyShot, pos, vel, "I", 20.0, colors::YELLOW, true)
        };
        log::trace!("'{enemy}' fires shot {n}");
        pg.add_object(shot.with_controller(LimitedTime::new(t, ENEMY_SHOT_LIFETIME)));
        Ok(())
    }

    fn maybe_drop_mine(&mut self, pg: &mut Playground, enemy: &str) -> Result<(), EngineError> {
        let chance = self.state.rules.mine_factor * pg.timestep();
        if chance <= 0.0 || pg.random() >= chance {
            return Ok(());
        }
        let n = pg.level_int_or(names::ENEMY_SHOT_COUNTER, 0)? + 1;
        pg.set_level_flag(names::ENEMY_SHOT_COUNTER, n);
        let pos = pg.require(enemy)?.pos();
        pg.add_object(
            prefab::rect_body(
                format!("mine{n}"),
                ObjectTag::EnemyShot,
                pos,
                Vec2::new(0.0, ENEMY_SHOT_SPEED),
                Vec2::splat(8.0),
                colors::RED,
            )
            .with_controller(Mine::new(MINE_SPEED)),
        );
        Ok(())
    }

    fn dying(&mut self, pg: &mut Playground) -> Result<(), EngineError> {
        let since = pg.level_float(names::DYING_SINCE)?;
        if pg.game_time() - since <= DYING_INTERVAL {
            return Ok(());
        }
        log::debug!("{}: dying -> std", self.state.rules.name);
        pg.set_level_flag(names::DETAILED_STATUS, DetailedStatus::Std.as_str());
        pg.require_mut(EGO_ID)?.set_active(true);
        for id in pg.collect_objects(ObjectTag::Enemy, false) {
            if let Some(enemy) = pg.object_mut(&id) {
                enemy.set_active(true);
            }
        }
        Ok(())
    }
}

fn create_ego(size: Vec2) -> GameObject {
    prefab::circle_body(
        EGO_ID,
        ObjectTag::Player,
        Vec2::new(size.x / 2.0, size.y - 2.0 * EGO_RADIUS),
        Vec2::ZERO,
        EGO_RADIUS,
        colors::RED,
    )
    .with_controller(EgoController::collision_aware(EGO_RADIUS))
}

fn create_stars(pg: &mut Playground) {
    let w = pg.width();
    for i in 1..=STAR_COUNT {
        let x = pg.random() * w;
        let y = pg.random() * 15.0;
        let vy = pg.random() * STAR_SPEED;
        pg.add_object(
            prefab::circle_body(
                format!("star{i}"),
                ObjectTag::Decoration,
                Vec2::new(x, y),
                Vec2::new(0.0, vy),
                1.0,
                colors::WHITE,
            )
            .with_controller(FallingStar::default()),
        );
    }
}

/// Load an animation, falling back to a plain placeholder so a missing
/// asset never stops the level.
fn load_or_placeholder(services: &mut Services, name: &str, size: Vec2) -> Arc<Animation> {
    match services.assets.load_animation(name) {
        Ok(anim) if !anim.is_empty() => anim,
        Ok(_) => {
            log::warn!("Animation '{name}' has no frames, using placeholder");
            Arc::new(Animation::placeholder(name, size))
        }
        Err(e) => {
            log::warn!("{e}, using placeholder");
            Arc::new(Animation::placeholder(name, size))
        }
    }
}

fn status_flag<T>(
    pg: &Playground,
    name: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, EngineError> {
    let text = pg.level_text(name)?;
    parse(text).ok_or_else(|| EngineError::InvalidFlagAccess {
        key: format!("{}/{name}", pg.level()),
        expected: "status name",
        found: "unknown text",
    })
}

impl<R: ShooterReactions> Level for ShooterLevel<R> {
    fn name(&self) -> &str {
        &self.state.rules.name
    }

    fn preferred_size(&self) -> Vec2 {
        Vec2::new(crate::consts::CANVAS_WIDTH, crate::consts::CANVAS_HEIGHT)
    }

    fn prepare(&mut self, pg: &mut Playground, services: &mut Services) -> Result<(), EngineError> {
        pg.prepare(&self.state.rules.name);
        self.state.lost = false;
        self.state.done = false;
        self.state.start_time = pg.game_time();

        pg.global_int_or(names::POINTS, 0)?;
        pg.global_int_or(names::LIVES, START_LIVES)?;
        let best = services.scores.read_highscore();
        pg.set_global_flag(names::HIGHSCORE, best);

        pg.set_level_flag(names::ENEMY_SHOT_COUNTER, 0_i64);
        pg.set_level_flag(names::GAME_STATUS, GameStatus::Start.as_str());
        pg.set_level_flag(names::DETAILED_STATUS, DetailedStatus::Std.as_str());

        if self.state.enemy_anim.is_none() {
            self.state.enemy_anim = Some(load_or_placeholder(services, ENEMY_ANIMATION, Vec2::splat(40.0)));
        }
        if self.state.collect_anim.is_none() {
            self.state.collect_anim =
                Some(load_or_placeholder(services, COLLECT_ANIMATION, Vec2::splat(60.0)));
        }
        Ok(())
    }

    fn apply_game_logic(
        &mut self,
        pg: &mut Playground,
        services: &mut Services,
    ) -> Result<(), EngineError> {
        match status_flag(pg, names::GAME_STATUS, GameStatus::from_str)? {
            GameStatus::Start => self.setup_initial_state(pg),
            GameStatus::Starting => {
                if pg.game_time() - self.state.start_time > LEVEL_INIT_TIME {
                    log::debug!("{}: starting -> init", self.state.rules.name);
                    pg.set_level_flag(names::GAME_STATUS, GameStatus::Init.as_str());
                }
            }
            GameStatus::Init => {
                self.create_enemies(pg);
                self.create_collectables(pg);
                log::debug!("{}: init -> playing", self.state.rules.name);
                pg.set_level_flag(names::GAME_STATUS, GameStatus::Playing.as_str());
            }
            GameStatus::Playing => match status_flag(pg, names::DETAILED_STATUS, DetailedStatus::from_str)? {
                DetailedStatus::Std => self.playing(pg, services)?,
                DetailedStatus::Dying => self.dying(pg)?,
            },
        }
        Ok(())
    }

    fn level_finished(&self) -> bool {
        self.state.done
    }

    fn game_over(&self) -> bool {
        self.state.lost
    }

    fn draw_level(&self, pg: &Playground, sink: &mut dyn RenderSink) {
        let size = pg.size();
        sink.fill_rect(size / 2.0, size, colors::BACKGROUND);

        let global = |name: &str| pg.global_flag(name).and_then(FlagValue::as_int).unwrap_or(0);
        sink.draw_text(
            Vec2::new(10.0, 20.0),
            &format!("Points: {}", global(names::POINTS)),
            20.0,
            colors::HUD,
        );
        sink.draw_text(
            Vec2::new(size.x - 100.0, 20.0),
            &format!("Lives: {}", global(names::LIVES)),
            20.0,
            colors::HUD,
        );
        sink.draw_text(
            Vec2::new(10.0, 40.0),
            &format!("Highscore: {}", global(names::HIGHSCORE)),
            20.0,
            colors::HUD,
        );
        if pg.is_paused() {
            sink.draw_text(Vec2::new(30.0, 400.0), "Game paused", 50.0, colors::RED);
        }
    }
}
