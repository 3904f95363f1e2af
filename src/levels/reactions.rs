//! Shooter collision reactions
//!
//! The four hooks a shooter variant can replace. Default bodies delegate to
//! the free functions here so an override can still fall back to them.

use glam::Vec2;

use super::Services;
use super::shooter::{DetailedStatus, ShooterState};
use crate::audio::SoundCue;
use crate::consts::{
    BONUS_DURATION, CONTACT_PENALTY, DYING_INTERVAL, ENEMY_POINTS, SHARD_COUNT, SHARD_SPEED,
};
use crate::error::EngineError;
use crate::renderer::{Color, colors};
use crate::sim::controller::LimitedTime;
use crate::sim::flags::names;
use crate::sim::{EGO_ID, GameEvent, ObjectTag, Playground, prefab};

pub const BONUS_TEXT_ID: &str = "bonustext";
pub const OUCH_TEXT_ID: &str = "AUA-EGO";

pub trait ShooterReactions {
    /// A player shot touched an enemy.
    fn enemy_hit(&mut self, pg: &mut Playground, enemy: &str, shot: &str) -> Result<(), EngineError> {
        destroy_enemy(pg, enemy, shot)
    }

    /// The player touched a collectable.
    fn collectable_touched(&mut self, pg: &mut Playground, collect: &str) -> Result<(), EngineError> {
        grant_extra_life(pg, collect)
    }

    /// The player touched an enemy.
    fn enemy_contact(&mut self, pg: &mut Playground, _enemy: &str) -> Result<(), EngineError> {
        punish_contact(pg)
    }

    /// An enemy shot touched the player.
    fn player_hit(
        &mut self,
        state: &mut ShooterState,
        pg: &mut Playground,
        services: &mut Services,
        shot: &str,
    ) -> Result<(), EngineError> {
        player_hit(state, pg, services, shot)
    }
}

/// Every hit is lethal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardReactions;

impl ShooterReactions for StandardReactions {}

/// Enemies survive until hit `required` times, optionally taunting the
/// player on each survived hit.
#[derive(Debug, Clone)]
pub struct MultiHit {
    required: i64,
    taunt: Option<String>,
}

impl MultiHit {
    pub fn new(required: i64) -> Self {
        Self {
            required,
            taunt: None,
        }
    }

    pub fn with_taunt(mut self, text: &str) -> Self {
        self.taunt = Some(text.to_string());
        self
    }
}

impl ShooterReactions for MultiHit {
    fn enemy_hit(&mut self, pg: &mut Playground, enemy: &str, shot: &str) -> Result<(), EngineError> {
        let hits = pg.object_int_or(enemy, names::HIT_COUNTER, 0)? + 1;
        if hits >= self.required {
            log::trace!("'{enemy}' took {hits} hits, destroyed");
            destroy_enemy(pg, enemy, shot)?;
        } else {
            log::trace!("'{enemy}' took {hits} of {} hits", self.required);
            pg.set_object_flag(enemy, names::HIT_COUNTER, hits);
            if let Some(taunt) = &self.taunt {
                let (pos, vel) = {
                    let e = pg.require(enemy)?;
                    (e.pos(), e.vel())
                };
                let drift = random_spread(pg) + vel;
                let t = pg.game_time();
                pg.add_object(
                    prefab::text(
                        format!("bonus{enemy}"),
                        ObjectTag::Effect,
                        pos,
                        drift,
                        taunt,
                        20.0,
                        colors::YELLOW,
                        false,
                    )
                    .with_controller(LimitedTime::new(t, BONUS_DURATION)),
                );
            }
        }
        pg.delete_object(shot);
        Ok(())
    }
}

/// Random velocity with each axis in `±SHARD_SPEED`
fn random_spread(pg: &mut Playground) -> Vec2 {
    let vx = 2.0 * (pg.random() - 0.5) * SHARD_SPEED;
    let vy = 2.0 * (pg.random() - 0.5) * SHARD_SPEED;
    Vec2::new(vx, vy)
}

/// Cloud of short-lived shards around `pos`, inheriting `vel`.
pub fn spawn_explosion(pg: &mut Playground, base: &str, pos: Vec2, vel: Vec2, color: Color) {
    let t = pg.game_time();
    let serial = pg.next_serial();
    for i in 0..SHARD_COUNT {
        let v = random_spread(pg) + vel;
        pg.add_object(
            prefab::circle_body(format!("{base}{serial}/{i}"), ObjectTag::Effect, pos, v, 2.0, color)
                .with_controller(LimitedTime::new(t, DYING_INTERVAL)),
        );
    }
}

pub fn destroy_enemy(pg: &mut Playground, enemy: &str, shot: &str) -> Result<(), EngineError> {
    let (pos, vel) = {
        let e = pg.require(enemy)?;
        (e.pos(), e.vel())
    };
    spawn_explosion(pg, "shard", pos, vel, colors::RED);
    pg.emit(GameEvent::Sound(SoundCue::Smash));
    pg.delete_object(enemy);
    pg.delete_object(shot);
    pg.add_to_global(names::POINTS, ENEMY_POINTS)?;
    Ok(())
}

/// One extra life per collectable, at most one bonus text in flight.
pub fn grant_extra_life(pg: &mut Playground, collect: &str) -> Result<(), EngineError> {
    if pg.has_object_or_pending(BONUS_TEXT_ID) {
        return Ok(());
    }
    let (pos, vel) = {
        let c = pg.require(collect)?;
        (c.pos(), c.vel())
    };
    let drift = random_spread(pg) + vel;
    let t = pg.game_time();
    pg.add_object(
        prefab::text(
            BONUS_TEXT_ID,
            ObjectTag::Effect,
            pos,
            drift,
            "Extra life!!",
            20.0,
            colors::YELLOW,
            false,
        )
        .with_controller(LimitedTime::new(t, BONUS_DURATION)),
    );
    pg.delete_object(collect);
    let lives = pg.add_to_global(names::LIVES, 1)?;
    log::debug!("Extra life, now {lives}");
    Ok(())
}

/// Points penalty for touching an enemy, once per contact window.
pub fn punish_contact(pg: &mut Playground) -> Result<(), EngineError> {
    if pg.has_object_or_pending(OUCH_TEXT_ID) {
        return Ok(());
    }
    let (pos, vel) = {
        let ego = pg.require(EGO_ID)?;
        (ego.pos(), ego.vel())
    };
    let t = pg.game_time();
    pg.add_object(
        prefab::text(
            OUCH_TEXT_ID,
            ObjectTag::Effect,
            pos - Vec2::new(0.0, 20.0),
            vel,
            "AUAA!!",
            10.0,
            colors::RED,
            false,
        )
        .with_controller(LimitedTime::new(t, BONUS_DURATION)),
    );
    pg.add_to_global(names::POINTS, -CONTACT_PENALTY)?;
    Ok(())
}

/// Lose a life; on the last one the level is lost and the score recorded.
/// Otherwise the level enters its dying phase with everything frozen.
pub fn player_hit(
    state: &mut ShooterState,
    pg: &mut Playground,
    services: &mut Services,
    shot: &str,
) -> Result<(), EngineError> {
    let t = pg.game_time();
    pg.delete_object(shot);

    let lives = pg.add_to_global(names::LIVES, -1)?;
    log::info!("Player hit, {lives} lives left");
    if lives <= 0 {
        state.lost = true;
        log::info!("Game over");
        persist_highscore(pg, services)?;
    }

    for id in pg.collect_objects(ObjectTag::EnemyShot, true) {
        pg.delete_object(&id);
    }
    pg.set_level_flag(names::DETAILED_STATUS, DetailedStatus::Dying.as_str());
    pg.set_level_flag(names::DYING_SINCE, t);

    let (pos, vel) = {
        let ego = pg.require_mut(EGO_ID)?;
        ego.set_active(false);
        (ego.pos(), ego.vel())
    };
    spawn_explosion(pg, "egoexp", pos, vel, colors::WHITE);

    for id in pg.collect_objects(ObjectTag::Enemy, false) {
        if let Some(enemy) = pg.object_mut(&id) {
            enemy.set_y(0.0);
            enemy.set_active(false);
        }
    }
    Ok(())
}

/// Offer the current points to the score store. Write failures are logged
/// and the game goes on.
pub fn persist_highscore(pg: &mut Playground, services: &mut Services) -> Result<(), EngineError> {
    let points = pg.global_int_or(names::POINTS, 0)?;
    let best = pg.global_int_or(names::HIGHSCORE, 0)?;
    match services.scores.write_highscore(points, best) {
        Ok(true) => {
            log::info!("New highscore {points}");
            pg.set_global_flag(names::HIGHSCORE, points);
        }
        Ok(false) => log::debug!("Score {points} does not beat {best}"),
        Err(e) => log::error!("{e}"),
    }
    Ok(())
}
