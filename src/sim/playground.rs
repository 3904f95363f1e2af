//! Playground: the shared world state levels and controllers operate on
//!
//! Holds the object registry, deferred add/remove queues, flags, the current
//! input batch, pause state, simulation time and the seeded RNG. Additions and
//! removals requested during a tick are applied at the end of
//! `update_objects`, additions first.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::flags::{FlagScope, FlagStore, FlagValue};
use super::object::{GameObject, ObjectTag};
use crate::audio::SoundCue;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::error::EngineError;
use crate::platform::input::{InputBatch, KeyEvent, MouseEvent};
use crate::renderer::RenderSink;

/// Side effects raised by the simulation for the outer loop to dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Sound(SoundCue),
}

#[derive(Debug)]
pub struct Playground {
    level: String,
    size: Vec2,
    objects: BTreeMap<String, GameObject>,
    pending_add: Vec<GameObject>,
    pending_delete: Vec<String>,
    /// Objects whose controller failed during the current tick
    faulted: BTreeSet<String>,
    flags: FlagStore,
    key_events: VecDeque<KeyEvent>,
    mouse_events: Vec<MouseEvent>,
    paused: bool,
    game_time: f32,
    timestep: f32,
    events: Vec<GameEvent>,
    serial: u64,
    rng: Pcg32,
}

impl Playground {
    pub fn new(seed: u64) -> Self {
        Self {
            level: String::new(),
            size: Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            objects: BTreeMap::new(),
            pending_add: Vec::new(),
            pending_delete: Vec::new(),
            faulted: BTreeSet::new(),
            flags: FlagStore::new(),
            key_events: VecDeque::new(),
            mouse_events: Vec::new(),
            paused: false,
            game_time: 0.0,
            timestep: 0.0,
            events: Vec::new(),
            serial: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Enter a level: drops all objects and level-scoped flags, restarts the
    /// clock, unpauses.
    pub fn prepare(&mut self, level: &str) {
        log::info!("Preparing playground for level '{level}'");
        self.reset();
        self.flags.reset(FlagScope::Level);
        self.level = level.to_string();
        self.game_time = 0.0;
        self.timestep = 0.0;
        self.paused = false;
    }

    /// Drop every object and pending mutation.
    pub fn reset(&mut self) {
        self.objects.clear();
        self.pending_add.clear();
        self.pending_delete.clear();
        self.faulted.clear();
        self.events.clear();
        self.key_events.clear();
        self.mouse_events.clear();
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    // --- objects ---

    /// Queue an object for insertion at the end of the current tick.
    pub fn add_object(&mut self, obj: GameObject) {
        self.pending_add.push(obj);
    }

    /// Insert immediately. For level setup outside the update loop.
    pub fn add_object_now(&mut self, obj: GameObject) {
        if let Some(old) = self.objects.insert(obj.id().to_string(), obj) {
            log::debug!("Replaced object '{}'", old.id());
        }
    }

    /// Queue an object for removal at the end of the current tick.
    pub fn delete_object(&mut self, id: &str) {
        self.pending_delete.push(id.to_string());
    }

    pub fn delete_object_now(&mut self, id: &str) -> Option<GameObject> {
        self.objects.remove(id)
    }

    pub fn object(&self, id: &str) -> Option<&GameObject> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: &str) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    pub fn require(&self, id: &str) -> Result<&GameObject, EngineError> {
        self.objects.get(id).ok_or_else(|| EngineError::missing(id))
    }

    pub fn require_mut(&mut self, id: &str) -> Result<&mut GameObject, EngineError> {
        self.objects.get_mut(id).ok_or_else(|| EngineError::missing(id))
    }

    /// Registered now, or queued for insertion this tick
    pub fn has_object_or_pending(&self, id: &str) -> bool {
        self.objects.contains_key(id) || self.pending_add.iter().any(|o| o.id() == id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn objects(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.values()
    }

    /// Ids of registered objects carrying `tag`, in id order. Objects whose
    /// controller failed this tick are left out.
    pub fn collect_objects(&self, tag: ObjectTag, active_only: bool) -> Vec<String> {
        self.objects
            .values()
            .filter(|o| o.tag() == tag)
            .filter(|o| !active_only || o.is_active())
            .filter(|o| !self.faulted.contains(o.id()))
            .map(|o| o.id().to_string())
            .collect()
    }

    /// Collision test between two registered objects.
    pub fn collides(&self, a: &str, b: &str) -> Result<bool, EngineError> {
        let first = self.require(a)?;
        let second = self.require(b)?;
        first.collision_detection(second)
    }

    pub fn is_faulted(&self, id: &str) -> bool {
        self.faulted.contains(id)
    }

    /// Run every active object's controller once, then apply queued
    /// additions and removals.
    ///
    /// A failing controller is logged and its object marked faulted for this
    /// tick; the remaining objects still update.
    pub fn update_objects(&mut self) {
        self.faulted.clear();
        let ids: Vec<String> = self.objects.keys().cloned().collect();

        for id in ids {
            let Some(mut obj) = self.objects.remove(&id) else {
                continue;
            };
            if obj.is_active() {
                if let Err(err) = obj.update(self) {
                    log::error!("Controller of '{id}' failed: {err}");
                    self.faulted.insert(id.clone());
                }
            }
            self.objects.insert(id, obj);
        }

        self.apply_pending();
    }

    /// Apply queued mutations: additions first, then removals.
    pub fn apply_pending(&mut self) {
        for obj in self.pending_add.drain(..) {
            if self.objects.insert(obj.id().to_string(), obj).is_some() {
                log::debug!("Pending add replaced an existing object");
            }
        }
        for id in self.pending_delete.drain(..) {
            if self.objects.remove(&id).is_none() {
                log::trace!("Delete of unknown object '{id}' ignored");
            }
        }
    }

    /// Draw every active object.
    pub fn draw_objects(&mut self, sink: &mut dyn RenderSink) {
        let time = self.game_time;
        for obj in self.objects.values_mut() {
            obj.draw(time, sink);
        }
    }

    // --- flags ---

    pub fn flags(&self) -> &FlagStore {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut FlagStore {
        &mut self.flags
    }

    pub fn reset_flags(&mut self, scope: FlagScope) {
        self.flags.reset(scope);
    }

    pub fn set_global_flag(&mut self, name: &str, value: impl Into<FlagValue>) {
        self.flags.set(FlagStore::global_key(name), value);
    }

    pub fn global_flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(&FlagStore::global_key(name))
    }

    pub fn global_int(&self, name: &str) -> Result<i64, EngineError> {
        self.flags.int(&FlagStore::global_key(name))
    }

    pub fn global_int_or(&mut self, name: &str, default: i64) -> Result<i64, EngineError> {
        self.flags.int_or(&FlagStore::global_key(name), default)
    }

    /// Add `delta` to an integer global flag (created at 0), returning the new value.
    pub fn add_to_global(&mut self, name: &str, delta: i64) -> Result<i64, EngineError> {
        let value = self.global_int_or(name, 0)? + delta;
        self.set_global_flag(name, value);
        Ok(value)
    }

    pub fn set_level_flag(&mut self, name: &str, value: impl Into<FlagValue>) {
        self.flags.set(FlagStore::level_key(&self.level, name), value);
    }

    pub fn level_flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(&FlagStore::level_key(&self.level, name))
    }

    pub fn level_int(&self, name: &str) -> Result<i64, EngineError> {
        self.flags.int(&FlagStore::level_key(&self.level, name))
    }

    pub fn level_int_or(&mut self, name: &str, default: i64) -> Result<i64, EngineError> {
        let key = FlagStore::level_key(&self.level, name);
        self.flags.int_or(&key, default)
    }

    pub fn level_float(&self, name: &str) -> Result<f32, EngineError> {
        self.flags.float(&FlagStore::level_key(&self.level, name))
    }

    pub fn level_text(&self, name: &str) -> Result<&str, EngineError> {
        self.flags.text(&FlagStore::level_key(&self.level, name))
    }

    pub fn set_object_flag(&mut self, id: &str, name: &str, value: impl Into<FlagValue>) {
        self.flags
            .set(FlagStore::object_key(&self.level, id, name), value);
    }

    pub fn object_flag(&self, id: &str, name: &str) -> Option<&FlagValue> {
        self.flags.get(&FlagStore::object_key(&self.level, id, name))
    }

    pub fn object_int_or(&mut self, id: &str, name: &str, default: i64) -> Result<i64, EngineError> {
        let key = FlagStore::object_key(&self.level, id, name);
        self.flags.int_or(&key, default)
    }

    // --- input ---

    /// Install the input batch for this tick, replacing the previous one.
    pub fn process_input(&mut self, batch: InputBatch) {
        self.key_events = batch.keys;
        self.mouse_events = batch.mouse;
    }

    /// Take this tick's key events in arrival order.
    pub fn take_key_events(&mut self) -> VecDeque<KeyEvent> {
        std::mem::take(&mut self.key_events)
    }

    pub fn mouse_events(&self) -> &[MouseEvent] {
        &self.mouse_events
    }

    // --- pause and time ---

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("Pause {}", if self.paused { "on" } else { "off" });
    }

    pub fn game_time(&self) -> f32 {
        self.game_time
    }

    pub fn set_game_time(&mut self, t: f32) {
        self.game_time = t;
    }

    /// Seconds simulated by the current tick
    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    pub fn set_timestep(&mut self, dt: f32) {
        self.timestep = dt;
    }

    // --- events, ids, randomness ---

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Monotonic counter for building unique object ids
    pub fn next_serial(&mut self) -> u64 {
        self.serial += 1;
        self.serial
    }

    /// Uniform sample in `[0, 1)`
    pub fn random(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}
