//! Typed key/value flags with global and per-level scopes
//!
//! Keys are namespaced strings: `global/<name>` survives level changes,
//! `<level>/<name>` is discarded when a level is prepared, and object flags
//! live under `<level>/<object id>/<name>`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const GLOBAL_PREFIX: &str = "global";

/// Well-known flag names shared between levels and the HUD
pub mod names {
    pub const POINTS: &str = "points";
    pub const LIVES: &str = "egoLives";
    pub const HIGHSCORE: &str = "highscore";
    pub const GAME_STATUS: &str = "gameStatus";
    pub const DETAILED_STATUS: &str = "detailedStatus";
    pub const DYING_SINCE: &str = "t0";
    pub const ENEMY_SHOT_COUNTER: &str = "enemyShotCounter";
    pub const NEXT_SHOT: &str = "nextShot";
    pub const HIT_COUNTER: &str = "counter";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlagValue {
    Int(i64),
    Float(f32),
    Bool(bool),
    Text(String),
}

impl FlagValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FlagValue::Int(_) => "int",
            FlagValue::Float(_) => "float",
            FlagValue::Bool(_) => "bool",
            FlagValue::Text(_) => "text",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FlagValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            FlagValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FlagValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for FlagValue {
    fn from(v: i64) -> Self {
        FlagValue::Int(v)
    }
}

impl From<f32> for FlagValue {
    fn from(v: f32) -> Self {
        FlagValue::Float(v)
    }
}

impl From<bool> for FlagValue {
    fn from(v: bool) -> Self {
        FlagValue::Bool(v)
    }
}

impl From<&str> for FlagValue {
    fn from(v: &str) -> Self {
        FlagValue::Text(v.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(v: String) -> Self {
        FlagValue::Text(v)
    }
}

/// Which flags `FlagStore::reset` discards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagScope {
    Global,
    Level,
    All,
}

#[derive(Debug, Clone, Default)]
pub struct FlagStore {
    values: HashMap<String, FlagValue>,
}

impl FlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global_key(name: &str) -> String {
        format!("{GLOBAL_PREFIX}/{name}")
    }

    pub fn level_key(level: &str, name: &str) -> String {
        format!("{level}/{name}")
    }

    pub fn object_key(level: &str, object_id: &str, name: &str) -> String {
        format!("{level}/{object_id}/{name}")
    }

    fn is_global(key: &str) -> bool {
        key.split_once('/')
            .is_some_and(|(scope, _)| scope == GLOBAL_PREFIX)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FlagValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Return the stored value, storing `default` first when the key is absent.
    pub fn get_or_create(&mut self, key: impl Into<String>, default: impl Into<FlagValue>) -> &FlagValue {
        self.values.entry(key.into()).or_insert_with(|| default.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<FlagValue> {
        self.values.remove(key)
    }

    pub fn int(&self, key: &str) -> Result<i64, EngineError> {
        let value = self.require(key, "int")?;
        value.as_int().ok_or_else(|| mismatch(key, "int", value))
    }

    pub fn float(&self, key: &str) -> Result<f32, EngineError> {
        let value = self.require(key, "float")?;
        value.as_float().ok_or_else(|| mismatch(key, "float", value))
    }

    pub fn bool(&self, key: &str) -> Result<bool, EngineError> {
        let value = self.require(key, "bool")?;
        value.as_bool().ok_or_else(|| mismatch(key, "bool", value))
    }

    pub fn text(&self, key: &str) -> Result<&str, EngineError> {
        let value = self.require(key, "text")?;
        value.as_text().ok_or_else(|| mismatch(key, "text", value))
    }

    /// Integer flag, created with `default` when absent.
    pub fn int_or(&mut self, key: &str, default: i64) -> Result<i64, EngineError> {
        self.get_or_create(key, default);
        self.int(key)
    }

    pub fn float_or(&mut self, key: &str, default: f32) -> Result<f32, EngineError> {
        self.get_or_create(key, default);
        self.float(key)
    }

    pub fn reset(&mut self, scope: FlagScope) {
        match scope {
            FlagScope::All => self.values.clear(),
            FlagScope::Global => self.values.retain(|k, _| !Self::is_global(k)),
            FlagScope::Level => self.values.retain(|k, _| Self::is_global(k)),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, key: &str, expected: &'static str) -> Result<&FlagValue, EngineError> {
        self.values
            .get(key)
            .ok_or_else(|| EngineError::InvalidFlagAccess {
                key: key.to_string(),
                expected,
                found: "nothing",
            })
    }
}

fn mismatch(key: &str, expected: &'static str, found: &FlagValue) -> EngineError {
    EngineError::InvalidFlagAccess {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let mut flags = FlagStore::new();
        flags.set("global/points", 1200_i64);
        flags.set("level1/gameStatus", "playing");

        assert_eq!(flags.int("global/points").unwrap(), 1200);
        assert_eq!(flags.text("level1/gameStatus").unwrap(), "playing");
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let mut flags = FlagStore::new();
        flags.set("global/points", "lots");

        let err = flags.int("global/points").unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidFlagAccess {
                key: "global/points".into(),
                expected: "int",
                found: "text",
            }
        );
    }

    #[test]
    fn test_missing_flag_is_reported() {
        let flags = FlagStore::new();
        assert!(matches!(
            flags.float("level1/t0"),
            Err(EngineError::InvalidFlagAccess { found: "nothing", .. })
        ));
    }

    #[test]
    fn test_get_or_create_keeps_existing() {
        let mut flags = FlagStore::new();
        assert_eq!(flags.int_or("global/egoLives", 5).unwrap(), 5);
        flags.set("global/egoLives", 2_i64);
        assert_eq!(flags.int_or("global/egoLives", 5).unwrap(), 2);
    }

    #[test]
    fn test_reset_scopes() {
        let mut flags = FlagStore::new();
        flags.set(FlagStore::global_key("points"), 10_i64);
        flags.set(FlagStore::level_key("level1", "t0"), 1.5_f32);
        flags.set(FlagStore::object_key("level1", "enemy3", "counter"), 1_i64);

        flags.reset(FlagScope::Level);
        assert_eq!(flags.len(), 1);
        assert!(flags.contains("global/points"));

        flags.set(FlagStore::level_key("level1", "t0"), 1.5_f32);
        flags.reset(FlagScope::Global);
        assert_eq!(flags.len(), 1);
        assert!(flags.contains("level1/t0"));

        flags.reset(FlagScope::All);
        assert!(flags.is_empty());
    }
}
