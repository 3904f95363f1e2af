//! Highscore persistence
//!
//! One best score and the time it was set, persisted as JSON. Levels talk to
//! it through the `ScoreStore` trait so tests can swap in `MemoryScoreStore`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The best score so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HighScore {
    /// Final points, 0 when nothing was recorded yet
    pub best: i64,
    /// Unix timestamp (s) when `best` was set
    pub achieved_at: Option<u64>,
}

impl HighScore {
    /// Replace the record if `score` beats it. Non-positive scores never count.
    pub fn record(&mut self, score: i64, timestamp: u64) -> bool {
        if score <= 0 || score <= self.best {
            return false;
        }
        self.best = score;
        self.achieved_at = Some(timestamp);
        true
    }

    /// Load from a JSON file; a missing or unreadable file gives no record.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScore>(&json) {
                Ok(record) => {
                    log::info!("Loaded highscore {}", record.best);
                    record
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt highscore file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No highscore found, starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let write_err = |reason: String| EngineError::PersistenceWrite {
            path: path.display().to_string(),
            reason,
        };
        let json = serde_json::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| write_err(e.to_string()))?;
        log::info!("Highscore {} saved", self.best);
        Ok(())
    }
}

/// Persistence boundary used by levels
pub trait ScoreStore {
    /// Best recorded score, 0 when nothing is stored
    fn read_highscore(&mut self) -> i64;

    /// Record `current` if it beats `previous_best`. Returns whether a
    /// record was written.
    fn write_highscore(&mut self, current: i64, previous_best: i64) -> Result<bool, EngineError>;
}

/// Highscore kept in a JSON file
#[derive(Debug)]
pub struct FileScoreStore {
    path: PathBuf,
    record: HighScore,
}

impl FileScoreStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let record = HighScore::load(&path);
        Self { path, record }
    }

    pub fn record(&self) -> HighScore {
        self.record
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl ScoreStore for FileScoreStore {
    fn read_highscore(&mut self) -> i64 {
        self.record.best
    }

    fn write_highscore(&mut self, current: i64, previous_best: i64) -> Result<bool, EngineError> {
        if current <= previous_best {
            return Ok(false);
        }
        let mut updated = self.record;
        if !updated.record(current, unix_now()) {
            return Ok(false);
        }
        updated.save(&self.path)?;
        self.record = updated;
        Ok(true)
    }
}

/// In-memory store. Clones share state, so a test can keep one handle and
/// give the other to a level.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    inner: Arc<Mutex<MemoryScores>>,
}

#[derive(Debug, Default)]
struct MemoryScores {
    best: i64,
    attempts: Vec<(i64, i64)>,
    fail_writes: bool,
}

impl MemoryScoreStore {
    pub fn new(best: i64) -> Self {
        let store = Self::default();
        store.lock().best = best;
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryScores> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every `(current, previous_best)` passed to `write_highscore`
    pub fn attempts(&self) -> Vec<(i64, i64)> {
        self.lock().attempts.clone()
    }

    pub fn best(&self) -> i64 {
        self.lock().best
    }

    /// Make subsequent writes fail, to exercise error paths
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }
}

impl ScoreStore for MemoryScoreStore {
    fn read_highscore(&mut self) -> i64 {
        self.lock().best
    }

    fn write_highscore(&mut self, current: i64, previous_best: i64) -> Result<bool, EngineError> {
        let mut inner = self.lock();
        inner.attempts.push((current, previous_best));
        if inner.fail_writes {
            return Err(EngineError::PersistenceWrite {
                path: "memory".into(),
                reason: "writes disabled".into(),
            });
        }
        if current > previous_best {
            inner.best = current;
            return Ok(true);
        }
        Ok(false)
    }
}
