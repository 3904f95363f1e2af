//! Engine error type
//!
//! One enum for every failure the simulation or its boundary services can report.
//! Recoverable failures (assets, persistence) are logged by their callers; collider
//! pairing errors are programming errors and propagate.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// Two collider shapes have no pairwise test
    UnsupportedColliderPairing { a: &'static str, b: &'static str },
    /// A descriptor, frame or sound could not be read
    AssetLoad { path: String, reason: String },
    /// Score or settings file could not be written
    PersistenceWrite { path: String, reason: String },
    /// Flag missing, or stored with a different type than the caller assumed
    InvalidFlagAccess {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Game logic requires an object that is not registered
    MissingObject { id: String },
    /// Controller does not accept the given typed setting
    UnsupportedSetting {
        controller: &'static str,
        setting: &'static str,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedColliderPairing { a, b } => {
                write!(f, "no collision test for collider pair {a}/{b}")
            }
            Self::AssetLoad { path, reason } => write!(f, "failed to load asset {path}: {reason}"),
            Self::PersistenceWrite { path, reason } => {
                write!(f, "failed to write {path}: {reason}")
            }
            Self::InvalidFlagAccess {
                key,
                expected,
                found,
            } => write!(f, "flag {key}: expected {expected}, found {found}"),
            Self::MissingObject { id } => write!(f, "object '{id}' is not registered"),
            Self::UnsupportedSetting {
                controller,
                setting,
            } => write!(f, "{controller} does not accept setting {setting}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    pub fn missing(id: impl Into<String>) -> Self {
        Self::MissingObject { id: id.into() }
    }
}
