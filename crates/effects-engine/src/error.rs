//! Error types for the engine seam.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a scene engine.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EngineError {
    /// The engine handle could not be created.
    #[error("engine creation failed: {0}")]
    CreateFailed(String),

    /// The scene could not be loaded.
    #[error("scene load failed: {0}")]
    LoadFailed(String),

    /// A playback operation failed.
    #[error("playback failed: {0}")]
    Playback(String),

    /// The engine does not support this capability.
    ///
    /// Tolerated by the player core: unsupported speed control is a no-op
    /// and unsupported time queries report zero.
    #[error("operation not supported by this engine")]
    Unsupported,
}
