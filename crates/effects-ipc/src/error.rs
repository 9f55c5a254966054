//! Command failure taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that terminate a command with a failure result.
///
/// Argument and lifecycle errors are resolved locally and never mutate the
/// player state. Engine-reported failures additionally surface as an
/// `Error` event on the event channel.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CommandError {
    /// Missing or malformed command argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No engine handle exists for this instance yet.
    #[error("player not initialized")]
    NotInitialized,

    /// No scene has reached the ready state yet.
    #[error("no scene loaded")]
    SceneNotLoaded,

    /// The load could not be started.
    #[error("load error: {0}")]
    LoadError(String),

    /// The engine reported a load failure.
    #[error("load failed: {0}")]
    LoadFailed(String),

    /// Play was rejected by the current state or the engine.
    #[error("play error: {0}")]
    PlayError(String),

    /// Pause was rejected by the current state or the engine.
    #[error("pause error: {0}")]
    PauseError(String),

    /// Resume was rejected by the current state or the engine.
    #[error("resume error: {0}")]
    ResumeError(String),

    /// Stop was rejected by the current state or the engine.
    #[error("stop error: {0}")]
    StopError(String),

    /// Replay was rejected by the current state or the engine.
    #[error("replay error: {0}")]
    ReplayError(String),

    /// The loop setting could not be applied.
    #[error("set loop error: {0}")]
    SetLoopError(String),

    /// The speed setting was rejected.
    #[error("set speed error: {0}")]
    SetSpeedError(String),

    /// The current playback time could not be read.
    #[error("get time error: {0}")]
    GetTimeError(String),

    /// The scene duration could not be read.
    #[error("get duration error: {0}")]
    GetDurationError(String),
}

impl CommandError {
    /// The wire error code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::SceneNotLoaded => "SCENE_NOT_LOADED",
            Self::LoadError(_) => "LOAD_ERROR",
            Self::LoadFailed(_) => "LOAD_FAILED",
            Self::PlayError(_) => "PLAY_ERROR",
            Self::PauseError(_) => "PAUSE_ERROR",
            Self::ResumeError(_) => "RESUME_ERROR",
            Self::StopError(_) => "STOP_ERROR",
            Self::ReplayError(_) => "REPLAY_ERROR",
            Self::SetLoopError(_) => "SET_LOOP_ERROR",
            Self::SetSpeedError(_) => "SET_SPEED_ERROR",
            Self::GetTimeError(_) => "GET_TIME_ERROR",
            Self::GetDurationError(_) => "GET_DURATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(CommandError::NotInitialized.code(), "NOT_INITIALIZED");
        assert_eq!(CommandError::SceneNotLoaded.code(), "SCENE_NOT_LOADED");
        assert_eq!(
            CommandError::LoadFailed("bad scene".into()).code(),
            "LOAD_FAILED"
        );
        assert_eq!(
            CommandError::InvalidArgument("url".into()).code(),
            "INVALID_ARGUMENT"
        );
    }

    #[test]
    fn test_display_includes_detail() {
        let err = CommandError::PlayError("engine busy".into());
        assert_eq!(err.to_string(), "play error: engine busy");
    }
}
