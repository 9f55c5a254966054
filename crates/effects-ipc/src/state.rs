//! Player lifecycle states.

use serde::{Deserialize, Serialize};

/// The current lifecycle state of a player instance.
///
/// Exactly one state is active per instance at any time. Only the five
/// wire-visible states (`Loading` through `Stopped`) ever appear in a
/// `StateChanged` event; `Uninitialized` and `Error` are internal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// No scene has ever been loaded; no engine handle exists.
    #[default]
    Uninitialized,

    /// A scene load is in flight.
    Loading,

    /// The scene is loaded and ready to play.
    Ready,

    /// The scene is playing.
    Playing,

    /// Playback is paused mid-scene.
    Paused,

    /// Playback has stopped (end of scene or explicit stop).
    Stopped,

    /// The engine reported a failure; only a fresh load recovers.
    Error,
}

impl PlayerState {
    /// Returns true if a scene load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true if the player is currently playing.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true if the player is in the error state.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns true if a `play` command is valid from this state.
    pub fn is_playable(&self) -> bool {
        matches!(self, Self::Ready | Self::Stopped | Self::Paused)
    }

    /// Returns the lowercase name of this state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Error => "error",
        }
    }

    /// Returns true if this state is reported over the event channel.
    ///
    /// `Uninitialized` has no wire name, and engine failures are surfaced
    /// through the `Error` event rather than a state change.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, Self::Uninitialized | Self::Error)
    }
}
