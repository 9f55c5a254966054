//! Events sent from a player instance to the host.

use serde::{Deserialize, Serialize};

use crate::state::PlayerState;

/// Unsolicited events raised by a player instance.
///
/// Events are fire-and-forget and delivered in the order the engine raised
/// them; a single instance never emits two events concurrently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// The playback state changed.
    ///
    /// Carries only wire-visible states: `loading`, `ready`, `playing`,
    /// `paused`, `stopped`.
    StateChanged(PlayerState),

    /// The pending scene load completed successfully.
    LoadComplete,

    /// A finite playthrough reached the end of the scene.
    PlayComplete,

    /// The engine reported a failure.
    Error {
        /// Human-readable failure description.
        message: String,
    },
}
