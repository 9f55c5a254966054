//! Typed host<->player messages for the effects player.
//!
//! This crate defines the control-channel contract between the embedding
//! host and a player instance: commands flow one way, events flow the
//! other. Commands are request/response — every command envelope carries a
//! single-use [`Responder`] that delivers exactly one terminal result back
//! to the caller. Events are fire-and-forget and ordered per instance.

mod commands;
mod error;
mod events;
mod state;
mod types;

pub use commands::{
    command_pair, CommandEnvelope, CommandOutcome, CommandReply, PlayerCommand, Responder,
};
pub use error::CommandError;
pub use events::PlayerEvent;
pub use state::PlayerState;
pub use types::PlaybackConfig;

use crossbeam_channel::{Receiver, Sender};

/// Channel capacity for commands (host → player).
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Channel capacity for events (player → host).
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Creates a bounded command channel.
pub fn command_channel() -> (Sender<CommandEnvelope>, Receiver<CommandEnvelope>) {
    crossbeam_channel::bounded(COMMAND_CHANNEL_CAPACITY)
}

/// Creates a bounded event channel.
pub fn event_channel() -> (Sender<PlayerEvent>, Receiver<PlayerEvent>) {
    crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY)
}
