//! Commands sent from the host to a player instance.

use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// Commands that the host can send to a player instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlayerCommand {
    /// Load a scene, replacing any previously loaded one.
    LoadScene {
        /// Scene URL or bundled asset path.
        url: String,

        /// Start playing as soon as the load completes.
        auto_play: bool,
    },

    /// Start playback from the beginning of the scene.
    Play,

    /// Pause playback.
    Pause,

    /// Resume paused playback.
    Resume,

    /// Stop playback.
    Stop,

    /// Stop and immediately play again from the beginning.
    Replay,

    /// Enable or disable infinite looping.
    SetLoop(bool),

    /// Set the playback speed multiplier.
    SetSpeed(f32),

    /// Query the current playback position in seconds.
    GetCurrentTime,

    /// Query the scene duration in seconds.
    GetDuration,

    /// Tear down the instance: destroy the engine handle, release channels.
    Dispose,
}

impl PlayerCommand {
    /// Returns the command name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadScene { .. } => "load_scene",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
            Self::Replay => "replay",
            Self::SetLoop(_) => "set_loop",
            Self::SetSpeed(_) => "set_speed",
            Self::GetCurrentTime => "get_current_time",
            Self::GetDuration => "get_duration",
            Self::Dispose => "dispose",
        }
    }
}

/// Successful command payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// The command completed; no payload.
    Done,

    /// A time query result, in seconds.
    Seconds(f64),
}

/// The terminal result of one command.
pub type CommandReply = Result<CommandOutcome, CommandError>;

/// One-shot reply handle for a command.
///
/// `resolve` consumes the responder, so each command gets exactly one
/// terminal result — never zero, never more than one.
#[derive(Debug)]
pub struct Responder {
    tx: Sender<CommandReply>,
}

impl Responder {
    /// Delivers the terminal result to the caller.
    ///
    /// A caller that has given up waiting is not an error; the reply is
    /// simply dropped.
    pub fn resolve(self, reply: CommandReply) {
        let _ = self.tx.send(reply);
    }
}

/// A command paired with its reply handle.
#[derive(Debug)]
pub struct CommandEnvelope {
    command: PlayerCommand,
    responder: Responder,
}

impl CommandEnvelope {
    /// Splits the envelope into the command and its responder.
    pub fn into_parts(self) -> (PlayerCommand, Responder) {
        (self.command, self.responder)
    }

    /// The wrapped command, for routing and logging.
    pub fn command(&self) -> &PlayerCommand {
        &self.command
    }
}

/// Builds an envelope for `command` plus the receiver for its reply.
pub fn command_pair(command: PlayerCommand) -> (CommandEnvelope, Receiver<CommandReply>) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    (
        CommandEnvelope {
            command,
            responder: Responder { tx },
        },
        rx,
    )
}
