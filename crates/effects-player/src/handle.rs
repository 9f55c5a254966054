//! Host-facing handle to one player instance.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;

use effects_ipc::{
    command_pair, CommandEnvelope, CommandError, CommandOutcome, CommandReply, PlayerCommand,
    PlayerEvent, PlayerState,
};

/// Control surface for a single player instance.
///
/// Commands block until the instance delivers the terminal result; events
/// arrive on [`PlayerHandle::events`] in emission order. The handle does
/// not own the instance — disposal goes through the registry.
pub struct PlayerHandle {
    id: i64,
    command_tx: Sender<CommandEnvelope>,
    event_rx: Receiver<PlayerEvent>,
    state: Arc<RwLock<PlayerState>>,
}

impl PlayerHandle {
    pub(crate) fn new(
        id: i64,
        command_tx: Sender<CommandEnvelope>,
        event_rx: Receiver<PlayerEvent>,
        state: Arc<RwLock<PlayerState>>,
    ) -> Self {
        Self {
            id,
            command_tx,
            event_rx,
            state,
        }
    }

    /// The caller-supplied view identifier.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current lifecycle state, as last published by the instance.
    pub fn state(&self) -> PlayerState {
        *self.state.read()
    }

    /// The event stream for this instance.
    pub fn events(&self) -> &Receiver<PlayerEvent> {
        &self.event_rx
    }

    /// Loads a scene, superseding any previously loaded one.
    pub fn load_scene(&self, url: &str, auto_play: bool) -> Result<(), CommandError> {
        self.dispatch(PlayerCommand::LoadScene {
            url: url.to_owned(),
            auto_play,
        })
        .map(|_| ())
    }

    /// Starts playback from the beginning of the scene.
    pub fn play(&self) -> Result<(), CommandError> {
        self.dispatch(PlayerCommand::Play).map(|_| ())
    }

    /// Pauses playback.
    pub fn pause(&self) -> Result<(), CommandError> {
        self.dispatch(PlayerCommand::Pause).map(|_| ())
    }

    /// Resumes paused playback.
    pub fn resume(&self) -> Result<(), CommandError> {
        self.dispatch(PlayerCommand::Resume).map(|_| ())
    }

    /// Stops playback.
    pub fn stop(&self) -> Result<(), CommandError> {
        self.dispatch(PlayerCommand::Stop).map(|_| ())
    }

    /// Stops and immediately plays again from the beginning.
    pub fn replay(&self) -> Result<(), CommandError> {
        self.dispatch(PlayerCommand::Replay).map(|_| ())
    }

    /// Enables or disables infinite looping.
    pub fn set_loop(&self, looping: bool) -> Result<(), CommandError> {
        self.dispatch(PlayerCommand::SetLoop(looping)).map(|_| ())
    }

    /// Sets the playback speed multiplier.
    pub fn set_speed(&self, speed: f32) -> Result<(), CommandError> {
        self.dispatch(PlayerCommand::SetSpeed(speed)).map(|_| ())
    }

    /// Current playback position in seconds.
    pub fn current_time(&self) -> Result<f64, CommandError> {
        self.dispatch(PlayerCommand::GetCurrentTime)
            .map(Self::seconds)
    }

    /// Scene duration in seconds.
    pub fn duration(&self) -> Result<f64, CommandError> {
        self.dispatch(PlayerCommand::GetDuration).map(Self::seconds)
    }

    fn dispatch(&self, command: PlayerCommand) -> CommandReply {
        let (envelope, reply_rx) = command_pair(command);
        if self.command_tx.send(envelope).is_err() {
            // The instance has been disposed; its channel is gone.
            return Err(CommandError::NotInitialized);
        }
        reply_rx
            .recv()
            .unwrap_or(Err(CommandError::NotInitialized))
    }

    fn seconds(outcome: CommandOutcome) -> f64 {
        match outcome {
            CommandOutcome::Seconds(seconds) => seconds,
            CommandOutcome::Done => 0.0,
        }
    }
}
