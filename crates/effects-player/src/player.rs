//! Per-instance player actor: the lifecycle state machine and its run loop.
//!
//! Each player instance is a single-threaded actor. Commands from the host
//! and asynchronous engine signals are both drained on the instance thread,
//! so the engine handle and the playback state have exactly one writer and
//! the host never observes two events for the same instance concurrently.

use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{select, Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, error, info, instrument, warn};

use effects_engine::{
    signal_channel, EngineError, EngineFactory, EngineSignal, RenderSurface, SceneEngine,
    SceneSource, SignalKind, SignalSink,
};
use effects_ipc::{
    CommandEnvelope, CommandError, CommandOutcome, PlaybackConfig, PlayerCommand, PlayerEvent,
    PlayerState, Responder,
};

/// Frame rate assumed when estimating duration from a frame count.
const ESTIMATED_FPS: f64 = 30.0;

/// The currently loaded scene. Replaced, never mutated, on each load.
#[derive(Debug, Clone)]
struct SceneReference {
    source: SceneSource,
    loaded_at: Instant,
}

/// A scene load whose engine completion is still outstanding.
struct PendingLoad {
    responder: Responder,
    auto_play: bool,
}

enum Flow {
    Continue,
    Shutdown,
}

/// One player instance: owns the engine handle, the playback state and the
/// generation counter. Driven by [`Player::run`] on its own thread.
pub(crate) struct Player {
    id: i64,
    state: PlayerState,
    shared_state: Arc<RwLock<PlayerState>>,
    config: PlaybackConfig,
    scene: Option<SceneReference>,
    engine: Option<Box<dyn SceneEngine>>,
    factory: Arc<dyn EngineFactory>,
    surface: RenderSurface,
    generation: u64,
    pending_load: Option<PendingLoad>,
    stop_deferred: bool,
    command_rx: Receiver<CommandEnvelope>,
    signal_tx: Sender<EngineSignal>,
    signal_rx: Receiver<EngineSignal>,
    event_tx: Sender<PlayerEvent>,
}

impl Player {
    pub(crate) fn new(
        id: i64,
        surface: RenderSurface,
        factory: Arc<dyn EngineFactory>,
        command_rx: Receiver<CommandEnvelope>,
        event_tx: Sender<PlayerEvent>,
        shared_state: Arc<RwLock<PlayerState>>,
    ) -> Self {
        let (signal_tx, signal_rx) = signal_channel();
        Self {
            id,
            state: PlayerState::Uninitialized,
            shared_state,
            config: PlaybackConfig::default(),
            scene: None,
            engine: None,
            factory,
            surface,
            generation: 0,
            pending_load: None,
            stop_deferred: false,
            command_rx,
            signal_tx,
            signal_rx,
            event_tx,
        }
    }

    /// Run the instance (blocking) until disposed or orphaned.
    #[instrument(name = "player_run", skip(self))]
    pub(crate) fn run(&mut self) {
        info!(id = self.id, "Player starting");

        loop {
            select! {
                recv(self.command_rx) -> msg => match msg {
                    Ok(envelope) => {
                        if let Flow::Shutdown = self.handle_command(envelope) {
                            break;
                        }
                    }
                    Err(_) => {
                        info!(id = self.id, "Command channel disconnected, shutting down");
                        break;
                    }
                },
                recv(self.signal_rx) -> msg => {
                    if let Ok(signal) = msg {
                        self.handle_signal(signal);
                    }
                }
            }
        }

        self.teardown();
        info!(id = self.id, "Player stopped");
    }

    /// Handle a command. Returns `Flow::Shutdown` on dispose.
    fn handle_command(&mut self, envelope: CommandEnvelope) -> Flow {
        debug!(id = self.id, command = envelope.command().name(), "Handling command");

        let (command, responder) = envelope.into_parts();
        match command {
            PlayerCommand::LoadScene { url, auto_play } => {
                self.load_scene(url, auto_play, responder)
            }
            PlayerCommand::Play => responder.resolve(self.play().map(|()| CommandOutcome::Done)),
            PlayerCommand::Pause => responder.resolve(self.pause().map(|()| CommandOutcome::Done)),
            PlayerCommand::Resume => {
                responder.resolve(self.resume().map(|()| CommandOutcome::Done))
            }
            PlayerCommand::Stop => responder.resolve(self.stop().map(|()| CommandOutcome::Done)),
            PlayerCommand::Replay => {
                responder.resolve(self.replay().map(|()| CommandOutcome::Done))
            }
            PlayerCommand::SetLoop(looping) => {
                responder.resolve(self.set_loop(looping).map(|()| CommandOutcome::Done))
            }
            PlayerCommand::SetSpeed(speed) => {
                responder.resolve(self.set_speed(speed).map(|()| CommandOutcome::Done))
            }
            PlayerCommand::GetCurrentTime => {
                responder.resolve(self.current_time().map(CommandOutcome::Seconds))
            }
            PlayerCommand::GetDuration => {
                responder.resolve(self.duration().map(CommandOutcome::Seconds))
            }
            PlayerCommand::Dispose => {
                responder.resolve(Ok(CommandOutcome::Done));
                return Flow::Shutdown;
            }
        }

        Flow::Continue
    }

    /// Start loading a scene, superseding whatever is loaded or in flight.
    #[instrument(name = "load_scene", skip(self, responder))]
    fn load_scene(&mut self, url: String, auto_play: bool, responder: Responder) {
        let source = match SceneSource::parse(&url) {
            Ok(source) => source,
            Err(message) => {
                responder.resolve(Err(CommandError::InvalidArgument(message)));
                return;
            }
        };

        // A newer load supersedes a pending one; the old command still gets
        // its single terminal result.
        if let Some(pending) = self.pending_load.take() {
            pending
                .responder
                .resolve(Err(CommandError::LoadFailed("superseded by a newer load".into())));
        }
        self.stop_deferred = false;

        // The prior handle must be destroyed before the next one exists.
        self.engine = None;
        self.generation += 1;

        info!(id = self.id, %source, auto_play, generation = self.generation, "Loading scene");
        self.scene = Some(SceneReference {
            source: source.clone(),
            loaded_at: Instant::now(),
        });
        self.transition_to(PlayerState::Loading);

        let sink = SignalSink::new(self.generation, self.signal_tx.clone());
        let mut engine = match self.factory.create(&self.surface, sink) {
            Ok(engine) => engine,
            Err(e) => {
                self.fail_load_start(e, responder);
                return;
            }
        };
        if let Err(e) = engine.load(&source) {
            self.fail_load_start(e, responder);
            return;
        }

        self.engine = Some(engine);
        self.pending_load = Some(PendingLoad { responder, auto_play });
    }

    /// The load could not even be started: no engine handle survives.
    fn fail_load_start(&mut self, error: EngineError, responder: Responder) {
        error!(id = self.id, %error, "Scene load could not be started");
        self.engine = None;
        self.send_event(PlayerEvent::Error {
            message: error.to_string(),
        });
        self.transition_to(PlayerState::Error);
        responder.resolve(Err(CommandError::LoadError(error.to_string())));
    }

    /// Apply an engine signal, discarding anything from a stale generation.
    fn handle_signal(&mut self, signal: EngineSignal) {
        if signal.generation != self.generation {
            debug!(
                id = self.id,
                signal_generation = signal.generation,
                current_generation = self.generation,
                "Discarding stale engine signal"
            );
            return;
        }

        match signal.kind {
            SignalKind::LoadFinished(result) => self.finish_load(result),
            SignalKind::PlaybackEnded => self.finish_playback(),
            SignalKind::Fault(message) => {
                error!(id = self.id, fault = %message, "Engine fault");
                self.send_event(PlayerEvent::Error { message });
                self.transition_to(PlayerState::Error);
            }
        }
    }

    fn finish_load(&mut self, result: Result<(), EngineError>) {
        let Some(pending) = self.pending_load.take() else {
            debug!(id = self.id, "Ignoring load completion with no pending load");
            return;
        };

        match result {
            Ok(()) => {
                if let Some(scene) = &self.scene {
                    info!(
                        id = self.id,
                        source = %scene.source,
                        elapsed_ms = scene.loaded_at.elapsed().as_millis() as u64,
                        "Scene ready"
                    );
                }
                self.send_event(PlayerEvent::LoadComplete);
                self.transition_to(PlayerState::Ready);
                pending.responder.resolve(Ok(CommandOutcome::Done));

                if self.stop_deferred {
                    // A stop arrived mid-load; it could not cancel the load,
                    // so it asserts its transition now and wins over auto-play.
                    self.stop_deferred = false;
                    self.transition_to(PlayerState::Stopped);
                } else if pending.auto_play {
                    if let Err(e) = self.play() {
                        warn!(id = self.id, error = %e, "Auto-play failed");
                        self.send_event(PlayerEvent::Error {
                            message: e.to_string(),
                        });
                    }
                }
            }
            Err(e) => {
                error!(id = self.id, error = %e, "Scene load failed");
                self.stop_deferred = false;
                self.engine = None;
                self.send_event(PlayerEvent::Error {
                    message: e.to_string(),
                });
                self.transition_to(PlayerState::Error);
                pending
                    .responder
                    .resolve(Err(CommandError::LoadFailed(e.to_string())));
            }
        }
    }

    fn finish_playback(&mut self) {
        if !self.state.is_playing() {
            debug!(id = self.id, state = self.state.name(), "Ignoring playback end");
            return;
        }
        if self.config.is_infinite() {
            // Under an infinite repeat contract the engine restarts
            // internally; an end signal must not knock us out of Playing.
            debug!(id = self.id, "Ignoring playback end while looping");
            return;
        }

        self.transition_to(PlayerState::Stopped);
        self.send_event(PlayerEvent::PlayComplete);
    }

    fn play(&mut self) -> Result<(), CommandError> {
        let repeat_count = self.config.effective_repeat_count();
        let Some(engine) = self.engine.as_mut() else {
            return Err(CommandError::NotInitialized);
        };

        match self.state {
            // Policy: play while already playing is a no-op, never a restart.
            PlayerState::Playing => Ok(()),
            PlayerState::Ready | PlayerState::Stopped | PlayerState::Paused => {
                engine
                    .play(repeat_count)
                    .map_err(|e| CommandError::PlayError(e.to_string()))?;
                self.transition_to(PlayerState::Playing);
                Ok(())
            }
            PlayerState::Loading | PlayerState::Uninitialized => {
                Err(CommandError::SceneNotLoaded)
            }
            PlayerState::Error => Err(CommandError::PlayError("player is in error state".into())),
        }
    }

    fn pause(&mut self) -> Result<(), CommandError> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(CommandError::NotInitialized);
        };

        if self.state != PlayerState::Playing {
            return Err(CommandError::PauseError(format!(
                "pause is not valid while {}",
                self.state.name()
            )));
        }
        engine
            .pause()
            .map_err(|e| CommandError::PauseError(e.to_string()))?;
        self.transition_to(PlayerState::Paused);
        Ok(())
    }

    fn resume(&mut self) -> Result<(), CommandError> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(CommandError::NotInitialized);
        };

        if self.state != PlayerState::Paused {
            return Err(CommandError::ResumeError(format!(
                "resume is not valid while {}",
                self.state.name()
            )));
        }
        engine
            .resume()
            .map_err(|e| CommandError::ResumeError(e.to_string()))?;
        self.transition_to(PlayerState::Playing);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CommandError> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(CommandError::NotInitialized);
        };

        match self.state {
            // There is no load cancellation: the stop asserts its transition
            // once the engine responds.
            PlayerState::Loading => {
                self.stop_deferred = true;
                Ok(())
            }
            // Idempotent.
            PlayerState::Stopped => Ok(()),
            PlayerState::Playing | PlayerState::Paused | PlayerState::Ready => {
                engine
                    .stop()
                    .map_err(|e| CommandError::StopError(e.to_string()))?;
                self.transition_to(PlayerState::Stopped);
                Ok(())
            }
            PlayerState::Uninitialized | PlayerState::Error => Err(CommandError::StopError(
                format!("stop is not valid while {}", self.state.name()),
            )),
        }
    }

    fn replay(&mut self) -> Result<(), CommandError> {
        let repeat_count = self.config.effective_repeat_count();
        let Some(engine) = self.engine.as_mut() else {
            return Err(CommandError::NotInitialized);
        };

        if !matches!(
            self.state,
            PlayerState::Ready | PlayerState::Playing | PlayerState::Paused | PlayerState::Stopped
        ) {
            return Err(CommandError::ReplayError(format!(
                "replay is not valid while {}",
                self.state.name()
            )));
        }

        engine
            .stop()
            .map_err(|e| CommandError::ReplayError(e.to_string()))?;
        engine
            .play(repeat_count)
            .map_err(|e| CommandError::ReplayError(e.to_string()))?;
        self.transition_to(PlayerState::Playing);
        Ok(())
    }

    /// State-independent: takes effect on the next play or replay.
    fn set_loop(&mut self, looping: bool) -> Result<(), CommandError> {
        self.config.set_loop(looping);
        debug!(id = self.id, looping, "Loop setting updated");
        Ok(())
    }

    /// State-independent; forwarded to a live engine when one exists.
    fn set_speed(&mut self, speed: f32) -> Result<(), CommandError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(CommandError::SetSpeedError(format!(
                "speed must be positive, got {speed}"
            )));
        }

        if let Some(engine) = self.engine.as_mut() {
            match engine.set_speed(speed) {
                Ok(()) => {}
                Err(EngineError::Unsupported) => {
                    debug!(id = self.id, "Engine lacks speed control; stored for next play");
                }
                Err(e) => return Err(CommandError::SetSpeedError(e.to_string())),
            }
        }
        self.config.speed = speed;
        debug!(id = self.id, speed, "Speed updated");
        Ok(())
    }

    fn current_time(&self) -> Result<f64, CommandError> {
        let Some(engine) = self.engine.as_ref() else {
            return Err(CommandError::NotInitialized);
        };
        // Engines without a position query report zero rather than failing.
        Ok(engine.current_time().unwrap_or(0.0))
    }

    fn duration(&self) -> Result<f64, CommandError> {
        let Some(engine) = self.engine.as_ref() else {
            return Err(CommandError::NotInitialized);
        };
        // Estimated from the frame count; zero when the engine cannot say.
        Ok(engine
            .frame_count()
            .map(|frames| frames as f64 / ESTIMATED_FPS)
            .unwrap_or(0.0))
    }

    fn transition_to(&mut self, new_state: PlayerState) {
        let previous = self.state;
        self.state = new_state;
        *self.shared_state.write() = new_state;

        debug!(
            id = self.id,
            previous = previous.name(),
            current = new_state.name(),
            "State transition"
        );

        if new_state.is_reportable() {
            self.send_event(PlayerEvent::StateChanged(new_state));
        }
    }

    fn send_event(&self, event: PlayerEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            warn!(id = self.id, "Failed to send event: {}", e);
        }
    }

    fn teardown(&mut self) {
        // A pending load can no longer complete; its command still gets a
        // terminal result before the channel goes away.
        if let Some(pending) = self.pending_load.take() {
            pending
                .responder
                .resolve(Err(CommandError::LoadFailed("player disposed".into())));
        }
        self.engine = None;
        self.scene = None;
        debug!(id = self.id, "Player resources released");
    }

    #[cfg(test)]
    fn scene_source(&self) -> Option<&SceneSource> {
        self.scene.as_ref().map(|s| &s.source)
    }

    #[cfg(test)]
    fn scene_age(&self) -> Option<std::time::Duration> {
        self.scene.as_ref().map(|s| s.loaded_at.elapsed())
    }
}
