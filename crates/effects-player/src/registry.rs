//! View registry: binds view identifiers to live player instances.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use effects_engine::{EngineFactory, RenderSurface};
use effects_ipc::{
    command_channel, command_pair, event_channel, CommandEnvelope, PlayerCommand, PlayerState,
};

use crate::handle::PlayerHandle;
use crate::player::Player;

struct RegisteredPlayer {
    command_tx: Sender<CommandEnvelope>,
    thread: JoinHandle<()>,
}

/// Maps caller-supplied view identifiers to live player instances.
///
/// Creation is synchronous and always succeeds — a fresh instance simply
/// starts Uninitialized. Disposal tears down the engine handle and the
/// channels before returning, and is idempotent.
pub struct PlayerRegistry {
    factory: Arc<dyn EngineFactory>,
    players: Mutex<HashMap<i64, RegisteredPlayer>>,
}

impl PlayerRegistry {
    /// Creates a registry whose instances draw engines from `factory`.
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            factory,
            players: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a player instance for `id` bound to `surface`.
    ///
    /// At most one live instance exists per id: creating over an existing
    /// id disposes the previous instance first.
    pub fn create_view(&self, id: i64, surface: RenderSurface) -> PlayerHandle {
        self.dispose_view(id);

        let (command_tx, command_rx) = command_channel();
        let (event_tx, event_rx) = event_channel();
        let shared_state = Arc::new(RwLock::new(PlayerState::Uninitialized));

        let factory = Arc::clone(&self.factory);
        let state = Arc::clone(&shared_state);
        let thread = thread::Builder::new()
            .name(format!("effects-player-{id}"))
            .spawn(move || {
                Player::new(id, surface, factory, command_rx, event_tx, state).run();
            })
            .expect("player thread should spawn");

        self.players.lock().insert(
            id,
            RegisteredPlayer {
                command_tx: command_tx.clone(),
                thread,
            },
        );

        info!(id, texture_id = surface.texture_id, "Player view created");
        PlayerHandle::new(id, command_tx, event_rx, shared_state)
    }

    /// Disposes the instance registered under `id`.
    ///
    /// The engine handle and channels are released before this returns.
    /// Disposing an unknown or already-disposed id is a no-op.
    pub fn dispose_view(&self, id: i64) {
        let Some(entry) = self.players.lock().remove(&id) else {
            debug!(id, "Dispose for unregistered player, nothing to do");
            return;
        };

        let (envelope, reply_rx) = command_pair(PlayerCommand::Dispose);
        if entry.command_tx.send(envelope).is_ok() {
            let _ = reply_rx.recv();
        }
        if entry.thread.join().is_err() {
            warn!(id, "Player thread panicked during dispose");
        }

        info!(id, "Player view disposed");
    }

    /// Returns true if a live instance is registered under `id`.
    pub fn contains(&self, id: i64) -> bool {
        self.players.lock().contains_key(&id)
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.players.lock().len()
    }

    /// Returns true if no instances are registered.
    pub fn is_empty(&self) -> bool {
        self.players.lock().is_empty()
    }
}

impl Drop for PlayerRegistry {
    fn drop(&mut self) {
        let ids: Vec<i64> = self.players.lock().keys().copied().collect();
        for id in ids {
            self.dispose_view(id);
        }
    }
}
