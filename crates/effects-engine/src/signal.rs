//! Generation-tagged callback plumbing from the engine to the player core.

use crossbeam_channel::{Receiver, Sender};
use tracing::warn;

use crate::error::EngineError;

/// Channel capacity for engine signals.
///
/// Signals are tiny and drained promptly by the instance's run loop; the
/// bound only guards against a wedged consumer.
pub const SIGNAL_CHANNEL_CAPACITY: usize = 64;

/// An asynchronous engine callback, re-marshaled onto the instance thread.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSignal {
    /// Generation of the load that produced this handle. Signals whose
    /// generation is not current are stale and must be discarded.
    pub generation: u64,

    /// What the engine reported.
    pub kind: SignalKind,
}

/// The payload of an engine callback.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalKind {
    /// The in-flight scene load finished.
    LoadFinished(Result<(), EngineError>),

    /// A finite playthrough reached the end of the scene.
    PlaybackEnded,

    /// The engine failed outside any pending command.
    Fault(String),
}

/// Creates a bounded signal channel for one player instance.
pub fn signal_channel() -> (Sender<EngineSignal>, Receiver<EngineSignal>) {
    crossbeam_channel::bounded(SIGNAL_CHANNEL_CAPACITY)
}

/// The engine's side of the signal channel.
///
/// Each engine handle gets a sink stamped with the generation of the load
/// that created it, so the engine itself never tracks generations. Safe to
/// call from any engine-internal thread; delivery and all state mutation
/// happen on the instance thread.
#[derive(Debug, Clone)]
pub struct SignalSink {
    generation: u64,
    tx: Sender<EngineSignal>,
}

impl SignalSink {
    /// Creates a sink stamped with `generation`.
    pub fn new(generation: u64, tx: Sender<EngineSignal>) -> Self {
        Self { generation, tx }
    }

    /// The generation this sink is stamped with.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Reports the completion of the in-flight load.
    pub fn load_finished(&self, result: Result<(), EngineError>) {
        self.send(SignalKind::LoadFinished(result));
    }

    /// Reports the end of a finite playthrough.
    pub fn playback_ended(&self) {
        self.send(SignalKind::PlaybackEnded);
    }

    /// Reports an engine failure outside any pending command.
    pub fn fault(&self, message: impl Into<String>) {
        self.send(SignalKind::Fault(message.into()));
    }

    fn send(&self, kind: SignalKind) {
        let signal = EngineSignal {
            generation: self.generation,
            kind,
        };
        if self.tx.try_send(signal).is_err() {
            // Instance disposed or wedged; the signal is stale either way.
            warn!(generation = self.generation, "Dropping engine signal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_stamps_generation() {
        let (tx, rx) = signal_channel();
        let sink = SignalSink::new(3, tx);

        sink.playback_ended();

        let signal = rx.recv().unwrap();
        assert_eq!(signal.generation, 3);
        assert_eq!(signal.kind, SignalKind::PlaybackEnded);
    }

    #[test]
    fn test_sink_survives_disconnected_channel() {
        let (tx, rx) = signal_channel();
        let sink = SignalSink::new(1, tx);
        drop(rx);

        // Must not panic: the instance may already be gone.
        sink.fault("late failure");
    }
}
