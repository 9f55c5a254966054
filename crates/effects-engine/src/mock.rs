//! Scriptable in-process engine for tests and SDK-less builds.
//!
//! The mock records every handle operation in a shared [`MockJournal`] and
//! exposes a [`MockRemote`] per created handle so tests can fire the
//! asynchronous callbacks (load completion, end of playback, faults) at
//! exactly the moment under test — including after the handle has been
//! superseded, which is how stale-generation discard is exercised.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::engine::{EngineFactory, RenderSurface, SceneEngine};
use crate::error::EngineError;
use crate::signal::SignalSink;
use crate::source::SceneSource;

/// How a mock handle answers `load`.
#[derive(Debug, Clone, Default)]
pub enum MockLoad {
    /// Complete successfully as soon as `load` is called.
    #[default]
    Resolve,

    /// Fail with the given message as soon as `load` is called.
    Fail(String),

    /// Do nothing; the test fires completion through the [`MockRemote`].
    Hold,
}

/// Capabilities and scripted outcomes for mock handles.
#[derive(Debug, Clone)]
pub struct MockBehavior {
    /// Load outcome for handles created under this behavior.
    pub load: MockLoad,

    /// Fail handle creation itself with this message.
    pub create_error: Option<String>,

    /// Fail `play` with this message.
    pub play_error: Option<String>,

    /// Frame count reported for the loaded scene (None = unsupported).
    pub frame_count: Option<u64>,

    /// Playback position reported by `current_time` (None = unsupported).
    pub current_time: Option<f64>,

    /// Whether `set_speed` is supported.
    pub supports_speed: bool,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            load: MockLoad::Resolve,
            create_error: None,
            play_error: None,
            frame_count: Some(150),
            current_time: Some(0.0),
            supports_speed: true,
        }
    }
}

/// One recorded handle operation.
#[derive(Debug, Clone, PartialEq)]
pub struct MockLifecycle {
    /// Generation of the handle that performed the operation.
    pub generation: u64,

    /// The operation itself.
    pub action: MockAction,
}

/// Handle operations recorded by the journal.
#[derive(Debug, Clone, PartialEq)]
pub enum MockAction {
    Created,
    LoadStarted { source: String },
    Played { repeat_count: u32 },
    Paused,
    Resumed,
    Stopped,
    SpeedSet { speed: f32 },
    Destroyed,
}

/// Shared, ordered record of every mock handle operation.
#[derive(Debug, Clone, Default)]
pub struct MockJournal {
    entries: Arc<Mutex<Vec<MockLifecycle>>>,
}

impl MockJournal {
    fn record(&self, generation: u64, action: MockAction) {
        self.entries.lock().push(MockLifecycle { generation, action });
    }

    /// Snapshot of all recorded operations, in order.
    pub fn entries(&self) -> Vec<MockLifecycle> {
        self.entries.lock().clone()
    }

    /// Just the actions, in order, for compact assertions.
    pub fn actions(&self) -> Vec<MockAction> {
        self.entries.lock().iter().map(|e| e.action.clone()).collect()
    }

    /// Discards all recorded operations.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// Test-side handle to one created mock engine's callback sink.
///
/// Cloned freely; stays usable after the engine handle is destroyed, which
/// is exactly the late-callback case the player core must survive.
#[derive(Debug, Clone)]
pub struct MockRemote {
    sink: SignalSink,
}

impl MockRemote {
    /// Generation of the handle this remote belongs to.
    pub fn generation(&self) -> u64 {
        self.sink.generation()
    }

    /// Fires load completion for a `MockLoad::Hold` handle.
    pub fn finish_load(&self, result: Result<(), EngineError>) {
        self.sink.load_finished(result);
    }

    /// Fires the end-of-playback callback.
    pub fn finish_playback(&self) {
        self.sink.playback_ended();
    }

    /// Fires a mid-playback engine fault.
    pub fn fault(&self, message: impl Into<String>) {
        self.sink.fault(message);
    }
}

/// Creates journaled, scriptable mock handles.
pub struct MockEngineFactory {
    behavior: Mutex<MockBehavior>,
    journal: MockJournal,
    remotes: Mutex<Vec<MockRemote>>,
}

impl MockEngineFactory {
    /// Creates a factory with default behavior.
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::default())
    }

    /// Creates a factory whose handles follow `behavior`.
    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            journal: MockJournal::default(),
            remotes: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the behavior for subsequently created handles.
    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock() = behavior;
    }

    /// The shared operation journal.
    pub fn journal(&self) -> MockJournal {
        self.journal.clone()
    }

    /// Remote for the most recently created handle.
    pub fn last_remote(&self) -> Option<MockRemote> {
        self.remotes.lock().last().cloned()
    }

    /// Number of handles created so far.
    pub fn created_count(&self) -> usize {
        self.remotes.lock().len()
    }
}

impl Default for MockEngineFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineFactory for MockEngineFactory {
    fn create(
        &self,
        surface: &RenderSurface,
        sink: SignalSink,
    ) -> Result<Box<dyn SceneEngine>, EngineError> {
        let behavior = self.behavior.lock().clone();
        if let Some(message) = &behavior.create_error {
            return Err(EngineError::CreateFailed(message.clone()));
        }

        let generation = sink.generation();
        debug!(texture_id = surface.texture_id, generation, "Creating mock engine");

        self.journal.record(generation, MockAction::Created);
        self.remotes.lock().push(MockRemote { sink: sink.clone() });

        Ok(Box::new(MockEngine {
            behavior,
            sink,
            journal: self.journal.clone(),
            generation,
        }))
    }
}

struct MockEngine {
    behavior: MockBehavior,
    sink: SignalSink,
    journal: MockJournal,
    generation: u64,
}

impl SceneEngine for MockEngine {
    fn load(&mut self, source: &SceneSource) -> Result<(), EngineError> {
        self.journal.record(
            self.generation,
            MockAction::LoadStarted {
                source: source.to_string(),
            },
        );
        match &self.behavior.load {
            MockLoad::Resolve => self.sink.load_finished(Ok(())),
            MockLoad::Fail(message) => self
                .sink
                .load_finished(Err(EngineError::LoadFailed(message.clone()))),
            MockLoad::Hold => {}
        }
        Ok(())
    }

    fn play(&mut self, repeat_count: u32) -> Result<(), EngineError> {
        if let Some(message) = &self.behavior.play_error {
            return Err(EngineError::Playback(message.clone()));
        }
        self.journal
            .record(self.generation, MockAction::Played { repeat_count });
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.journal.record(self.generation, MockAction::Paused);
        Ok(())
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        self.journal.record(self.generation, MockAction::Resumed);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.journal.record(self.generation, MockAction::Stopped);
        Ok(())
    }

    fn set_speed(&mut self, speed: f32) -> Result<(), EngineError> {
        if !self.behavior.supports_speed {
            return Err(EngineError::Unsupported);
        }
        self.journal
            .record(self.generation, MockAction::SpeedSet { speed });
        Ok(())
    }

    fn current_time(&self) -> Option<f64> {
        self.behavior.current_time
    }

    fn frame_count(&self) -> Option<u64> {
        self.behavior.frame_count
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        self.journal.record(self.generation, MockAction::Destroyed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{signal_channel, SignalKind};

    fn create_engine(factory: &MockEngineFactory, generation: u64) -> Box<dyn SceneEngine> {
        let (tx, _rx) = signal_channel();
        factory
            .create(&RenderSurface::new(7), SignalSink::new(generation, tx))
            .unwrap()
    }

    #[test]
    fn test_resolve_load_fires_completion() {
        let factory = MockEngineFactory::new();
        let (tx, rx) = signal_channel();
        let mut engine = factory
            .create(&RenderSurface::new(1), SignalSink::new(1, tx))
            .unwrap();

        engine
            .load(&SceneSource::parse("assets/a.json").unwrap())
            .unwrap();

        let signal = rx.recv().unwrap();
        assert_eq!(signal.generation, 1);
        assert_eq!(signal.kind, SignalKind::LoadFinished(Ok(())));
    }

    #[test]
    fn test_hold_load_waits_for_remote() {
        let factory = MockEngineFactory::with_behavior(MockBehavior {
            load: MockLoad::Hold,
            ..MockBehavior::default()
        });
        let (tx, rx) = signal_channel();
        let mut engine = factory
            .create(&RenderSurface::new(1), SignalSink::new(1, tx))
            .unwrap();

        engine
            .load(&SceneSource::parse("assets/a.json").unwrap())
            .unwrap();
        assert!(rx.try_recv().is_err());

        factory.last_remote().unwrap().finish_load(Ok(()));
        assert_eq!(rx.recv().unwrap().kind, SignalKind::LoadFinished(Ok(())));
    }

    #[test]
    fn test_journal_records_destroy() {
        let factory = MockEngineFactory::new();
        let journal = factory.journal();

        let engine = create_engine(&factory, 1);
        drop(engine);

        assert_eq!(
            journal.actions(),
            vec![MockAction::Created, MockAction::Destroyed]
        );
    }

    #[test]
    fn test_unsupported_speed() {
        let factory = MockEngineFactory::with_behavior(MockBehavior {
            supports_speed: false,
            ..MockBehavior::default()
        });
        let mut engine = create_engine(&factory, 1);

        assert_eq!(engine.set_speed(2.0), Err(EngineError::Unsupported));
    }

    #[test]
    fn test_create_error() {
        let factory = MockEngineFactory::with_behavior(MockBehavior {
            create_error: Some("no GL context".into()),
            ..MockBehavior::default()
        });
        let (tx, _rx) = signal_channel();
        let result = factory.create(&RenderSurface::new(1), SignalSink::new(1, tx));

        assert_eq!(
            result.err(),
            Some(EngineError::CreateFailed("no GL context".into()))
        );
    }
}
