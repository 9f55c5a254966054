//! The engine capability seam.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::signal::SignalSink;
use crate::source::SceneSource;

/// The rendering surface a player instance is bound to.
///
/// Supplied by the embedding host at view creation; the engine renders
/// into the texture it identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSurface {
    /// Host texture identifier.
    pub texture_id: i64,
}

impl RenderSurface {
    /// Creates a surface descriptor for `texture_id`.
    pub fn new(texture_id: i64) -> Self {
        Self { texture_id }
    }
}

/// One loaded/playing scene instance inside the native engine.
///
/// Exactly one handle exists per player instance; dropping the handle
/// destroys the underlying engine object. All methods are called from the
/// instance's own thread, never concurrently.
pub trait SceneEngine: Send {
    /// Begins loading `source`. Completion is reported asynchronously
    /// through [`SignalSink::load_finished`]; an `Err` here means the load
    /// could not even be started.
    fn load(&mut self, source: &SceneSource) -> Result<(), EngineError>;

    /// Starts playback from the beginning. `repeat_count` of 0 repeats
    /// forever; a finite count ends with [`SignalSink::playback_ended`].
    fn play(&mut self, repeat_count: u32) -> Result<(), EngineError>;

    /// Pauses playback at the current frame.
    fn pause(&mut self) -> Result<(), EngineError>;

    /// Resumes paused playback.
    fn resume(&mut self) -> Result<(), EngineError>;

    /// Stops playback.
    fn stop(&mut self) -> Result<(), EngineError>;

    /// Sets the playback speed multiplier. Engines without speed control
    /// return [`EngineError::Unsupported`].
    fn set_speed(&mut self, speed: f32) -> Result<(), EngineError>;

    /// Current playback position in seconds, if the engine can report it.
    fn current_time(&self) -> Option<f64>;

    /// Total frame count of the loaded scene, if the engine can report it.
    fn frame_count(&self) -> Option<u64>;
}

/// Creates engine handles for a player instance.
///
/// `create` is called once per scene load, after the previous handle has
/// been dropped; `sink` is stamped with the new load's generation.
pub trait EngineFactory: Send + Sync {
    /// Creates a fresh engine handle bound to `surface`.
    fn create(
        &self,
        surface: &RenderSurface,
        sink: SignalSink,
    ) -> Result<Box<dyn SceneEngine>, EngineError>;
}
