//! Native scene engine abstraction for the effects player.
//!
//! The player core drives a scene engine exclusively through the
//! [`SceneEngine`] trait: one handle per loaded scene, created by an
//! [`EngineFactory`] and destroyed by drop. Asynchronous engine callbacks
//! come back as generation-tagged [`EngineSignal`]s so the core can discard
//! results from superseded loads.
//!
//! [`MockEngineFactory`] provides the in-tree engine variant; a binding to
//! the real native SDK implements the same traits.

mod engine;
mod error;
mod mock;
mod signal;
mod source;

pub use engine::{EngineFactory, RenderSurface, SceneEngine};
pub use error::EngineError;
pub use mock::{
    MockAction, MockBehavior, MockEngineFactory, MockJournal, MockLifecycle, MockLoad, MockRemote,
};
pub use signal::{signal_channel, EngineSignal, SignalKind, SignalSink};
pub use source::SceneSource;
