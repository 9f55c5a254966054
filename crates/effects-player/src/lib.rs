//! Player lifecycle state machine and view registry for the effects player.
//!
//! This crate is the control plane between an embedding host and a native
//! scene engine: it validates commands against the authoritative playback
//! state, drives the engine through the capability seam in
//! [`effects_engine`], and normalizes asynchronous engine callbacks into
//! the ordered event stream defined in [`effects_ipc`].

mod handle;
mod player;
mod registry;

pub use handle::PlayerHandle;
pub use registry::PlayerRegistry;

/// Version reported to hosts that query the plugin.
pub const SDK_VERSION: &str = "1.0.0";
