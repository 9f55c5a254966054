//! Common types used across IPC messages.

use serde::{Deserialize, Serialize};

/// Playback configuration for a player instance.
///
/// Owned by the lifecycle state machine. Survives scene reloads, `stop`
/// and `replay`; it is handed to the engine on the next `play`.
///
/// `looping` and `repeat_count` are two views of the same setting:
/// `looping == true` is equivalent to `repeat_count == 0` (infinite), and
/// `looping == false` to `repeat_count == 1`. [`PlaybackConfig::set_loop`]
/// keeps both in sync.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Whether playback repeats forever.
    pub looping: bool,

    /// Number of playthroughs (0 = infinite, >0 = finite).
    pub repeat_count: u32,

    /// Playback speed multiplier.
    pub speed: f32,
}

impl PlaybackConfig {
    /// Sets looping, keeping `repeat_count` consistent.
    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
        self.repeat_count = if looping { 0 } else { 1 };
    }

    /// Returns true if playback repeats forever.
    pub fn is_infinite(&self) -> bool {
        self.looping || self.repeat_count == 0
    }

    /// The repeat count to hand to the engine (0 = infinite).
    pub fn effective_repeat_count(&self) -> u32 {
        if self.looping {
            0
        } else {
            self.repeat_count.max(1)
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            looping: false,
            repeat_count: 1,
            speed: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_playthrough() {
        let config = PlaybackConfig::default();
        assert!(!config.is_infinite());
        assert_eq!(config.effective_repeat_count(), 1);
        assert_eq!(config.speed, 1.0);
    }

    #[test]
    fn test_set_loop_keeps_repeat_count_in_sync() {
        let mut config = PlaybackConfig::default();

        config.set_loop(true);
        assert_eq!(config.repeat_count, 0);
        assert!(config.is_infinite());
        assert_eq!(config.effective_repeat_count(), 0);

        config.set_loop(false);
        assert_eq!(config.repeat_count, 1);
        assert!(!config.is_infinite());
        assert_eq!(config.effective_repeat_count(), 1);
    }

    #[test]
    fn test_zero_repeat_count_means_infinite() {
        let config = PlaybackConfig {
            looping: false,
            repeat_count: 0,
            speed: 1.0,
        };
        assert!(config.is_infinite());
    }
}
