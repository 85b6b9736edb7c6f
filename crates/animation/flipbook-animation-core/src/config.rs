#![allow(dead_code)]
//! Core configuration for flipbook-animation-core.

use serde::{Deserialize, Serialize};

/// Configuration for channel sizing and defaults.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Initial capacity of the mixer track arena. Slots grow past this but are
    /// never reclaimed (cache-forever allocation).
    pub initial_tracks: usize,

    /// Bounded length of the transition-history ring buffer.
    pub history_capacity: usize,

    /// Fallback fps applied when a loaded state carries a non-positive or
    /// non-finite fps.
    pub default_fps: f32,

    /// Maximum events retained per tick before older events are dropped.
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_tracks: 8,
            history_capacity: 12,
            default_fps: 12.0,
            max_events_per_tick: 256,
        }
    }
}
