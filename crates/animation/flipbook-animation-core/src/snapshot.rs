#![allow(dead_code)]
//! Read-only diagnostic export of a channel's playback situation.

use serde::Serialize;

/// Snapshot of one channel for debugging overlays. Produced on demand and
/// never mutates channel state.
#[derive(Clone, Debug, Serialize)]
pub struct DebugSnapshot {
    pub state_name: Option<String>,
    pub clip_time: f32,
    pub clip_length: f32,
    pub normalized_time: f32,
    pub speed: f32,
    pub is_playing: bool,
    pub transition_history: Vec<String>,
    pub source_name: String,
}
