#![allow(dead_code)]
//! Parse content-authored state-set JSON into canonical [`AnimationState`]
//! records.
//!
//! The wire shape mirrors what sprite authoring exports:
//! `{ "name": "...", "states": [ { "name", "frames", "fps", "loop"?, "priority"? } ] }`.
//! `loop` defaults to true, `priority` to 0. Timing invariants are validated
//! eagerly; a bad record fails the whole document so content bugs surface at
//! load time, not mid-gameplay.

use serde::Deserialize;

use crate::state::{AnimationState, ImageHandle, StateLibrary};

/// Public API: parse a state-set JSON document into validated states.
pub fn parse_stored_states_json(s: &str) -> Result<Vec<AnimationState>, String> {
    let set: StoredStateSet = serde_json::from_str(s).map_err(|e| format!("parse error: {e}"))?;

    let mut states = Vec::with_capacity(set.states.len());
    for raw in set.states {
        let state = AnimationState {
            name: raw.name,
            frames: raw.frames,
            fps: raw.fps,
            looped: raw.looped,
            priority: raw.priority,
        };
        state.validate().map_err(|e| e.to_string())?;
        states.push(state);
    }
    Ok(states)
}

/// Parse a document and load every state into a library.
pub fn load_stored_states_json(
    s: &str,
    library: &mut StateLibrary,
    default_fps: f32,
) -> Result<usize, String> {
    let states = parse_stored_states_json(s)?;
    let count = states.len();
    for state in states {
        library.insert(state, default_fps);
    }
    Ok(count)
}

#[derive(Debug, Deserialize)]
struct StoredStateSet {
    #[serde(default)]
    name: String,
    states: Vec<RawState>,
}

#[derive(Debug, Deserialize)]
struct RawState {
    name: String,
    frames: Vec<ImageHandle>,
    fps: f32,
    #[serde(default = "default_true", rename = "loop")]
    looped: bool,
    #[serde(default)]
    priority: i32,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    /// it should parse a minimal document and apply loop/priority defaults
    #[test]
    fn parse_with_defaults() {
        let doc = r#"{
            "name": "hero",
            "states": [
                { "name": "Idle", "frames": ["i0", "i1"], "fps": 8 },
                { "name": "Attack", "frames": ["a0"], "fps": 4, "loop": false, "priority": 2 }
            ]
        }"#;
        let states = parse_stored_states_json(doc).expect("document should parse");
        assert_eq!(states.len(), 2);
        assert!(states[0].looped);
        assert_eq!(states[0].priority, 0);
        assert!(!states[1].looped);
        assert_eq!(states[1].priority, 2);
    }

    /// it should reject a document containing a state with non-positive fps
    #[test]
    fn reject_bad_fps() {
        let doc = r#"{ "states": [ { "name": "Bad", "frames": ["x"], "fps": 0 } ] }"#;
        let err = parse_stored_states_json(doc).unwrap_err();
        assert!(err.contains("non-positive fps"), "got: {err}");
    }
}
