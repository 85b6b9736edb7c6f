//! Shared fixtures for flipbook crates: JSON state sets under `fixtures/`
//! plus programmatic builders used by core and control tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

use flipbook_animation_core::{parse_stored_states_json, AnimationState, StateLibrary};

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "state-sets")]
    state_sets: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

/// Load a named state-set fixture from the manifest.
pub fn load_state_set(name: &str) -> Result<Vec<AnimationState>> {
    let rel = MANIFEST
        .state_sets
        .get(name)
        .ok_or_else(|| anyhow!("unknown state set '{name}'"))?;
    let raw = read_to_string(rel)?;
    parse_stored_states_json(&raw).map_err(|e| anyhow!(e))
}

/// Library preloaded with the hero state set (Idle/Walk/Jump/Attack).
pub fn hero_library() -> StateLibrary {
    let mut lib = StateLibrary::new();
    for state in load_state_set("hero").expect("hero fixture should load") {
        lib.insert(state, 12.0);
    }
    lib
}

/// Build a state with generated frame handles (`name/0`, `name/1`, ...).
pub fn mk_state(name: &str, frame_count: usize, fps: f32, looped: bool) -> AnimationState {
    let frames = (0..frame_count).map(|i| format!("{name}/{i}")).collect();
    AnimationState::new(name, frames, fps, looped)
}

/// Build a library from a list of states.
pub fn mk_library(states: Vec<AnimationState>) -> StateLibrary {
    let mut lib = StateLibrary::new();
    for state in states {
        lib.insert(state, 12.0);
    }
    lib
}
