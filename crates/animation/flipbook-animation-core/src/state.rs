#![allow(dead_code)]
//! Canonical sprite-state data model and the append-only state library.
//!
//! An [`AnimationState`] is the immutable content record for one named
//! flipbook: an ordered frame sequence plus timing flags. The [`StateLibrary`]
//! is the injected mapping object that resolves names to records; channels
//! only ever read it.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque image handle (small string key). Adapters map these to real
/// texture/sprite resources on their side of the boundary.
pub type ImageHandle = String;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("state '{0}' has a non-positive fps")]
    NonPositiveFps(String),
    #[error("state '{0}' has a non-finite fps")]
    NonFiniteFps(String),
}

/// A named flipbook animation. Immutable once loaded into a library.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnimationState {
    pub name: String,
    pub frames: Vec<ImageHandle>,
    pub fps: f32,
    #[serde(default = "default_looped")]
    pub looped: bool,
    /// Advisory ordering hint for gameplay-side selection; unused by blending.
    #[serde(default)]
    pub priority: i32,
}

fn default_looped() -> bool {
    true
}

impl AnimationState {
    pub fn new(name: &str, frames: Vec<ImageHandle>, fps: f32, looped: bool) -> Self {
        Self {
            name: name.to_string(),
            frames,
            fps,
            looped,
            priority: 0,
        }
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Total clip duration in seconds. Zero for empty or invalid states.
    pub fn duration(&self) -> f32 {
        if self.frames.is_empty() || self.fps <= 0.0 {
            return 0.0;
        }
        self.frames.len() as f32 / self.fps
    }

    /// Validate timing invariants (fps finite and > 0).
    pub fn validate(&self) -> Result<(), StateError> {
        if !self.fps.is_finite() {
            return Err(StateError::NonFiniteFps(self.name.clone()));
        }
        if self.fps <= 0.0 {
            return Err(StateError::NonPositiveFps(self.name.clone()));
        }
        Ok(())
    }
}

/// Append-only arena of animation states with a name→index map.
/// Entries are never removed; reloading a name replaces the record in place.
#[derive(Default, Debug)]
pub struct StateLibrary {
    items: Vec<AnimationState>,
    by_name: HashMap<String, usize>,
}

impl StateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a state, coercing an invalid fps to `default_fps` with a logged
    /// warning. A duplicate name replaces the existing record and keeps its
    /// index.
    pub fn insert(&mut self, mut state: AnimationState, default_fps: f32) -> usize {
        if let Err(e) = state.validate() {
            log::warn!("coercing fps of '{}' to {default_fps}: {e}", state.name);
            state.fps = default_fps;
        }
        if let Some(&idx) = self.by_name.get(&state.name) {
            log::warn!("state '{}' reloaded; replacing existing record", state.name);
            self.items[idx] = state;
            return idx;
        }
        let idx = self.items.len();
        self.by_name.insert(state.name.clone(), idx);
        self.items.push(state);
        idx
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&AnimationState> {
        self.items.get(idx)
    }

    pub fn get_by_name(&self, name: &str) -> Option<(usize, &AnimationState)> {
        let idx = *self.by_name.get(name)?;
        Some((idx, &self.items[idx]))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|s| s.name.as_str())
    }
}
