#![allow(dead_code)]
//! Flipbook Animation Core (engine-agnostic)
//!
//! A portable sprite flipbook animation engine: frame tracks advance time
//! cursors and report frame/loop/completion boundaries, a blend mixer holds
//! per-track weights with instant switch and linear crossfade, and an
//! animation channel resolves named states, drives the per-tick update, and
//! publishes a render signal plus semantic events each tick.
//!
//! Scheduling is single-threaded and cooperative: the host calls
//! `AnimationChannel::update(dt)` once per rendered frame and applies the
//! returned outputs. There are no internal timers or threads.

pub mod channel;
pub mod config;
pub mod events;
pub mod history;
pub mod mixer;
pub mod snapshot;
pub mod state;
pub mod stored_states;
pub mod track;

// Re-exports for consumers (drivers, control layers)
pub use channel::{AnimationChannel, FrameHook, LoopHook, PlayOptions};
pub use config::Config;
pub use events::{ChannelEvent, FrameChange, Outputs};
pub use history::TransitionHistory;
pub use mixer::{BlendMixer, Fade};
pub use snapshot::DebugSnapshot;
pub use state::{AnimationState, ImageHandle, StateError, StateLibrary};
pub use stored_states::{load_stored_states_json, parse_stored_states_json};
pub use track::{FrameTrack, TrackTick};
