#![allow(dead_code)]
//! Animation channel: per-entity playback driver over a blend mixer.
//!
//! A channel owns its mixer and state library, resolves state names to track
//! slots, and exposes play/pause/resume/stop/crossfade/blend plus per-tick
//! `update(dt)`. Commands issued between ticks surface as events in the next
//! tick's outputs; hook side effects can only influence the following tick.
//!
//! All misuse is non-fatal: unresolved names, empty states, and operations on
//! a released channel log a diagnostic and leave prior state untouched.

use std::panic::{catch_unwind, AssertUnwindSafe};

use hashbrown::{HashMap, HashSet};

use crate::config::Config;
use crate::events::{ChannelEvent, FrameChange, Outputs};
use crate::history::TransitionHistory;
use crate::mixer::BlendMixer;
use crate::snapshot::DebugSnapshot;
use crate::state::{AnimationState, StateLibrary};
use crate::track::TrackTick;
use serde::{Deserialize, Serialize};

/// Per-frame content hook: receives the state name and frame index.
/// Hooks are panic-isolated; a failing hook is logged and never propagated.
pub type FrameHook = Box<dyn FnMut(&str, usize)>;

/// First-loop hook: receives the state name.
pub type LoopHook = Box<dyn FnMut(&str)>;

/// Options for starting playback.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayOptions {
    pub speed: f32,
    /// Overrides the state's own loop flag for this playback when set.
    pub looped: Option<bool>,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            looped: None,
        }
    }
}

#[derive(Clone, Debug)]
struct SavedPlayback {
    state: String,
    normalized_time: f32,
    speed: f32,
}

/// The top-level per-entity animation driver.
pub struct AnimationChannel {
    name: String,
    cfg: Config,
    library: StateLibrary,
    mixer: BlendMixer,

    current: Option<usize>,
    current_speed: f32,
    playing: bool,
    paused: bool,
    released: bool,

    history: TransitionHistory,
    saved: Option<SavedPlayback>,

    // Hooks. `play_hooks` are per-play overrides, cleared on every play.
    frame_hooks: HashMap<(String, usize), FrameHook>,
    play_hooks: HashMap<usize, FrameHook>,
    first_loop_hooks: HashMap<String, LoopHook>,
    first_loop_fired: HashSet<String>,

    // Per-tick outputs plus events buffered between ticks.
    outputs: Outputs,
    pending_events: Vec<ChannelEvent>,
    pending_initial: bool,
}

impl std::fmt::Debug for AnimationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationChannel")
            .field("name", &self.name)
            .field("current", &self.current_state_name())
            .field("playing", &self.playing)
            .field("paused", &self.paused)
            .field("released", &self.released)
            .field("tracks", &self.mixer.len())
            .finish()
    }
}

impl AnimationChannel {
    /// Create a channel with an empty library.
    pub fn new(name: &str, cfg: Config) -> Self {
        Self::with_library(name, cfg, StateLibrary::new())
    }

    /// Create a channel over an externally built library (injected mapping,
    /// no ambient globals).
    pub fn with_library(name: &str, cfg: Config, library: StateLibrary) -> Self {
        Self {
            name: name.to_string(),
            mixer: BlendMixer::with_capacity(cfg.initial_tracks),
            history: TransitionHistory::new(cfg.history_capacity),
            cfg,
            library,
            current: None,
            current_speed: 1.0,
            playing: false,
            paused: false,
            released: false,
            saved: None,
            frame_hooks: HashMap::new(),
            play_hooks: HashMap::new(),
            first_loop_hooks: HashMap::new(),
            first_loop_fired: HashSet::new(),
            outputs: Outputs::default(),
            pending_events: Vec::new(),
            pending_initial: false,
        }
    }

    /// Load a state record into the channel's library. Invalid fps values are
    /// coerced to `Config.default_fps` with a logged warning.
    pub fn load_state(&mut self, state: AnimationState) -> usize {
        self.library.insert(state, self.cfg.default_fps)
    }

    #[inline]
    pub fn library(&self) -> &StateLibrary {
        &self.library
    }

    #[inline]
    pub fn source_name(&self) -> &str {
        &self.name
    }

    // ---- playback commands -------------------------------------------------

    /// Start playback of a named state from frame 0 with default options.
    pub fn play(&mut self, name: &str) {
        self.play_with(name, PlayOptions::default());
    }

    /// Start playback with explicit speed / loop override. Resolves the state,
    /// ensures a track slot, resets it, and instant-switches the mixer to it.
    /// Per-play frame-event overrides and first-loop tracking are cleared.
    pub fn play_with(&mut self, name: &str, opts: PlayOptions) {
        if self.guard_released("play") {
            return;
        }
        let Some((state_idx, state)) = self.library.get_by_name(name) else {
            log::warn!("channel '{}': unknown state '{name}'; play ignored", self.name);
            return;
        };
        if state.frames.is_empty() {
            log::warn!("channel '{}': state '{name}' has no frames; play ignored", self.name);
            return;
        }
        let looped = opts.looped.unwrap_or(state.looped);

        let idx = self.mixer.ensure_track(name, state_idx);
        if let Some(track) = self.mixer.track_mut(idx) {
            track.reset();
            track.speed = opts.speed;
            track.looped = looped;
        }
        self.mixer.instant_switch(idx);

        let prev = self.current_state_name().unwrap_or("-").to_string();
        self.history.record(format!("{prev} -> {name}"));

        self.current = Some(idx);
        self.current_speed = opts.speed;
        self.playing = true;
        self.paused = false;
        self.play_hooks.clear();
        self.first_loop_fired.remove(name);
        self.pending_events.push(ChannelEvent::Started {
            state: name.to_string(),
        });
        self.pending_initial = true;
    }

    /// Linear crossfade to `to` over `duration` seconds.
    ///
    /// The fade-out source is always the currently active track. A `from`
    /// argument that names a different state is logged and ignored for weight
    /// sourcing (the source engine accepted the parameter without reading it;
    /// here the mismatch is surfaced instead of silently replicated).
    pub fn crossfade(&mut self, from: &str, to: &str, duration: f32) {
        if self.guard_released("crossfade") {
            return;
        }
        let Some((state_idx, state)) = self.library.get_by_name(to) else {
            log::warn!("channel '{}': unknown state '{to}'; crossfade ignored", self.name);
            return;
        };
        if state.frames.is_empty() {
            log::warn!(
                "channel '{}': state '{to}' has no frames; crossfade ignored",
                self.name
            );
            return;
        }
        let to_looped = state.looped;

        let to_idx = self.mixer.ensure_track(to, state_idx);
        if let Some(track) = self.mixer.track_mut(to_idx) {
            track.reset();
            track.speed = 1.0;
            track.looped = to_looped;
        }

        match self.current {
            Some(from_idx) if from_idx != to_idx => {
                if self.mixer.name_of(from_idx) != Some(from) {
                    log::warn!(
                        "channel '{}': crossfade source '{from}' is not the active state; \
                         fading from the active track instead",
                        self.name
                    );
                }
                self.mixer.begin_fade(from_idx, to_idx, duration);
            }
            _ => self.mixer.instant_switch(to_idx),
        }

        let prev = self.current_state_name().unwrap_or("-").to_string();
        self.history.record(format!("{prev} ~> {to} ({duration:.2}s)"));

        self.current = Some(to_idx);
        self.current_speed = 1.0;
        self.playing = true;
        self.paused = false;
        self.play_hooks.clear();
        self.first_loop_fired.remove(to);
        self.pending_events.push(ChannelEvent::Started {
            state: to.to_string(),
        });
        self.pending_initial = true;
    }

    /// Hold a two-track blend: `base` at `1 - weight`, `overlay` at `weight`,
    /// everything else zeroed. No ramp; the caller supplies the weight every
    /// call.
    pub fn blend(&mut self, base: &str, overlay: &str, weight: f32) {
        if self.guard_released("blend") {
            return;
        }
        let Some((base_state, _)) = self.library.get_by_name(base) else {
            log::warn!("channel '{}': unknown state '{base}'; blend ignored", self.name);
            return;
        };
        let Some((overlay_state, _)) = self.library.get_by_name(overlay) else {
            log::warn!("channel '{}': unknown state '{overlay}'; blend ignored", self.name);
            return;
        };
        let base_idx = self.mixer.ensure_track(base, base_state);
        let overlay_idx = self.mixer.ensure_track(overlay, overlay_state);
        self.mixer.blend_pair(base_idx, overlay_idx, weight);

        if self.current != Some(base_idx) {
            let prev = self.current_state_name().unwrap_or("-").to_string();
            self.history.record(format!("{prev} -> {base}+{overlay} (blend)"));
            self.current = Some(base_idx);
        }
        self.playing = true;
    }

    /// Zero all weights and clear the playing flag. Track cursors keep their
    /// positions; `currentStateId` is preserved for diagnostics.
    pub fn stop(&mut self) {
        if self.guard_released("stop") {
            return;
        }
        self.mixer.zero_all();
        self.playing = false;
        self.pending_events.push(ChannelEvent::Stopped);
    }

    /// Suspend the channel clock. Individual track state is untouched.
    pub fn pause(&mut self) {
        if self.guard_released("pause") || self.paused {
            return;
        }
        self.paused = true;
        self.pending_events.push(ChannelEvent::Paused);
    }

    /// Resume a paused channel clock.
    pub fn resume(&mut self) {
        if self.guard_released("resume") || !self.paused {
            return;
        }
        self.paused = false;
        self.pending_events.push(ChannelEvent::Resumed);
    }

    /// True iff the channel is actively advancing the named state.
    pub fn is_playing(&self, name: &str) -> bool {
        self.playing && !self.paused && self.current_state_name() == Some(name)
    }

    /// Set the playback speed of the active track.
    pub fn set_speed(&mut self, speed: f32) {
        if self.guard_released("set_speed") {
            return;
        }
        self.current_speed = speed;
        if let Some(idx) = self.current {
            if let Some(track) = self.mixer.track_mut(idx) {
                track.speed = speed;
            }
        }
    }

    // ---- time accessors ----------------------------------------------------

    /// Active track cursor in seconds, 0 when nothing is bound.
    pub fn time(&self) -> f32 {
        self.current
            .and_then(|idx| self.mixer.track(idx))
            .map(|t| t.time_cursor)
            .unwrap_or(0.0)
    }

    /// Direct scrub of the active track's cursor. Fires no events.
    pub fn set_time(&mut self, time: f32) {
        if self.guard_released("set_time") {
            return;
        }
        let Some(idx) = self.current else {
            return;
        };
        let mixer = &mut self.mixer;
        let library = &self.library;
        if let Some(track) = mixer.track_mut(idx) {
            if let Some(state) = library.get(track.state) {
                track.seek(time, state);
            }
        }
    }

    /// Playback position of the active track as a fraction of clip duration,
    /// in `[0, 1)`.
    pub fn normalized_time(&self) -> f32 {
        let Some(idx) = self.current else {
            return 0.0;
        };
        let Some(track) = self.mixer.track(idx) else {
            return 0.0;
        };
        let Some(state) = self.library.get(track.state) else {
            return 0.0;
        };
        track.normalized_time(state)
    }

    /// Total duration of the active state's clip in seconds.
    pub fn clip_length(&self) -> f32 {
        self.current
            .and_then(|idx| self.mixer.track(idx))
            .and_then(|t| self.library.get(t.state))
            .map(|s| s.duration())
            .unwrap_or(0.0)
    }

    /// Frame index of the active track.
    pub fn frame_index(&self) -> Option<usize> {
        self.current
            .and_then(|idx| self.mixer.track(idx))
            .map(|t| t.frame_index)
    }

    /// Cumulative loop count of the active track since its last reset.
    pub fn loop_count(&self) -> u32 {
        self.current
            .and_then(|idx| self.mixer.track(idx))
            .map(|t| t.loops)
            .unwrap_or(0)
    }

    pub fn current_state_name(&self) -> Option<&str> {
        self.current.and_then(|idx| self.mixer.name_of(idx))
    }

    /// Mixer weight of a named state's slot; diagnostics and tests.
    pub fn weight_of(&self, name: &str) -> Option<f32> {
        self.mixer.index_of(name).map(|idx| self.mixer.weight(idx))
    }

    // ---- save / restore ----------------------------------------------------

    /// Snapshot `(state, normalized_time, speed)` of the active playback so an
    /// interruption (hit reaction, cutscene) can resume where it left off.
    pub fn save_playback_state(&mut self) {
        let Some(name) = self.current_state_name().map(str::to_string) else {
            log::warn!("channel '{}': nothing to save", self.name);
            return;
        };
        self.saved = Some(SavedPlayback {
            normalized_time: self.normalized_time(),
            speed: self.current_speed,
            state: name,
        });
    }

    /// Re-play the saved state, then seek to the saved normalized time.
    pub fn restore_playback_state(&mut self) {
        let Some(saved) = self.saved.clone() else {
            log::warn!("channel '{}': no saved playback state", self.name);
            return;
        };
        self.play_with(
            &saved.state,
            PlayOptions {
                speed: saved.speed,
                looped: None,
            },
        );
        if self.current_state_name() == Some(saved.state.as_str()) {
            let length = self.clip_length();
            self.set_time(saved.normalized_time * length);
        }
    }

    // ---- hooks -------------------------------------------------------------

    /// Register a persistent per-frame hook for a state. Survives plays.
    pub fn on_frame(&mut self, state: &str, frame: usize, hook: FrameHook) {
        self.frame_hooks.insert((state.to_string(), frame), hook);
    }

    /// Register a per-play frame-hook override for the active playback.
    /// Overrides shadow persistent hooks and are cleared by the next play.
    pub fn override_frame(&mut self, frame: usize, hook: FrameHook) {
        self.play_hooks.insert(frame, hook);
    }

    /// Register a hook fired on the first loop boundary after each play of a
    /// state. The fired flag is keyed per state name and cleared on play.
    pub fn on_first_loop(&mut self, state: &str, hook: LoopHook) {
        self.first_loop_hooks.insert(state.to_string(), hook);
    }

    // ---- per-tick driver ---------------------------------------------------

    /// Step the channel by `dt`, producing this tick's outputs.
    ///
    /// Order within one tick: buffered command events, fresh-play initial
    /// frame, fade ramp, cursor advancement for every weighted track, then
    /// boundary events and hooks for the active track.
    pub fn update(&mut self, dt: f32) -> &Outputs {
        self.outputs.clear();
        if self.released {
            return &self.outputs;
        }
        self.outputs.events.append(&mut self.pending_events);

        if self.paused || !self.playing {
            return &self.outputs;
        }

        if self.pending_initial {
            self.pending_initial = false;
            if let Some(name) = self.current_state_name().map(str::to_string) {
                let frame = self.frame_index().unwrap_or(0);
                self.emit_frame(&name, frame);
            }
        }

        if let Some((from, to)) = self.mixer.tick_fade(dt) {
            let from = self.mixer.name_of(from).unwrap_or("?").to_string();
            let to = self.mixer.name_of(to).unwrap_or("?").to_string();
            self.push_event(ChannelEvent::FadeFinished { from, to });
        }

        // Advance every contributing track before evaluating boundaries.
        let mut reports: Vec<(usize, TrackTick)> = Vec::new();
        {
            let mixer = &mut self.mixer;
            let library = &self.library;
            for idx in mixer.active_indices() {
                let Some(track) = mixer.track_mut(idx) else {
                    continue;
                };
                let Some(state) = library.get(track.state) else {
                    continue;
                };
                let tick = track.advance(dt, state);
                if tick != TrackTick::default() {
                    reports.push((idx, tick));
                }
            }
        }

        // Re-publish boundaries of the active track only.
        for (idx, tick) in reports {
            if Some(idx) != self.current {
                continue;
            }
            let Some(name) = self.mixer.name_of(idx).map(str::to_string) else {
                continue;
            };
            let (total_loops, cursor) = match self.mixer.track(idx) {
                Some(t) => (t.loops, t.time_cursor),
                None => continue,
            };

            if let Some(frame) = tick.frame_changed {
                self.emit_frame(&name, frame);
            }
            if tick.loops_fired > 0 {
                for k in 0..tick.loops_fired {
                    self.push_event(ChannelEvent::Looped {
                        state: name.clone(),
                        loop_count: total_loops - tick.loops_fired + k + 1,
                    });
                }
                self.fire_first_loop(&name);
            }
            if tick.just_completed {
                self.push_event(ChannelEvent::Completed {
                    state: name.clone(),
                    at_time: cursor,
                });
                // One-shot playback is over; polling drivers unblock here.
                self.playing = false;
            }
        }

        self.refresh_frame_signal();
        &self.outputs
    }

    // ---- diagnostics -------------------------------------------------------

    /// Read-only diagnostic export. Never mutates state.
    pub fn snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            state_name: self.current_state_name().map(str::to_string),
            clip_time: self.time(),
            clip_length: self.clip_length(),
            normalized_time: self.normalized_time(),
            speed: self.current_speed,
            is_playing: self.playing && !self.paused,
            transition_history: self.history.to_vec(),
            source_name: self.name.clone(),
        }
    }

    /// Explicit teardown. Clears every slot and hook; all further operations
    /// on this channel are logged no-ops. Hosts must call this on entity
    /// destruction rather than relying on drop order.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.mixer.clear();
        self.frame_hooks.clear();
        self.play_hooks.clear();
        self.first_loop_hooks.clear();
        self.pending_events.clear();
        self.outputs.clear();
        self.current = None;
        self.playing = false;
        self.released = true;
        log::debug!("channel '{}' released", self.name);
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    // ---- internals ---------------------------------------------------------

    fn guard_released(&self, op: &str) -> bool {
        if self.released {
            log::warn!("channel '{}' is released; {op} ignored", self.name);
        }
        self.released
    }

    fn push_event(&mut self, event: ChannelEvent) {
        if self.outputs.events.len() >= self.cfg.max_events_per_tick {
            log::debug!("channel '{}': event cap reached; dropping {event:?}", self.name);
            return;
        }
        self.outputs.push_event(event);
    }

    /// Render signal + FrameChanged event + hook firing for one frame index.
    fn emit_frame(&mut self, name: &str, frame: usize) {
        if let Some(image) = self
            .library
            .get_by_name(name)
            .and_then(|(_, s)| s.frames.get(frame))
            .cloned()
        {
            self.outputs.frame = Some(FrameChange {
                state: name.to_string(),
                frame_index: frame,
                image,
            });
        }
        self.push_event(ChannelEvent::FrameChanged {
            state: name.to_string(),
            frame_index: frame,
        });

        let panicked = if let Some(hook) = self.play_hooks.get_mut(&frame) {
            catch_unwind(AssertUnwindSafe(|| hook(name, frame))).is_err()
        } else if let Some(hook) = self.frame_hooks.get_mut(&(name.to_string(), frame)) {
            catch_unwind(AssertUnwindSafe(|| hook(name, frame))).is_err()
        } else {
            false
        };
        if panicked {
            log::error!(
                "channel '{}': frame hook panicked for state '{name}' frame {frame}",
                self.name
            );
            self.push_event(ChannelEvent::Error {
                message: format!("frame hook panicked for '{name}' frame {frame}"),
            });
        }
    }

    fn fire_first_loop(&mut self, name: &str) {
        if self.first_loop_fired.contains(name) {
            return;
        }
        self.first_loop_fired.insert(name.to_string());
        let panicked = if let Some(hook) = self.first_loop_hooks.get_mut(name) {
            catch_unwind(AssertUnwindSafe(|| hook(name))).is_err()
        } else {
            return;
        };
        if panicked {
            log::error!(
                "channel '{}': first-loop hook panicked for state '{name}'",
                self.name
            );
            self.push_event(ChannelEvent::Error {
                message: format!("first-loop hook panicked for '{name}'"),
            });
        }
    }

    /// Keep `outputs.frame` populated every tick so hosts always have the
    /// current image, even when no boundary was crossed.
    fn refresh_frame_signal(&mut self) {
        if self.outputs.frame.is_some() {
            return;
        }
        let Some(idx) = self.current else {
            return;
        };
        let Some(track) = self.mixer.track(idx) else {
            return;
        };
        let Some(state) = self.library.get(track.state) else {
            return;
        };
        let Some(image) = state.frames.get(track.frame_index).cloned() else {
            return;
        };
        self.outputs.frame = Some(FrameChange {
            state: state.name.clone(),
            frame_index: track.frame_index,
            image,
        });
    }
}

impl Drop for AnimationChannel {
    // Safety net only; hosts are expected to call release() explicitly.
    fn drop(&mut self) {
        self.release();
    }
}
