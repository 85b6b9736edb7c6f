#![allow(dead_code)]
//! Minimal animation-facing state machine.
//!
//! States are trait objects holding their target animation name; `enter`
//! issues exactly one `play`, `update` evaluates transition predicates only
//! and never mutates animation directly. The machine holds one current state;
//! switching to the current state is a no-op, so animations are never
//! redundantly restarted.

use hashbrown::HashMap;

use flipbook_animation_core::AnimationChannel;

use crate::input::InputSnapshot;

pub const IDLE: &str = "idle";
pub const WALK: &str = "walk";
pub const JUMP: &str = "jump";

/// One gameplay state driving a channel.
pub trait FsmState {
    fn id(&self) -> &str;
    fn enter(&mut self, channel: &mut AnimationChannel);
    fn exit(&mut self, _channel: &mut AnimationChannel) {}
    /// Evaluate transition predicates; return the id of the next state, if
    /// any. Must not touch the channel.
    fn update(&mut self, input: &InputSnapshot, dt: f32) -> Option<String>;
}

/// State machine over a set of registered states.
pub struct AnimationFsm {
    states: Vec<Box<dyn FsmState>>,
    by_id: HashMap<String, usize>,
    current: Option<usize>,
}

impl Default for AnimationFsm {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationFsm {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            by_id: HashMap::new(),
            current: None,
        }
    }

    /// The standard Idle/Walk/Jump locomotion machine over the given
    /// animation names.
    pub fn locomotion(idle_anim: &str, walk_anim: &str, jump_anim: &str) -> Self {
        let mut fsm = Self::new();
        fsm.add_state(Box::new(IdleState::new(idle_anim)));
        fsm.add_state(Box::new(WalkState::new(walk_anim)));
        fsm.add_state(Box::new(JumpState::new(jump_anim)));
        fsm
    }

    pub fn add_state(&mut self, state: Box<dyn FsmState>) {
        let id = state.id().to_string();
        if self.by_id.contains_key(&id) {
            log::warn!("fsm state '{id}' already registered; replacing");
        }
        let idx = self.states.len();
        self.by_id.insert(id, idx);
        self.states.push(state);
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.map(|idx| self.states[idx].id())
    }

    /// Enter the initial state.
    pub fn start(&mut self, id: &str, channel: &mut AnimationChannel) {
        self.change_state(id, channel);
    }

    /// Switch to `id`. A no-op when `id` is already current (returns false);
    /// an unknown id is logged and ignored.
    pub fn change_state(&mut self, id: &str, channel: &mut AnimationChannel) -> bool {
        if self.current_id() == Some(id) {
            return false;
        }
        let Some(&idx) = self.by_id.get(id) else {
            log::warn!("fsm: unknown state '{id}'; transition ignored");
            return false;
        };
        if let Some(cur) = self.current {
            self.states[cur].exit(channel);
        }
        self.current = Some(idx);
        self.states[idx].enter(channel);
        true
    }

    /// Evaluate the current state's transition predicates against this tick's
    /// input and apply at most one transition.
    pub fn update(&mut self, channel: &mut AnimationChannel, input: &InputSnapshot, dt: f32) {
        let Some(cur) = self.current else {
            return;
        };
        if let Some(next) = self.states[cur].update(input, dt) {
            self.change_state(&next, channel);
        }
    }
}

impl std::fmt::Debug for AnimationFsm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationFsm")
            .field("states", &self.states.len())
            .field("current", &self.current_id())
            .finish()
    }
}

// ---- built-in states -------------------------------------------------------

pub struct IdleState {
    anim: String,
}

impl IdleState {
    pub fn new(anim: &str) -> Self {
        Self {
            anim: anim.to_string(),
        }
    }
}

impl FsmState for IdleState {
    fn id(&self) -> &str {
        IDLE
    }

    fn enter(&mut self, channel: &mut AnimationChannel) {
        channel.play(&self.anim);
    }

    fn update(&mut self, input: &InputSnapshot, _dt: f32) -> Option<String> {
        if input.jump_pressed {
            return Some(JUMP.to_string());
        }
        if !input.move_axis.is_zero() {
            return Some(WALK.to_string());
        }
        None
    }
}

pub struct WalkState {
    anim: String,
}

impl WalkState {
    pub fn new(anim: &str) -> Self {
        Self {
            anim: anim.to_string(),
        }
    }
}

impl FsmState for WalkState {
    fn id(&self) -> &str {
        WALK
    }

    fn enter(&mut self, channel: &mut AnimationChannel) {
        channel.play(&self.anim);
    }

    fn update(&mut self, input: &InputSnapshot, _dt: f32) -> Option<String> {
        if input.jump_pressed {
            return Some(JUMP.to_string());
        }
        if input.move_axis.is_zero() {
            return Some(IDLE.to_string());
        }
        None
    }
}

/// Jump has no core exit transition; landing detection is a host concern.
/// Register a custom state or subclass-style wrapper to leave it.
pub struct JumpState {
    anim: String,
}

impl JumpState {
    pub fn new(anim: &str) -> Self {
        Self {
            anim: anim.to_string(),
        }
    }
}

impl FsmState for JumpState {
    fn id(&self) -> &str {
        JUMP
    }

    fn enter(&mut self, channel: &mut AnimationChannel) {
        channel.play(&self.anim);
    }

    fn update(&mut self, _input: &InputSnapshot, _dt: f32) -> Option<String> {
        None
    }
}
