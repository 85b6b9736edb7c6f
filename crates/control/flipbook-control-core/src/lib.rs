#![allow(dead_code)]
//! Flipbook control layer (engine-agnostic)
//!
//! Gameplay-facing drivers over `flipbook-animation-core` channels: a minimal
//! animation FSM with Idle/Walk/Jump built-ins, jump-buffer and coyote-time
//! helpers, and a cooperative step sequencer. Everything is single-threaded
//! and tick-driven; the host supplies input snapshots and dt.

pub mod buffering;
pub mod fsm;
pub mod input;
pub mod sequence;

pub use buffering::{CoyoteTimer, JumpBuffer, DEFAULT_WINDOW};
pub use fsm::{AnimationFsm, FsmState, IdleState, JumpState, WalkState, IDLE, JUMP, WALK};
pub use input::{InputSnapshot, Vec2};
pub use sequence::{RunnerStatus, Sequence, SequenceRunner, StepCallback};
