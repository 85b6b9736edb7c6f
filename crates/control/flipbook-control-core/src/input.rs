#![allow(dead_code)]
//! Input snapshot contract for the control layer.
//!
//! The FSM never reads devices; the host samples its input system once per
//! tick and passes the snapshot in.

use serde::{Deserialize, Serialize};

/// 2D movement axis, typically in [-1, 1] per component.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// One tick's worth of gameplay input.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct InputSnapshot {
    pub move_axis: Vec2,
    pub jump_pressed: bool,
}

impl InputSnapshot {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(x: f32, y: f32) -> Self {
        Self {
            move_axis: Vec2::new(x, y),
            jump_pressed: false,
        }
    }

    pub fn jumping() -> Self {
        Self {
            move_axis: Vec2::default(),
            jump_pressed: true,
        }
    }
}
