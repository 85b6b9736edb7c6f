#![allow(dead_code)]
//! Jump buffering and coyote time for grounded/airborne states.

/// Default grace window, in seconds, for both helpers.
pub const DEFAULT_WINDOW: f32 = 0.1;

/// Remembers an early jump press for a short window so it still triggers once
/// eligibility occurs. A buffered press is consumable exactly once.
#[derive(Clone, Copy, Debug)]
pub struct JumpBuffer {
    window: f32,
    remaining: f32,
}

impl Default for JumpBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl JumpBuffer {
    pub fn new(window: f32) -> Self {
        Self {
            window: window.max(0.0),
            remaining: 0.0,
        }
    }

    /// Record a jump press, restarting the buffer window.
    pub fn press(&mut self) {
        self.remaining = self.window;
    }

    /// Age the buffer by one tick.
    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    #[inline]
    pub fn is_buffered(&self) -> bool {
        self.remaining > 0.0
    }

    /// Take the buffered press if one is live. Subsequent calls return false
    /// until the next press.
    pub fn consume(&mut self) -> bool {
        if self.remaining > 0.0 {
            self.remaining = 0.0;
            true
        } else {
            false
        }
    }
}

/// Remembers grounded-ness for a grace window after leaving the ground,
/// during which a jump is still permitted.
#[derive(Clone, Copy, Debug)]
pub struct CoyoteTimer {
    window: f32,
    remaining: f32,
}

impl Default for CoyoteTimer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl CoyoteTimer {
    pub fn new(window: f32) -> Self {
        Self {
            window: window.max(0.0),
            remaining: 0.0,
        }
    }

    /// Feed the grounded flag for this tick. While grounded the window stays
    /// topped up; once airborne it drains.
    pub fn update(&mut self, grounded: bool, dt: f32) {
        if grounded {
            self.remaining = self.window;
        } else {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    #[inline]
    pub fn can_jump(&self) -> bool {
        self.remaining > 0.0
    }
}
