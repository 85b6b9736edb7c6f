#![allow(dead_code)]
//! Output contracts from an animation channel.
//!
//! Outputs carry the render signal for this tick (the current image) and a
//! separate list of semantic events. Hosts apply the frame to their renderer
//! and transport events; both are pull-based and rebuilt every `update`.

use serde::{Deserialize, Serialize};

use crate::state::ImageHandle;

/// The current image signal for one tick.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FrameChange {
    pub state: String,
    pub frame_index: usize,
    pub image: ImageHandle,
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum ChannelEvent {
    Started {
        state: String,
    },
    FrameChanged {
        state: String,
        frame_index: usize,
    },
    Looped {
        state: String,
        loop_count: u32,
    },
    Completed {
        state: String,
        at_time: f32,
    },
    Stopped,
    Paused,
    Resumed,
    FadeFinished {
        from: String,
        to: String,
    },
    Error {
        message: String,
    },
}

/// Outputs returned by `AnimationChannel::update()`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    /// Current image for this tick, if an active state has frames.
    #[serde(default)]
    pub frame: Option<FrameChange>,
    #[serde(default)]
    pub events: Vec<ChannelEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.frame = None;
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: ChannelEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frame.is_none() && self.events.is_empty()
    }
}
