#![allow(dead_code)]
//! Frame track: per-state playback cursor and frame bookkeeping.
//!
//! A track is a live playback slot bound to one library state. `advance`
//! mutates the cursor and reports boundary crossings in a [`TrackTick`];
//! the owning channel turns those reports into events and hook firings
//! after all cursors have moved, so hook side effects can never corrupt
//! the tick in flight.

use crate::state::AnimationState;

/// Boundary report for one `advance` call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackTick {
    /// New frame index, present only when the index actually changed.
    pub frame_changed: Option<usize>,
    /// Number of loop boundaries crossed during this advance.
    pub loops_fired: u32,
    /// Set on the advance that clamps a one-shot state to its last frame.
    pub just_completed: bool,
}

/// A live playback slot bound to one state in the owning channel's library.
/// Slots are allocated lazily and never reclaimed.
#[derive(Clone, Debug)]
pub struct FrameTrack {
    /// Index of the bound state in the owning channel's library.
    pub state: usize,
    pub time_cursor: f32,
    pub frame_index: usize,
    pub speed: f32,
    /// Effective loop flag for this playback (state flag, possibly overridden
    /// per play).
    pub looped: bool,
    pub completed: bool,
    /// Cumulative loop count since the last reset.
    pub loops: u32,
}

impl FrameTrack {
    pub fn new(state: usize) -> Self {
        Self {
            state,
            time_cursor: 0.0,
            frame_index: 0,
            speed: 1.0,
            looped: true,
            completed: false,
            loops: 0,
        }
    }

    /// Advance the cursor by `dt * speed` and recompute the frame index.
    ///
    /// Looped states wrap both cursor and index modulo the clip duration and
    /// report every crossed boundary. One-shot states clamp to the last frame
    /// and complete exactly once; further advances are frozen.
    pub fn advance(&mut self, dt: f32, state: &AnimationState) -> TrackTick {
        let mut tick = TrackTick::default();
        let n = state.frame_count();
        if n == 0 {
            log::debug!("track for '{}' has no frames; advance is a no-op", state.name);
            return tick;
        }
        if self.completed {
            return tick;
        }
        let duration = state.duration();
        if duration <= 0.0 {
            return tick;
        }

        self.time_cursor += dt * self.speed;
        if self.time_cursor < 0.0 {
            self.time_cursor = 0.0;
        }

        let prev = self.frame_index;
        if self.looped {
            if self.time_cursor >= duration {
                let crossed = (self.time_cursor / duration).floor() as u32;
                self.time_cursor -= crossed as f32 * duration;
                self.loops += crossed;
                tick.loops_fired = crossed;
            }
            let raw = (self.time_cursor * state.fps).floor() as usize;
            self.frame_index = raw.min(n - 1);
        } else {
            let raw = (self.time_cursor * state.fps).floor() as usize;
            if raw >= n {
                self.frame_index = n - 1;
                self.completed = true;
                tick.just_completed = true;
            } else {
                self.frame_index = raw;
            }
        }

        if self.frame_index != prev {
            tick.frame_changed = Some(self.frame_index);
        }
        tick
    }

    /// Direct scrub of the cursor. Fires no events; the frame index is
    /// recomputed immediately.
    pub fn seek(&mut self, time: f32, state: &AnimationState) {
        let n = state.frame_count();
        let duration = state.duration();
        if n == 0 || duration <= 0.0 {
            return;
        }
        if self.looped {
            let mut t = time % duration;
            if t < 0.0 {
                t += duration;
            }
            self.time_cursor = t;
            self.frame_index = ((t * state.fps).floor() as usize).min(n - 1);
        } else {
            let t = time.clamp(0.0, duration);
            self.time_cursor = t;
            let raw = (t * state.fps).floor() as usize;
            self.frame_index = raw.min(n - 1);
            self.completed = raw >= n;
        }
    }

    /// Playback position as a fraction of total duration, in `[0, 1)`.
    pub fn normalized_time(&self, state: &AnimationState) -> f32 {
        let duration = state.duration();
        if duration <= 0.0 {
            return 0.0;
        }
        let x = self.time_cursor / duration;
        x - x.floor()
    }

    /// Zero cursor, frame index, completion flag, and loop count.
    pub fn reset(&mut self) {
        self.time_cursor = 0.0;
        self.frame_index = 0;
        self.completed = false;
        self.loops = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> AnimationState {
        AnimationState::new("Walk", vec!["w".into(); 8], 8.0, true)
    }

    fn attack() -> AnimationState {
        AnimationState::new("Attack", vec!["a".into(); 4], 4.0, false)
    }

    /// it should wrap a looped track and count every crossed boundary
    #[test]
    fn loop_wrap_counts_boundaries() {
        let state = walk();
        let mut t = FrameTrack::new(0);
        let tick = t.advance(2.5, &state);
        assert_eq!(tick.loops_fired, 2);
        assert_eq!(t.loops, 2);
        assert!((t.normalized_time(&state) - 0.5).abs() < 1e-5);
    }

    /// it should clamp a one-shot track to the last frame and complete once
    #[test]
    fn one_shot_clamps_and_completes_once() {
        let state = attack();
        let mut t = FrameTrack::new(0);
        t.looped = false;
        let tick = t.advance(2.0, &state);
        assert!(tick.just_completed);
        assert_eq!(t.frame_index, 3);
        assert!(t.completed);

        // frozen after completion
        let tick2 = t.advance(1.0, &state);
        assert_eq!(tick2, TrackTick::default());
        assert_eq!(t.frame_index, 3);
    }

    /// it should report a frame change only when the index moves
    #[test]
    fn frame_change_only_on_boundary() {
        let state = walk();
        let mut t = FrameTrack::new(0);
        let a = t.advance(0.06, &state); // still frame 0 at 8 fps
        assert_eq!(a.frame_changed, None);
        let b = t.advance(0.07, &state); // crosses 0.125
        assert_eq!(b.frame_changed, Some(1));
    }

    /// it should seek with wrap for looped and clamp for one-shot states
    #[test]
    fn seek_wraps_and_clamps() {
        let state = walk();
        let mut t = FrameTrack::new(0);
        t.seek(1.25, &state);
        assert!((t.time_cursor - 0.25).abs() < 1e-6);
        assert_eq!(t.frame_index, 2);

        let one_shot = attack();
        let mut t2 = FrameTrack::new(0);
        t2.looped = false;
        t2.seek(5.0, &one_shot);
        assert!((t2.time_cursor - 1.0).abs() < 1e-6);
        assert_eq!(t2.frame_index, 3);
    }

    /// it should treat a zero-frame state as a no-op advance
    #[test]
    fn zero_frames_noop() {
        let state = AnimationState::new("Empty", vec![], 8.0, true);
        let mut t = FrameTrack::new(0);
        let tick = t.advance(1.0, &state);
        assert_eq!(tick, TrackTick::default());
        assert_eq!(t.time_cursor, 0.0);
    }
}
