#![allow(dead_code)]
//! Blend mixer: the weighted set of all tracks belonging to one channel.
//!
//! Tracks are allocated lazily the first time a state name is played and
//! cached forever; slots are never reclaimed, so long-running sessions with
//! many unique state names grow the arena monotonically. Weights are raw:
//! they are not clamped and are not required to sum to 1.

use hashbrown::HashMap;

use crate::track::FrameTrack;

/// An in-flight linear crossfade between two track slots.
#[derive(Clone, Copy, Debug)]
pub struct Fade {
    pub from: usize,
    pub to: usize,
    pub duration: f32,
    pub elapsed: f32,
}

/// Flat mixer of named tracks with per-track weights.
#[derive(Debug, Default)]
pub struct BlendMixer {
    tracks: Vec<FrameTrack>,
    weights: Vec<f32>,
    by_name: HashMap<String, usize>,
    fade: Option<Fade>,
}

impl BlendMixer {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            tracks: Vec::with_capacity(cap),
            weights: Vec::with_capacity(cap),
            by_name: HashMap::with_capacity(cap),
            fade: None,
        }
    }

    /// Return the existing slot for `name` or bind the next free one to the
    /// given library state. Growth is append-only.
    pub fn ensure_track(&mut self, name: &str, state: usize) -> usize {
        if let Some(&idx) = self.by_name.get(name) {
            return idx;
        }
        let idx = self.tracks.len();
        self.tracks.push(FrameTrack::new(state));
        self.weights.push(0.0);
        self.by_name.insert(name.to_string(), idx);
        idx
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Reverse lookup of a slot's bound state name.
    pub fn name_of(&self, idx: usize) -> Option<&str> {
        self.by_name
            .iter()
            .find_map(|(n, &i)| if i == idx { Some(n.as_str()) } else { None })
    }

    #[inline]
    pub fn track(&self, idx: usize) -> Option<&FrameTrack> {
        self.tracks.get(idx)
    }

    #[inline]
    pub fn track_mut(&mut self, idx: usize) -> Option<&mut FrameTrack> {
        self.tracks.get_mut(idx)
    }

    #[inline]
    pub fn weight(&self, idx: usize) -> f32 {
        self.weights.get(idx).copied().unwrap_or(0.0)
    }

    /// Direct set: no clamping, no renormalization.
    pub fn set_weight(&mut self, idx: usize, weight: f32) {
        if let Some(w) = self.weights.get_mut(idx) {
            *w = weight;
        }
    }

    /// Target weight 1, all others 0, synchronously. Cancels any fade.
    pub fn instant_switch(&mut self, target: usize) {
        self.fade = None;
        for (i, w) in self.weights.iter_mut().enumerate() {
            *w = if i == target { 1.0 } else { 0.0 };
        }
    }

    /// Begin a linear crossfade. A non-positive duration degenerates to an
    /// instant switch.
    pub fn begin_fade(&mut self, from: usize, to: usize, duration: f32) {
        if duration <= 0.0 {
            self.instant_switch(to);
            return;
        }
        for (i, w) in self.weights.iter_mut().enumerate() {
            *w = if i == from { 1.0 } else { 0.0 };
        }
        self.fade = Some(Fade {
            from,
            to,
            duration,
            elapsed: 0.0,
        });
    }

    /// Drive the in-flight fade. On completion weights snap to exact 0/1 and
    /// the finished `(from, to)` pair is returned.
    pub fn tick_fade(&mut self, dt: f32) -> Option<(usize, usize)> {
        let fade = self.fade.as_mut()?;
        fade.elapsed += dt;
        let t = fade.elapsed / fade.duration;
        let (from, to) = (fade.from, fade.to);
        if t >= 1.0 {
            self.fade = None;
            self.set_weight(from, 0.0);
            self.set_weight(to, 1.0);
            Some((from, to))
        } else {
            self.set_weight(from, 1.0 - t);
            self.set_weight(to, t);
            None
        }
    }

    #[inline]
    pub fn fade(&self) -> Option<&Fade> {
        self.fade.as_ref()
    }

    /// Two-track blend: caller supplies the overlay weight every call.
    /// All other slots are forced to zero. Distinct from crossfade: no ramp.
    pub fn blend_pair(&mut self, base: usize, overlay: usize, weight: f32) {
        self.fade = None;
        for (i, w) in self.weights.iter_mut().enumerate() {
            *w = if i == overlay {
                weight
            } else if i == base {
                1.0 - weight
            } else {
                0.0
            };
        }
    }

    /// Zero every weight (stop). Cursors are untouched.
    pub fn zero_all(&mut self) {
        self.fade = None;
        for w in self.weights.iter_mut() {
            *w = 0.0;
        }
    }

    /// Indices of all slots currently contributing (nonzero weight).
    pub fn active_indices(&self) -> Vec<usize> {
        self.weights
            .iter()
            .enumerate()
            .filter_map(|(i, &w)| if w != 0.0 { Some(i) } else { None })
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Drop every slot and binding. Used on channel teardown only.
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.weights.clear();
        self.by_name.clear();
        self.fade = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// it should cache slots forever and reuse them by name
    #[test]
    fn ensure_track_cache_forever() {
        let mut m = BlendMixer::with_capacity(8);
        let a = m.ensure_track("Idle", 0);
        let b = m.ensure_track("Walk", 1);
        assert_ne!(a, b);
        assert_eq!(m.ensure_track("Idle", 0), a);
        assert_eq!(m.len(), 2);
    }

    /// it should ramp fade weights linearly and snap to exact 0/1 at the end
    #[test]
    fn fade_ramp_and_snap() {
        let mut m = BlendMixer::with_capacity(8);
        let a = m.ensure_track("A", 0);
        let b = m.ensure_track("B", 1);
        m.begin_fade(a, b, 1.0);
        assert_eq!(m.weight(a), 1.0);
        assert_eq!(m.weight(b), 0.0);

        assert!(m.tick_fade(0.25).is_none());
        assert!((m.weight(a) - 0.75).abs() < 1e-6);
        assert!((m.weight(b) - 0.25).abs() < 1e-6);

        assert_eq!(m.tick_fade(1.0), Some((a, b)));
        assert_eq!(m.weight(a), 0.0);
        assert_eq!(m.weight(b), 1.0);
        assert!(m.fade().is_none());
    }

    /// it should not clamp weights set directly
    #[test]
    fn raw_weights_unclamped() {
        let mut m = BlendMixer::with_capacity(8);
        let a = m.ensure_track("A", 0);
        m.set_weight(a, 1.7);
        assert_eq!(m.weight(a), 1.7);
    }

    /// it should force all but base/overlay to zero in blend_pair
    #[test]
    fn blend_pair_zeroes_others() {
        let mut m = BlendMixer::with_capacity(8);
        let a = m.ensure_track("A", 0);
        let b = m.ensure_track("B", 1);
        let c = m.ensure_track("C", 2);
        m.set_weight(c, 1.0);
        m.blend_pair(a, b, 0.3);
        assert!((m.weight(a) - 0.7).abs() < 1e-6);
        assert!((m.weight(b) - 0.3).abs() < 1e-6);
        assert_eq!(m.weight(c), 0.0);
        assert_eq!(m.active_indices(), vec![a, b]);
    }
}
