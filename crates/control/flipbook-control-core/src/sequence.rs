#![allow(dead_code)]
//! Cooperative step sequencer: "play state, then wait, then callback".
//!
//! The runner holds one in-flight step and polls it each tick; a play step
//! suspends until the channel reports the state no longer playing, a delay
//! step counts down wall time. `interrupt()` cancels the in-flight step and
//! halts the sequence permanently.
//!
//! Playing a looped state in a sequence waits until something else stops it;
//! that mirrors the polling contract rather than guessing a loop count.

use flipbook_animation_core::{AnimationChannel, PlayOptions};

/// Per-step callback. Runs on the host tick that observes the trigger.
pub type StepCallback = Box<dyn FnMut()>;

struct Mark<T> {
    at: T,
    fired: bool,
    callback: StepCallback,
}

enum Step {
    Play {
        state: String,
        speed: f32,
        started: bool,
        frame_marks: Vec<Mark<usize>>,
        time_marks: Vec<Mark<f32>>,
        on_complete: Option<StepCallback>,
    },
    Delay {
        seconds: f32,
        elapsed: f32,
        on_complete: Option<StepCallback>,
    },
}

/// Fluent builder for a step sequence. Consumed by `run()`.
#[derive(Default)]
pub struct Sequence {
    steps: Vec<Step>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a play step at speed 1.
    pub fn play(mut self, state: &str) -> Self {
        self.steps.push(Step::Play {
            state: state.to_string(),
            speed: 1.0,
            started: false,
            frame_marks: Vec::new(),
            time_marks: Vec::new(),
            on_complete: None,
        });
        self
    }

    /// Set the speed of the most recent play step.
    pub fn with_speed(mut self, value: f32) -> Self {
        match self.steps.last_mut() {
            Some(Step::Play { speed, .. }) => *speed = value,
            _ => log::warn!("with_speed called without a preceding play step; ignored"),
        }
        self
    }

    /// Fire a callback the first time the most recent play step reaches the
    /// given frame index.
    pub fn at_frame(mut self, frame: usize, callback: StepCallback) -> Self {
        match self.steps.last_mut() {
            Some(Step::Play { frame_marks, .. }) => frame_marks.push(Mark {
                at: frame,
                fired: false,
                callback,
            }),
            _ => log::warn!("at_frame called without a preceding play step; ignored"),
        }
        self
    }

    /// Fire a callback the first time the most recent play step reaches the
    /// given normalized time in `[0, 1)`.
    pub fn at_normalized_time(mut self, time: f32, callback: StepCallback) -> Self {
        match self.steps.last_mut() {
            Some(Step::Play { time_marks, .. }) => time_marks.push(Mark {
                at: time,
                fired: false,
                callback,
            }),
            _ => log::warn!("at_normalized_time called without a preceding play step; ignored"),
        }
        self
    }

    /// Completion callback for the most recent step, fired after the step
    /// finishes and before the next one begins.
    pub fn then(mut self, callback: StepCallback) -> Self {
        match self.steps.last_mut() {
            Some(Step::Play { on_complete, .. }) | Some(Step::Delay { on_complete, .. }) => {
                *on_complete = Some(callback)
            }
            None => log::warn!("then called on an empty sequence; ignored"),
        }
        self
    }

    /// Append a fixed delay step.
    pub fn wait(mut self, seconds: f32) -> Self {
        self.steps.push(Step::Delay {
            seconds: seconds.max(0.0),
            elapsed: 0.0,
            on_complete: None,
        });
        self
    }

    pub fn run(self) -> SequenceRunner {
        SequenceRunner {
            steps: self.steps,
            cursor: 0,
            status: RunnerStatus::Running,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunnerStatus {
    Running,
    Done,
    Interrupted,
}

/// Executes one step at a time against a channel, one poll per tick.
pub struct SequenceRunner {
    steps: Vec<Step>,
    cursor: usize,
    status: RunnerStatus,
}

impl SequenceRunner {
    #[inline]
    pub fn status(&self) -> RunnerStatus {
        self.status
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.status == RunnerStatus::Done
    }

    /// Cancel the in-flight step and halt permanently. No resume.
    pub fn interrupt(&mut self) {
        if self.status == RunnerStatus::Running {
            self.status = RunnerStatus::Interrupted;
        }
    }

    /// Poll the in-flight step. The host drives `channel.update(dt)`
    /// separately; the runner only issues plays and watches for completion.
    pub fn tick(&mut self, channel: &mut AnimationChannel, dt: f32) {
        if self.status != RunnerStatus::Running {
            return;
        }
        let Some(step) = self.steps.get_mut(self.cursor) else {
            self.status = RunnerStatus::Done;
            return;
        };

        let mut step_done = false;
        match step {
            Step::Play {
                state,
                speed,
                started,
                frame_marks,
                time_marks,
                on_complete,
            } => {
                if !*started {
                    channel.play_with(
                        state,
                        PlayOptions {
                            speed: *speed,
                            looped: None,
                        },
                    );
                    *started = true;
                    if !channel.is_playing(state) {
                        // Unresolved state: the play was a no-op. Skip the
                        // step instead of stalling the whole sequence.
                        log::warn!("sequence: state '{state}' did not start; skipping step");
                        if let Some(cb) = on_complete.as_mut() {
                            cb();
                        }
                        step_done = true;
                    }
                } else {
                    let nt = channel.normalized_time();
                    for mark in time_marks.iter_mut() {
                        if !mark.fired && nt >= mark.at {
                            mark.fired = true;
                            (mark.callback)();
                        }
                    }
                    if let Some(frame) = channel.frame_index() {
                        for mark in frame_marks.iter_mut() {
                            if !mark.fired && frame >= mark.at {
                                mark.fired = true;
                                (mark.callback)();
                            }
                        }
                    }
                    if !channel.is_playing(state) {
                        // Completion counts as normalized time 1.0: a one-shot
                        // cursor overshoots and wraps toward 0 on its final
                        // tick, so late marks would otherwise never trigger.
                        for mark in time_marks.iter_mut() {
                            if !mark.fired {
                                mark.fired = true;
                                (mark.callback)();
                            }
                        }
                        if let Some(cb) = on_complete.as_mut() {
                            cb();
                        }
                        step_done = true;
                    }
                }
            }
            Step::Delay {
                seconds,
                elapsed,
                on_complete,
            } => {
                *elapsed += dt;
                if *elapsed >= *seconds {
                    if let Some(cb) = on_complete.as_mut() {
                        cb();
                    }
                    step_done = true;
                }
            }
        }

        if step_done {
            self.cursor += 1;
            if self.cursor >= self.steps.len() {
                self.status = RunnerStatus::Done;
            }
        }
    }
}
