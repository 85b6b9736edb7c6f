use std::cell::RefCell;
use std::rc::Rc;

use flipbook_animation_core::{AnimationChannel, Config};
use flipbook_control::{RunnerStatus, Sequence, SequenceRunner};
use flipbook_test_fixtures::hero_library;

fn hero_channel() -> AnimationChannel {
    AnimationChannel::with_library("hero", Config::default(), hero_library())
}

fn drive(runner: &mut SequenceRunner, channel: &mut AnimationChannel, dt: f32, ticks: usize) {
    for _ in 0..ticks {
        runner.tick(channel, dt);
        let _ = channel.update(dt);
    }
}

/// it should run play, then wait, then fire callbacks in order
#[test]
fn play_wait_callback_order() {
    let mut ch = hero_channel();
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let l1 = log.clone();
    let l2 = log.clone();
    // Attack: 1 s one-shot.
    let mut runner = Sequence::new()
        .play("Attack")
        .then(Box::new(move || l1.borrow_mut().push("attack-done")))
        .wait(0.5)
        .then(Box::new(move || l2.borrow_mut().push("wait-done")))
        .run();

    drive(&mut runner, &mut ch, 0.25, 12);
    assert_eq!(runner.status(), RunnerStatus::Done);
    assert_eq!(log.borrow().as_slice(), ["attack-done", "wait-done"]);
}

/// it should fire frame and normalized-time marks exactly once
#[test]
fn marks_fire_once() {
    let mut ch = hero_channel();
    let frames: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let f = frames.clone();
    let t = frames.clone();
    let mut runner = Sequence::new()
        .play("Attack")
        .at_frame(2, Box::new(move || f.borrow_mut().push("frame-2")))
        .at_normalized_time(0.5, Box::new(move || t.borrow_mut().push("half")))
        .run();

    drive(&mut runner, &mut ch, 0.125, 16);
    assert_eq!(runner.status(), RunnerStatus::Done);
    let fired = frames.borrow();
    assert_eq!(fired.iter().filter(|s| **s == "frame-2").count(), 1);
    assert_eq!(fired.iter().filter(|s| **s == "half").count(), 1);
}

/// it should fire a late normalized-time mark on step completion
#[test]
fn late_time_mark_fires_on_completion() {
    let mut ch = hero_channel();
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let m = log.clone();
    let d = log.clone();
    // Coarse polling: no tick observes a normalized time >= 0.9 before the
    // 1 s Attack clip completes.
    let mut runner = Sequence::new()
        .play("Attack")
        .at_normalized_time(0.9, Box::new(move || m.borrow_mut().push("late-mark")))
        .then(Box::new(move || d.borrow_mut().push("done")))
        .run();

    drive(&mut runner, &mut ch, 0.25, 8);
    assert_eq!(runner.status(), RunnerStatus::Done);
    assert_eq!(log.borrow().as_slice(), ["late-mark", "done"]);
}

/// it should halt permanently on interrupt with no further callbacks
#[test]
fn interrupt_is_permanent() {
    let mut ch = hero_channel();
    let fired = Rc::new(RefCell::new(false));

    let f = fired.clone();
    let mut runner = Sequence::new()
        .play("Attack")
        .then(Box::new(move || *f.borrow_mut() = true))
        .run();

    drive(&mut runner, &mut ch, 0.25, 2);
    runner.interrupt();
    assert_eq!(runner.status(), RunnerStatus::Interrupted);

    drive(&mut runner, &mut ch, 0.25, 12);
    assert_eq!(runner.status(), RunnerStatus::Interrupted);
    assert!(!*fired.borrow());
}

/// it should keep waiting on a looped state until interrupted
#[test]
fn looped_state_waits_indefinitely() {
    let mut ch = hero_channel();
    let mut runner = Sequence::new().play("Walk").run();

    drive(&mut runner, &mut ch, 0.25, 40);
    assert_eq!(runner.status(), RunnerStatus::Running);
    assert!(ch.is_playing("Walk"));

    runner.interrupt();
    assert_eq!(runner.status(), RunnerStatus::Interrupted);
}

/// it should skip a step whose state cannot start instead of stalling
#[test]
fn unresolved_state_skips_step() {
    let mut ch = hero_channel();
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let l1 = log.clone();
    let l2 = log.clone();
    let mut runner = Sequence::new()
        .play("Nope")
        .then(Box::new(move || l1.borrow_mut().push("skipped")))
        .wait(0.25)
        .then(Box::new(move || l2.borrow_mut().push("waited")))
        .run();

    drive(&mut runner, &mut ch, 0.25, 4);
    assert_eq!(runner.status(), RunnerStatus::Done);
    assert_eq!(log.borrow().as_slice(), ["skipped", "waited"]);
}

/// it should apply the step speed to the underlying play
#[test]
fn step_speed_applied() {
    let mut ch = hero_channel();
    let mut runner = Sequence::new().play("Attack").with_speed(2.0).run();

    // 2x speed: the 1 s attack finishes in ~0.5 s of wall time.
    drive(&mut runner, &mut ch, 0.25, 4);
    assert_eq!(runner.status(), RunnerStatus::Done);
}
