use flipbook_animation_core::{AnimationChannel, ChannelEvent, Config};
use flipbook_control::{AnimationFsm, FsmState, InputSnapshot, IDLE, JUMP, WALK};
use flipbook_test_fixtures::hero_library;

fn hero_channel() -> AnimationChannel {
    AnimationChannel::with_library("hero", Config::default(), hero_library())
}

fn started_count(channel: &mut AnimationChannel) -> usize {
    channel
        .update(0.0)
        .events
        .iter()
        .filter(|e| matches!(e, ChannelEvent::Started { .. }))
        .count()
}

/// it should walk the Idle/Walk/Jump transition table from input snapshots
#[test]
fn locomotion_transitions() {
    let mut ch = hero_channel();
    let mut fsm = AnimationFsm::locomotion("Idle", "Walk", "Jump");

    fsm.start(IDLE, &mut ch);
    assert_eq!(fsm.current_id(), Some(IDLE));
    assert!(ch.is_playing("Idle"));

    fsm.update(&mut ch, &InputSnapshot::moving(1.0, 0.0), 0.016);
    assert_eq!(fsm.current_id(), Some(WALK));
    assert!(ch.is_playing("Walk"));

    fsm.update(&mut ch, &InputSnapshot::idle(), 0.016);
    assert_eq!(fsm.current_id(), Some(IDLE));
    assert!(ch.is_playing("Idle"));

    fsm.update(&mut ch, &InputSnapshot::jumping(), 0.016);
    assert_eq!(fsm.current_id(), Some(JUMP));
    assert!(ch.is_playing("Jump"));

    // Jump has no core exit transition.
    fsm.update(&mut ch, &InputSnapshot::moving(1.0, 0.0), 0.016);
    assert_eq!(fsm.current_id(), Some(JUMP));
}

/// it should treat changing to the current state as a no-op with no replay
#[test]
fn change_state_idempotent() {
    let mut ch = hero_channel();
    let mut fsm = AnimationFsm::locomotion("Idle", "Walk", "Jump");

    fsm.start(IDLE, &mut ch);
    assert_eq!(started_count(&mut ch), 1);

    assert!(!fsm.change_state(IDLE, &mut ch));
    assert_eq!(started_count(&mut ch), 0);

    // Repeated idle input keeps the state and never replays the animation.
    for _ in 0..5 {
        fsm.update(&mut ch, &InputSnapshot::idle(), 0.016);
    }
    assert_eq!(started_count(&mut ch), 0);
}

/// it should ignore transitions to unregistered state ids
#[test]
fn unknown_state_ignored() {
    let mut ch = hero_channel();
    let mut fsm = AnimationFsm::locomotion("Idle", "Walk", "Jump");
    fsm.start(IDLE, &mut ch);

    assert!(!fsm.change_state("swim", &mut ch));
    assert_eq!(fsm.current_id(), Some(IDLE));
}

/// it should support custom states leaving Jump (landing extension point)
#[test]
fn custom_landing_state() {
    struct LandingJump {
        anim: String,
        grounded: bool,
    }
    impl FsmState for LandingJump {
        fn id(&self) -> &str {
            JUMP
        }
        fn enter(&mut self, channel: &mut AnimationChannel) {
            channel.play(&self.anim);
        }
        fn update(&mut self, _input: &InputSnapshot, _dt: f32) -> Option<String> {
            if self.grounded {
                Some(IDLE.to_string())
            } else {
                None
            }
        }
    }

    let mut ch = hero_channel();
    let mut fsm = AnimationFsm::new();
    fsm.add_state(Box::new(flipbook_control::IdleState::new("Idle")));
    fsm.add_state(Box::new(flipbook_control::WalkState::new("Walk")));
    fsm.add_state(Box::new(LandingJump {
        anim: "Jump".to_string(),
        grounded: true,
    }));

    fsm.start(JUMP, &mut ch);
    assert!(ch.is_playing("Jump"));
    fsm.update(&mut ch, &InputSnapshot::idle(), 0.016);
    assert_eq!(fsm.current_id(), Some(IDLE));
    assert!(ch.is_playing("Idle"));
}
