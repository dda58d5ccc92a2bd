use assert_matches::assert_matches;
use keysprint::{
    classifier::{classify, CharState},
    controller::{Controller, KeyOutcome},
    error::SessionError,
    language::Language,
    runtime::{Key, ManualClock},
    session::{Phase, SessionConfig, TargetText},
    stats::{self, consistency},
    time_series::WpmHistory,
    word_generator::{FixedText, WordGenerator},
    TestDuration,
};

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn controller(text: &str, duration: TestDuration) -> (Controller, ManualClock) {
    let clock = ManualClock::new();
    let ctl = Controller::new(
        SessionConfig {
            duration,
            word_count: 1,
        },
        Box::new(FixedText::new(TargetText::new(text).unwrap())),
        Box::new(clock.clone()),
    );
    (ctl, clock)
}

fn type_str(ctl: &mut Controller, s: &str) {
    for c in s.chars() {
        ctl.on_key(Key::Char(c));
    }
}

#[test]
fn scenario_a_classification() {
    let (mut ctl, _) = controller("cat dog", TestDuration::Thirty);
    type_str(&mut ctl, "cat dig");

    let snapshot = ctl.snapshot();
    assert_eq!(snapshot.states, classify(&chars("cat dog"), &chars("cat dig")));
    assert_eq!(
        snapshot.states,
        vec![
            CharState::Correct,
            CharState::Correct,
            CharState::Correct,
            CharState::Correct,
            CharState::Correct,
            CharState::Incorrect,
            CharState::Correct,
        ]
    );
}

#[test]
fn scenario_b_nothing_typed() {
    let target = chars("cat dog");
    let result = stats::final_stats(&target, &[], 30, 30, &WpmHistory::new());

    assert_eq!(result.correct_chars, 0);
    assert_eq!(result.wpm, 0);
    assert_eq!(result.accuracy, 100);
    assert_eq!(result.errors, 0);
    assert_eq!(result.consistency, 100);
}

#[test]
fn scenario_c_ten_correct_chars_in_thirty_seconds() {
    let (mut ctl, clock) = controller("abcdefghijklmnop", TestDuration::Thirty);
    type_str(&mut ctl, "abcdefghij");

    clock.advance_secs(30);
    let done = ctl.poll().expect("timer should have expired");

    assert_eq!(done.stats.correct_chars, 10);
    assert_eq!(done.stats.wpm, 4);
    assert_eq!(ctl.snapshot().remaining_secs, 0);
}

#[test]
fn scenario_d_flat_history_is_fully_consistent() {
    assert_eq!(consistency(&[60.0, 60.0, 60.0]), 100);
    let history: WpmHistory = [60.0, 60.0, 60.0].into_iter().collect();
    assert_eq!(consistency(&history.wpm_values()), 100);
}

#[test]
fn scenario_e_backspace_on_empty_buffer() {
    let (mut ctl, _) = controller("cat", TestDuration::Fifteen);
    assert_eq!(ctl.on_key(Key::Backspace), KeyOutcome::Ignored);
    assert_eq!(ctl.phase(), Phase::Idle);
    assert!(ctl.snapshot().typed.is_empty());

    ctl.on_key(Key::Char('c'));
    ctl.on_key(Key::Backspace);
    assert_eq!(ctl.on_key(Key::Backspace), KeyOutcome::Ignored);
    assert_eq!(ctl.phase(), Phase::Running);
    assert!(ctl.snapshot().typed.is_empty());
}

#[test]
fn restart_discards_previous_test() {
    let (mut ctl, clock) = controller("cat dog", TestDuration::Fifteen);
    type_str(&mut ctl, "cat");
    clock.advance_secs(5);
    ctl.poll();

    ctl.reset(None);
    let snapshot = ctl.snapshot();
    assert_eq!(snapshot.phase, Phase::Idle);
    assert!(snapshot.typed.is_empty());
    assert_eq!(snapshot.remaining_secs, 15);
    assert!(ctl.history().is_empty());

    // the old test's elapsed time must not count against the new one
    clock.advance_secs(60);
    assert!(ctl.poll().is_none());
    assert_eq!(ctl.snapshot().remaining_secs, 15);
}

#[test]
fn finalize_is_idempotent() {
    let (mut ctl, clock) = controller("cat", TestDuration::Fifteen);
    assert_matches!(
        ctl.finalize(),
        Err(SessionError::NotFinished {
            phase: Phase::Idle
        })
    );

    type_str(&mut ctl, "ca");
    clock.advance_secs(15);
    let done = ctl.poll().unwrap();

    assert_eq!(ctl.finalize().unwrap(), done.stats);
    assert_eq!(ctl.finalize().unwrap(), done.stats);
    assert!(ctl.poll().is_none());
    assert!(ctl.tick().is_none());
}

#[test]
fn keystroke_at_zero_remaining_is_scored() {
    let (mut ctl, clock) = controller("abcdef", TestDuration::Fifteen);
    type_str(&mut ctl, "a");

    clock.advance_secs(15);
    assert_eq!(ctl.on_key(Key::Char('b')), KeyOutcome::Typed);

    let done = ctl.poll().expect("expires once the key is applied");
    assert_eq!(done.stats.correct_chars, 2);
    assert_eq!(done.stats.wpm, 2);
}

#[test]
fn keystroke_after_expiry_boundary_is_dropped() {
    let (mut ctl, clock) = controller("abcdef", TestDuration::Fifteen);
    type_str(&mut ctl, "a");

    clock.advance(std::time::Duration::from_millis(15_500));
    assert_eq!(ctl.on_key(Key::Char('b')), KeyOutcome::Ignored);
    assert_eq!(ctl.phase(), Phase::Finished);

    let done = ctl.poll().expect("late key expired the timer");
    assert_eq!(done.stats.correct_chars, 1);
    assert_eq!(ctl.snapshot().typed, vec!['a']);
}

#[test]
fn remaining_time_never_increases() {
    let (mut ctl, clock) = controller("the quick brown fox", TestDuration::Fifteen);
    type_str(&mut ctl, "t");

    let mut last = ctl.snapshot().remaining_secs;
    for step in 0..40 {
        clock.advance(std::time::Duration::from_millis(450));
        if step % 3 == 0 {
            ctl.on_key(Key::Char('h'));
        }
        ctl.poll();
        let now = ctl.snapshot().remaining_secs;
        assert!(now <= last);
        last = now;
    }
    assert_eq!(last, 0);
    assert_eq!(ctl.phase(), Phase::Finished);
}

#[test]
fn generated_text_uses_requested_word_count() {
    let clock = ManualClock::new();
    let ctl = Controller::new(
        SessionConfig {
            duration: TestDuration::Thirty,
            word_count: 12,
        },
        Box::new(WordGenerator::seeded(Language::english(), 7)),
        Box::new(clock),
    );

    let text: String = ctl.snapshot().target.into_iter().collect();
    assert_eq!(text.split(' ').count(), 12);
    assert!(!text.ends_with(' '));
}
