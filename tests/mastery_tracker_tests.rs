mod common;

use proptest::prelude::*;

use prealgebra_tutor::adaptive::{
    DifficultyLevel, MasteryConfig, MasteryTracker, RecommendationAction, SessionStatus,
};

use common::record_pattern;

fn arb_difficulty() -> impl Strategy<Value = DifficultyLevel> {
    prop_oneof![
        Just(DifficultyLevel::Easy),
        Just(DifficultyLevel::Medium),
        Just(DifficultyLevel::Hard),
    ]
}

#[test]
fn scenario_mastery_path() {
    let mut tracker = MasteryTracker::default();
    record_pattern(&mut tracker, &[true, true, true], 5.0, DifficultyLevel::Medium);

    assert!(tracker.has_mastery());
    assert!(!tracker.should_continue());
    assert_eq!(tracker.session_status(), SessionStatus::Mastered);
    let recommendation = tracker.recommendation();
    assert_eq!(recommendation.action, RecommendationAction::Advance);
    assert!(recommendation.can_advance);
}

#[test]
fn scenario_struggle_path() {
    let mut tracker = MasteryTracker::default();
    for attempt in 1..=5 {
        tracker.record_attempt(false, 20.0, false, DifficultyLevel::Medium);
        if attempt < 5 {
            assert!(tracker.should_continue(), "stopped early at attempt {attempt}");
        }
    }
    assert!(!tracker.should_continue());
    assert_eq!(tracker.session_status(), SessionStatus::Struggling);
}

#[test]
fn exhaustion_at_eight_without_mastery() {
    let mut tracker = MasteryTracker::default();
    // correct/incorrect alternation keeps the streak at one
    let pattern: Vec<bool> = (0..8).map(|i| i % 2 == 1).collect();
    record_pattern(&mut tracker, &pattern[..7], 20.0, DifficultyLevel::Medium);
    assert!(tracker.should_continue());

    record_pattern(&mut tracker, &pattern[7..], 20.0, DifficultyLevel::Medium);
    assert!(!tracker.has_mastery());
    assert!(!tracker.should_continue());
    assert_eq!(tracker.session_status(), SessionStatus::Exhausted);
}

#[test]
fn reset_is_idempotent() {
    let mut tracker = MasteryTracker::default();
    record_pattern(&mut tracker, &[true, false, true, true], 12.0, DifficultyLevel::Hard);

    tracker.reset();
    let once = tracker.state().clone();
    tracker.reset();
    assert_eq!(tracker.state(), &once);
    assert_eq!(tracker.current_mastery(), 0.0);
    assert_eq!(tracker.attempt_count(), 0);
    assert_eq!(tracker.current_difficulty(), DifficultyLevel::Medium);
}

#[test]
fn escalation_reaches_ceiling_and_floor() {
    let mut tracker = MasteryTracker::default();
    tracker.record_attempt(false, 20.0, false, DifficultyLevel::Medium);
    tracker.record_attempt(false, 20.0, false, DifficultyLevel::Medium);
    assert_eq!(tracker.current_difficulty(), DifficultyLevel::Easy);

    tracker.reset();
    record_pattern(&mut tracker, &[true, true, true, true], 20.0, DifficultyLevel::Medium);
    assert_eq!(tracker.current_difficulty(), DifficultyLevel::Hard);
}

#[test]
fn config_threshold_controls_mastery() {
    let config = MasteryConfig {
        mastery_threshold: 2.0,
        ..Default::default()
    };
    let mut tracker = MasteryTracker::new(config);
    record_pattern(&mut tracker, &[true; 7], 5.0, DifficultyLevel::Hard);
    assert!(!tracker.has_mastery());
    assert!(tracker.should_continue());
}

proptest! {
    #[test]
    fn continuation_floor_holds(pattern in prop::collection::vec(any::<bool>(), 0..3), seconds in 0.0f64..120.0) {
        let mut tracker = MasteryTracker::default();
        record_pattern(&mut tracker, &pattern, seconds, DifficultyLevel::Medium);
        prop_assert!(tracker.should_continue());
    }

    #[test]
    fn incorrect_answer_lowers_mastery(position in 0usize..5, difficulty in arb_difficulty(), seconds in 0.0f64..29.9) {
        let mut perfect = MasteryTracker::default();
        record_pattern(&mut perfect, &[true; 5], seconds, difficulty);

        let mut flawed = MasteryTracker::default();
        let mut pattern = [true; 5];
        pattern[position] = false;
        record_pattern(&mut flawed, &pattern, seconds, difficulty);

        prop_assert!(perfect.current_mastery() > flawed.current_mastery());
    }

    #[test]
    fn eight_attempts_always_stop(pattern in prop::collection::vec(any::<bool>(), 8..12)) {
        let mut tracker = MasteryTracker::default();
        record_pattern(&mut tracker, &pattern, 20.0, DifficultyLevel::Medium);
        prop_assert!(!tracker.should_continue());
    }

    #[test]
    fn difficulty_moves_one_tier_at_a_time(pattern in prop::collection::vec(any::<bool>(), 1..30)) {
        let mut tracker = MasteryTracker::default();
        let mut previous = tracker.current_difficulty();
        for correct in pattern {
            tracker.record_attempt(correct, 20.0, false, previous);
            let next = tracker.current_difficulty();
            prop_assert!(next == previous || next == previous.harder() || next == previous.easier());
            previous = next;
        }
    }
}
