#![allow(dead_code)]

use prealgebra_tutor::adaptive::{DifficultyLevel, MasteryTracker};
use prealgebra_tutor::generator::EquationSpec;
use prealgebra_tutor::linear::Solution;

/// What a learner who solved `spec` would type.
pub fn correct_answer(spec: &EquationSpec) -> String {
    match spec.answer {
        Solution::Value(x) => format!("x = {x}"),
        Solution::Infinite => "infinitely many solutions".to_string(),
        Solution::NoSolution => "no solution".to_string(),
    }
}

pub fn wrong_answer(spec: &EquationSpec) -> String {
    match spec.answer {
        Solution::Value(x) => (x - 1).to_string(),
        Solution::Infinite => "none".to_string(),
        Solution::NoSolution => "infinite".to_string(),
    }
}

pub fn record_pattern(tracker: &mut MasteryTracker, pattern: &[bool], seconds: f64, difficulty: DifficultyLevel) {
    for &correct in pattern {
        tracker.record_attempt(correct, seconds, false, difficulty);
    }
}
