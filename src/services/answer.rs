use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorError};
use crate::generator::EquationSpec;
use crate::linear::Solution;

const INFINITE_FORMS: &[&str] = &[
    "infinite",
    "infinity",
    "\u{221e}",
    "infinitelymany",
    "infinitelymanysolutions",
    "allrealnumbers",
    "allnumbers",
];

const NONE_FORMS: &[&str] = &[
    "none",
    "nosolution",
    "nosolutions",
    "noanswer",
    "\u{2205}",
];

/// Parses what a student typed: `7`, `-3`, `x = 7`, `infinite`, `no solution`…
pub fn parse_answer(input: &str) -> Result<Solution> {
    let compact: String = input
        .trim()
        .trim_end_matches('.')
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .collect();
    let value = compact.strip_prefix("x=").unwrap_or(&compact);

    if value.is_empty() {
        return Err(TutorError::parse(input, "empty answer"));
    }
    if INFINITE_FORMS.contains(&value) {
        return Ok(Solution::Infinite);
    }
    if NONE_FORMS.contains(&value) {
        return Ok(Solution::NoSolution);
    }
    if let Ok(n) = value.parse::<i64>() {
        return Ok(Solution::Value(n));
    }

    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Ok(Solution::Value(f as i64))
        }
        Ok(_) => Err(TutorError::parse(input, "answers are whole numbers")),
        Err(_) => Err(TutorError::parse(input, "not a number or a special answer")),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerCheck {
    pub correct: bool,
    pub expected: Solution,
    /// `None` when the input could not be read at all.
    pub given: Option<Solution>,
}

/// An unreadable answer is judged wrong rather than rejected, so a typo still
/// counts as an attempt.
pub fn check_answer(spec: &EquationSpec, input: &str) -> AnswerCheck {
    let given = match parse_answer(input) {
        Ok(solution) => Some(solution),
        Err(err) => {
            tracing::debug!(error = %err, "unreadable answer");
            None
        }
    };

    AnswerCheck {
        correct: given == Some(spec.answer),
        expected: spec.answer,
        given,
    }
}
