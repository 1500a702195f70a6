use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TutorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn harder(&self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            _ => Self::Hard,
        }
    }

    pub fn easier(&self) -> Self {
        match self {
            Self::Hard => Self::Medium,
            _ => Self::Easy,
        }
    }

    /// Lenient parse for display strings; anything unrecognised is `Medium`.
    /// Use `str::parse` when an unknown tier must be rejected.
    pub fn parse(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Easy => 0.8,
            Self::Medium => 1.0,
            Self::Hard => 1.3,
        }
    }
}

impl FromStr for DifficultyLevel {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" | "mid" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(TutorError::UnknownDifficulty(other.to_string())),
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student response to one problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub correct: bool,
    pub time_spent_seconds: f64,
    pub used_hint: bool,
    pub difficulty: DifficultyLevel,
    pub timestamp: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn new(correct: bool, time_spent_seconds: f64, used_hint: bool, difficulty: DifficultyLevel) -> Self {
        Self {
            correct,
            time_spent_seconds,
            used_hint,
            difficulty,
            timestamp: Utc::now(),
        }
    }

    pub fn hint_penalty(&self) -> f64 {
        if self.used_hint {
            0.7
        } else {
            1.0
        }
    }

    pub fn speed_bonus(&self) -> f64 {
        if self.time_spent_seconds < 30.0 {
            1.1
        } else if self.time_spent_seconds > 60.0 {
            0.9
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryMetrics {
    pub consecutive_correct: u32,
    pub consecutive_incorrect: u32,
    pub hints_used_count: u32,
}

impl MasteryMetrics {
    pub fn record(&mut self, correct: bool, used_hint: bool) {
        if correct {
            self.consecutive_correct += 1;
            self.consecutive_incorrect = 0;
        } else {
            self.consecutive_incorrect += 1;
            self.consecutive_correct = 0;
        }
        if used_hint {
            self.hints_used_count += 1;
        }
    }
}

/// Where the session stands according to the continuation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Mastered,
    Exhausted,
    Struggling,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Mastered => "mastered",
            Self::Exhausted => "exhausted",
            Self::Struggling => "struggling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationAction {
    Advance,
    Review,
    Help,
    Hint,
    Continue,
}

impl RecommendationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Review => "review",
            Self::Help => "help",
            Self::Hint => "hint",
            Self::Continue => "continue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub action: RecommendationAction,
    pub message: String,
    pub can_advance: bool,
}

impl Recommendation {
    pub fn new(action: RecommendationAction) -> Self {
        let message = match action {
            RecommendationAction::Advance => "Great work! You've mastered this concept.",
            RecommendationAction::Review => {
                "You're close. Review the worked steps and try this level again."
            }
            RecommendationAction::Help => {
                "This one is tricky. Go back over the lesson before trying again."
            }
            RecommendationAction::Hint => "Try using a hint on the next problem.",
            RecommendationAction::Continue => "Keep practicing!",
        };
        Self {
            action,
            message: message.to_string(),
            can_advance: action == RecommendationAction::Advance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_attempts: usize,
    pub correct_count: usize,
    pub overall_accuracy: f64,
    pub recent_accuracy: f64,
    pub mastery: f64,
    pub has_mastery: bool,
    pub status: SessionStatus,
    pub current_difficulty: DifficultyLevel,
    pub average_time_seconds: f64,
    pub metrics: MasteryMetrics,
    pub recommendation: Recommendation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_steps_saturate() {
        assert_eq!(DifficultyLevel::Easy.harder(), DifficultyLevel::Medium);
        assert_eq!(DifficultyLevel::Medium.harder(), DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::Hard.harder(), DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::Hard.easier(), DifficultyLevel::Medium);
        assert_eq!(DifficultyLevel::Easy.easier(), DifficultyLevel::Easy);
    }

    #[test]
    fn difficulty_parsing() {
        assert_eq!("HARD".parse::<DifficultyLevel>(), Ok(DifficultyLevel::Hard));
        assert_eq!(" mid ".parse::<DifficultyLevel>(), Ok(DifficultyLevel::Medium));
        assert!("expert".parse::<DifficultyLevel>().is_err());
        assert_eq!(DifficultyLevel::parse("expert"), DifficultyLevel::Medium);
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&DifficultyLevel::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn metrics_reset_opposite_streak() {
        let mut metrics = MasteryMetrics::default();
        metrics.record(true, false);
        metrics.record(true, true);
        assert_eq!(metrics.consecutive_correct, 2);
        assert_eq!(metrics.hints_used_count, 1);

        metrics.record(false, false);
        assert_eq!(metrics.consecutive_correct, 0);
        assert_eq!(metrics.consecutive_incorrect, 1);
    }

    #[test]
    fn speed_bonus_buckets() {
        let at = |secs| AttemptRecord::new(true, secs, false, DifficultyLevel::Medium).speed_bonus();
        assert_eq!(at(5.0), 1.1);
        assert_eq!(at(30.0), 1.0);
        assert_eq!(at(60.0), 1.0);
        assert_eq!(at(61.0), 0.9);
        assert_eq!(at(-1.0), 1.1);
    }
}
