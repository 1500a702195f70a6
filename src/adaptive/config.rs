use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyRule {
    pub window: usize,
    pub escalate_accuracy: f64,
    pub escalate_streak: u32,
    pub deescalate_accuracy: f64,
    pub deescalate_streak: u32,
}

impl Default for DifficultyRule {
    fn default() -> Self {
        Self {
            window: 3,
            escalate_accuracy: 0.9,
            escalate_streak: 2,
            deescalate_accuracy: 0.5,
            deescalate_streak: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryConfig {
    pub mastery_threshold: f64,
    pub min_questions_for_mastery: usize,
    pub max_questions_before_mastery: usize,
    pub mastery_window: usize,
    pub required_streak: u32,
    pub mastery_accuracy: f64,
    pub struggle_min_attempts: usize,
    pub struggle_accuracy: f64,
    pub review_accuracy: f64,
    pub hint_accuracy: f64,
    pub difficulty: DifficultyRule,
    /// Clamp the reported mastery into `[0, 1]`. Off by default: hard, fast,
    /// unassisted runs can legitimately score above 1.
    pub clamp_mastery: bool,
}

impl Default for MasteryConfig {
    fn default() -> Self {
        Self {
            mastery_threshold: 0.85,
            min_questions_for_mastery: 3,
            max_questions_before_mastery: 8,
            mastery_window: 5,
            required_streak: 3,
            mastery_accuracy: 0.8,
            struggle_min_attempts: 5,
            struggle_accuracy: 0.3,
            review_accuracy: 0.6,
            hint_accuracy: 0.4,
            difficulty: DifficultyRule::default(),
            clamp_mastery: false,
        }
    }
}

impl MasteryConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("TUTOR_MASTERY_THRESHOLD") {
            config.mastery_threshold = val.parse().unwrap_or(config.mastery_threshold);
        }
        if let Ok(val) = std::env::var("TUTOR_MIN_QUESTIONS") {
            config.min_questions_for_mastery = val.parse().unwrap_or(config.min_questions_for_mastery);
        }
        if let Ok(val) = std::env::var("TUTOR_MAX_QUESTIONS") {
            config.max_questions_before_mastery =
                val.parse().unwrap_or(config.max_questions_before_mastery);
        }
        if let Ok(val) = std::env::var("TUTOR_CLAMP_MASTERY") {
            config.clamp_mastery = val == "true" || val == "1";
        }

        if let Err(err) = config.validate() {
            tracing::warn!(error = %err, "mastery config from env rejected, using defaults");
            return Self::default();
        }

        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.mastery_window == 0 || self.difficulty.window == 0 {
            return Err(TutorError::InvalidConfig("windows must be non-empty".to_string()));
        }
        if self.min_questions_for_mastery > self.max_questions_before_mastery {
            return Err(TutorError::InvalidConfig(format!(
                "min questions ({}) exceeds max questions ({})",
                self.min_questions_for_mastery, self.max_questions_before_mastery
            )));
        }
        if !(0.0..=2.0).contains(&self.mastery_threshold) {
            return Err(TutorError::InvalidConfig(format!(
                "mastery threshold {} out of range",
                self.mastery_threshold
            )));
        }
        Ok(())
    }
}
