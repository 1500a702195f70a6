//! Session-scoped mastery tracking.
//!
//! Consumes one attempt record per answered problem and answers three
//! questions for the surrounding session:
//! - how well is the learner doing right now (`current_mastery`)
//! - what tier should the next problem use (`current_difficulty`)
//! - should the level keep going (`should_continue` / `session_status`)
//!
//! All decisions are recomputed from the history on every call; the only
//! mutation path is `record_attempt`, and `reset` starts a fresh level.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::adaptive::config::MasteryConfig;
use crate::adaptive::types::*;
use crate::core::{
    AttemptRecordedPayload, DifficultyChangedPayload, EventBus, MasteryReachedPayload,
    MasteryUpdatedPayload, StruggleDetectedPayload, TutorEvent,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub performance_history: Vec<AttemptRecord>,
    pub current_difficulty: DifficultyLevel,
    pub metrics: MasteryMetrics,
}

pub struct MasteryTracker {
    config: MasteryConfig,
    state: SessionState,
    events: Option<Arc<EventBus>>,
    session_id: Option<String>,
    mastery_announced: bool,
    struggle_announced: bool,
}

impl MasteryTracker {
    pub fn new(config: MasteryConfig) -> Self {
        Self {
            config,
            state: SessionState::default(),
            events: None,
            session_id: None,
            mastery_announced: false,
            struggle_announced: false,
        }
    }

    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Tags published events with the owning session.
    pub fn set_session_id(&mut self, session_id: Option<String>) {
        self.session_id = session_id;
    }

    pub fn config(&self) -> &MasteryConfig {
        &self.config
    }

    /// Swaps thresholds, e.g. for a level with its own mastery bar. History
    /// is left alone; pair with `reset` when starting over.
    pub fn set_config(&mut self, config: MasteryConfig) {
        self.config = config;
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &[AttemptRecord] {
        &self.state.performance_history
    }

    pub fn metrics(&self) -> MasteryMetrics {
        self.state.metrics
    }

    pub fn attempt_count(&self) -> usize {
        self.state.performance_history.len()
    }

    pub fn current_difficulty(&self) -> DifficultyLevel {
        self.state.current_difficulty
    }

    pub fn record_attempt(
        &mut self,
        correct: bool,
        time_spent_seconds: f64,
        used_hint: bool,
        difficulty: DifficultyLevel,
    ) -> f64 {
        self.record(AttemptRecord::new(correct, time_spent_seconds, used_hint, difficulty))
    }

    /// Appends an already-built record (e.g. one restored by the caller).
    pub fn record(&mut self, attempt: AttemptRecord) -> f64 {
        if attempt.difficulty != self.state.current_difficulty {
            tracing::debug!(
                recorded = %attempt.difficulty,
                current = %self.state.current_difficulty,
                "attempt difficulty differs from current tier"
            );
        }

        self.state.metrics.record(attempt.correct, attempt.used_hint);
        self.publish(TutorEvent::AttemptRecorded(AttemptRecordedPayload {
            session_id: self.session_id.clone(),
            attempt_number: self.state.performance_history.len() + 1,
            correct: attempt.correct,
            time_spent_seconds: attempt.time_spent_seconds,
            used_hint: attempt.used_hint,
            difficulty: attempt.difficulty,
            timestamp: attempt.timestamp,
        }));
        self.state.performance_history.push(attempt);

        self.adjust_difficulty();

        let mastery = self.current_mastery();
        tracing::debug!(
            attempts = self.attempt_count(),
            mastery,
            difficulty = %self.state.current_difficulty,
            "attempt recorded"
        );
        self.publish(TutorEvent::MasteryUpdated(MasteryUpdatedPayload {
            session_id: self.session_id.clone(),
            mastery,
            attempt_count: self.attempt_count(),
            timestamp: Utc::now(),
        }));
        self.announce_milestones(mastery);

        mastery
    }

    fn recent(&self, n: usize) -> &[AttemptRecord] {
        let history = &self.state.performance_history;
        &history[history.len().saturating_sub(n)..]
    }

    pub fn current_mastery(&self) -> f64 {
        let window = self.recent(self.config.mastery_window);
        if window.is_empty() {
            return 0.0;
        }

        let count = window.len() as f64;
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;

        for (index, attempt) in window.iter().enumerate() {
            let recency_weight = (index + 1) as f64 / count;
            total_weight += recency_weight;
            if attempt.correct {
                weighted_sum += recency_weight
                    * attempt.difficulty.multiplier()
                    * attempt.hint_penalty()
                    * attempt.speed_bonus();
            }
        }

        let mastery = weighted_sum / total_weight;
        if self.config.clamp_mastery {
            mastery.clamp(0.0, 1.0)
        } else {
            mastery
        }
    }

    /// Share of correct answers among the `n` most recent attempts.
    pub fn recent_accuracy(&self, n: usize) -> f64 {
        let window = self.recent(n);
        if window.is_empty() {
            return 0.0;
        }
        window.iter().filter(|a| a.correct).count() as f64 / window.len() as f64
    }

    pub fn has_mastery(&self) -> bool {
        self.attempt_count() >= self.config.min_questions_for_mastery
            && self.current_mastery() >= self.config.mastery_threshold
            && self.state.metrics.consecutive_correct >= self.config.required_streak
            && self.recent_accuracy(self.config.mastery_window) >= self.config.mastery_accuracy
    }

    pub fn session_status(&self) -> SessionStatus {
        let attempts = self.attempt_count();

        if attempts < self.config.min_questions_for_mastery {
            SessionStatus::InProgress
        } else if self.has_mastery() {
            SessionStatus::Mastered
        } else if attempts >= self.config.max_questions_before_mastery {
            SessionStatus::Exhausted
        } else if attempts >= self.config.struggle_min_attempts
            && self.recent_accuracy(self.config.mastery_window) < self.config.struggle_accuracy
        {
            SessionStatus::Struggling
        } else {
            SessionStatus::InProgress
        }
    }

    pub fn should_continue(&self) -> bool {
        self.session_status() == SessionStatus::InProgress
    }

    pub fn recommendation(&self) -> Recommendation {
        let attempts = self.attempt_count();
        let accuracy = self.recent_accuracy(self.config.mastery_window);
        let exhausted = attempts >= self.config.max_questions_before_mastery;

        let action = if self.has_mastery() {
            RecommendationAction::Advance
        } else if exhausted && accuracy >= self.config.review_accuracy {
            RecommendationAction::Review
        } else if exhausted {
            RecommendationAction::Help
        } else if attempts >= self.config.min_questions_for_mastery
            && accuracy < self.config.hint_accuracy
        {
            RecommendationAction::Hint
        } else {
            RecommendationAction::Continue
        };

        Recommendation::new(action)
    }

    pub fn summary(&self) -> SessionSummary {
        let history = &self.state.performance_history;
        let total_attempts = history.len();
        let correct_count = history.iter().filter(|a| a.correct).count();
        let (overall_accuracy, average_time_seconds) = if total_attempts == 0 {
            (0.0, 0.0)
        } else {
            let total_time: f64 = history.iter().map(|a| a.time_spent_seconds).sum();
            (
                correct_count as f64 / total_attempts as f64,
                total_time / total_attempts as f64,
            )
        };

        SessionSummary {
            total_attempts,
            correct_count,
            overall_accuracy,
            recent_accuracy: self.recent_accuracy(self.config.mastery_window),
            mastery: self.current_mastery(),
            has_mastery: self.has_mastery(),
            status: self.session_status(),
            current_difficulty: self.state.current_difficulty,
            average_time_seconds,
            metrics: self.state.metrics,
            recommendation: self.recommendation(),
        }
    }

    pub fn reset(&mut self) {
        self.state = SessionState::default();
        self.mastery_announced = false;
        self.struggle_announced = false;
    }

    fn adjust_difficulty(&mut self) {
        if self.attempt_count() < 2 {
            return;
        }

        let rule = &self.config.difficulty;
        let accuracy = self.recent_accuracy(rule.window);
        let metrics = self.state.metrics;
        let current = self.state.current_difficulty;

        let next = if accuracy >= rule.escalate_accuracy
            && metrics.consecutive_correct >= rule.escalate_streak
        {
            current.harder()
        } else if accuracy < rule.deescalate_accuracy
            && metrics.consecutive_incorrect >= rule.deescalate_streak
        {
            current.easier()
        } else {
            current
        };

        if next != current {
            self.state.current_difficulty = next;
            tracing::info!(
                from = %current,
                to = %next,
                recent_accuracy = accuracy,
                "difficulty adjusted"
            );
            self.publish(TutorEvent::DifficultyChanged(DifficultyChangedPayload {
                session_id: self.session_id.clone(),
                from: current,
                to: next,
                recent_accuracy: accuracy,
                timestamp: Utc::now(),
            }));
        }
    }

    fn announce_milestones(&mut self, mastery: f64) {
        match self.session_status() {
            SessionStatus::Mastered if !self.mastery_announced => {
                self.mastery_announced = true;
                tracing::info!(mastery, attempts = self.attempt_count(), "mastery reached");
                self.publish(TutorEvent::MasteryReached(MasteryReachedPayload {
                    session_id: self.session_id.clone(),
                    mastery,
                    attempts: self.attempt_count(),
                    timestamp: Utc::now(),
                }));
            }
            SessionStatus::Struggling if !self.struggle_announced => {
                self.struggle_announced = true;
                let recent_accuracy = self.recent_accuracy(self.config.mastery_window);
                tracing::info!(recent_accuracy, attempts = self.attempt_count(), "struggle detected");
                self.publish(TutorEvent::StruggleDetected(StruggleDetectedPayload {
                    session_id: self.session_id.clone(),
                    recent_accuracy,
                    attempts: self.attempt_count(),
                    timestamp: Utc::now(),
                }));
            }
            _ => {}
        }
    }

    fn publish(&self, event: TutorEvent) {
        if let Some(ref events) = self.events {
            events.publish(event);
        }
    }
}

impl Default for MasteryTracker {
    fn default() -> Self {
        Self::new(MasteryConfig::default())
    }
}
