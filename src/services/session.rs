//! One learner working through one level.
//!
//! `LearningSession` owns the tracker, generator and XP ledger for the level in
//! progress and is the only thing a front end needs to drive: `start`, then
//! `next_problem` / `submit` until the status turns terminal, then `finish`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adaptive::{
    DifficultyLevel, MasteryConfig, MasteryTracker, Recommendation, RecommendationAction, SessionStatus,
    SessionSummary,
};
use crate::core::{EventBus, SessionEndedPayload, SessionStartedPayload, TutorEvent, XpAwardedPayload};
use crate::curriculum::LevelDescriptor;
use crate::error::{Result, TutorError};
use crate::generator::{EquationGenerator, EquationSpec};
use crate::services::answer::{check_answer, AnswerCheck};
use crate::services::xp::{XpLedger, XpPolicy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutcome {
    pub check: AnswerCheck,
    pub mastery: f64,
    /// Tier the next problem will use.
    pub difficulty: DifficultyLevel,
    pub xp_awarded: u32,
    pub status: SessionStatus,
    pub recommendation: Recommendation,
    /// Worked solution of the problem just answered.
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_id: String,
    pub level_id: String,
    pub status: SessionStatus,
    pub summary: SessionSummary,
    pub xp_earned: u64,
    pub completion_bonus: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

struct PendingProblem {
    spec: EquationSpec,
    hint_shown: bool,
}

struct ActiveLevel {
    session_id: String,
    level: LevelDescriptor,
    started_at: DateTime<Utc>,
    xp: XpLedger,
    completion_bonus: u32,
    ended: bool,
}

pub struct LearningSession {
    base_config: MasteryConfig,
    xp_policy: XpPolicy,
    tracker: MasteryTracker,
    generator: EquationGenerator,
    events: Option<Arc<EventBus>>,
    active: Option<ActiveLevel>,
    pending: Option<PendingProblem>,
}

impl LearningSession {
    pub fn new(config: MasteryConfig, xp_policy: XpPolicy, generator: EquationGenerator) -> Self {
        Self {
            tracker: MasteryTracker::new(config.clone()),
            base_config: config,
            xp_policy,
            generator,
            events: None,
            active: None,
            pending: None,
        }
    }

    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.tracker = self.tracker.with_event_bus(Arc::clone(&events));
        self.events = Some(events);
        self
    }

    /// Begins `level` from a clean slate. Any level still in progress is
    /// abandoned without a report.
    pub fn start(&mut self, level: LevelDescriptor) -> &str {
        let session_id = uuid::Uuid::new_v4().to_string();

        self.tracker.reset();
        self.tracker.set_config(MasteryConfig {
            mastery_threshold: level.mastery_threshold,
            ..self.base_config.clone()
        });
        self.tracker.set_session_id(Some(session_id.clone()));
        self.pending = None;

        tracing::info!(
            session_id = %session_id,
            level_id = %level.id,
            concept = level.concept.key(),
            "level started"
        );
        self.publish(TutorEvent::SessionStarted(SessionStartedPayload {
            session_id: session_id.clone(),
            level_id: level.id.clone(),
            concept: level.concept.key().to_string(),
            difficulty: self.tracker.current_difficulty(),
            timestamp: Utc::now(),
        }));

        let active = self.active.insert(ActiveLevel {
            session_id,
            level,
            started_at: Utc::now(),
            xp: XpLedger::new(),
            completion_bonus: 0,
            ended: false,
        });
        &active.session_id
    }

    pub fn tracker(&self) -> &MasteryTracker {
        &self.tracker
    }

    pub fn level(&self) -> Option<&LevelDescriptor> {
        self.active.as_ref().map(|active| &active.level)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.session_id.as_str())
    }

    pub fn xp_earned(&self) -> u64 {
        self.active.as_ref().map_or(0, |active| active.xp.total())
    }

    pub fn pending_problem(&self) -> Option<&EquationSpec> {
        self.pending.as_ref().map(|pending| &pending.spec)
    }

    /// Tracker status, with the level's question cap applied on top.
    pub fn status(&self) -> Result<SessionStatus> {
        let active = self.active.as_ref().ok_or(TutorError::SessionNotStarted)?;
        let status = self.tracker.session_status();
        if status == SessionStatus::InProgress
            && self.tracker.attempt_count() >= active.level.total_questions
        {
            return Ok(SessionStatus::Exhausted);
        }
        Ok(status)
    }

    /// Tracker advice, except that a level stopped by its question cap never
    /// says to keep going.
    pub fn recommendation(&self) -> Result<Recommendation> {
        let capped = self.status()? == SessionStatus::Exhausted
            && self.tracker.session_status() == SessionStatus::InProgress;
        if !capped {
            return Ok(self.tracker.recommendation());
        }
        let config = self.tracker.config();
        let action = if self.tracker.recent_accuracy(config.mastery_window) >= config.review_accuracy {
            RecommendationAction::Review
        } else {
            RecommendationAction::Help
        };
        Ok(Recommendation::new(action))
    }

    /// The problem awaiting an answer; a new one at the tracker's current tier
    /// if none is pending.
    pub fn next_problem(&mut self) -> Result<&EquationSpec> {
        let status = self.status()?;
        if status.is_terminal() {
            return Err(TutorError::SessionFinished);
        }

        if self.pending.is_none() {
            let concept = self.active.as_ref().ok_or(TutorError::SessionNotStarted)?.level.concept;
            let spec = self.generator.generate(concept, self.tracker.current_difficulty());
            tracing::debug!(
                equation = %spec.equation_text,
                difficulty = %spec.difficulty,
                "problem issued"
            );
            self.pending = Some(PendingProblem {
                spec,
                hint_shown: false,
            });
        }

        self.pending
            .as_ref()
            .map(|pending| &pending.spec)
            .ok_or(TutorError::NoActiveProblem)
    }

    /// Reveals the pending problem's hint; the attempt then counts as hinted.
    pub fn request_hint(&mut self) -> Result<String> {
        let active = self.active.as_ref().ok_or(TutorError::SessionNotStarted)?;
        if !active.level.hints_available {
            return Err(TutorError::HintsUnavailable);
        }
        let pending = self.pending.as_mut().ok_or(TutorError::NoActiveProblem)?;
        pending.hint_shown = true;
        Ok(pending.spec.hint.clone())
    }

    pub fn submit(&mut self, answer: &str, time_spent_seconds: f64, used_hint: bool) -> Result<AttemptOutcome> {
        if self.active.is_none() {
            return Err(TutorError::SessionNotStarted);
        }
        if self.status()?.is_terminal() {
            return Err(TutorError::SessionFinished);
        }
        let pending = self.pending.take().ok_or(TutorError::NoActiveProblem)?;
        let used_hint = used_hint || pending.hint_shown;

        let check = check_answer(&pending.spec, answer);
        let mastery = self.tracker.record_attempt(
            check.correct,
            time_spent_seconds,
            used_hint,
            pending.spec.difficulty,
        );

        let streak = self.tracker.metrics().consecutive_correct;
        let xp_awarded = self
            .xp_policy
            .award(check.correct, pending.spec.difficulty, used_hint, streak);
        if xp_awarded > 0 {
            self.credit(xp_awarded, "correct answer");
        }

        let status = self.status()?;
        if status == SessionStatus::Mastered {
            self.pay_completion_bonus();
        }
        if status.is_terminal() {
            self.end(status);
        }

        Ok(AttemptOutcome {
            check,
            mastery,
            difficulty: self.tracker.current_difficulty(),
            xp_awarded,
            status,
            recommendation: self.recommendation()?,
            steps: pending.spec.steps,
        })
    }

    /// Closes the level and reports on it. Safe to call more than once.
    pub fn finish(&mut self) -> Result<SessionReport> {
        let status = self.status()?;
        self.end(status);
        self.pending = None;

        let mut summary = self.tracker.summary();
        summary.status = status;
        summary.recommendation = self.recommendation()?;

        let active = self.active.as_ref().ok_or(TutorError::SessionNotStarted)?;
        Ok(SessionReport {
            session_id: active.session_id.clone(),
            level_id: active.level.id.clone(),
            status,
            summary,
            xp_earned: active.xp.total(),
            completion_bonus: active.completion_bonus,
            started_at: active.started_at,
            ended_at: Utc::now(),
        })
    }

    fn pay_completion_bonus(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.level.xp_reward == 0 {
            return;
        }
        active.completion_bonus = active.level.xp_reward;
        let amount = active.level.xp_reward;
        self.credit(amount, "level mastered");
    }

    fn credit(&mut self, amount: u32, reason: &str) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let total = active.xp.credit(amount, reason);
        let session_id = active.session_id.clone();
        tracing::debug!(amount, total, reason, "xp awarded");
        self.publish(TutorEvent::XpAwarded(XpAwardedPayload {
            session_id,
            amount,
            total,
            reason: reason.to_string(),
            timestamp: Utc::now(),
        }));
    }

    fn end(&mut self, status: SessionStatus) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.ended {
            return;
        }
        active.ended = true;

        let summary = self.tracker.summary();
        let payload = SessionEndedPayload {
            session_id: active.session_id.clone(),
            level_id: active.level.id.clone(),
            status,
            attempts: summary.total_attempts,
            correct: summary.correct_count,
            xp_earned: active.xp.total(),
            timestamp: Utc::now(),
        };
        tracing::info!(
            session_id = %payload.session_id,
            level_id = %payload.level_id,
            status = status.as_str(),
            attempts = payload.attempts,
            xp = payload.xp_earned,
            "level ended"
        );
        self.publish(TutorEvent::SessionEnded(payload));
    }

    fn publish(&self, event: TutorEvent) {
        if let Some(ref events) = self.events {
            events.publish(event);
        }
    }
}
