use std::collections::BTreeMap;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::broadcast::{error::TryRecvError, Receiver};

use prealgebra_tutor::config::Config;
use prealgebra_tutor::core::{EventBus, EventEnvelope};
use prealgebra_tutor::curriculum::{Curriculum, LevelDescriptor};
use prealgebra_tutor::generator::EquationSpec;
use prealgebra_tutor::linear::Solution;
use prealgebra_tutor::logging::init_tracing;
use prealgebra_tutor::services::{LearningSession, SessionReport, XpLedger};
use prealgebra_tutor::{EquationGenerator, SessionStatus, TutorError};

const MAX_TRIES_PER_LEVEL: usize = 3;

/// Answers correctly with a fixed probability and sometimes peeks at hints.
struct SimulatedLearner {
    rng: ChaCha8Rng,
    accuracy: f64,
}

impl SimulatedLearner {
    fn answer(&mut self, spec: &EquationSpec) -> (String, f64) {
        let correct = self.rng.gen_bool(self.accuracy);
        let time_spent = self.rng.gen_range(8.0..80.0);
        let text = match (spec.answer, correct) {
            (Solution::Value(x), true) => format!("x = {x}"),
            (Solution::Value(x), false) => (x + self.rng.gen_range(1..=3)).to_string(),
            (Solution::Infinite, true) | (Solution::NoSolution, false) => "infinitely many".to_string(),
            (Solution::NoSolution, true) | (Solution::Infinite, false) => "no solution".to_string(),
        };
        (text, time_spent)
    }

    fn wants_hint(&mut self) -> bool {
        self.rng.gen_bool(0.15)
    }
}

fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config);

    let seed = config.seed.unwrap_or_else(rand::random::<u64>);
    tracing::info!(seed, accuracy = config.sim_accuracy, "tutor-sim starting");

    let bus = Arc::new(EventBus::new());
    let mut receiver = bus.subscribe_global();
    let mut event_counts = BTreeMap::new();

    let mut learner = SimulatedLearner {
        rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
        accuracy: config.sim_accuracy,
    };
    let mut session = LearningSession::new(
        config.mastery.clone(),
        config.xp.clone(),
        EquationGenerator::with_seed(seed),
    )
    .with_event_bus(Arc::clone(&bus));

    let curriculum = Curriculum::standard();
    let level_limit = config.sim_levels.unwrap_or(curriculum.levels().len());
    let mut ledger = XpLedger::new();

    'levels: for level in curriculum.levels().iter().take(level_limit) {
        for attempt in 1..=MAX_TRIES_PER_LEVEL {
            let played = play_level(
                &mut session,
                &mut learner,
                level.clone(),
                &mut receiver,
                &mut event_counts,
            );
            let report = match played {
                Ok(report) => report,
                Err(err) => {
                    tracing::error!(level_id = %level.id, error = %err, "level aborted");
                    break 'levels;
                }
            };

            ledger.credit(report.xp_earned.min(u32::MAX as u64) as u32, level.id.clone());
            tracing::info!(
                level_id = %level.id,
                title = %level.title,
                attempt,
                status = report.status.as_str(),
                questions = report.summary.total_attempts,
                accuracy = report.summary.overall_accuracy,
                mastery = report.summary.mastery,
                xp = report.xp_earned,
                "level finished"
            );

            if report.status == SessionStatus::Mastered {
                continue 'levels;
            }
        }
        tracing::warn!(level_id = %level.id, tries = MAX_TRIES_PER_LEVEL, "level not mastered, stopping");
        break;
    }

    drain(&mut receiver, &mut event_counts);
    let player = config.xp.player_level(ledger.total());
    tracing::info!(
        total_xp = ledger.total(),
        player_level = player.level,
        xp_into_level = player.xp_into_level,
        xp_for_next = player.xp_for_next,
        events = bus.event_count(),
        "simulation complete"
    );
    for (&event_type, &count) in &event_counts {
        tracing::info!(event_type, count, "event totals");
    }
}

fn play_level(
    session: &mut LearningSession,
    learner: &mut SimulatedLearner,
    level: LevelDescriptor,
    receiver: &mut Receiver<EventEnvelope>,
    event_counts: &mut BTreeMap<&'static str, usize>,
) -> Result<SessionReport, TutorError> {
    let hints_available = level.hints_available;
    session.start(level);

    loop {
        let spec = match session.next_problem() {
            Ok(spec) => spec.clone(),
            Err(TutorError::SessionFinished) => break,
            Err(err) => return Err(err),
        };

        let used_hint = hints_available && learner.wants_hint();
        if used_hint {
            let hint = session.request_hint()?;
            tracing::debug!(%hint, "hint shown");
        }

        let (answer, time_spent) = learner.answer(&spec);
        let outcome = session.submit(&answer, time_spent, false)?;
        tracing::debug!(
            equation = %spec.equation_text,
            answer = %answer,
            correct = outcome.check.correct,
            mastery = outcome.mastery,
            next_difficulty = %outcome.difficulty,
            xp = outcome.xp_awarded,
            "answered"
        );
        drain(receiver, event_counts);

        if outcome.status.is_terminal() {
            break;
        }
    }

    session.finish()
}

fn drain(receiver: &mut Receiver<EventEnvelope>, counts: &mut BTreeMap<&'static str, usize>) {
    loop {
        match receiver.try_recv() {
            Ok(envelope) => *counts.entry(envelope.event.event_type()).or_default() += 1,
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event receiver lagged");
            }
            Err(_) => break,
        }
    }
}
