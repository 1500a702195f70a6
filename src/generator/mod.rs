//! Equation synthesis.
//!
//! Every family follows the same recipe: sample the answer and the structural
//! coefficients inside the tier's ranges, back-solve the one dependent
//! constant so the equation holds exactly, then render text, steps and hint.
//! Nothing is solved after the fact; correctness is by construction.

pub mod concept;
pub mod format;

mod both_sides;
mod distributive;
mod like_terms;
mod special;
mod two_step;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::adaptive::DifficultyLevel;
use crate::error::Result;
use crate::linear::{LinearEquation, Solution};

pub use concept::ConceptType;

/// Upper bound on resampling a degenerate draw before falling back to a
/// fixed, known-good problem.
pub const MAX_RESAMPLE_ATTEMPTS: usize = 64;

/// Inclusive integer range.
pub type Span = (i64, i64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquationSpec {
    pub equation_text: String,
    pub answer: Solution,
    pub steps: Vec<String>,
    pub hint: String,
    pub concept: String,
    pub concept_type: ConceptType,
    pub difficulty: DifficultyLevel,
}

impl EquationSpec {
    /// Re-parses `equation_text` and confirms it agrees with `answer`.
    pub fn is_consistent(&self) -> Result<bool> {
        let equation = LinearEquation::parse(&self.equation_text)?;
        Ok(match self.answer {
            Solution::Value(x) => equation.satisfied_by(x) && equation.solve()? == self.answer,
            special => equation.solve()? == special,
        })
    }
}

/// Family routine output before the concept/difficulty tags are attached.
pub(crate) struct Draft {
    pub equation_text: String,
    pub answer: Solution,
    pub steps: Vec<String>,
    pub hint: &'static str,
}

pub(crate) fn sample<R: Rng + ?Sized>(rng: &mut R, span: Span) -> i64 {
    rng.gen_range(span.0..=span.1)
}

/// Magnitude from `span`, sign chosen uniformly.
pub(crate) fn sample_signed<R: Rng + ?Sized>(rng: &mut R, span: Span) -> i64 {
    let magnitude = sample(rng, span);
    if rng.gen_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

/// Draws until `draw` accepts, at most `MAX_RESAMPLE_ATTEMPTS` times.
pub(crate) fn resample<R, T>(
    rng: &mut R,
    family: &'static str,
    mut draw: impl FnMut(&mut R) -> Option<T>,
    fallback: impl FnOnce() -> T,
) -> T
where
    R: Rng + ?Sized,
{
    for _ in 0..MAX_RESAMPLE_ATTEMPTS {
        if let Some(value) = draw(rng) {
            return value;
        }
    }
    tracing::warn!(family, attempts = MAX_RESAMPLE_ATTEMPTS, "resampling exhausted, using fallback");
    fallback()
}

pub struct EquationGenerator {
    rng: ChaCha8Rng,
}

impl EquationGenerator {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Deterministic generator, for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self, concept: ConceptType, difficulty: DifficultyLevel) -> EquationSpec {
        let rng = &mut self.rng;
        let draft = match concept {
            ConceptType::TwoStepBasic => two_step::basic(rng, difficulty),
            ConceptType::TwoStepMixed => two_step::mixed(rng, difficulty),
            ConceptType::CombiningLikeTerms => like_terms::generate(rng, difficulty),
            ConceptType::Distributive => distributive::generate(rng, difficulty),
            ConceptType::VariablesBothSides => both_sides::basic(rng, difficulty),
            ConceptType::BothSidesDistributive => both_sides::distributive(rng, difficulty),
            ConceptType::BothSidesPractice => both_sides::practice(rng, difficulty),
            ConceptType::InfiniteSolutions => special::infinite(rng, difficulty),
            ConceptType::NoSolution => special::none(rng, difficulty),
            ConceptType::SpecialSolutions => {
                if rng.gen_bool(0.5) {
                    special::infinite(rng, difficulty)
                } else {
                    special::none(rng, difficulty)
                }
            }
        };

        tracing::trace!(
            concept = concept.key(),
            %difficulty,
            equation = %draft.equation_text,
            "equation generated"
        );

        EquationSpec {
            equation_text: draft.equation_text,
            answer: draft.answer,
            steps: draft.steps,
            hint: draft.hint.to_string(),
            concept: concept.label().to_string(),
            concept_type: concept,
            difficulty,
        }
    }

    /// Same as `generate`, for callers holding a curriculum key. Unknown keys
    /// are rejected rather than mapped to a default family.
    pub fn generate_for_key(&mut self, key: &str, difficulty: DifficultyLevel) -> Result<EquationSpec> {
        let concept: ConceptType = key.parse()?;
        Ok(self.generate(concept, difficulty))
    }
}

impl Default for EquationGenerator {
    fn default() -> Self {
        Self::new()
    }
}
