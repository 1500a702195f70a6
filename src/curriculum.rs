//! Fixed lesson catalog, ordered from two-step equations to special
//! solutions. Each level drills one equation family.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorError};
use crate::generator::ConceptType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescriptor {
    pub id: String,
    pub title: String,
    pub concept: ConceptType,
    /// Hard cap on questions, on top of the tracker's own exhaustion gate.
    pub total_questions: usize,
    pub mastery_threshold: f64,
    pub hints_available: bool,
    /// Completion bonus, paid once when the level is mastered.
    pub xp_reward: u32,
}

impl LevelDescriptor {
    pub fn new(id: &str, title: &str, concept: ConceptType) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            concept,
            total_questions: 10,
            mastery_threshold: 0.85,
            hints_available: true,
            xp_reward: 50,
        }
    }

    fn questions(mut self, total_questions: usize) -> Self {
        self.total_questions = total_questions;
        self
    }

    fn reward(mut self, xp_reward: u32) -> Self {
        self.xp_reward = xp_reward;
        self
    }

    fn without_hints(mut self) -> Self {
        self.hints_available = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curriculum {
    levels: Vec<LevelDescriptor>,
}

impl Curriculum {
    pub fn new(levels: Vec<LevelDescriptor>) -> Self {
        Self { levels }
    }

    pub fn standard() -> Self {
        use ConceptType::*;

        Self::new(vec![
            LevelDescriptor::new("lesson-1", "Two-Step Equations", TwoStepBasic),
            LevelDescriptor::new("lesson-2", "Subtraction and Division", TwoStepMixed),
            LevelDescriptor::new("lesson-3", "Combining Like Terms", CombiningLikeTerms).reward(60),
            LevelDescriptor::new("lesson-4", "The Distributive Property", Distributive).reward(60),
            LevelDescriptor::new("lesson-5", "Variables on Both Sides", VariablesBothSides).reward(75),
            LevelDescriptor::new("lesson-6", "Distribute, Then Collect", BothSidesDistributive)
                .reward(75),
            LevelDescriptor::new("lesson-7", "Both Sides Practice", BothSidesPractice)
                .questions(12)
                .reward(75),
            LevelDescriptor::new("lesson-8", "Infinitely Many Solutions", InfiniteSolutions)
                .questions(8)
                .reward(60),
            LevelDescriptor::new("lesson-9", "No Solution", NoSolution)
                .questions(8)
                .reward(60),
            LevelDescriptor::new("lesson-10", "Special Solutions Challenge", SpecialSolutions)
                .without_hints()
                .reward(100),
        ])
    }

    pub fn levels(&self) -> &[LevelDescriptor] {
        &self.levels
    }

    pub fn get(&self, id: &str) -> Result<&LevelDescriptor> {
        self.levels
            .iter()
            .find(|level| level.id == id)
            .ok_or_else(|| TutorError::UnknownLevel(id.to_string()))
    }

    /// `Ok(None)` after the last level.
    pub fn next_after(&self, id: &str) -> Result<Option<&LevelDescriptor>> {
        let position = self
            .levels
            .iter()
            .position(|level| level.id == id)
            .ok_or_else(|| TutorError::UnknownLevel(id.to_string()))?;
        Ok(self.levels.get(position + 1))
    }

    pub fn first(&self) -> Option<&LevelDescriptor> {
        self.levels.first()
    }
}

impl Default for Curriculum {
    fn default() -> Self {
        Self::standard()
    }
}
