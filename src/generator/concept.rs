use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TutorError;

/// Equation families the generator can synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConceptType {
    TwoStepBasic,
    TwoStepMixed,
    CombiningLikeTerms,
    Distributive,
    VariablesBothSides,
    BothSidesDistributive,
    BothSidesPractice,
    InfiniteSolutions,
    NoSolution,
    SpecialSolutions,
}

impl ConceptType {
    pub const ALL: [ConceptType; 10] = [
        Self::TwoStepBasic,
        Self::TwoStepMixed,
        Self::CombiningLikeTerms,
        Self::Distributive,
        Self::VariablesBothSides,
        Self::BothSidesDistributive,
        Self::BothSidesPractice,
        Self::InfiniteSolutions,
        Self::NoSolution,
        Self::SpecialSolutions,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::TwoStepBasic => "two-step-basic",
            Self::TwoStepMixed => "two-step-mixed",
            Self::CombiningLikeTerms => "combining-like-terms",
            Self::Distributive => "distributive",
            Self::VariablesBothSides => "variables-both-sides",
            Self::BothSidesDistributive => "both-sides-distributive",
            Self::BothSidesPractice => "both-sides-practice",
            Self::InfiniteSolutions => "infinite-solutions",
            Self::NoSolution => "no-solution",
            Self::SpecialSolutions => "special-solutions",
        }
    }

    /// Human-readable tag shown next to a problem.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TwoStepBasic => "Two-Step Equations",
            Self::TwoStepMixed => "Two-Step Equations (Subtraction & Division)",
            Self::CombiningLikeTerms => "Combining Like Terms",
            Self::Distributive => "Distributive Property",
            Self::VariablesBothSides => "Variables on Both Sides",
            Self::BothSidesDistributive => "Variables on Both Sides with Distribution",
            Self::BothSidesPractice => "Variables on Both Sides Practice",
            Self::InfiniteSolutions => "Infinite Solutions",
            Self::NoSolution => "No Solution",
            Self::SpecialSolutions => "Special Solutions",
        }
    }

    pub fn has_special_answer(&self) -> bool {
        matches!(
            self,
            Self::InfiniteSolutions | Self::NoSolution | Self::SpecialSolutions
        )
    }
}

impl FromStr for ConceptType {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|concept| concept.key() == key)
            .ok_or_else(|| TutorError::UnknownConcept(s.to_string()))
    }
}

impl fmt::Display for ConceptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for concept in ConceptType::ALL {
            assert_eq!(concept.key().parse::<ConceptType>(), Ok(concept));
        }
    }

    #[test]
    fn parse_is_forgiving_about_case_and_underscores() {
        assert_eq!(
            "Two_Step_Basic".parse::<ConceptType>(),
            Ok(ConceptType::TwoStepBasic)
        );
    }

    #[test]
    fn unknown_key_is_an_error() {
        assert_eq!(
            "quadratics".parse::<ConceptType>(),
            Err(TutorError::UnknownConcept("quadratics".to_string()))
        );
    }

    #[test]
    fn serde_uses_keys() {
        let json = serde_json::to_string(&ConceptType::BothSidesPractice).unwrap();
        assert_eq!(json, "\"both-sides-practice\"");
    }
}
