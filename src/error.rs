use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TutorError {
    #[error("unknown concept type: {0}")]
    UnknownConcept(String),
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
    #[error("cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: String },
    #[error("arithmetic overflow")]
    Overflow,
    #[error("equation has no integral solution")]
    NonIntegralSolution,
    #[error("no problem is waiting for an answer")]
    NoActiveProblem,
    #[error("no level has been started")]
    SessionNotStarted,
    #[error("session already finished")]
    SessionFinished,
    #[error("hints are not available on this level")]
    HintsUnavailable,
    #[error("unknown level: {0}")]
    UnknownLevel(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl TutorError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TutorError>;
