pub mod answer;
pub mod session;
pub mod xp;

pub use answer::{check_answer, parse_answer, AnswerCheck};
pub use session::{AttemptOutcome, LearningSession, SessionReport};
pub use xp::{PlayerLevel, XpEntry, XpLedger, XpPolicy};
