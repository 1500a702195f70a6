pub mod config;
pub mod tracker;
pub mod types;

pub use config::{DifficultyRule, MasteryConfig};
pub use tracker::{MasteryTracker, SessionState};
pub use types::*;
