pub mod adaptive;
pub mod config;
pub mod core;
pub mod curriculum;
pub mod error;
pub mod generator;
pub mod linear;
pub mod logging;
pub mod services;

pub use adaptive::{DifficultyLevel, MasteryConfig, MasteryTracker, SessionStatus};
pub use curriculum::{Curriculum, LevelDescriptor};
pub use error::{Result, TutorError};
pub use generator::{ConceptType, EquationGenerator, EquationSpec};
pub use linear::{LinearEquation, Solution};
pub use services::{LearningSession, XpPolicy};
