use std::path::PathBuf;

use crate::adaptive::MasteryConfig;
use crate::services::xp::XpPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub file_logs: bool,
    pub log_dir: PathBuf,
    pub seed: Option<u64>,
    pub sim_accuracy: f64,
    pub sim_levels: Option<usize>,
    pub mastery: MasteryConfig,
    pub xp: XpPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let file_logs = std::env::var("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let log_dir = std::env::var("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./logs"));

        let seed = std::env::var("TUTOR_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok());

        let sim_accuracy = std::env::var("TUTOR_SIM_ACCURACY")
            .ok()
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|value| (0.0..=1.0).contains(value))
            .unwrap_or(0.75);

        let sim_levels = std::env::var("TUTOR_SIM_LEVELS")
            .ok()
            .and_then(|value| value.parse::<usize>().ok());

        Self {
            log_level,
            file_logs,
            log_dir,
            seed,
            sim_accuracy,
            sim_levels,
            mastery: MasteryConfig::from_env(),
            xp: XpPolicy::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file_logs: false,
            log_dir: PathBuf::from("./logs"),
            seed: None,
            sim_accuracy: 0.75,
            sim_levels: None,
            mastery: MasteryConfig::default(),
            xp: XpPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so no other test observes the mutated environment.
    #[test]
    fn env_overrides_and_fallbacks() {
        std::env::set_var("TUTOR_SEED", "42");
        std::env::set_var("TUTOR_SIM_ACCURACY", "0.5");
        std::env::set_var("TUTOR_SIM_LEVELS", "3");
        std::env::set_var("TUTOR_MASTERY_THRESHOLD", "0.9");
        std::env::set_var("TUTOR_CLAMP_MASTERY", "true");

        let config = Config::from_env();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.sim_accuracy, 0.5);
        assert_eq!(config.sim_levels, Some(3));
        assert_eq!(config.mastery.mastery_threshold, 0.9);
        assert!(config.mastery.clamp_mastery);

        std::env::set_var("TUTOR_SIM_ACCURACY", "1.7");
        std::env::set_var("TUTOR_MIN_QUESTIONS", "20");
        let config = Config::from_env();
        assert_eq!(config.sim_accuracy, 0.75);
        assert_eq!(config.mastery.min_questions_for_mastery, 3);
        assert_eq!(config.mastery.mastery_threshold, 0.85);

        std::env::remove_var("TUTOR_MIN_QUESTIONS");
        for (flag, expected) in [("1", true), ("yes", false), ("0", false)] {
            std::env::set_var("TUTOR_CLAMP_MASTERY", flag);
            std::env::set_var("ENABLE_FILE_LOGS", flag);
            let config = Config::from_env();
            assert_eq!(config.mastery.clamp_mastery, expected, "{flag}");
            assert_eq!(config.file_logs, expected, "{flag}");
        }

        for key in [
            "TUTOR_SEED",
            "TUTOR_SIM_ACCURACY",
            "TUTOR_SIM_LEVELS",
            "TUTOR_MASTERY_THRESHOLD",
            "TUTOR_CLAMP_MASTERY",
            "TUTOR_MIN_QUESTIONS",
            "ENABLE_FILE_LOGS",
        ] {
            std::env::remove_var(key);
        }
    }
}
