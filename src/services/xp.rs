use serde::{Deserialize, Serialize};

use crate::adaptive::DifficultyLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpPolicy {
    pub base_xp: u32,
    pub easy_multiplier: f64,
    pub medium_multiplier: f64,
    pub hard_multiplier: f64,
    /// Applied to the whole award when the answer used a hint.
    pub hint_factor: f64,
    pub streak_bonus_step: u32,
    pub streak_bonus_cap: u32,
    /// XP needed to leave level 1; level `n` needs `n` times this.
    pub xp_per_level: u64,
}

impl Default for XpPolicy {
    fn default() -> Self {
        Self {
            base_xp: 10,
            easy_multiplier: 1.0,
            medium_multiplier: 1.5,
            hard_multiplier: 2.0,
            hint_factor: 0.5,
            streak_bonus_step: 2,
            streak_bonus_cap: 10,
            xp_per_level: 100,
        }
    }
}

impl XpPolicy {
    pub fn multiplier(&self, difficulty: DifficultyLevel) -> f64 {
        match difficulty {
            DifficultyLevel::Easy => self.easy_multiplier,
            DifficultyLevel::Medium => self.medium_multiplier,
            DifficultyLevel::Hard => self.hard_multiplier,
        }
    }

    /// Bonus for a run of `streak` correct answers, the current one included.
    pub fn streak_bonus(&self, streak: u32) -> u32 {
        streak
            .saturating_sub(1)
            .saturating_mul(self.streak_bonus_step)
            .min(self.streak_bonus_cap)
    }

    pub fn award(&self, correct: bool, difficulty: DifficultyLevel, used_hint: bool, streak: u32) -> u32 {
        if !correct {
            return 0;
        }
        let raw = self.base_xp as f64 * self.multiplier(difficulty) + self.streak_bonus(streak) as f64;
        let factor = if used_hint { self.hint_factor } else { 1.0 };
        (raw * factor).round().max(0.0) as u32
    }

    pub fn player_level(&self, total_xp: u64) -> PlayerLevel {
        let step = self.xp_per_level.max(1);
        let mut level = 1u32;
        let mut remaining = total_xp;
        loop {
            let needed = step.saturating_mul(level as u64);
            if remaining < needed {
                return PlayerLevel {
                    level,
                    xp_into_level: remaining,
                    xp_for_next: needed,
                };
            }
            remaining -= needed;
            level += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLevel {
    pub level: u32,
    pub xp_into_level: u64,
    pub xp_for_next: u64,
}

impl PlayerLevel {
    pub fn progress(&self) -> f64 {
        if self.xp_for_next == 0 {
            return 0.0;
        }
        self.xp_into_level as f64 / self.xp_for_next as f64
    }
}

/// Running XP total for one learner across sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpLedger {
    total: u64,
    entries: Vec<XpEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpEntry {
    pub amount: u32,
    pub reason: String,
}

impl XpLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new total. Zero awards are not recorded.
    pub fn credit(&mut self, amount: u32, reason: impl Into<String>) -> u64 {
        if amount > 0 {
            self.total = self.total.saturating_add(amount as u64);
            self.entries.push(XpEntry {
                amount,
                reason: reason.into(),
            });
        }
        self.total
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn entries(&self) -> &[XpEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_by_difficulty() {
        let policy = XpPolicy::default();
        assert_eq!(policy.award(true, DifficultyLevel::Easy, false, 1), 10);
        assert_eq!(policy.award(true, DifficultyLevel::Medium, false, 1), 15);
        assert_eq!(policy.award(true, DifficultyLevel::Hard, false, 1), 20);
        assert_eq!(policy.award(false, DifficultyLevel::Hard, false, 5), 0);
    }

    #[test]
    fn test_streak_bonus_is_capped() {
        let policy = XpPolicy::default();
        assert_eq!(policy.streak_bonus(0), 0);
        assert_eq!(policy.streak_bonus(1), 0);
        assert_eq!(policy.streak_bonus(3), 4);
        assert_eq!(policy.streak_bonus(6), 10);
        assert_eq!(policy.streak_bonus(50), 10);
        assert_eq!(policy.award(true, DifficultyLevel::Easy, false, 3), 14);
    }

    #[test]
    fn test_hint_halves_award() {
        let policy = XpPolicy::default();
        assert_eq!(policy.award(true, DifficultyLevel::Hard, true, 1), 10);
        // (15 + 2) / 2 rounds to 9
        assert_eq!(policy.award(true, DifficultyLevel::Medium, true, 2), 9);
    }

    #[test]
    fn test_player_level_thresholds() {
        let policy = XpPolicy::default();
        assert_eq!(
            policy.player_level(0),
            PlayerLevel { level: 1, xp_into_level: 0, xp_for_next: 100 }
        );
        assert_eq!(policy.player_level(99).level, 1);
        assert_eq!(
            policy.player_level(100),
            PlayerLevel { level: 2, xp_into_level: 0, xp_for_next: 200 }
        );
        assert_eq!(policy.player_level(299).level, 2);
        let third = policy.player_level(350);
        assert_eq!(third.level, 3);
        assert_eq!(third.xp_into_level, 50);
        assert!((third.progress() - 50.0 / 300.0).abs() < 1e-12);
    }

    #[test]
    fn test_ledger_skips_zero_awards() {
        let mut ledger = XpLedger::new();
        assert_eq!(ledger.credit(15, "correct answer"), 15);
        assert_eq!(ledger.credit(0, "incorrect answer"), 15);
        assert_eq!(ledger.credit(50, "level mastered"), 65);
        assert_eq!(ledger.entries().len(), 2);
        assert_eq!(ledger.total(), 65);
    }
}
