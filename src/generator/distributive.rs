use rand::Rng;

use crate::adaptive::DifficultyLevel;
use crate::generator::format::{equation, grouped, isolate_and_divide, linear, signed, step};
use crate::generator::{sample, sample_signed, Draft, Span};
use crate::linear::Solution;

struct Ranges {
    multiplier: Span,
    inner: Span,
    answer: Span,
    trailing: Span,
    negative_inner: bool,
    /// Chance of a trailing constant after the group, `a(x + b) + e = c`.
    trailing_chance: f64,
}

impl Ranges {
    fn for_level(difficulty: DifficultyLevel) -> Self {
        match difficulty {
            DifficultyLevel::Easy => Self {
                multiplier: (2, 4),
                inner: (1, 5),
                answer: (1, 8),
                trailing: (1, 5),
                negative_inner: false,
                trailing_chance: 0.0,
            },
            DifficultyLevel::Medium => Self {
                multiplier: (2, 6),
                inner: (1, 9),
                answer: (1, 10),
                trailing: (1, 9),
                negative_inner: true,
                trailing_chance: 0.5,
            },
            DifficultyLevel::Hard => Self {
                multiplier: (2, 9),
                inner: (1, 9),
                answer: (-5, 12),
                trailing: (1, 10),
                negative_inner: true,
                trailing_chance: 1.0,
            },
        }
    }
}

/// `a(x + b) = c`, optionally `a(x + b) + e = c`.
pub(crate) fn generate<R: Rng + ?Sized>(rng: &mut R, difficulty: DifficultyLevel) -> Draft {
    let ranges = Ranges::for_level(difficulty);
    let a = sample(rng, ranges.multiplier);
    let b = if ranges.negative_inner {
        sample_signed(rng, ranges.inner)
    } else {
        sample(rng, ranges.inner)
    };
    let x = sample(rng, ranges.answer);
    let e = if rng.gen_bool(ranges.trailing_chance) {
        sample_signed(rng, ranges.trailing)
    } else {
        0
    };
    let c = a * (x + b) + e;

    let lhs = format!("{}{}", grouped(a, b), signed(e));
    let text = equation(&lhs, &c.to_string());
    let rhs = c.to_string();

    let mut steps = vec![text.clone()];
    let distributed = format!("{}{}", linear(a, a * b), signed(e));
    steps.push(step(&format!("Distribute {a}"), &equation(&distributed, &rhs)));

    let constant = a * b + e;
    if e != 0 {
        steps.push(step("Combine constants", &equation(&linear(a, constant), &rhs)));
    }
    isolate_and_divide(&mut steps, a, constant, c, x);

    Draft {
        equation_text: text,
        answer: Solution::Value(x),
        steps,
        hint: "Multiply the number outside the parentheses by each term inside first.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn easy_has_no_trailing_constant() {
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        for _ in 0..200 {
            let draft = generate(&mut rng, DifficultyLevel::Easy);
            let lhs = draft.equation_text.split(" = ").next().unwrap();
            assert!(lhs.ends_with(')'), "{lhs}");
            assert!(draft.steps[1].starts_with("Distribute"));
        }
    }

    #[test]
    fn hard_always_has_trailing_constant() {
        let mut rng = ChaCha8Rng::seed_from_u64(32);
        for _ in 0..200 {
            let draft = generate(&mut rng, DifficultyLevel::Hard);
            let lhs = draft.equation_text.split(" = ").next().unwrap();
            assert!(!lhs.ends_with(')'), "{lhs}");
            assert!(draft.steps.iter().any(|s| s.starts_with("Combine constants")));
        }
    }
}
