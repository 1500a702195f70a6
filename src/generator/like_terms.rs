use rand::Rng;

use crate::adaptive::DifficultyLevel;
use crate::generator::format::{coef_x, equation, isolate_and_divide, linear, signed, step};
use crate::generator::{resample, sample, sample_signed, Draft, Span};
use crate::linear::Solution;

struct Ranges {
    first: Span,
    second: Span,
    answer: Span,
    constant: Span,
    /// Hard problems may subtract the second term and use a negative constant.
    allow_negative: bool,
}

impl Ranges {
    fn for_level(difficulty: DifficultyLevel) -> Self {
        match difficulty {
            DifficultyLevel::Easy => Self {
                first: (1, 4),
                second: (1, 4),
                answer: (1, 8),
                constant: (1, 9),
                allow_negative: false,
            },
            DifficultyLevel::Medium => Self {
                first: (2, 6),
                second: (1, 6),
                answer: (1, 12),
                constant: (1, 15),
                allow_negative: false,
            },
            DifficultyLevel::Hard => Self {
                first: (3, 9),
                second: (1, 8),
                answer: (-5, 15),
                constant: (1, 20),
                allow_negative: true,
            },
        }
    }
}

/// `ax + bx + c = d`; on hard also `ax - bx + c = d` with `a != b`.
pub(crate) fn generate<R: Rng + ?Sized>(rng: &mut R, difficulty: DifficultyLevel) -> Draft {
    let ranges = Ranges::for_level(difficulty);
    let a = sample(rng, ranges.first);

    let b = resample(
        rng,
        "combining-like-terms",
        |rng| {
            let magnitude = sample(rng, ranges.second);
            let b = if ranges.allow_negative && rng.gen_bool(0.5) {
                -magnitude
            } else {
                magnitude
            };
            (a + b != 0).then_some(b)
        },
        || 1,
    );
    let x = sample(rng, ranges.answer);
    let c = if ranges.allow_negative {
        sample_signed(rng, ranges.constant)
    } else {
        sample(rng, ranges.constant)
    };

    let combined = a + b;
    let d = combined * x + c;

    let second = if b > 0 {
        format!(" + {}", coef_x(b))
    } else {
        format!(" - {}", coef_x(-b))
    };
    let lhs = format!("{}{second}{}", coef_x(a), signed(c));
    let text = equation(&lhs, &d.to_string());

    let mut steps = vec![
        text.clone(),
        step("Combine like terms", &equation(&linear(combined, c), &d.to_string())),
    ];
    isolate_and_divide(&mut steps, combined, c, d, x);

    Draft {
        equation_text: text,
        answer: Solution::Value(x),
        steps,
        hint: "Add the x-terms together first, then solve the two-step equation.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn easy_problems_have_two_positive_x_terms() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..200 {
            let draft = generate(&mut rng, DifficultyLevel::Easy);
            let lhs = draft.equation_text.split(" = ").next().unwrap();
            assert_eq!(lhs.matches('x').count(), 2, "{lhs}");
            assert!(!lhs.contains(" - "), "{lhs}");
            assert_eq!(draft.steps[1].split(": ").next(), Some("Combine like terms"));
        }
    }

    #[test]
    fn hard_problems_never_cancel_x() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        for _ in 0..500 {
            let draft = generate(&mut rng, DifficultyLevel::Hard);
            let combined = draft.steps[1].split(": ").nth(1).unwrap();
            assert!(combined.contains('x'), "{}", draft.equation_text);
        }
    }
}
