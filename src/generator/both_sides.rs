use rand::Rng;

use crate::adaptive::DifficultyLevel;
use crate::generator::format::{
    equation, grouped, isolate_and_divide, linear, move_x_term, step,
};
use crate::generator::{resample, sample, sample_signed, Draft, Span};
use crate::linear::Solution;

const HINT: &str = "Move all the x-terms to one side and the numbers to the other.";

struct Ranges {
    left: Span,
    right: Span,
    answer: Span,
    constant: Span,
    signed_constant: bool,
    /// `b` in `a(x + b)`.
    inner: Span,
    signed_inner: bool,
}

impl Ranges {
    fn for_level(difficulty: DifficultyLevel) -> Self {
        match difficulty {
            DifficultyLevel::Easy => Self {
                left: (2, 5),
                right: (1, 4),
                answer: (1, 8),
                constant: (1, 9),
                signed_constant: false,
                inner: (1, 4),
                signed_inner: false,
            },
            DifficultyLevel::Medium => Self {
                left: (2, 8),
                right: (1, 7),
                answer: (1, 10),
                constant: (1, 15),
                signed_constant: false,
                inner: (1, 6),
                signed_inner: true,
            },
            DifficultyLevel::Hard => Self {
                left: (2, 9),
                right: (1, 9),
                answer: (-5, 12),
                constant: (1, 15),
                signed_constant: true,
                inner: (1, 8),
                signed_inner: true,
            },
        }
    }

    fn constant<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        draw(rng, self.constant, self.signed_constant)
    }

    fn inner<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        draw(rng, self.inner, self.signed_inner)
    }

    /// Distinct left/right coefficients. Below hard the left one is kept
    /// larger so the collected x-term stays positive.
    fn coefficients<R: Rng + ?Sized>(&self, rng: &mut R, family: &'static str) -> (i64, i64) {
        let ordered = !self.signed_constant;
        resample(
            rng,
            family,
            |rng| {
                let a = sample(rng, self.left);
                let c = sample(rng, self.right);
                let ok = if ordered { a > c } else { a != c };
                ok.then_some((a, c))
            },
            || (self.left.1, self.left.1 - 1),
        )
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, span: Span, signed: bool) -> i64 {
    if signed {
        sample_signed(rng, span)
    } else {
        sample(rng, span)
    }
}

/// `ax + b = cx + d`
pub(crate) fn basic<R: Rng + ?Sized>(rng: &mut R, difficulty: DifficultyLevel) -> Draft {
    let ranges = Ranges::for_level(difficulty);
    let (a, c) = ranges.coefficients(rng, "variables-both-sides");
    let x = sample(rng, ranges.answer);
    let b = ranges.constant(rng);
    let d = (a - c) * x + b;

    let text = equation(&linear(a, b), &linear(c, d));
    let mut steps = vec![text.clone()];
    steps.push(step(&move_x_term(c), &equation(&linear(a - c, b), &d.to_string())));
    isolate_and_divide(&mut steps, a - c, b, d, x);

    Draft {
        equation_text: text,
        answer: Solution::Value(x),
        steps,
        hint: HINT,
    }
}

/// `a(x + b) = cx + d`
pub(crate) fn distributive<R: Rng + ?Sized>(rng: &mut R, difficulty: DifficultyLevel) -> Draft {
    let ranges = Ranges::for_level(difficulty);
    let (a, c) = ranges.coefficients(rng, "both-sides-distributive");
    let b = ranges.inner(rng);
    let x = sample(rng, ranges.answer);
    let d = a * (x + b) - c * x;

    let rhs = linear(c, d);
    let text = equation(&grouped(a, b), &rhs);
    let mut steps = vec![text.clone()];
    steps.push(step(&format!("Distribute {a}"), &equation(&linear(a, a * b), &rhs)));
    steps.push(step(&move_x_term(c), &equation(&linear(a - c, a * b), &d.to_string())));
    isolate_and_divide(&mut steps, a - c, a * b, d, x);

    Draft {
        equation_text: text,
        answer: Solution::Value(x),
        steps,
        hint: "Distribute first, then move all the x-terms to one side.",
    }
}

struct PracticeRanges {
    left: Span,
    right: Span,
    left_constant: Span,
    right_constant: Span,
}

impl PracticeRanges {
    fn for_level(difficulty: DifficultyLevel) -> Self {
        match difficulty {
            DifficultyLevel::Easy => Self {
                left: (2, 6),
                right: (1, 5),
                left_constant: (1, 10),
                right_constant: (1, 20),
            },
            DifficultyLevel::Medium => Self {
                left: (2, 9),
                right: (1, 8),
                left_constant: (1, 15),
                right_constant: (1, 30),
            },
            DifficultyLevel::Hard => Self {
                left: (2, 12),
                right: (1, 11),
                left_constant: (-15, 15),
                right_constant: (-20, 40),
            },
        }
    }
}

/// All four of `ax + b = cx + d` are drawn freely and the answer derived;
/// draws whose answer is not a positive integer are redrawn.
pub(crate) fn practice<R: Rng + ?Sized>(rng: &mut R, difficulty: DifficultyLevel) -> Draft {
    let ranges = PracticeRanges::for_level(difficulty);
    let (a, b, c, d, x) = resample(
        rng,
        "both-sides-practice",
        |rng| {
            let a = sample(rng, ranges.left);
            let b = sample(rng, ranges.left_constant);
            let c = sample(rng, ranges.right);
            let d = sample(rng, ranges.right_constant);
            let coef = a - c;
            if coef == 0 || (d - b) % coef != 0 {
                return None;
            }
            let x = (d - b) / coef;
            (x > 0).then_some((a, b, c, d, x))
        },
        || (3, 2, 1, 6, 2),
    );

    let text = equation(&linear(a, b), &linear(c, d));
    let mut steps = vec![text.clone()];
    steps.push(step(&move_x_term(c), &equation(&linear(a - c, b), &d.to_string())));
    isolate_and_divide(&mut steps, a - c, b, d, x);

    Draft {
        equation_text: text,
        answer: Solution::Value(x),
        steps,
        hint: HINT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn practice_answers_are_positive() {
        for difficulty in DifficultyLevel::ALL {
            let mut rng = ChaCha8Rng::seed_from_u64(41);
            for _ in 0..300 {
                let x = practice(&mut rng, difficulty).answer.value().unwrap();
                assert!(x > 0);
            }
        }
    }

    #[test]
    fn basic_has_x_on_both_sides() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for difficulty in DifficultyLevel::ALL {
            for _ in 0..100 {
                let draft = basic(&mut rng, difficulty);
                let (lhs, rhs) = draft.equation_text.split_once(" = ").unwrap();
                assert!(lhs.contains('x') && rhs.contains('x'), "{}", draft.equation_text);
            }
        }
    }

    #[test]
    fn easy_collected_coefficient_is_positive() {
        let mut rng = ChaCha8Rng::seed_from_u64(43);
        for _ in 0..200 {
            let draft = distributive(&mut rng, DifficultyLevel::Easy);
            let collected = draft.steps[2].split(": ").nth(1).unwrap();
            assert!(!collected.starts_with('-'), "{collected}");
        }
    }

    fn inner_constant(text: &str) -> i64 {
        let group = text.split_once('(').unwrap().1.split_once(')').unwrap().0;
        let (sign, magnitude) = group.trim_start_matches('x').trim().split_once(' ').unwrap();
        let magnitude: i64 = magnitude.parse().unwrap();
        if sign == "-" {
            -magnitude
        } else {
            magnitude
        }
    }

    #[test]
    fn distributive_inner_constant_follows_tier() {
        let mut rng = ChaCha8Rng::seed_from_u64(44);
        for (difficulty, bound, signed) in [
            (DifficultyLevel::Easy, 4, false),
            (DifficultyLevel::Medium, 6, true),
            (DifficultyLevel::Hard, 8, true),
        ] {
            let mut saw_negative = false;
            for _ in 0..300 {
                let draft = distributive(&mut rng, difficulty);
                let b = inner_constant(&draft.equation_text);
                assert!(b != 0 && b.abs() <= bound, "{}", draft.equation_text);
                saw_negative |= b < 0;
            }
            assert_eq!(saw_negative, signed, "{difficulty}");
        }
    }
}
