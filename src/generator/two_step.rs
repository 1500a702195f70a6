use rand::Rng;

use crate::adaptive::DifficultyLevel;
use crate::generator::format::{coef_x, equation, isolate_and_divide, linear, quotient, step};
use crate::generator::{resample, sample, Draft, Span};
use crate::linear::Solution;

struct BasicRanges {
    coefficient: Span,
    answer: Span,
    constant: Span,
}

impl BasicRanges {
    fn for_level(difficulty: DifficultyLevel) -> Self {
        match difficulty {
            DifficultyLevel::Easy => Self {
                coefficient: (2, 4),
                answer: (1, 8),
                constant: (1, 7),
            },
            DifficultyLevel::Medium => Self {
                coefficient: (2, 6),
                answer: (1, 12),
                constant: (1, 15),
            },
            DifficultyLevel::Hard => Self {
                coefficient: (3, 8),
                answer: (-5, 15),
                constant: (1, 20),
            },
        }
    }
}

/// `ax + b = c`
pub(crate) fn basic<R: Rng + ?Sized>(rng: &mut R, difficulty: DifficultyLevel) -> Draft {
    let ranges = BasicRanges::for_level(difficulty);
    let a = sample(rng, ranges.coefficient);
    let x = sample(rng, ranges.answer);
    let b = sample(rng, ranges.constant);
    let c = a * x + b;

    let text = equation(&linear(a, b), &c.to_string());
    let mut steps = vec![text.clone()];
    isolate_and_divide(&mut steps, a, b, c, x);

    Draft {
        equation_text: text,
        answer: Solution::Value(x),
        steps,
        hint: "Undo the addition first, then undo the multiplication.",
    }
}

struct MixedRanges {
    coefficient: Span,
    divisor: Span,
    answer: Span,
    dividend: Span,
    constant: Span,
}

impl MixedRanges {
    fn for_level(difficulty: DifficultyLevel) -> Self {
        match difficulty {
            DifficultyLevel::Easy => Self {
                coefficient: (2, 4),
                divisor: (2, 4),
                answer: (1, 8),
                dividend: (4, 24),
                constant: (1, 7),
            },
            DifficultyLevel::Medium => Self {
                coefficient: (2, 6),
                divisor: (2, 5),
                answer: (1, 12),
                dividend: (4, 40),
                constant: (1, 12),
            },
            DifficultyLevel::Hard => Self {
                coefficient: (3, 8),
                divisor: (2, 8),
                answer: (-5, 15),
                dividend: (-30, 60),
                constant: (1, 20),
            },
        }
    }
}

/// `ax - b = c`, `x/a + b = c` or `x/a - b = c`, picked uniformly.
pub(crate) fn mixed<R: Rng + ?Sized>(rng: &mut R, difficulty: DifficultyLevel) -> Draft {
    let ranges = MixedRanges::for_level(difficulty);
    match rng.gen_range(0..3) {
        0 => subtraction(rng, &ranges),
        1 => division(rng, &ranges, false),
        _ => division(rng, &ranges, true),
    }
}

fn subtraction<R: Rng + ?Sized>(rng: &mut R, ranges: &MixedRanges) -> Draft {
    let a = sample(rng, ranges.coefficient);
    let x = sample(rng, ranges.answer);
    let b = sample(rng, ranges.constant);
    let c = a * x - b;

    let text = equation(&linear(a, -b), &c.to_string());
    let mut steps = vec![text.clone()];
    isolate_and_divide(&mut steps, a, -b, c, x);

    Draft {
        equation_text: text,
        answer: Solution::Value(x),
        steps,
        hint: "Add the constant to both sides, then divide by the coefficient.",
    }
}

/// The answer is rounded toward zero onto a multiple of the divisor so
/// `x/a` stays whole; a draw that rounds to zero is redrawn.
fn division<R: Rng + ?Sized>(rng: &mut R, ranges: &MixedRanges, subtract: bool) -> Draft {
    let a = sample(rng, ranges.divisor);
    let x = resample(
        rng,
        "two-step-division",
        |rng| {
            let raw = sample(rng, ranges.dividend);
            let x = (raw / a) * a;
            (x != 0).then_some(x)
        },
        || a,
    );
    let b = sample(rng, ranges.constant);
    let offset = if subtract { -b } else { b };
    let c = x / a + offset;

    let lhs = if subtract {
        format!("{} - {b}", quotient(a))
    } else {
        format!("{} + {b}", quotient(a))
    };
    let text = equation(&lhs, &c.to_string());
    let reason = if subtract {
        format!("Add {b} to both sides")
    } else {
        format!("Subtract {b} from both sides")
    };

    let steps = vec![
        text.clone(),
        step(&reason, &equation(&quotient(a), &(c - offset).to_string())),
        step(
            &format!("Multiply both sides by {a}"),
            &equation(&coef_x(1), &x.to_string()),
        ),
    ];

    Draft {
        equation_text: text,
        answer: Solution::Value(x),
        steps,
        hint: "Undo the addition or subtraction first, then multiply to undo the division.",
    }
}
