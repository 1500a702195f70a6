use rand::Rng;

use crate::adaptive::DifficultyLevel;
use crate::generator::format::{coef_x, equation, grouped, linear, signed, step};
use crate::generator::{sample, sample_signed, Draft, Span};
use crate::linear::Solution;

struct Ranges {
    multiplier: Span,
    inner: Span,
    shared: Span,
    signed_inner: bool,
    shared_constant: bool,
}

impl Ranges {
    fn for_level(difficulty: DifficultyLevel) -> Self {
        match difficulty {
            DifficultyLevel::Easy => Self {
                multiplier: (2, 4),
                inner: (1, 5),
                shared: (1, 5),
                signed_inner: false,
                shared_constant: false,
            },
            DifficultyLevel::Medium => Self {
                multiplier: (2, 6),
                inner: (1, 8),
                shared: (1, 8),
                signed_inner: true,
                shared_constant: false,
            },
            DifficultyLevel::Hard => Self {
                multiplier: (2, 9),
                inner: (1, 9),
                shared: (1, 10),
                signed_inner: true,
                shared_constant: true,
            },
        }
    }

    fn inner<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        if self.signed_inner {
            sample_signed(rng, self.inner)
        } else {
            sample(rng, self.inner)
        }
    }
}

/// `a(x + b) = ax + ab`; hard adds the same constant to both sides,
/// `a(x + b) + e = ax + (ab + e)`.
pub(crate) fn infinite<R: Rng + ?Sized>(rng: &mut R, difficulty: DifficultyLevel) -> Draft {
    let ranges = Ranges::for_level(difficulty);
    let a = sample(rng, ranges.multiplier);
    let b = ranges.inner(rng);
    let e = if ranges.shared_constant {
        sample_signed(rng, ranges.shared)
    } else {
        0
    };
    let constant = a * b + e;

    let rhs = linear(a, constant);
    let text = equation(&format!("{}{}", grouped(a, b), signed(e)), &rhs);

    let mut steps = vec![text.clone()];
    steps.push(step(
        &format!("Distribute {a}"),
        &equation(&format!("{}{}", linear(a, a * b), signed(e)), &rhs),
    ));
    if e != 0 {
        steps.push(step("Combine constants", &equation(&rhs, &rhs)));
    }
    let identity = equation(&constant.to_string(), &constant.to_string());
    steps.push(step(&format!("Subtract {} from both sides", coef_x(a)), &identity));
    steps.push(format!(
        "{identity} is always true, so every value of x is a solution"
    ));

    Draft {
        equation_text: text,
        answer: Solution::Infinite,
        steps,
        hint: "Simplify both sides. If they end up exactly the same, every number works.",
    }
}

/// Easy: `ax + b = ax + d`; otherwise `a(x + b) = ax + d`; always `d` differs
/// from the left-hand constant.
pub(crate) fn none<R: Rng + ?Sized>(rng: &mut R, difficulty: DifficultyLevel) -> Draft {
    let ranges = Ranges::for_level(difficulty);
    let a = sample(rng, ranges.multiplier);
    let b = ranges.inner(rng);
    let grouped_form = difficulty != DifficultyLevel::Easy;

    let left_constant = if grouped_form { a * b } else { b };
    let d = left_constant + sample_signed(rng, ranges.shared);

    let lhs = if grouped_form { grouped(a, b) } else { linear(a, b) };
    let rhs = linear(a, d);
    let text = equation(&lhs, &rhs);

    let mut steps = vec![text.clone()];
    if grouped_form {
        steps.push(step(
            &format!("Distribute {a}"),
            &equation(&linear(a, left_constant), &rhs),
        ));
    }
    let contradiction = equation(&left_constant.to_string(), &d.to_string());
    steps.push(step(&format!("Subtract {} from both sides", coef_x(a)), &contradiction));
    steps.push(format!("{contradiction} is never true, so there is no solution"));

    Draft {
        equation_text: text,
        answer: Solution::NoSolution,
        steps,
        hint: "Simplify both sides. If the x-terms cancel and the numbers don't match, nothing works.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::LinearEquation;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn infinite_sides_are_identical_after_simplifying() {
        let mut rng = ChaCha8Rng::seed_from_u64(51);
        for difficulty in DifficultyLevel::ALL {
            for _ in 0..200 {
                let draft = infinite(&mut rng, difficulty);
                let eq = LinearEquation::parse(&draft.equation_text).unwrap();
                assert_eq!(eq.left, eq.right, "{}", draft.equation_text);
            }
        }
    }

    #[test]
    fn none_sides_share_coefficient_but_not_constant() {
        let mut rng = ChaCha8Rng::seed_from_u64(52);
        for difficulty in DifficultyLevel::ALL {
            for _ in 0..200 {
                let draft = none(&mut rng, difficulty);
                let eq = LinearEquation::parse(&draft.equation_text).unwrap();
                assert_eq!(eq.left.coef, eq.right.coef);
                assert_ne!(eq.left.constant, eq.right.constant, "{}", draft.equation_text);
            }
        }
    }

    #[test]
    fn easy_no_solution_is_ungrouped() {
        let mut rng = ChaCha8Rng::seed_from_u64(53);
        let draft = none(&mut rng, DifficultyLevel::Easy);
        assert!(!draft.equation_text.contains('('));
        assert_eq!(draft.steps.len(), 3);
    }
}
