//! Canonical rendering of equations and solution steps.
//!
//! Signs are always folded into the operator (`3x - 4`, never `3x + -4`) and
//! a unit coefficient is written as a bare `x`.

/// `3x`, `x`, `-x`
pub fn coef_x(coef: i64) -> String {
    match coef {
        1 => "x".to_string(),
        -1 => "-x".to_string(),
        _ => format!("{coef}x"),
    }
}

/// ` + 5`, ` - 5`, or nothing for zero.
pub fn signed(value: i64) -> String {
    match value {
        0 => String::new(),
        v if v > 0 => format!(" + {v}"),
        v => format!(" - {}", v.unsigned_abs()),
    }
}

/// `coef * x + constant`, dropping whichever part is zero.
pub fn linear(coef: i64, constant: i64) -> String {
    if coef == 0 {
        constant.to_string()
    } else {
        format!("{}{}", coef_x(coef), signed(constant))
    }
}

/// `a(x + b)`
pub fn grouped(a: i64, b: i64) -> String {
    let inner = format!("x{}", signed(b));
    match a {
        1 => format!("({inner})"),
        -1 => format!("-({inner})"),
        _ => format!("{a}({inner})"),
    }
}

/// `x/a`
pub fn quotient(divisor: i64) -> String {
    format!("x/{divisor}")
}

pub fn equation(left: &str, right: &str) -> String {
    format!("{left} = {right}")
}

pub fn step(reason: &str, equation: &str) -> String {
    format!("{reason}: {equation}")
}

/// Appends the closing "isolate the x-term, then divide" steps for
/// `coef * x + constant = rhs`, whose root is `answer`.
pub fn isolate_and_divide(steps: &mut Vec<String>, coef: i64, constant: i64, rhs: i64, answer: i64) {
    debug_assert_eq!(coef * answer + constant, rhs);

    if constant != 0 {
        let reason = if constant > 0 {
            format!("Subtract {constant} from both sides")
        } else {
            format!("Add {} to both sides", constant.unsigned_abs())
        };
        steps.push(step(&reason, &equation(&coef_x(coef), &(rhs - constant).to_string())));
    }

    if coef != 1 {
        steps.push(step(
            &format!("Divide both sides by {coef}"),
            &equation("x", &answer.to_string()),
        ));
    }
}

/// Step that moves `coef * x` off the right-hand side.
pub fn move_x_term(coef: i64) -> String {
    if coef > 0 {
        format!("Subtract {} from both sides", coef_x(coef))
    } else {
        format!("Add {} to both sides", coef_x(-coef))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_coefficients() {
        assert_eq!(coef_x(1), "x");
        assert_eq!(coef_x(-1), "-x");
        assert_eq!(coef_x(-4), "-4x");
        assert_eq!(coef_x(7), "7x");
    }

    #[test]
    fn folds_signs() {
        assert_eq!(linear(3, -4), "3x - 4");
        assert_eq!(linear(3, 4), "3x + 4");
        assert_eq!(linear(1, 0), "x");
        assert_eq!(linear(0, -6), "-6");
        assert_eq!(grouped(2, -3), "2(x - 3)");
        assert_eq!(grouped(-1, 5), "-(x + 5)");
    }

    #[test]
    fn isolate_steps_end_in_solved_form() {
        let mut steps = Vec::new();
        isolate_and_divide(&mut steps, 3, -4, 11, 5);
        assert_eq!(steps, vec!["Add 4 to both sides: 3x = 15", "Divide both sides by 3: x = 5"]);

        let mut steps = Vec::new();
        isolate_and_divide(&mut steps, 1, 2, 9, 7);
        assert_eq!(steps, vec!["Subtract 2 from both sides: x = 7"]);
    }
}
