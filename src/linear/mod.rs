//! Linear expressions and equations in one variable, with exact arithmetic.
//!
//! The generator never needs this to build a problem (constants are
//! back-solved), but answer checking and the generator's own tests parse the
//! rendered `equation_text` back through here.

pub mod fraction;
mod parser;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TutorError};

pub use fraction::Fraction;
pub use parser::parse_expr;

/// `coef * x + constant`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinearExpr {
    pub coef: Fraction,
    pub constant: Fraction,
}

impl LinearExpr {
    pub fn new(coef: Fraction, constant: Fraction) -> Self {
        Self { coef, constant }
    }

    pub fn x() -> Self {
        Self::new(Fraction::ONE, Fraction::ZERO)
    }

    pub fn constant(value: Fraction) -> Self {
        Self::new(Fraction::ZERO, value)
    }

    pub fn is_constant(&self) -> bool {
        self.coef.is_zero()
    }

    /// Checked ops below return `None` when a coefficient overflows `i64`.
    pub fn scale(&self, factor: Fraction) -> Option<Self> {
        Some(Self::new(
            self.coef.checked_mul(factor)?,
            self.constant.checked_mul(factor)?,
        ))
    }

    /// `None` on a zero divisor too.
    pub fn divide(&self, divisor: Fraction) -> Option<Self> {
        Some(Self::new(
            self.coef.checked_div(divisor)?,
            self.constant.checked_div(divisor)?,
        ))
    }

    /// Product of two expressions, `None` when it would be quadratic.
    pub fn product(&self, other: &LinearExpr) -> Option<Self> {
        if self.is_constant() {
            other.scale(self.constant)
        } else if other.is_constant() {
            self.scale(other.constant)
        } else {
            None
        }
    }

    pub fn checked_add(&self, rhs: &LinearExpr) -> Option<Self> {
        Some(Self::new(
            self.coef.checked_add(rhs.coef)?,
            self.constant.checked_add(rhs.constant)?,
        ))
    }

    pub fn checked_sub(&self, rhs: &LinearExpr) -> Option<Self> {
        Some(Self::new(
            self.coef.checked_sub(rhs.coef)?,
            self.constant.checked_sub(rhs.constant)?,
        ))
    }

    pub fn checked_neg(&self) -> Option<Self> {
        Some(Self::new(self.coef.checked_neg()?, self.constant.checked_neg()?))
    }

    pub fn eval(&self, x: i64) -> Option<Fraction> {
        self.coef
            .checked_mul(Fraction::integer(x))?
            .checked_add(self.constant)
    }
}

/// Solution set of a linear equation with an integral answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solution {
    Value(i64),
    /// Every value of `x` satisfies the equation.
    Infinite,
    /// No value of `x` satisfies the equation.
    NoSolution,
}

impl Solution {
    pub fn value(&self) -> Option<i64> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_special(&self) -> bool {
        !matches!(self, Self::Value(_))
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "x = {v}"),
            Self::Infinite => f.write_str("infinitely many solutions"),
            Self::NoSolution => f.write_str("no solution"),
        }
    }
}

impl Serialize for Solution {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_i64(*v),
            Self::Infinite => serializer.serialize_str("infinite"),
            Self::NoSolution => serializer.serialize_str("none"),
        }
    }
}

impl<'de> Deserialize<'de> for Solution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(Self::Value(v)),
            Repr::Text(s) if s == "infinite" => Ok(Self::Infinite),
            Repr::Text(s) if s == "none" => Ok(Self::NoSolution),
            Repr::Text(s) => Err(serde::de::Error::custom(format!("unknown solution {s:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearEquation {
    pub left: LinearExpr,
    pub right: LinearExpr,
}

impl LinearEquation {
    pub fn parse(text: &str) -> Result<Self> {
        let mut sides = text.split('=');
        let (left, right) = match (sides.next(), sides.next(), sides.next()) {
            (Some(left), Some(right), None) => (left, right),
            _ => return Err(TutorError::parse(text, "expected exactly one '='")),
        };

        Ok(Self {
            left: parse_expr(left)?,
            right: parse_expr(right)?,
        })
    }

    /// Both sides moved left: `coef * x + constant = 0`.
    pub fn normalized(&self) -> Result<LinearExpr> {
        self.left.checked_sub(&self.right).ok_or(TutorError::Overflow)
    }

    /// `false` when either side overflows at `x`.
    pub fn satisfied_by(&self, x: i64) -> bool {
        match (self.left.eval(x), self.right.eval(x)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    /// Solves exactly. A unique but non-integral root is an error because the
    /// tutor only ever poses integral problems.
    pub fn solve(&self) -> Result<Solution> {
        let normalized = self.normalized()?;
        if normalized.coef.is_zero() {
            return Ok(if normalized.constant.is_zero() {
                Solution::Infinite
            } else {
                Solution::NoSolution
            });
        }

        let root = normalized
            .constant
            .checked_neg()
            .and_then(|c| c.checked_div(normalized.coef))
            .ok_or(TutorError::Overflow)?;
        root.to_integer()
            .map(Solution::Value)
            .ok_or(TutorError::NonIntegralSolution)
    }
}
