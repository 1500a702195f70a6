//! Exact rational arithmetic for checking equations.
//!
//! Intermediates are computed in `i128` and narrowed back after reduction, so
//! every operation is checked: a result that does not fit in `i64` is `None`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    num: i64,
    den: i64,
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Fraction {
    pub const ZERO: Fraction = Fraction { num: 0, den: 1 };
    pub const ONE: Fraction = Fraction { num: 1, den: 1 };

    /// `None` for a zero denominator or a reduced value outside `i64`.
    pub fn new(num: i64, den: i64) -> Option<Self> {
        Self::reduce(num as i128, den as i128)
    }

    fn reduce(num: i128, den: i128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let g = gcd(num, den).max(1);
        let sign = if den < 0 { -1 } else { 1 };
        Some(Self {
            num: i64::try_from(sign * num / g).ok()?,
            den: i64::try_from(sign * den / g).ok()?,
        })
    }

    pub fn integer(value: i64) -> Self {
        Self { num: value, den: 1 }
    }

    pub fn numerator(&self) -> i64 {
        self.num
    }

    pub fn denominator(&self) -> i64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn to_integer(&self) -> Option<i64> {
        (self.den == 1).then_some(self.num)
    }

    pub fn checked_add(self, rhs: Fraction) -> Option<Fraction> {
        let (a, b, c, d) = self.wide(rhs);
        Self::reduce(a.checked_mul(d)?.checked_add(c.checked_mul(b)?)?, b.checked_mul(d)?)
    }

    pub fn checked_sub(self, rhs: Fraction) -> Option<Fraction> {
        self.checked_add(rhs.checked_neg()?)
    }

    pub fn checked_mul(self, rhs: Fraction) -> Option<Fraction> {
        let (a, b, c, d) = self.wide(rhs);
        Self::reduce(a.checked_mul(c)?, b.checked_mul(d)?)
    }

    /// `None` on division by zero as well as on overflow.
    pub fn checked_div(self, rhs: Fraction) -> Option<Fraction> {
        let (a, b, c, d) = self.wide(rhs);
        Self::reduce(a.checked_mul(d)?, b.checked_mul(c)?)
    }

    pub fn checked_neg(self) -> Option<Fraction> {
        Some(Self {
            num: self.num.checked_neg()?,
            den: self.den,
        })
    }

    fn wide(self, rhs: Fraction) -> (i128, i128, i128, i128) {
        (
            self.num as i128,
            self.den as i128,
            rhs.num as i128,
            rhs.den as i128,
        )
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_sign_and_gcd() {
        let f = Fraction::new(6, -8).unwrap();
        assert_eq!(f.numerator(), -3);
        assert_eq!(f.denominator(), 4);
        assert!(Fraction::new(1, 0).is_none());
    }

    #[test]
    fn arithmetic() {
        let half = Fraction::new(1, 2).unwrap();
        let third = Fraction::new(1, 3).unwrap();
        assert_eq!(half.checked_add(third), Fraction::new(5, 6));
        assert_eq!(half.checked_sub(half), Some(Fraction::ZERO));
        assert_eq!(half.checked_mul(Fraction::integer(4)), Some(Fraction::integer(2)));
        assert_eq!(half.checked_div(third), Fraction::new(3, 2));
        assert_eq!(half.checked_div(Fraction::ZERO), None);
        assert_eq!(Fraction::integer(7).to_integer(), Some(7));
        assert_eq!(third.to_integer(), None);
        assert_eq!(third.to_string(), "1/3");
    }

    #[test]
    fn extremes_do_not_panic() {
        assert_eq!(Fraction::new(i64::MIN, 2), Some(Fraction::integer(i64::MIN / 2)));
        assert_eq!(Fraction::new(i64::MIN, -1), None);
        assert_eq!(Fraction::integer(i64::MIN).checked_neg(), None);

        let big = Fraction::integer(4_000_000_000);
        assert_eq!(big.checked_mul(big), None);
        assert_eq!(Fraction::integer(i64::MAX).checked_add(Fraction::ONE), None);
        assert_eq!(
            Fraction::integer(i64::MAX).checked_sub(Fraction::integer(i64::MAX)),
            Some(Fraction::ZERO)
        );
        // the intermediate exceeds i64 but the reduced result fits
        let huge = Fraction::new(i64::MAX, 3).unwrap();
        assert_eq!(huge.checked_mul(Fraction::integer(3)), Some(Fraction::integer(i64::MAX)));
    }
}
