//! Arbitrary-precision numbers and the arithmetic context they are made in.
//!
//! Every `Real` carries its own precision. Values built through a
//! [`Precision`] context all carry the context's digit count, so arithmetic
//! between them rounds to that many significant decimal digits. There is no
//! process-wide precision setting: callers hold a `Precision` and pass it
//! down to whatever creates numbers.

use crate::{IvError, IvResult};
use dashu_float::DBig;
use dashu_int::IBig;

/// Arbitrary-precision floating point type used throughout the system.
pub type Real = DBig;

/// Arithmetic context: number of significant decimal digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precision {
    digits: usize,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            digits: Self::DEFAULT_DIGITS,
        }
    }
}

impl Precision {
    /// 16 output digits, doubled and rounded up.
    pub const DEFAULT_DIGITS: usize = 40;

    pub fn new(digits: usize) -> IvResult<Self> {
        if digits == 0 {
            return Err(IvError::InvalidArg {
                what: "precision digits must be positive",
            });
        }
        Ok(Self { digits })
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    /// Round `x` to this context's precision.
    pub fn lift(&self, x: Real) -> Real {
        x.with_precision(self.digits).value()
    }

    pub fn parse(&self, text: &str) -> IvResult<Real> {
        let trimmed = text.trim();
        let value = trimmed.parse::<Real>().map_err(|_| IvError::Parse {
            what: "decimal number",
            value: trimmed.to_string(),
        })?;
        Ok(self.lift(value))
    }

    /// Upgrade a double to this context.
    ///
    /// Goes through the shortest decimal representation that round-trips the
    /// double, so `0.1_f64` becomes exactly `0.1`.
    pub fn from_f64(&self, value: f64) -> IvResult<Real> {
        if !value.is_finite() {
            return Err(IvError::NonFinite {
                what: "double-precision input",
                value,
            });
        }
        self.parse(&format!("{value:e}"))
    }

    pub fn from_int(&self, value: i64) -> Real {
        self.lift(Real::from_parts(IBig::from(value), 0))
    }

    pub fn zero(&self) -> Real {
        self.lift(Real::ZERO)
    }

    pub fn one(&self) -> Real {
        self.lift(Real::ONE)
    }

    /// One unit in the last significant digit of 1.
    pub fn epsilon(&self) -> Real {
        let exponent = -(self.digits as isize);
        self.lift(Real::from_parts(IBig::ONE, exponent))
    }

    /// Downgrade to a double (nearest representable).
    pub fn to_f64(&self, value: &Real) -> IvResult<f64> {
        let text = value.to_string();
        let parsed = text.parse::<f64>().map_err(|_| IvError::Parse {
            what: "double from decimal",
            value: text.clone(),
        })?;
        if !parsed.is_finite() {
            return Err(IvError::NonFinite {
                what: "downgraded value",
                value: parsed,
            });
        }
        Ok(parsed)
    }
}

/// Magnitude of `x`.
pub fn abs(x: &Real) -> Real {
    if *x < Real::ZERO { -x.clone() } else { x.clone() }
}

/// Larger of the two values (first wins on ties).
pub fn max<'a>(a: &'a Real, b: &'a Real) -> &'a Real {
    if b > a { b } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_forty_digits() {
        assert_eq!(Precision::default().digits(), 40);
        assert!(Precision::new(0).is_err());
    }

    #[test]
    fn division_rounds_to_context_digits() {
        let ctx = Precision::default();
        let third = ctx.one() / ctx.from_int(3);
        let gap = ctx.one() - &third * ctx.from_int(3);
        assert!(gap > Real::ZERO);
        assert!(gap <= ctx.epsilon());
    }

    #[test]
    fn parse_rejects_garbage() {
        let ctx = Precision::default();
        let err = ctx.parse("not-a-number").unwrap_err();
        assert!(format!("{err}").contains("not-a-number"));
    }

    #[test]
    fn from_f64_uses_shortest_decimal() {
        let ctx = Precision::default();
        assert_eq!(ctx.from_f64(0.1).unwrap(), ctx.parse("0.1").unwrap());
        assert_eq!(ctx.from_f64(0.0).unwrap(), Real::ZERO);
        assert_eq!(ctx.from_f64(-0.0).unwrap(), Real::ZERO);
    }

    #[test]
    fn from_f64_detects_nan() {
        let err = Precision::default().from_f64(f64::NAN).unwrap_err();
        assert!(format!("{err}").contains("Non-finite"));
    }

    #[test]
    fn epsilon_is_tiny_and_positive() {
        let ctx = Precision::default();
        let eps = ctx.epsilon();
        assert!(eps > Real::ZERO);
        assert_eq!(eps, ctx.parse("1e-40").unwrap());
    }

    #[test]
    fn abs_and_max() {
        let ctx = Precision::default();
        let a = ctx.parse("-2.5").unwrap();
        let b = ctx.parse("1.5").unwrap();
        assert_eq!(abs(&a), ctx.parse("2.5").unwrap());
        assert_eq!(max(&a, &b), &b);
    }

    proptest! {
        #[test]
        fn f64_survives_upgrade_and_downgrade(x in -1.0e12_f64..1.0e12_f64) {
            let ctx = Precision::default();
            let upgraded = ctx.from_f64(x).unwrap();
            prop_assert_eq!(ctx.to_f64(&upgraded).unwrap(), x);
        }
    }
}
