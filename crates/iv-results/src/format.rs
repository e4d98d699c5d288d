//! Deterministic decimal rendering of arbitrary-precision values.
//!
//! All rounding here is done on the exact decimal significand with integer
//! arithmetic, half away from zero, so the output never depends on the
//! precision the value happens to carry.

use dashu_int::{Sign, UBig};
use iv_core::Real;

/// Fixed-point renderer used for every persisted number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanonicalFormatter {
    precision: usize,
}

impl Default for CanonicalFormatter {
    fn default() -> Self {
        Self {
            precision: iv_core::DEFAULT_OUTPUT_DIGITS,
        }
    }
}

impl CanonicalFormatter {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    /// Digits after the decimal point.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// `x` with exactly `precision` fractional digits, trailing zeros kept.
    ///
    /// A value that rounds to zero is written without a sign.
    pub fn format(&self, x: &Real) -> String {
        let (negative, magnitude, exponent) = decompose(x);
        let scaled = rescale(magnitude, exponent + self.precision as isize);
        let mut digits = scaled.to_string();
        if digits.len() <= self.precision {
            digits = format!("{digits:0>width$}", width = self.precision + 1);
        }

        let mut out = String::with_capacity(digits.len() + 2);
        if negative && scaled != UBig::ZERO {
            out.push('-');
        }
        let split = digits.len() - self.precision;
        out.push_str(&digits[..split]);
        if self.precision > 0 {
            out.push('.');
            out.push_str(&digits[split..]);
        }
        out
    }
}

/// `x` rounded to `n` significant digits in positional notation, trailing
/// fractional zeros dropped but at least one fractional digit kept
/// (`298.15`, `300.0`).
pub fn format_significant(x: &Real, n: usize) -> String {
    let (negative, magnitude, exponent) = decompose(x);
    if magnitude == UBig::ZERO {
        return "0.0".to_string();
    }
    let (significand, exponent) = round_significant(magnitude, exponent, n.max(1));
    let digits = significand.to_string();

    let (integer, fraction) = if exponent >= 0 {
        (format!("{digits}{}", "0".repeat(exponent as usize)), String::new())
    } else {
        let frac_len = (-exponent) as usize;
        if digits.len() > frac_len {
            let split = digits.len() - frac_len;
            (digits[..split].to_string(), digits[split..].to_string())
        } else {
            ("0".to_string(), format!("{digits:0>frac_len$}"))
        }
    };
    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };

    let sign = if negative { "-" } else { "" };
    format!("{sign}{integer}.{fraction}")
}

/// Sign, |significand| and base-10 exponent of `x`.
fn decompose(x: &Real) -> (bool, UBig, isize) {
    let repr = x.repr();
    let (sign, magnitude) = repr.significand().clone().into_parts();
    (sign == Sign::Negative, magnitude, repr.exponent())
}

fn pow10(n: usize) -> UBig {
    UBig::from(10u8).pow(n)
}

fn digit_count(n: &UBig) -> usize {
    n.to_string().len()
}

/// `magnitude·10^shift`, rounded half away from zero to an integer.
fn rescale(magnitude: UBig, shift: isize) -> UBig {
    if shift >= 0 {
        return magnitude * pow10(shift as usize);
    }
    let divisor = pow10(shift.unsigned_abs());
    let quotient = &magnitude / &divisor;
    let remainder = &magnitude % &divisor;
    if &remainder + &remainder >= divisor {
        quotient + UBig::ONE
    } else {
        quotient
    }
}

/// Round `magnitude·10^exponent` to `n` significant digits; returns the new
/// significand and exponent.
fn round_significant(magnitude: UBig, exponent: isize, n: usize) -> (UBig, isize) {
    let count = digit_count(&magnitude);
    if count <= n {
        return (magnitude, exponent);
    }
    let drop = (count - n) as isize;
    let rounded = rescale(magnitude, -drop);
    (rounded, exponent + drop)
}
