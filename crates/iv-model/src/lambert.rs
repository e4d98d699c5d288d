//! Principal branch of the Lambert W function.
//!
//! Both versions take `ln x` rather than `x`: the arguments arising from the
//! diode equation are routinely far beyond the f64 range (e^3000 and up), and
//! log space keeps the double-precision variant usable there.
//!
//! Iteration: Newton on `f(w) = w + ln w - ln x`, which gives
//! `w ← w·(1 + ln x − ln w)/(1 + w)`. `f` is increasing and concave, so from
//! any positive start with `ln w < 1 + ln x` the iterates stay positive and
//! converge monotonically after the first step.

use crate::error::{ModelError, ModelResult};
use iv_core::{Precision, Real, abs};

const MAX_ITERATIONS: usize = 200;

/// Relative step below which the iteration is converged, in units of the
/// context epsilon. Scaled by `1 + |ln x|`: for small `w` the factor
/// `1 + ln x − ln w` cancels and loses that many ulps.
const GUARD_ULPS: i64 = 1000;

/// W₀(x) for x = exp(`ln_x`), in `precision`.
pub fn lambert_w0_from_ln(ln_x: &Real, precision: Precision) -> ModelResult<Real> {
    let ln_x = precision.lift(ln_x.clone());
    let one = precision.one();

    let mut w = if ln_x > one {
        &ln_x - ln_x.ln()
    } else {
        let x = ln_x.exp();
        &x / (&one + &x)
    };

    let tol = precision.epsilon() * precision.from_int(GUARD_ULPS) * (&one + abs(&ln_x));
    for _ in 0..MAX_ITERATIONS {
        let next = &w * (&one + &ln_x - w.ln()) / (&one + &w);
        let step = abs(&(&next - &w));
        w = next;
        if step <= &tol * &w {
            return Ok(w);
        }
    }

    Err(ModelError::ConvergenceFailed {
        what: format!(
            "Lambert W did not converge for ln(x) = {ln_x} after {MAX_ITERATIONS} iterations"
        ),
    })
}

/// W₀(x) for x = exp(`ln_x`), in double precision.
pub(crate) fn lambert_w0_from_ln_f64(ln_x: f64) -> ModelResult<f64> {
    if !ln_x.is_finite() {
        return Err(ModelError::Numeric {
            what: format!("Lambert W argument ln(x) = {ln_x}"),
        });
    }
    // W(x) ≈ x once x is this small; exp() is already subnormal or zero.
    if ln_x < -700.0 {
        return Ok(ln_x.exp());
    }

    let mut w = if ln_x > 1.0 {
        ln_x - ln_x.ln()
    } else {
        let x = ln_x.exp();
        x / (1.0 + x)
    };

    let tol = GUARD_ULPS as f64 * f64::EPSILON * (1.0 + ln_x.abs());
    for _ in 0..MAX_ITERATIONS {
        let next = w * (1.0 + ln_x - w.ln()) / (1.0 + w);
        let step = (next - w).abs();
        w = next;
        if step <= tol * w {
            return Ok(w);
        }
    }

    Err(ModelError::ConvergenceFailed {
        what: format!("Lambert W (f64) did not converge for ln(x) = {ln_x}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Precision {
        Precision::default()
    }

    /// w·e^w − x, evaluated as w + ln w − ln x to stay in range.
    fn defect(w: &Real, ln_x: &Real) -> Real {
        abs(&(w + w.ln() - ln_x))
    }

    #[test]
    fn omega_constant() {
        let w = lambert_w0_from_ln(&ctx().zero(), ctx()).unwrap();
        let omega = ctx()
            .parse("0.5671432904097838729999686622103555497538")
            .unwrap();
        assert!(abs(&(&w - &omega)) < ctx().parse("1e-37").unwrap());
    }

    #[test]
    fn w_of_e_is_one() {
        let w = lambert_w0_from_ln(&ctx().one(), ctx()).unwrap();
        assert!(abs(&(&w - &ctx().one())) < ctx().parse("1e-37").unwrap());
    }

    #[test]
    fn huge_argument_in_log_space() {
        let ln_x = ctx().parse("3868.5").unwrap();
        let w = lambert_w0_from_ln(&ln_x, ctx()).unwrap();
        assert!(defect(&w, &ln_x) < ctx().parse("1e-34").unwrap());
        assert!(w > ctx().parse("3850").unwrap());
    }

    #[test]
    fn tiny_argument() {
        let ln_x = ctx().parse("-100").unwrap();
        let w = lambert_w0_from_ln(&ln_x, ctx()).unwrap();
        // W(x) = x·e^(−W(x)) ≈ x for tiny x
        let x = ln_x.exp();
        let rel = abs(&((&w - &x) / &x));
        assert!(rel < ctx().parse("1e-30").unwrap());
    }

    #[test]
    fn f64_matches_arbitrary_precision() {
        for ln_x in [-20.0, -1.0, 0.0, 0.5, 1.0, 3.0, 26.0, 3868.5] {
            let exact = lambert_w0_from_ln(&ctx().from_f64(ln_x).unwrap(), ctx()).unwrap();
            let exact = ctx().to_f64(&exact).unwrap();
            let approx = lambert_w0_from_ln_f64(ln_x).unwrap();
            assert!(
                (approx - exact).abs() <= 1e-13 * exact.abs(),
                "ln_x={ln_x}: {approx} vs {exact}"
            );
        }
    }

    #[test]
    fn f64_underflow_and_nan() {
        assert_eq!(lambert_w0_from_ln_f64(-5000.0).unwrap(), 0.0);
        assert!(lambert_w0_from_ln_f64(f64::NAN).is_err());
    }
}
