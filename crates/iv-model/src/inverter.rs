//! Closed-form inversion of the single-diode equation.

use crate::error::ModelResult;
use crate::lambert::lambert_w0_from_ln;
use crate::model::DiodeModel;
use iv_core::Real;

/// Exact, non-iterative solves of the single-diode equation for one variable
/// given the other.
///
/// Implementations are trusted only through the residual predicate: callers
/// check the result and treat a miss as a precision failure.
pub trait ClosedFormInverter {
    /// Current at `voltage`.
    fn current_from_voltage(&self, model: &DiodeModel, voltage: &Real) -> ModelResult<Real>;

    /// Voltage at `current`.
    fn voltage_from_current(&self, model: &DiodeModel, current: &Real) -> ModelResult<Real>;
}

/// Lambert-W closed forms.
///
/// With `a = n·N_s·V_th` and `G_sh = 1/R_sh`:
///
/// - I(V) = (I_L + I_0 − V·G_sh)/(1 + R_s·G_sh) − (a/R_s)·W(θ),
///   θ = R_s·I_0/(a·(1 + R_s·G_sh)) · exp((R_s·(I_L + I_0) + V)/(a·(1 + R_s·G_sh)))
/// - V(I) = (I_L + I_0 − I)·R_sh − I·R_s − a·W(ψ),
///   ψ = I_0·R_sh/a · exp((I_L + I_0 − I)·R_sh/a)
///
/// `R_s = 0` (explicit in I) and `I_0 = 0` (linear) are solved directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct LambertWInverter;

impl ClosedFormInverter for LambertWInverter {
    fn current_from_voltage(&self, model: &DiodeModel, voltage: &Real) -> ModelResult<Real> {
        let ctx = model.precision();
        let p = model.params();
        let one = ctx.one();
        let a = model.n_ns_vth();
        let gsh = model.shunt_conductance();
        let (il, io, rs) = (
            p.photocurrent(),
            p.saturation_current(),
            p.resistance_series(),
        );

        if *io == Real::ZERO {
            return Ok((il - voltage * gsh) / (&one + rs * gsh));
        }
        if *rs == Real::ZERO {
            let exponent = voltage / a;
            return Ok(il - io * (exponent.exp() - &one) - gsh * voltage);
        }

        let denom = &one + rs * gsh;
        let a_denom = a * &denom;
        let ln_theta = (rs * io / &a_denom).ln() + (rs * (il + io) + voltage) / &a_denom;
        let w = lambert_w0_from_ln(&ln_theta, ctx)?;
        Ok((il + io - voltage * gsh) / &denom - (a / rs) * w)
    }

    fn voltage_from_current(&self, model: &DiodeModel, current: &Real) -> ModelResult<Real> {
        let ctx = model.precision();
        let p = model.params();
        let a = model.n_ns_vth();
        let (il, io, rs, rsh) = (
            p.photocurrent(),
            p.saturation_current(),
            p.resistance_series(),
            p.resistance_shunt(),
        );

        let drive = il + io - current;
        if *io == Real::ZERO {
            return Ok((il - current) * rsh - current * rs);
        }

        let ln_psi = (io * rsh / a).ln() + &drive * rsh / a;
        let w = lambert_w0_from_ln(&ln_psi, ctx)?;
        Ok(&drive * rsh - current * rs - a * w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DiodeParameters;
    use iv_core::{Constants, Precision, abs};

    fn model(values: [&str; 6]) -> (DiodeModel, Constants) {
        let ctx = Precision::default();
        let constants = Constants::standard(ctx).unwrap();
        let params = DiodeParameters::parse(ctx, values).unwrap();
        (DiodeModel::new(&params, &constants), constants)
    }

    const MODULE: [&str; 6] = ["6", "1e-9", "0.1", "1000", "1", "60"];

    #[test]
    fn current_satisfies_equation_across_voltages() {
        let (m, c) = model(MODULE);
        let ctx = m.precision();
        for v in ["0", "5", "20", "30", "34", "34.69"] {
            let v = ctx.parse(v).unwrap();
            let i = LambertWInverter.current_from_voltage(&m, &v).unwrap();
            assert!(m.is_precise_enough(&v, &i, &c.atol), "V = {v}, I = {i}");
        }
    }

    #[test]
    fn open_circuit_voltage() {
        let (m, c) = model(MODULE);
        let ctx = m.precision();
        let v_oc = LambertWInverter
            .voltage_from_current(&m, &ctx.zero())
            .unwrap();
        assert!(m.is_precise_enough(&v_oc, &ctx.zero(), &c.atol));
        assert!(v_oc > ctx.parse("34.6").unwrap() && v_oc < ctx.parse("34.8").unwrap());
    }

    #[test]
    fn inversions_agree() {
        let (m, _) = model(MODULE);
        let ctx = m.precision();
        let v = ctx.parse("25").unwrap();
        let i = LambertWInverter.current_from_voltage(&m, &v).unwrap();
        let back = LambertWInverter.voltage_from_current(&m, &i).unwrap();
        assert!(abs(&(&back - &v)) < ctx.parse("1e-30").unwrap());
    }

    #[test]
    fn zero_series_resistance() {
        let (m, c) = model(["6", "1e-9", "0", "1000", "1", "60"]);
        let ctx = m.precision();
        for v in ["0", "10", "30"] {
            let v = ctx.parse(v).unwrap();
            let i = LambertWInverter.current_from_voltage(&m, &v).unwrap();
            assert!(m.is_precise_enough(&v, &i, &c.atol));
        }
        let v_oc = LambertWInverter
            .voltage_from_current(&m, &ctx.zero())
            .unwrap();
        assert!(m.is_precise_enough(&v_oc, &ctx.zero(), &c.atol));
    }

    #[test]
    fn zero_saturation_current_is_linear() {
        let (m, _) = model(["2", "0", "1", "4", "1", "1"]);
        let ctx = m.precision();
        let i = LambertWInverter
            .current_from_voltage(&m, &ctx.parse("4").unwrap())
            .unwrap();
        assert_eq!(i, ctx.parse("0.8").unwrap());
        let v_oc = LambertWInverter
            .voltage_from_current(&m, &ctx.zero())
            .unwrap();
        assert_eq!(v_oc, ctx.parse("8").unwrap());
    }
}
