//! Diode parameters bound to a thermal voltage and an arithmetic context.

use crate::error::ModelResult;
use crate::params::DiodeParameters;
use iv_core::{Constants, Precision, Real, abs};

/// Double-precision copy of the model inputs, for limited-precision solvers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiodeInputsF64 {
    pub photocurrent: f64,
    pub saturation_current: f64,
    pub resistance_series: f64,
    pub resistance_shunt: f64,
    /// n·N_s·V_th
    pub n_ns_vth: f64,
}

/// The single-diode equation for one parameter set.
///
/// Every quantity is held in the model's precision, so the residual is never
/// evaluated in a coarser arithmetic than the values it judges.
#[derive(Clone, Debug)]
pub struct DiodeModel {
    params: DiodeParameters,
    precision: Precision,
    vth: Real,
    n_ns_vth: Real,
    shunt_conductance: Real,
}

impl DiodeModel {
    pub fn new(params: &DiodeParameters, constants: &Constants) -> Self {
        let precision = constants.precision();
        let lift = |x: &Real| precision.lift(x.clone());
        let params = DiodeParameters {
            photocurrent: lift(params.photocurrent()),
            saturation_current: lift(params.saturation_current()),
            resistance_series: lift(params.resistance_series()),
            resistance_shunt: lift(params.resistance_shunt()),
            n: lift(params.n()),
            cells_in_series: lift(params.cells_in_series()),
        };
        let vth = lift(&constants.vth);
        let n_ns_vth = params.n() * params.cells_in_series() * &vth;
        let shunt_conductance = precision.one() / params.resistance_shunt();
        Self {
            params,
            precision,
            vth,
            n_ns_vth,
            shunt_conductance,
        }
    }

    pub fn params(&self) -> &DiodeParameters {
        &self.params
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Thermal voltage V_th (V)
    pub fn vth(&self) -> &Real {
        &self.vth
    }

    /// Modified ideality factor n·N_s·V_th (V)
    pub fn n_ns_vth(&self) -> &Real {
        &self.n_ns_vth
    }

    /// 1/R_sh (S)
    pub fn shunt_conductance(&self) -> &Real {
        &self.shunt_conductance
    }

    /// Signed deviation of (V, I) from the single-diode equation:
    ///
    /// `I_L − I_0·[exp((V + I·R_s)/(n·N_s·V_th)) − 1] − (V + I·R_s)/R_sh − I`
    pub fn residual(&self, voltage: &Real, current: &Real) -> Real {
        let p = &self.params;
        let v_diode = voltage + current * p.resistance_series();
        let exponent = &v_diode / &self.n_ns_vth;
        let diode = p.saturation_current() * (exponent.exp() - self.precision.one());
        let shunt = &v_diode / p.resistance_shunt();
        p.photocurrent() - diode - shunt - current
    }

    /// The acceptance criterion: `|residual(V, I)| < atol`.
    pub fn is_precise_enough(&self, voltage: &Real, current: &Real, atol: &Real) -> bool {
        abs(&self.residual(voltage, current)) < *atol
    }

    /// Downgrade the inputs for a double-precision solver.
    pub fn inputs_f64(&self) -> ModelResult<DiodeInputsF64> {
        let p = &self.params;
        let ctx = self.precision;
        Ok(DiodeInputsF64 {
            photocurrent: ctx.to_f64(p.photocurrent())?,
            saturation_current: ctx.to_f64(p.saturation_current())?,
            resistance_series: ctx.to_f64(p.resistance_series())?,
            resistance_shunt: ctx.to_f64(p.resistance_shunt())?,
            n_ns_vth: ctx.to_f64(&self.n_ns_vth)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn model() -> DiodeModel {
        let ctx = Precision::default();
        let constants = Constants::standard(ctx).unwrap();
        let params = DiodeParameters::parse(ctx, ["6", "1e-9", "0.1", "1000", "1", "60"]).unwrap();
        DiodeModel::new(&params, &constants)
    }

    #[test]
    fn residual_at_short_circuit_origin() {
        // V = 0, I = 0: only the photocurrent remains.
        let m = model();
        let zero = m.precision().zero();
        assert_eq!(m.residual(&zero, &zero), m.precision().parse("6").unwrap());
    }

    #[test]
    fn residual_is_exact_for_constructed_point() {
        // With I_0 = 0 the equation is linear: I = (I_L - V/R_sh) / (1 + R_s/R_sh).
        let ctx = Precision::default();
        let constants = Constants::standard(ctx).unwrap();
        let params = DiodeParameters::parse(ctx, ["2", "0", "1", "4", "1", "1"]).unwrap();
        let m = DiodeModel::new(&params, &constants);
        // V = 4 → I = (2 - 1) / 1.25 = 0.8
        let v = ctx.parse("4").unwrap();
        let i = ctx.parse("0.8").unwrap();
        assert_eq!(m.residual(&v, &i), Real::ZERO);
        assert!(m.is_precise_enough(&v, &i, &constants.atol));
    }

    #[test]
    fn inputs_downgrade() {
        let m = model();
        let f = m.inputs_f64().unwrap();
        assert_eq!(f.photocurrent, 6.0);
        assert_eq!(f.resistance_shunt, 1000.0);
        assert!((f.n_ns_vth - 60.0 * 0.025692579185).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn residual_decreases_with_current(i in 0.0_f64..6.0, dv in 0.0_f64..30.0) {
            // ∂residual/∂I < 0 everywhere, so a larger current at the same
            // voltage always gives a smaller residual.
            let m = model();
            let ctx = m.precision();
            let v = ctx.from_f64(dv).unwrap();
            let lo = ctx.from_f64(i).unwrap();
            let hi = &lo + ctx.parse("0.001").unwrap();
            prop_assert!(m.residual(&v, &hi) < m.residual(&v, &lo));
        }
    }
}
