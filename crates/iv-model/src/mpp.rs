//! Maximum power point of the I-V curve.

use crate::error::{ModelError, ModelResult};
use crate::inverter::{ClosedFormInverter, LambertWInverter};
use crate::model::DiodeModel;
use iv_core::{Real, abs};

/// The (V, I) pair maximizing V·I, and that product.
#[derive(Clone, Debug, PartialEq)]
pub struct MaxPowerPoint {
    pub voltage: Real,
    pub current: Real,
    pub power: Real,
}

/// Finds the max-power point so that (V_mp, I_mp) satisfies the residual
/// predicate at `atol`.
pub trait MaxPowerPointFinder {
    fn max_power_point(&self, model: &DiodeModel, atol: &Real) -> ModelResult<MaxPowerPoint>;
}

/// Bisection on the sign of dP/dV over [0, V_oc].
///
/// dP/dV = I + V·dI/dV with dI/dV = −D/(1 + R_s·D), where
/// D = (I_0/a)·exp((V + I·R_s)/a) + 1/R_sh. P is unimodal on [0, V_oc], so
/// the slope changes sign exactly once.
#[derive(Clone, Copy, Debug)]
pub struct BisectionMppFinder<I = LambertWInverter> {
    inverter: I,
    max_iterations: usize,
}

impl Default for BisectionMppFinder {
    fn default() -> Self {
        Self::new(LambertWInverter)
    }
}

impl<I: ClosedFormInverter> BisectionMppFinder<I> {
    pub fn new(inverter: I) -> Self {
        Self {
            inverter,
            max_iterations: 512,
        }
    }

    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    fn power_slope(&self, model: &DiodeModel, voltage: &Real, current: &Real) -> Real {
        let p = model.params();
        let a = model.n_ns_vth();
        let exponent = (voltage + current * p.resistance_series()) / a;
        let d = p.saturation_current() / a * exponent.exp() + model.shunt_conductance();
        let di_dv = -(&d / (model.precision().one() + p.resistance_series() * &d));
        current + voltage * di_dv
    }
}

impl<I: ClosedFormInverter> MaxPowerPointFinder for BisectionMppFinder<I> {
    fn max_power_point(&self, model: &DiodeModel, atol: &Real) -> ModelResult<MaxPowerPoint> {
        let ctx = model.precision();
        let two = ctx.from_int(2);

        let mut lo = ctx.zero();
        let mut hi = self.inverter.voltage_from_current(model, &ctx.zero())?;
        let mut iterations = 0;
        while &hi - &lo >= *atol && iterations < self.max_iterations {
            let mid = (&lo + &hi) / &two;
            let current = self.inverter.current_from_voltage(model, &mid)?;
            if self.power_slope(model, &mid, &current) > Real::ZERO {
                lo = mid;
            } else {
                hi = mid;
            }
            iterations += 1;
        }
        tracing::debug!(iterations, "max power point bracket closed");

        let voltage = (&lo + &hi) / &two;
        let current = self.inverter.current_from_voltage(model, &voltage)?;
        let residual = model.residual(&voltage, &current);
        if abs(&residual) >= *atol {
            return Err(ModelError::PrecisionFailure {
                what: format!("max power point (V = {voltage}, I = {current})"),
                residual: residual.to_string(),
                atol: atol.to_string(),
            });
        }

        let power = &voltage * &current;
        Ok(MaxPowerPoint {
            voltage,
            current,
            power,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DiodeParameters;
    use iv_core::{Constants, Precision};

    fn model(values: [&str; 6]) -> (DiodeModel, Constants) {
        let ctx = Precision::default();
        let constants = Constants::standard(ctx).unwrap();
        let params = DiodeParameters::parse(ctx, values).unwrap();
        (DiodeModel::new(&params, &constants), constants)
    }

    #[test]
    fn module_max_power_point() {
        let (m, c) = model(["6", "1e-9", "0.1", "1000", "1", "60"]);
        let ctx = m.precision();
        let mpp = BisectionMppFinder::new(LambertWInverter)
            .max_power_point(&m, &c.atol)
            .unwrap();
        assert!(m.is_precise_enough(&mpp.voltage, &mpp.current, &c.atol));
        assert_eq!(mpp.power, &mpp.voltage * &mpp.current);
        let expected = ctx.parse("167.3931405299").unwrap();
        assert!(abs(&(&mpp.power - &expected)) < ctx.parse("1e-9").unwrap());
    }

    #[test]
    fn power_is_maximal_nearby() {
        let (m, c) = model(["6", "1e-9", "0.1", "1000", "1", "60"]);
        let ctx = m.precision();
        let mpp = BisectionMppFinder::new(LambertWInverter)
            .max_power_point(&m, &c.atol)
            .unwrap();
        let step = ctx.parse("0.01").unwrap();
        for v in [&mpp.voltage - &step, &mpp.voltage + &step] {
            let i = LambertWInverter.current_from_voltage(&m, &v).unwrap();
            assert!(&v * &i < mpp.power);
        }
    }

    #[test]
    fn no_photocurrent_means_no_power() {
        let (m, c) = model(["0", "1e-9", "0.1", "1000", "1", "60"]);
        let mpp = BisectionMppFinder::new(LambertWInverter)
            .max_power_point(&m, &c.atol)
            .unwrap();
        assert!(abs(&mpp.power) < c.atol);
    }

    #[test]
    fn iteration_cap_still_validates_residual() {
        let (m, c) = model(["6", "1e-9", "0.1", "1000", "1", "60"]);
        // Bracket never narrows, but the point returned is still on the curve.
        let mpp = BisectionMppFinder::new(LambertWInverter)
            .with_max_iterations(0)
            .max_power_point(&m, &c.atol)
            .unwrap();
        assert!(m.is_precise_enough(&mpp.voltage, &mpp.current, &c.atol));
    }
}
