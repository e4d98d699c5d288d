//! Double-precision seed curves.

use crate::error::{ModelError, ModelResult};
use crate::lambert::lambert_w0_from_ln_f64;
use crate::model::{DiodeInputsF64, DiodeModel};
use iv_core::IvError;

/// Limited-precision I-V curve, ordered by increasing voltage, with the
/// first voltage exactly zero.
#[derive(Clone, Debug, PartialEq)]
pub struct ApproxCurve {
    pub voltages: Vec<f64>,
    pub currents: Vec<f64>,
}

/// Produces the approximate curve the refinement engine starts from.
pub trait ApproximateCurveGenerator {
    fn generate(&self, model: &DiodeModel, num_pts: usize) -> ModelResult<ApproxCurve>;
}

/// Lambert-W solution in f64: V_oc from I = 0, then `num_pts` voltages
/// spaced linearly on [0, V_oc] and their currents.
#[derive(Clone, Copy, Debug, Default)]
pub struct LambertCurveGenerator;

fn ensure_finite(value: f64, what: &'static str) -> ModelResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IvError::NonFinite { what, value }.into())
    }
}

fn current_from_voltage(p: &DiodeInputsF64, voltage: f64) -> ModelResult<f64> {
    let gsh = 1.0 / p.resistance_shunt;
    let (il, io, rs, a) = (
        p.photocurrent,
        p.saturation_current,
        p.resistance_series,
        p.n_ns_vth,
    );
    if io == 0.0 {
        return Ok((il - voltage * gsh) / (1.0 + rs * gsh));
    }
    if rs == 0.0 {
        return Ok(il - io * (voltage / a).exp_m1() - gsh * voltage);
    }
    let denom = 1.0 + rs * gsh;
    let ln_theta = (rs * io / (a * denom)).ln() + (rs * (il + io) + voltage) / (a * denom);
    let w = lambert_w0_from_ln_f64(ln_theta)?;
    Ok((il + io - voltage * gsh) / denom - (a / rs) * w)
}

fn voltage_from_current(p: &DiodeInputsF64, current: f64) -> ModelResult<f64> {
    let (il, io, rs, rsh, a) = (
        p.photocurrent,
        p.saturation_current,
        p.resistance_series,
        p.resistance_shunt,
        p.n_ns_vth,
    );
    if io == 0.0 {
        return Ok((il - current) * rsh - current * rs);
    }
    let drive = il + io - current;
    let ln_psi = (io * rsh / a).ln() + drive * rsh / a;
    let w = lambert_w0_from_ln_f64(ln_psi)?;
    Ok(drive * rsh - current * rs - a * w)
}

impl ApproximateCurveGenerator for LambertCurveGenerator {
    fn generate(&self, model: &DiodeModel, num_pts: usize) -> ModelResult<ApproxCurve> {
        if num_pts < 2 {
            return Err(ModelError::InvalidArg {
                what: format!("curve needs at least 2 points, got {num_pts}"),
            });
        }
        let inputs = model.inputs_f64()?;
        let v_oc = ensure_finite(voltage_from_current(&inputs, 0.0)?, "open-circuit voltage")?;

        let last = (num_pts - 1) as f64;
        let voltages: Vec<f64> = (0..num_pts).map(|k| v_oc * (k as f64 / last)).collect();
        let currents = voltages
            .iter()
            .map(|&v| -> ModelResult<f64> {
                ensure_finite(current_from_voltage(&inputs, v)?, "approximate current")
            })
            .collect::<ModelResult<Vec<f64>>>()?;

        Ok(ApproxCurve { voltages, currents })
    }
}
