//! The refinement pass.

use crate::curve::Curve;
use crate::error::{RefineError, RefineResult};
use iv_core::Real;
use iv_model::{ClosedFormInverter, DiodeModel};

/// A refined curve and the indices whose currents were recomputed.
#[derive(Clone, Debug)]
pub struct Refinement {
    pub curve: Curve,
    pub recomputed: Vec<usize>,
}

/// Bring every point of `curve` within `atol` of the single-diode equation.
///
/// Points that already satisfy the residual predicate keep their current.
/// Any other point gets the closed-form current at its voltage, which must
/// then pass the predicate. Voltages are never moved except at the last
/// point, which is pinned to (V_oc, 0).
pub fn refine<I: ClosedFormInverter + ?Sized>(
    mut curve: Curve,
    model: &DiodeModel,
    inverter: &I,
    atol: &Real,
) -> RefineResult<Refinement> {
    let ctx = model.precision();
    let mut recomputed = Vec::new();

    for (index, point) in curve.points_mut().iter_mut().enumerate() {
        if model.is_precise_enough(&point.voltage, &point.current, atol) {
            continue;
        }
        let current = inverter.current_from_voltage(model, &point.voltage)?;
        let residual = model.residual(&point.voltage, &current);
        if !model.is_precise_enough(&point.voltage, &current, atol) {
            return Err(RefineError::PrecisionFailure {
                index,
                voltage: point.voltage.to_string(),
                current: current.to_string(),
                residual: residual.to_string(),
                atol: atol.to_string(),
            });
        }
        tracing::debug!(index, voltage = %point.voltage, "current recomputed");
        point.current = current;
        recomputed.push(index);
    }

    let v_oc = inverter.voltage_from_current(model, &ctx.zero())?;
    if let Some(last) = curve.points_mut().last_mut() {
        last.voltage = v_oc;
        last.current = ctx.zero();
    }

    if curve.first().voltage != Real::ZERO {
        return Err(RefineError::BoundaryViolation {
            what: "first voltage",
            value: curve.first().voltage.to_string(),
        });
    }
    if curve.last().current != Real::ZERO {
        return Err(RefineError::BoundaryViolation {
            what: "last current",
            value: curve.last().current.to_string(),
        });
    }

    tracing::info!(
        points = curve.len(),
        recomputed = recomputed.len(),
        "curve refined"
    );
    Ok(Refinement { curve, recomputed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use iv_core::{Constants, Precision};
    use iv_model::{DiodeParameters, LambertWInverter, ModelResult};

    fn model() -> (DiodeModel, Constants) {
        let ctx = Precision::default();
        let constants = Constants::standard(ctx).unwrap();
        let params = DiodeParameters::parse(ctx, ["6", "1e-9", "0.1", "1000", "1", "60"]).unwrap();
        (DiodeModel::new(&params, &constants), constants)
    }

    /// Returns a fixed current regardless of the model.
    struct Constant(Real);

    impl ClosedFormInverter for Constant {
        fn current_from_voltage(&self, _: &DiodeModel, _: &Real) -> ModelResult<Real> {
            Ok(self.0.clone())
        }

        fn voltage_from_current(&self, _: &DiodeModel, _: &Real) -> ModelResult<Real> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn bad_inverter_is_a_precision_failure() {
        let (m, c) = model();
        let ctx = m.precision();
        let curve = Curve::from_f64(ctx, &[0.0, 10.0, 20.0], &[0.0, 0.0, 0.0]).unwrap();
        let err = refine(curve, &m, &Constant(ctx.zero()), &c.atol).unwrap_err();
        match err {
            RefineError::PrecisionFailure { index, .. } => assert_eq!(index, 0),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nonzero_first_voltage_is_a_boundary_violation() {
        let (m, c) = model();
        let ctx = m.precision();
        let curve = Curve::from_f64(ctx, &[1.0, 20.0, 34.0], &[6.0, 5.0, 0.0]).unwrap();
        let err = refine(curve, &m, &LambertWInverter, &c.atol).unwrap_err();
        assert!(matches!(
            err,
            RefineError::BoundaryViolation {
                what: "first voltage",
                ..
            }
        ));
    }

    #[test]
    fn interior_voltages_are_kept() {
        let (m, c) = model();
        let ctx = m.precision();
        let voltages = [0.0, 12.5, 25.0, 34.0];
        let curve = Curve::from_f64(ctx, &voltages, &[6.0, 6.0, 6.0, 6.0]).unwrap();
        let refined = refine(curve, &m, &LambertWInverter, &c.atol).unwrap();
        for (k, v) in voltages[..3].iter().enumerate() {
            assert_eq!(refined.curve.points()[k].voltage, ctx.from_f64(*v).unwrap());
        }
        assert_eq!(refined.recomputed, vec![0, 1, 2, 3]);
    }
}
