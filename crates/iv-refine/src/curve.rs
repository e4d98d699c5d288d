//! Discretized I-V curve in arbitrary precision.

use crate::error::{RefineError, RefineResult};
use iv_core::{Precision, Real};

/// One (V, I) sample.
#[derive(Clone, Debug, PartialEq)]
pub struct CurvePoint {
    pub voltage: Real,
    pub current: Real,
}

/// Ordered sequence of at least two points, by increasing voltage.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    points: Vec<CurvePoint>,
}

impl Curve {
    pub fn new(points: Vec<CurvePoint>) -> RefineResult<Self> {
        if points.len() < 2 {
            return Err(RefineError::InvalidCurve {
                what: format!("curve needs at least 2 points, got {}", points.len()),
            });
        }
        Ok(Self { points })
    }

    /// Upgrade a double-precision curve into `precision`.
    pub fn from_f64(precision: Precision, voltages: &[f64], currents: &[f64]) -> RefineResult<Self> {
        if voltages.len() != currents.len() {
            return Err(RefineError::InvalidCurve {
                what: format!(
                    "{} voltages but {} currents",
                    voltages.len(),
                    currents.len()
                ),
            });
        }
        let points = voltages
            .iter()
            .zip(currents)
            .map(|(&v, &i)| -> RefineResult<CurvePoint> {
                Ok(CurvePoint {
                    voltage: precision.from_f64(v)?,
                    current: precision.from_f64(i)?,
                })
            })
            .collect::<RefineResult<Vec<_>>>()?;
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [CurvePoint] {
        &mut self.points
    }

    pub fn voltages(&self) -> impl Iterator<Item = &Real> {
        self.points.iter().map(|p| &p.voltage)
    }

    pub fn currents(&self) -> impl Iterator<Item = &Real> {
        self.points.iter().map(|p| &p.current)
    }

    /// Short-circuit end (V = 0).
    pub fn first(&self) -> &CurvePoint {
        &self.points[0]
    }

    /// Open-circuit end (I = 0).
    pub fn last(&self) -> &CurvePoint {
        &self.points[self.points.len() - 1]
    }

    /// Largest voltage on the curve.
    pub fn max_voltage(&self) -> &Real {
        self.voltages()
            .fold(&self.first().voltage, |acc, v| iv_core::max(acc, v))
    }

    /// Largest current on the curve.
    pub fn max_current(&self) -> &Real {
        self.currents()
            .fold(&self.first().current, |acc, i| iv_core::max(acc, i))
    }
}
