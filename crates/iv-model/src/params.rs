//! Single-diode parameter set.

use crate::error::{ModelError, ModelResult};
use iv_core::{Precision, Real};

/// Parameter names in canonical column order.
pub const PARAMETER_NAMES: [&str; 6] = [
    "photocurrent",
    "saturation_current",
    "resistance_series",
    "resistance_shunt",
    "n",
    "cells_in_series",
];

/// Validated parameters of the single-diode equation.
///
/// Construction checks the physical ranges; the value is immutable after
/// that.
#[derive(Clone, Debug, PartialEq)]
pub struct DiodeParameters {
    pub(crate) photocurrent: Real,
    pub(crate) saturation_current: Real,
    pub(crate) resistance_series: Real,
    pub(crate) resistance_shunt: Real,
    pub(crate) n: Real,
    pub(crate) cells_in_series: Real,
}

fn invalid(name: &'static str, value: &Real, reason: &'static str) -> ModelError {
    ModelError::InvalidParameter {
        name,
        value: value.to_string(),
        reason,
    }
}

impl DiodeParameters {
    /// Create a parameter set.
    ///
    /// - `photocurrent` I_L ≥ 0 (A)
    /// - `saturation_current` I_0 ≥ 0 (A)
    /// - `resistance_series` R_s ≥ 0 (Ω)
    /// - `resistance_shunt` R_sh > 0 (Ω)
    /// - `n` ideality factor > 0
    /// - `cells_in_series` N_s ≥ 1
    pub fn new(
        photocurrent: Real,
        saturation_current: Real,
        resistance_series: Real,
        resistance_shunt: Real,
        n: Real,
        cells_in_series: Real,
    ) -> ModelResult<Self> {
        if photocurrent < Real::ZERO {
            return Err(invalid("photocurrent", &photocurrent, "must be >= 0"));
        }
        if saturation_current < Real::ZERO {
            return Err(invalid(
                "saturation_current",
                &saturation_current,
                "must be >= 0",
            ));
        }
        if resistance_series < Real::ZERO {
            return Err(invalid(
                "resistance_series",
                &resistance_series,
                "must be >= 0",
            ));
        }
        if resistance_shunt <= Real::ZERO {
            return Err(invalid("resistance_shunt", &resistance_shunt, "must be > 0"));
        }
        if n <= Real::ZERO {
            return Err(invalid("n", &n, "must be > 0"));
        }
        if cells_in_series < Real::ONE {
            return Err(invalid("cells_in_series", &cells_in_series, "must be >= 1"));
        }
        Ok(Self {
            photocurrent,
            saturation_current,
            resistance_series,
            resistance_shunt,
            n,
            cells_in_series,
        })
    }

    /// Parse the six values, in [`PARAMETER_NAMES`] order, in `precision`.
    pub fn parse(precision: Precision, values: [&str; 6]) -> ModelResult<Self> {
        let [il, io, rs, rsh, n, ns] = values;
        Self::new(
            precision.parse(il)?,
            precision.parse(io)?,
            precision.parse(rs)?,
            precision.parse(rsh)?,
            precision.parse(n)?,
            precision.parse(ns)?,
        )
    }

    /// I_L (A)
    pub fn photocurrent(&self) -> &Real {
        &self.photocurrent
    }

    /// I_0 (A)
    pub fn saturation_current(&self) -> &Real {
        &self.saturation_current
    }

    /// R_s (Ω)
    pub fn resistance_series(&self) -> &Real {
        &self.resistance_series
    }

    /// R_sh (Ω)
    pub fn resistance_shunt(&self) -> &Real {
        &self.resistance_shunt
    }

    pub fn n(&self) -> &Real {
        &self.n
    }

    pub fn cells_in_series(&self) -> &Real {
        &self.cells_in_series
    }
}
