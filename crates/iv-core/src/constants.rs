//! Physical and algorithm constants shared by every computation.

use crate::precision::{Precision, Real};
use crate::{IvError, IvResult};

pub const BOLTZMANN_J_PER_K: &str = "1.380649e-23";
pub const ELECTRON_CHARGE_C: &str = "1.60217663e-19";
pub const CELL_TEMPERATURE_K: &str = "298.15";
pub const DEFAULT_ATOL: &str = "1e-16";
pub const DEFAULT_NUM_PTS: usize = 100;
pub const DEFAULT_OUTPUT_DIGITS: usize = 16;

/// Immutable configuration record.
///
/// Built once by the top-level computation and passed down by reference.
/// The `with_*` methods return a new record; nothing mutates in place.
#[derive(Clone, Debug)]
pub struct Constants {
    precision: Precision,
    /// Boltzmann constant (J/K)
    pub k: Real,
    /// Electron charge (C)
    pub q: Real,
    /// Cell temperature (K)
    pub temp_cell: Real,
    /// Thermal voltage k·T/q (V)
    pub vth: Real,
    /// Acceptable residual magnitude
    pub atol: Real,
    /// Points per I-V curve
    pub num_pts: usize,
    /// Digits after the decimal point in persisted numbers
    pub output_digits: usize,
}

impl Constants {
    pub fn standard(precision: Precision) -> IvResult<Self> {
        let k = precision.parse(BOLTZMANN_J_PER_K)?;
        let q = precision.parse(ELECTRON_CHARGE_C)?;
        let temp_cell = precision.parse(CELL_TEMPERATURE_K)?;
        let vth = &k * &temp_cell / &q;
        Ok(Self {
            precision,
            k,
            q,
            temp_cell,
            vth,
            atol: precision.parse(DEFAULT_ATOL)?,
            num_pts: DEFAULT_NUM_PTS,
            output_digits: DEFAULT_OUTPUT_DIGITS,
        })
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn with_atol(&self, atol: Real) -> IvResult<Self> {
        if atol <= Real::ZERO {
            return Err(IvError::InvalidArg {
                what: "atol must be positive",
            });
        }
        Ok(Self {
            atol: self.precision.lift(atol),
            ..self.clone()
        })
    }

    pub fn with_num_pts(&self, num_pts: usize) -> IvResult<Self> {
        if num_pts < 2 {
            return Err(IvError::InvalidArg {
                what: "num_pts must be at least 2",
            });
        }
        Ok(Self {
            num_pts,
            ..self.clone()
        })
    }

    /// Change the cell temperature; the thermal voltage follows.
    pub fn with_temperature(&self, temp_cell: Real) -> IvResult<Self> {
        if temp_cell <= Real::ZERO {
            return Err(IvError::InvalidArg {
                what: "cell temperature must be positive",
            });
        }
        let temp_cell = self.precision.lift(temp_cell);
        let vth = &self.k * &temp_cell / &self.q;
        Ok(Self {
            temp_cell,
            vth,
            ..self.clone()
        })
    }

    pub fn with_output_digits(&self, output_digits: usize) -> IvResult<Self> {
        if output_digits == 0 {
            return Err(IvError::InvalidArg {
                what: "output digits must be positive",
            });
        }
        Ok(Self {
            output_digits,
            ..self.clone()
        })
    }
}
