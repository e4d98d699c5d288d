//! Single-diode photovoltaic model.
//!
//! This crate holds the diode parameters, the residual of the single-diode
//! equation, and the collaborators the refinement engine consumes through
//! traits:
//! - `ApproximateCurveGenerator`: double-precision seed curve
//! - `ClosedFormInverter`: exact Lambert-W solves for I(V) and V(I)
//! - `MaxPowerPointFinder`: max-power point to a residual tolerance
//!
//! Default implementations of each are provided.

pub mod approx;
pub mod error;
pub mod inverter;
pub mod lambert;
pub mod model;
pub mod mpp;
pub mod params;

pub use approx::{ApproxCurve, ApproximateCurveGenerator, LambertCurveGenerator};
pub use error::{ModelError, ModelResult};
pub use inverter::{ClosedFormInverter, LambertWInverter};
pub use lambert::lambert_w0_from_ln;
pub use model::DiodeModel;
pub use mpp::{BisectionMppFinder, MaxPowerPoint, MaxPowerPointFinder};
pub use params::{DiodeParameters, PARAMETER_NAMES};
