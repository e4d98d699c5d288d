//! Per-case and per-test-set assembly of refined curves.

use std::time::Instant;

use iv_core::{Constants, Real};
use iv_model::{
    ApproximateCurveGenerator, BisectionMppFinder, ClosedFormInverter, DiodeModel,
    LambertCurveGenerator, LambertWInverter, MaxPowerPoint, MaxPowerPointFinder,
};
use iv_refine::{Curve, RefineError, refine};
use iv_results::{CanonicalFormatter, CurveRecord, TestSetResult, format_significant};
use iv_source::{TestCase, TestSet};

use crate::error::{AppError, AppResult};
use crate::progress::{CaseProgress, RunProgressEvent, RunStage};

/// Significant digits of the persisted cell temperature.
const TEMPERATURE_DIGITS: usize = 5;

/// Name of one curve in logs and exports.
pub fn curve_name(test_set: &str, index: u32) -> String {
    format!("{test_set}_case_{index}")
}

/// Everything computed for one test case, before formatting.
#[derive(Clone, Debug)]
pub struct CaseResult {
    pub index: u32,
    pub curve: Curve,
    /// Points whose current the refiner had to recompute
    pub recomputed: usize,
    pub v_oc: Real,
    pub i_sc: Real,
    pub mpp: MaxPowerPoint,
}

/// Drives generator → refiner → max-power-point finder for each case.
pub struct CurveAssembler<G = LambertCurveGenerator, I = LambertWInverter, M = BisectionMppFinder> {
    constants: Constants,
    generator: G,
    inverter: I,
    mpp_finder: M,
}

impl CurveAssembler {
    /// Assembler with the Lambert-W collaborators.
    pub fn new(constants: Constants) -> Self {
        Self::with_collaborators(
            constants,
            LambertCurveGenerator,
            LambertWInverter,
            BisectionMppFinder::new(LambertWInverter),
        )
    }
}

impl<G, I, M> CurveAssembler<G, I, M>
where
    G: ApproximateCurveGenerator,
    I: ClosedFormInverter,
    M: MaxPowerPointFinder,
{
    pub fn with_collaborators(constants: Constants, generator: G, inverter: I, mpp_finder: M) -> Self {
        Self {
            constants,
            generator,
            inverter,
            mpp_finder,
        }
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    pub fn assemble_case(&self, case: &TestCase) -> AppResult<CaseResult> {
        let constants = &self.constants;
        let model = DiodeModel::new(&case.params, constants);

        let approx = self.generator.generate(&model, constants.num_pts)?;
        if approx.voltages.len() != constants.num_pts || approx.currents.len() != constants.num_pts {
            return Err(RefineError::InvalidCurve {
                what: format!(
                    "generator returned {} voltages and {} currents, expected {} points",
                    approx.voltages.len(),
                    approx.currents.len(),
                    constants.num_pts
                ),
            }
            .into());
        }
        let seed = Curve::from_f64(model.precision(), &approx.voltages, &approx.currents)?;
        let refinement = refine(seed, &model, &self.inverter, &constants.atol)?;

        let curve = refinement.curve;
        let v_oc = curve.max_voltage().clone();
        let i_sc = curve.max_current().clone();
        let mpp = self.mpp_finder.max_power_point(&model, &constants.atol)?;

        Ok(CaseResult {
            index: case.index,
            curve,
            recomputed: refinement.recomputed.len(),
            v_oc,
            i_sc,
            mpp,
        })
    }

    /// Canonical record of one assembled case.
    pub fn record(&self, result: &CaseResult) -> CurveRecord {
        let fmt = CanonicalFormatter::new(self.constants.output_digits);
        CurveRecord {
            index: result.index,
            voltages: result.curve.voltages().map(|v| fmt.format(v)).collect(),
            currents: result.curve.currents().map(|i| fmt.format(i)).collect(),
            v_oc: fmt.format(&result.v_oc),
            i_sc: fmt.format(&result.i_sc),
            v_mp: fmt.format(&result.mpp.voltage),
            i_mp: fmt.format(&result.mpp.current),
            p_mp: fmt.format(&result.mpp.power),
            temperature: format_significant(&self.constants.temp_cell, TEMPERATURE_DIGITS),
            irradiance: None,
            sweep_direction: None,
            datetime: None,
        }
    }

    /// Assemble every case of `test_set` in order. The first failing case
    /// ends the test set; the error names the curve.
    pub fn assemble_test_set(
        &self,
        test_set: &TestSet,
        progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    ) -> AppResult<TestSetResult> {
        let started = Instant::now();
        let total = test_set.len();
        let mut result = TestSetResult::new();

        for (position, case) in test_set.cases().iter().enumerate() {
            let name = curve_name(test_set.name(), case.index);
            if let Some(cb) = progress_cb.as_deref_mut() {
                cb(RunProgressEvent {
                    stage: RunStage::RefiningCase,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                    message: Some(format!("Refining {name}")),
                    case: Some(CaseProgress {
                        test_set: test_set.name().to_string(),
                        index: case.index,
                        position: position + 1,
                        total,
                    }),
                });
            }

            let case_result = self.assemble_case(case).map_err(|e| AppError::CaseFailed {
                curve: name.clone(),
                message: e.to_string(),
            })?;
            tracing::info!(
                curve = %name,
                recomputed = case_result.recomputed,
                p_mp = %case_result.mpp.power,
                "case refined"
            );
            result.push(self.record(&case_result));
        }

        Ok(result)
    }
}
