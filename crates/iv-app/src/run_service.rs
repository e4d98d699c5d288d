//! Generate and export services.

use std::path::{Path, PathBuf};
use std::time::Instant;

use iv_refine::Curve;
use iv_results::{CanonicalFormatter, ResultStore, TestSetResult};
use iv_source::TestSetDirectory;

use crate::assemble::{CaseResult, CurveAssembler, curve_name};
use crate::config::RunConfig;
use crate::error::{AppError, AppResult};
use crate::progress::{RunProgressEvent, RunStage};

/// Request to generate reference curves.
pub struct GenerateRequest<'a> {
    pub test_sets_dir: &'a Path,
    /// Test sets to generate; empty means every set in the directory
    pub test_sets: Vec<String>,
    /// Case indices to keep in every test set; empty means all cases
    pub cases: Vec<u32>,
    /// Directory receiving `{test_set}.json`, if the results are to be kept
    pub save_json: Option<&'a Path>,
    pub config: RunConfig,
}

/// Output for one test set.
#[derive(Debug, Clone)]
pub struct TestSetOutput {
    pub name: String,
    pub result: TestSetResult,
    pub saved_to: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub outputs: Vec<TestSetOutput>,
    pub total_time_s: f64,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            message,
        ));
    }
}

/// Test-set names available in `dir`.
pub fn list_test_sets(dir: &Path) -> AppResult<Vec<String>> {
    Ok(TestSetDirectory::new(dir).list()?)
}

/// Generate reference curves for the requested test sets.
pub fn generate(request: &GenerateRequest) -> AppResult<GenerateResponse> {
    generate_with_progress(request, None)
}

/// Generate reference curves and stream progress events.
///
/// Test sets are processed in order. A failure stops the whole invocation;
/// results already saved for earlier test sets stay on disk.
pub fn generate_with_progress(
    request: &GenerateRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<GenerateResponse> {
    let started = Instant::now();
    let constants = request.config.to_constants()?;
    let precision = constants.precision();

    emit_progress(
        &mut progress_cb,
        RunStage::LoadingTestSets,
        started,
        Some("Loading test sets".to_string()),
    );
    let source = TestSetDirectory::new(request.test_sets_dir);
    let mut test_sets = if request.test_sets.is_empty() {
        source.load_all(precision)?
    } else {
        source.load_many(&request.test_sets, precision)?
    };
    if !request.cases.is_empty() {
        test_sets = test_sets
            .iter()
            .map(|set| set.select(&request.cases))
            .collect::<Result<_, _>>()?;
    }

    let store = request
        .save_json
        .map(|dir| ResultStore::new(dir.to_path_buf()))
        .transpose()?;

    let assembler = CurveAssembler::new(constants);
    let mut outputs = Vec::with_capacity(test_sets.len());
    for test_set in &test_sets {
        let result = assembler.assemble_test_set(test_set, &mut progress_cb)?;

        let saved_to = match &store {
            Some(store) => {
                emit_progress(
                    &mut progress_cb,
                    RunStage::SavingResults,
                    started,
                    Some(format!("Saving {}", test_set.name())),
                );
                let path = store.save(test_set.name(), &result)?;
                tracing::info!(test_set = test_set.name(), path = %path.display(), "test set written");
                Some(path)
            }
            None => None,
        };

        outputs.push(TestSetOutput {
            name: test_set.name().to_string(),
            result,
            saved_to,
        });
    }

    emit_progress(&mut progress_cb, RunStage::Completed, started, None);
    Ok(GenerateResponse {
        outputs,
        total_time_s: started.elapsed().as_secs_f64(),
    })
}

/// Refine a single case of one test set.
pub fn refine_case(
    test_sets_dir: &Path,
    test_set: &str,
    index: u32,
    config: &RunConfig,
) -> AppResult<CaseResult> {
    let constants = config.to_constants()?;
    let selected = TestSetDirectory::new(test_sets_dir)
        .load(test_set, constants.precision())?
        .select(&[index])?;
    let case = selected.cases().first().ok_or_else(|| {
        AppError::InvalidInput(format!("{} does not exist", curve_name(test_set, index)))
    })?;
    CurveAssembler::new(constants).assemble_case(case)
}

/// `voltage,current` CSV of a refined curve, one row per point.
pub fn curve_csv(curve: &Curve, formatter: &CanonicalFormatter) -> String {
    let mut csv = String::from("voltage,current\n");
    for point in curve.points() {
        csv.push_str(&format!(
            "{},{}\n",
            formatter.format(&point.voltage),
            formatter.format(&point.current)
        ));
    }
    csv
}
