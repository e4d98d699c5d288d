//! Shared application service layer for ivprecise.
//!
//! Wires the test-set source, the refinement engine and the result store
//! together for the CLI: configuration, per-case assembly, progress
//! reporting and the generate/export services.

pub mod assemble;
pub mod config;
pub mod error;
pub mod progress;
pub mod run_service;

pub use assemble::{CaseResult, CurveAssembler, curve_name};
pub use config::RunConfig;
pub use error::{AppError, AppResult};
pub use progress::{CaseProgress, RunProgressEvent, RunStage};
pub use run_service::{
    GenerateRequest, GenerateResponse, TestSetOutput, curve_csv, generate,
    generate_with_progress, list_test_sets, refine_case,
};
