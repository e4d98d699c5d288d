#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStage {
    LoadingTestSets,
    RefiningCase,
    SavingResults,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseProgress {
    pub test_set: String,
    pub index: u32,
    /// 1-based position within the test set
    pub position: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub case: Option<CaseProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            case: None,
        }
    }
}
