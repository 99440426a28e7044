use chrono::{DateTime, Utc};
use common::{ProblemStatus, SubmissionStatus};
use serde::{Deserialize, Serialize};

use crate::entity::submission;
use crate::error::AppError;

use super::shared::Pagination;

/// Request body for recording a judged submission.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSubmissionRequest {
    /// Programming language (e.g., "cpp", "python").
    #[schema(example = "python")]
    pub language: String,
    #[schema(example = "class Solution:\n    def twoSum(self, nums, target): ...")]
    pub code: String,
    /// Verdict reported by the judge. `Pending` and `Running` are recorded but
    /// do not affect progress.
    pub status: SubmissionStatus,
    #[schema(example = 52)]
    pub runtime_ms: Option<i32>,
    #[schema(example = 16384)]
    pub memory_kb: Option<i32>,
    #[schema(example = 57)]
    pub test_cases_passed: Option<i32>,
    #[schema(example = 57)]
    pub total_test_cases: Option<i32>,
    pub output: Option<String>,
    pub error: Option<String>,
}

fn validate_source(language: &str, code: &str, max_code_bytes: usize) -> Result<(), AppError> {
    let language = language.trim();
    if language.is_empty() || language.chars().count() > 32 {
        return Err(AppError::Validation(
            "Language must be 1-32 characters".into(),
        ));
    }
    if code.trim().is_empty() {
        return Err(AppError::Validation("Code must not be empty".into()));
    }
    if code.len() > max_code_bytes {
        return Err(AppError::Validation(format!(
            "Code exceeds maximum size of {max_code_bytes} bytes"
        )));
    }
    Ok(())
}

pub fn validate_create_submission(
    payload: &CreateSubmissionRequest,
    max_code_bytes: usize,
) -> Result<(), AppError> {
    validate_source(&payload.language, &payload.code, max_code_bytes)?;

    for (name, value) in [
        ("runtime_ms", payload.runtime_ms),
        ("memory_kb", payload.memory_kb),
        ("test_cases_passed", payload.test_cases_passed),
        ("total_test_cases", payload.total_test_cases),
    ] {
        if value.is_some_and(|v| v < 0) {
            return Err(AppError::Validation(format!("{name} must be >= 0")));
        }
    }
    if let (Some(passed), Some(total)) = (payload.test_cases_passed, payload.total_test_cases)
        && passed > total
    {
        return Err(AppError::Validation(
            "test_cases_passed must not exceed total_test_cases".into(),
        ));
    }
    Ok(())
}

/// Request body for the run action.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RunRequest {
    #[schema(example = "python")]
    pub language: String,
    pub code: String,
}

pub fn validate_run_request(payload: &RunRequest, max_code_bytes: usize) -> Result<(), AppError> {
    validate_source(&payload.language, &payload.code, max_code_bytes)
}

/// Query parameters for submission listing.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct SubmissionListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Filter by problem slug.
    #[param(example = "two-sum")]
    pub problem_slug: Option<String>,
    /// Filter by status.
    pub status: Option<SubmissionStatus>,
}

/// Outcome of the progress update attached to a submit or run.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProgressUpdate {
    /// False when the progress write failed. The submission itself is kept.
    pub saved: bool,
    /// Status after this event; null when the write failed.
    pub status: Option<ProblemStatus>,
    /// True when this event solved the problem for the first time.
    pub newly_solved: bool,
    #[schema(example = json!(null))]
    pub error: Option<String>,
}

impl ProgressUpdate {
    pub fn failed() -> Self {
        Self {
            saved: false,
            status: None,
            newly_solved: false,
            error: Some("Failed to save progress".into()),
        }
    }
}

/// Full submission details.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "two-sum")]
    pub problem_slug: String,
    /// Null when the problem is no longer in the catalog.
    #[schema(example = "Two Sum")]
    pub problem_title: Option<String>,
    #[schema(example = "python")]
    pub language: String,
    pub code: String,
    pub status: SubmissionStatus,
    pub runtime_ms: Option<i32>,
    pub memory_kb: Option<i32>,
    pub test_cases_passed: Option<i32>,
    pub total_test_cases: Option<i32>,
    pub output: Option<String>,
    pub error: Option<String>,
    #[schema(example = "2024-06-15T14:30:00Z")]
    pub created_at: DateTime<Utc>,
}

impl SubmissionResponse {
    pub fn new(model: submission::Model, problem_title: Option<String>) -> Self {
        Self {
            id: model.id,
            problem_slug: model.problem_slug,
            problem_title,
            language: model.language,
            code: model.code,
            status: model.status,
            runtime_ms: model.runtime_ms,
            memory_kb: model.memory_kb,
            test_cases_passed: model.test_cases_passed,
            total_test_cases: model.total_test_cases,
            output: model.output,
            error: model.error,
            created_at: model.created_at,
        }
    }
}

/// Response to a submit: the stored submission and its progress effect.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CreateSubmissionResponse {
    #[serde(flatten)]
    pub submission: SubmissionResponse,
    /// Null for non-final statuses.
    pub progress: Option<ProgressUpdate>,
}

/// Response to a run.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RunResponse {
    #[schema(example = "two-sum")]
    pub problem_slug: String,
    pub progress: ProgressUpdate,
}

/// Submission summary for list views (code omitted).
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionListItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "two-sum")]
    pub problem_slug: String,
    #[schema(example = "Two Sum")]
    pub problem_title: Option<String>,
    #[schema(example = "python")]
    pub language: String,
    pub status: SubmissionStatus,
    pub runtime_ms: Option<i32>,
    pub memory_kb: Option<i32>,
    #[schema(example = "2024-06-15T14:30:00Z")]
    pub created_at: DateTime<Utc>,
}

impl SubmissionListItem {
    pub fn new(model: submission::Model, problem_title: Option<String>) -> Self {
        Self {
            id: model.id,
            problem_slug: model.problem_slug,
            problem_title,
            language: model.language,
            status: model.status,
            runtime_ms: model.runtime_ms,
            memory_kb: model.memory_kb,
            created_at: model.created_at,
        }
    }
}

/// Paginated list of submissions.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionListResponse {
    pub data: Vec<SubmissionListItem>,
    pub pagination: Pagination,
}
