use std::cmp;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Duration, Utc};
use common::progress::Outcome;
use common::store::record_outcome;
use sea_orm::*;
use tracing::{info, instrument, warn};

use crate::entity::submission;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::request::{AppJson, AppQuery};
use crate::models::shared::Pagination;
use crate::models::submission::*;
use crate::state::AppState;

use super::find_problem;

/// Check rate limit for a user.
///
/// Counts without locking, so a burst of concurrent requests may slightly
/// exceed the limit.
async fn check_rate_limit(
    db: &DatabaseConnection,
    user_id: i32,
    limit_per_minute: u32,
) -> Result<(), AppError> {
    if limit_per_minute == 0 {
        return Ok(()); // Rate limiting disabled
    }

    let one_minute_ago = Utc::now() - Duration::minutes(1);

    let count = submission::Entity::find()
        .filter(submission::Column::UserId.eq(user_id))
        .filter(submission::Column::CreatedAt.gt(one_minute_ago))
        .count(db)
        .await?;

    if count >= limit_per_minute as u64 {
        let oldest = submission::Entity::find()
            .filter(submission::Column::UserId.eq(user_id))
            .filter(submission::Column::CreatedAt.gt(one_minute_ago))
            .order_by_asc(submission::Column::CreatedAt)
            .one(db)
            .await?;

        let retry_after = oldest
            .map(|s| {
                let expires = s.created_at + Duration::minutes(1);
                cmp::max((expires - Utc::now()).num_seconds(), 1) as u64
            })
            .unwrap_or(60);

        return Err(AppError::RateLimited { retry_after });
    }

    Ok(())
}

/// Find a submission owned by `user_id`, or return 404.
async fn find_own_submission<C: ConnectionTrait>(
    db: &C,
    id: i32,
    user_id: i32,
) -> Result<submission::Model, AppError> {
    submission::Entity::find_by_id(id)
        .filter(submission::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found".into()))
}

fn problem_title(state: &AppState, slug: &str) -> Option<String> {
    state.catalog.problem_by_slug(slug).map(|p| p.title.clone())
}

/// Reconcile progress for an outcome. Store failures are reported in the
/// returned update rather than failing the request.
async fn apply_outcome(
    state: &AppState,
    user_id: i32,
    problem_slug: &str,
    outcome: Outcome,
    now: DateTime<Utc>,
) -> ProgressUpdate {
    match record_outcome(
        state.progress.as_ref(),
        user_id,
        problem_slug,
        outcome,
        now,
        state.config.progress.write_policy,
    )
    .await
    {
        Ok(reconciliation) => {
            if reconciliation.newly_solved() {
                info!(user_id, problem_slug, "Problem solved");
            }
            ProgressUpdate {
                saved: true,
                status: Some(reconciliation.detail.status),
                newly_solved: reconciliation.newly_solved(),
                error: None,
            }
        }
        Err(e) => {
            warn!(user_id, problem_slug, error = %e, "Failed to save progress");
            ProgressUpdate::failed()
        }
    }
}

/// Record a judged submission for a problem.
#[utoipa::path(
    post,
    path = "/{slug}/submissions",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Record a submission",
    description = "Stores the submission with its reported verdict and, for final verdicts, updates the caller's progress on the problem. A failed progress update is reported in `progress` and does not fail the request.",
    params(("slug" = String, Path, description = "Problem slug")),
    request_body = CreateSubmissionRequest,
    responses(
        (status = 201, description = "Submission recorded", body = CreateSubmissionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded (RATE_LIMITED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, slug = %slug, status = %payload.status))]
pub async fn create_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    AppJson(payload): AppJson<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let problem = find_problem(&state, &slug)?;
    let title = problem.title.clone();
    validate_create_submission(&payload, state.config.submission.max_code_bytes)?;
    check_rate_limit(
        &state.db,
        auth_user.user_id,
        state.config.submission.rate_limit_per_minute,
    )
    .await?;

    let new_submission = submission::ActiveModel {
        problem_slug: Set(slug.clone()),
        language: Set(payload.language.trim().to_string()),
        code: Set(payload.code),
        status: Set(payload.status),
        runtime_ms: Set(payload.runtime_ms),
        memory_kb: Set(payload.memory_kb),
        test_cases_passed: Set(payload.test_cases_passed),
        total_test_cases: Set(payload.total_test_cases),
        output: Set(payload.output),
        error: Set(payload.error),
        user_id: Set(auth_user.user_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let model = new_submission.insert(&state.db).await?;

    let progress = match model.status.outcome() {
        Some(outcome) => {
            Some(apply_outcome(&state, auth_user.user_id, &slug, outcome, model.created_at).await)
        }
        None => None,
    };

    Ok((
        StatusCode::CREATED,
        Json(CreateSubmissionResponse {
            submission: SubmissionResponse::new(model, Some(title)),
            progress,
        }),
    ))
}

/// Run code against a problem without submitting.
#[utoipa::path(
    post,
    path = "/{slug}/run",
    tag = "Submissions",
    operation_id = "runProblem",
    summary = "Run code",
    description = "Records an attempt on the problem without storing a submission. A solved problem stays solved.",
    params(("slug" = String, Path, description = "Problem slug")),
    request_body = RunRequest,
    responses(
        (status = 200, description = "Attempt recorded", body = RunResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, slug = %slug))]
pub async fn run_problem(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    AppJson(payload): AppJson<RunRequest>,
) -> Result<Json<RunResponse>, AppError> {
    find_problem(&state, &slug)?;
    validate_run_request(&payload, state.config.submission.max_code_bytes)?;

    let progress = apply_outcome(
        &state,
        auth_user.user_id,
        &slug,
        Outcome::NotAccepted,
        Utc::now(),
    )
    .await;

    Ok(Json(RunResponse {
        problem_slug: slug,
        progress,
    }))
}

/// List the caller's submissions.
#[utoipa::path(
    get,
    path = "/",
    tag = "Submissions",
    operation_id = "listSubmissions",
    summary = "List own submissions",
    description = "Returns the caller's submissions, newest first.",
    params(SubmissionListQuery),
    responses(
        (status = 200, description = "List of submissions", body = SubmissionListResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn list_submissions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SubmissionListQuery>,
) -> Result<Json<SubmissionListResponse>, AppError> {
    let (page, per_page) = Pagination::clamp(query.page, query.per_page);

    let mut select =
        submission::Entity::find().filter(submission::Column::UserId.eq(auth_user.user_id));

    if let Some(ref slug) = query.problem_slug {
        select = select.filter(submission::Column::ProblemSlug.eq(slug.trim()));
    }
    if let Some(status) = query.status {
        select = select.filter(submission::Column::Status.eq(status));
    }

    let total = select.clone().count(&state.db).await?;

    let submissions = select
        .order_by_desc(submission::Column::CreatedAt)
        .order_by_desc(submission::Column::Id)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let data = submissions
        .into_iter()
        .map(|s| {
            let title = problem_title(&state, &s.problem_slug);
            SubmissionListItem::new(s, title)
        })
        .collect();

    Ok(Json(SubmissionListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

/// Get one of the caller's submissions.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Submissions",
    operation_id = "getSubmission",
    summary = "Get submission details",
    description = "Submissions of other users are reported as not found.",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission details", body = SubmissionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, submission_id = %id))]
pub async fn get_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let model = find_own_submission(&state.db, id, auth_user.user_id).await?;
    let title = problem_title(&state, &model.problem_slug);
    Ok(Json(SubmissionResponse::new(model, title)))
}
