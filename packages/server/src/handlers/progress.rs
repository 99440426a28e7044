use axum::{
    Json,
    extract::{Path, State},
};
use common::achievement::achievement_progress;
use common::activity::{ContributionHeatmap, contribution_heatmap, monthly_buckets};
use common::stats::progress_stats;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::request::AppQuery;
use crate::models::progress::*;
use crate::models::shared::TodayQuery;
use crate::state::AppState;

use super::find_problem;

/// The caller's whole progress map.
#[utoipa::path(
    get,
    path = "/",
    tag = "Progress",
    operation_id = "getProgress",
    summary = "Get own progress",
    description = "Every stored entry in detailed form. Legacy entries have null timestamps; unreadable entries are omitted.",
    responses(
        (status = 200, description = "Progress map keyed by problem slug", body = ProgressMapResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_progress(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ProgressMapResponse>, AppError> {
    let progress = state.progress.read_progress(auth_user.user_id).await?;
    Ok(Json(progress.into()))
}

/// The caller's status on one problem.
#[utoipa::path(
    get,
    path = "/{slug}",
    tag = "Progress",
    operation_id = "getProblemProgress",
    summary = "Get own status on a problem",
    description = "Problems never attempted report `Todo` with null timestamps.",
    params(("slug" = String, Path, description = "Problem slug")),
    responses(
        (status = 200, description = "Problem status", body = ProblemProgressResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, slug = %slug))]
pub async fn get_problem_progress(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProblemProgressResponse>, AppError> {
    find_problem(&state, &slug)?;
    let detail = state
        .progress
        .read_entry(auth_user.user_id, &slug)
        .await?
        .map(|entry| entry.normalize())
        .unwrap_or_default();

    Ok(Json(ProblemProgressResponse {
        problem_slug: slug,
        detail,
    }))
}

/// Solved problems per month for the last six months.
#[utoipa::path(
    get,
    path = "/monthly",
    tag = "Activity",
    operation_id = "getMonthlyActivity",
    summary = "Monthly solved counts",
    description = "Six buckets, oldest first, ending with the month of `today`.",
    params(TodayQuery),
    responses(
        (status = 200, description = "Monthly series", body = MonthlyActivityResponse),
        (status = 400, description = "Invalid date (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn monthly_activity(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TodayQuery>,
) -> Result<Json<MonthlyActivityResponse>, AppError> {
    let today = query.resolve()?;
    let progress = state.progress.read_progress(auth_user.user_id).await?;
    Ok(Json(MonthlyActivityResponse {
        months: monthly_buckets(&progress, today),
    }))
}

/// Daily contribution heatmap for the year ending at `today`.
#[utoipa::path(
    get,
    path = "/heatmap",
    tag = "Activity",
    operation_id = "getContributionHeatmap",
    summary = "Contribution heatmap",
    description = "One entry per day for the year ending at `today`, with the total and the current streak.",
    params(TodayQuery),
    responses(
        (status = 200, description = "Heatmap", body = ContributionHeatmap),
        (status = 400, description = "Invalid date (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn contribution_activity(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TodayQuery>,
) -> Result<Json<ContributionHeatmap>, AppError> {
    let today = query.resolve()?;
    let progress = state.progress.read_progress(auth_user.user_id).await?;
    Ok(Json(contribution_heatmap(&progress, today)))
}

/// Solved counts by difficulty and achievement progress.
#[utoipa::path(
    get,
    path = "/",
    tag = "Stats",
    operation_id = "getStats",
    summary = "Profile statistics",
    responses(
        (status = 200, description = "Statistics", body = StatsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let progress = state.progress.read_progress(auth_user.user_id).await?;
    let problems = state.catalog.list_problems();

    Ok(Json(StatsResponse {
        stats: progress_stats(&progress, problems),
        achievements: achievement_progress(&progress, problems),
    }))
}
