use axum::{
    Json,
    extract::{Path, State},
};
use common::catalog::ProblemFilter;
use common::progress::status_of;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::request::AppQuery;
use crate::models::problem::*;
use crate::state::AppState;

use super::{caller_progress, find_problem};

/// List catalog problems.
#[utoipa::path(
    get,
    path = "/",
    tag = "Problems",
    operation_id = "listProblems",
    summary = "List problems",
    description = "Returns catalog problems in catalog order, optionally filtered. Authenticated callers also get their status per problem.",
    params(ProblemListQuery),
    responses(
        (status = 200, description = "Matching problems", body = ProblemListResponse),
        (status = 400, description = "Invalid query (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_problems(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ProblemListQuery>,
) -> Result<Json<ProblemListResponse>, AppError> {
    let progress = caller_progress(&state, auth_user.as_ref()).await?;
    let filter = ProblemFilter::from(query);

    let data: Vec<ProblemSummary> = state
        .catalog
        .filter(&filter)
        .into_iter()
        .map(|p| ProblemSummary::new(p, progress.as_ref()))
        .collect();

    Ok(Json(ProblemListResponse {
        total: data.len(),
        data,
    }))
}

/// Problems grouped by company.
#[utoipa::path(
    get,
    path = "/by-company",
    tag = "Problems",
    operation_id = "listProblemsByCompany",
    summary = "Problems grouped by company",
    responses(
        (status = 200, description = "Companies in alphabetical order", body = ProblemGroupsResponse),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user))]
pub async fn problems_by_company(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
) -> Result<Json<ProblemGroupsResponse>, AppError> {
    let progress = caller_progress(&state, auth_user.as_ref()).await?;
    Ok(Json(ProblemGroupsResponse::new(
        state.catalog.by_company(),
        progress.as_ref(),
    )))
}

/// Problems grouped by category.
#[utoipa::path(
    get,
    path = "/by-category",
    tag = "Problems",
    operation_id = "listProblemsByCategory",
    summary = "Problems grouped by category",
    description = "Problems without a category are grouped under `Uncategorized`.",
    responses(
        (status = 200, description = "Categories in alphabetical order", body = ProblemGroupsResponse),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user))]
pub async fn problems_by_category(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
) -> Result<Json<ProblemGroupsResponse>, AppError> {
    let progress = caller_progress(&state, auth_user.as_ref()).await?;
    Ok(Json(ProblemGroupsResponse::new(
        state.catalog.by_category(),
        progress.as_ref(),
    )))
}

/// Get a single problem by slug.
#[utoipa::path(
    get,
    path = "/{slug}",
    tag = "Problems",
    operation_id = "getProblem",
    summary = "Get problem details",
    params(("slug" = String, Path, description = "Problem slug")),
    responses(
        (status = 200, description = "Problem details", body = ProblemResponse),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(slug = %slug))]
pub async fn get_problem(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProblemResponse>, AppError> {
    let problem = find_problem(&state, &slug)?.clone();
    let progress = caller_progress(&state, auth_user.as_ref()).await?;

    Ok(Json(ProblemResponse {
        status: progress.as_ref().map(|p| status_of(p, &problem.slug)),
        problem,
    }))
}
