use axum::extract::DefaultBodyLimit;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/problems", problem_routes(config))
        .nest("/submissions", submission_routes())
        .nest("/progress", progress_routes())
        .nest("/activity", activity_routes())
        .nest("/stats", stats_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn problem_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let browse = OpenApiRouter::new()
        .routes(routes!(handlers::problem::list_problems))
        .routes(routes!(handlers::problem::problems_by_company))
        .routes(routes!(handlers::problem::problems_by_category))
        .routes(routes!(handlers::problem::get_problem));

    let attempts = OpenApiRouter::new()
        .routes(routes!(handlers::submission::create_submission))
        .routes(routes!(handlers::submission::run_problem))
        .layer(DefaultBodyLimit::max(attempt_body_limit(
            config.submission.max_code_bytes,
        )));

    browse.merge(attempts)
}

/// Body limit for submit and run requests.
///
/// JSON escaping can grow each source byte to six (`\u00XX`), so the limit
/// leaves room for that plus the rest of the envelope. The exact size check
/// on the decoded code happens in the handler.
fn attempt_body_limit(max_code_bytes: usize) -> usize {
    max_code_bytes.saturating_mul(6).saturating_add(4096)
}

fn submission_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::submission::list_submissions))
        .routes(routes!(handlers::submission::get_submission))
}

fn progress_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::progress::get_progress))
        .routes(routes!(handlers::progress::get_problem_progress))
}

fn activity_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::progress::monthly_activity))
        .routes(routes!(handlers::progress::contribution_activity))
}

fn stats_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::progress::get_stats))
}
