pub mod auth;
pub mod problem;
pub mod progress;
pub mod submission;

use common::{Problem, UserProgress};

use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::state::AppState;

/// Look up a catalog problem by slug or return 404.
fn find_problem<'a>(state: &'a AppState, slug: &str) -> Result<&'a Problem, AppError> {
    state
        .catalog
        .problem_by_slug(slug)
        .ok_or_else(|| AppError::NotFound(format!("Problem '{slug}' not found")))
}

/// Progress of the caller, or `None` for anonymous requests.
async fn caller_progress(
    state: &AppState,
    auth_user: Option<&AuthUser>,
) -> Result<Option<UserProgress>, AppError> {
    match auth_user {
        Some(user) => Ok(Some(state.progress.read_progress(user.user_id).await?)),
        None => Ok(None),
    }
}
