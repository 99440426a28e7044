use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Request body for registration and login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct Credentials {
    /// 1-32 chars, letters, digits and underscores.
    #[schema(example = "ada_l")]
    pub username: String,
    /// 8-128 characters.
    #[schema(example = "hunter2hunter2")]
    pub password: String,
}

impl Credentials {
    pub fn username(&self) -> &str {
        self.username.trim()
    }
}

pub fn validate_register_request(payload: &Credentials) -> Result<(), AppError> {
    let username = payload.username();
    if username.is_empty() || username.chars().count() > 32 {
        return Err(AppError::Validation(
            "Username must be 1-32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::Validation(
            "Username must contain only letters, digits, and underscores".into(),
        ));
    }
    let password_len = payload.password.chars().count();
    if !(8..=128).contains(&password_len) {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_login_request(payload: &Credentials) -> Result<(), AppError> {
    if payload.username().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// A user account as seen by its owner.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "ada_l")]
    pub username: String,
}

impl From<crate::entity::user::Model> for UserResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token lifetime in days.
    #[schema(example = 7)]
    pub expires_in_days: i64,
    pub user: UserResponse,
}
