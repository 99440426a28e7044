use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

impl Pagination {
    /// Clamp raw query values: page >= 1, per_page in 1..=100 (default 20).
    pub fn clamp(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
        (
            page.unwrap_or(1).max(1),
            per_page.unwrap_or(20).clamp(1, 100),
        )
    }

    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// Query parameter pinning the reference day of an activity view.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct TodayQuery {
    /// Reference day as `YYYY-MM-DD`. Defaults to the current UTC date.
    #[param(example = "2024-06-15")]
    pub today: Option<String>,
}

impl TodayQuery {
    pub fn resolve(&self) -> Result<NaiveDate, AppError> {
        match self.today.as_deref().map(str::trim) {
            None | Some("") => Ok(Utc::now().date_naive()),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::Validation(format!("Invalid date '{raw}', expected YYYY-MM-DD"))
            }),
        }
    }
}
