//! PostgreSQL-backed progress store.

use async_trait::async_trait;
use chrono::Utc;
use common::progress::{ProblemStatusDetail, StoredStatus, UserProgress};
use common::store::{ProgressStore, StoreError};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::{instrument, warn};

use crate::entity::problem_progress;

pub struct DbProgressStore {
    db: DatabaseConnection,
}

impl DbProgressStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn backend(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Parse a stored row, logging and dropping rows of unknown shape.
fn parse_row(row: &problem_progress::Model) -> Option<StoredStatus> {
    let parsed = StoredStatus::from_value(&row.detail);
    if parsed.is_none() {
        warn!(
            user_id = row.user_id,
            problem_slug = %row.problem_slug,
            "Skipping malformed progress entry"
        );
    }
    parsed
}

#[async_trait]
impl ProgressStore for DbProgressStore {
    #[instrument(skip(self))]
    async fn read_progress(&self, user_id: i32) -> Result<UserProgress, StoreError> {
        let rows = problem_progress::Entity::find()
            .filter(problem_progress::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(backend)?;

        Ok(rows
            .iter()
            .filter_map(|row| parse_row(row).map(|entry| (row.problem_slug.clone(), entry)))
            .collect())
    }

    #[instrument(skip(self))]
    async fn read_entry(
        &self,
        user_id: i32,
        problem_slug: &str,
    ) -> Result<Option<StoredStatus>, StoreError> {
        let row = problem_progress::Entity::find_by_id((user_id, problem_slug.to_string()))
            .one(&self.db)
            .await
            .map_err(backend)?;

        Ok(row.as_ref().and_then(parse_row))
    }

    #[instrument(skip(self, detail), fields(status = %detail.status))]
    async fn merge_progress(
        &self,
        user_id: i32,
        problem_slug: &str,
        detail: &ProblemStatusDetail,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(StoredStatus::from(detail.clone()))?;

        let row = problem_progress::ActiveModel {
            user_id: Set(user_id),
            problem_slug: Set(problem_slug.to_string()),
            detail: Set(value),
            updated_at: Set(Utc::now()),
        };

        let txn = self.db.begin().await.map_err(backend)?;
        problem_progress::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    problem_progress::Column::UserId,
                    problem_progress::Column::ProblemSlug,
                ])
                .update_columns([
                    problem_progress::Column::Detail,
                    problem_progress::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(backend)?;
        txn.commit().await.map_err(backend)?;

        Ok(())
    }
}
