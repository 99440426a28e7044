use common::SubmissionStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One recorded attempt. Rows are never updated or deleted.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Catalog slug. Problems live outside the database, so this is not a
    /// foreign key.
    pub problem_slug: String,
    pub language: String,
    #[sea_orm(column_type = "Text")]
    pub code: String,
    pub status: SubmissionStatus,

    /// Runtime in milliseconds.
    pub runtime_ms: Option<i32>,
    /// Peak memory in KB.
    pub memory_kb: Option<i32>,
    pub test_cases_passed: Option<i32>,
    pub total_test_cases: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub output: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub error: Option<String>,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
