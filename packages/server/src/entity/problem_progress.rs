use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Progress entry of one user on one problem.
///
/// `detail` holds either a bare status string (legacy rows) or a
/// `{status, solvedAt, lastAttemptedAt}` object.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "problem_progress")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub problem_slug: String,

    #[sea_orm(column_type = "JsonBinary")]
    pub detail: serde_json::Value,

    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
