use std::time::Duration;

use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::submission;

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Create secondary indexes that the schema sync does not manage.
///
/// Failures are logged and ignored.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Rate limiting and history listing:
    // SELECT ... FROM submission WHERE user_id = ? AND created_at > ?
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_submission_user_created")
        .table(submission::Entity)
        .col(submission::Column::UserId)
        .col(submission::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_submission_user_created exists"),
        Err(e) => warn!("Failed to create index idx_submission_user_created: {}", e),
    }

    let stmt = Index::create()
        .if_not_exists()
        .name("idx_submission_user_problem")
        .table(submission::Entity)
        .col(submission::Column::UserId)
        .col(submission::Column::ProblemSlug)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_submission_user_problem exists"),
        Err(e) => warn!("Failed to create index idx_submission_user_problem: {}", e),
    }

    Ok(())
}
