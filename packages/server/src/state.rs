use std::sync::Arc;

use common::{ProblemCatalog, ProgressStore};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub catalog: Arc<dyn ProblemCatalog>,
    pub progress: Arc<dyn ProgressStore>,
}
