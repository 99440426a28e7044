//! Progress persistence seam.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::progress::{
    Outcome, ProblemStatusDetail, Reconciliation, StoredStatus, UserProgress, WritePolicy,
    reconcile,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("progress backend error: {0}")]
    Backend(String),

    #[error("progress serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable per-user progress maps.
///
/// `merge_progress` replaces a single slug's entry atomically and leaves the
/// other entries of the map untouched.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// The whole progress map of a user. Unknown users yield an empty map.
    async fn read_progress(&self, user_id: i32) -> Result<UserProgress, StoreError>;

    async fn read_entry(
        &self,
        user_id: i32,
        problem_slug: &str,
    ) -> Result<Option<StoredStatus>, StoreError> {
        let mut progress = self.read_progress(user_id).await?;
        Ok(progress.remove(problem_slug))
    }

    async fn merge_progress(
        &self,
        user_id: i32,
        problem_slug: &str,
        detail: &ProblemStatusDetail,
    ) -> Result<(), StoreError>;
}

/// Reconcile `outcome` against the stored entry and persist the result when
/// `policy` asks for it.
pub async fn record_outcome(
    store: &dyn ProgressStore,
    user_id: i32,
    problem_slug: &str,
    outcome: Outcome,
    now: DateTime<Utc>,
    policy: WritePolicy,
) -> Result<Reconciliation, StoreError> {
    let current = store.read_entry(user_id, problem_slug).await?;
    let reconciliation = reconcile(current.as_ref(), outcome, now, policy);

    if reconciliation.needs_write {
        store
            .merge_progress(user_id, problem_slug, &reconciliation.detail)
            .await?;
    } else {
        debug!(user_id, problem_slug, status = %reconciliation.detail.status, "Progress write skipped");
    }

    Ok(reconciliation)
}

/// Process-local store, used in tests and single-node setups.
#[derive(Default)]
pub struct MemoryProgressStore {
    users: RwLock<HashMap<i32, UserProgress>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn read_progress(&self, user_id: i32) -> Result<UserProgress, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn read_entry(
        &self,
        user_id: i32,
        problem_slug: &str,
    ) -> Result<Option<StoredStatus>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .get(&user_id)
            .and_then(|progress| progress.get(problem_slug))
            .cloned())
    }

    async fn merge_progress(
        &self,
        user_id: i32,
        problem_slug: &str,
        detail: &ProblemStatusDetail,
    ) -> Result<(), StoreError> {
        self.users
            .write()
            .await
            .entry(user_id)
            .or_default()
            .insert(problem_slug.to_string(), StoredStatus::from(detail.clone()));
        Ok(())
    }
}
