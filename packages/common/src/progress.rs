//! Per-problem progress state and the reconciliation rules that advance it.
//!
//! A user's progress is a map from problem slug to a [`StoredStatus`]. Stored
//! entries come in two shapes: a bare status string written by older clients,
//! and a detailed object carrying timestamps. Both are normalized into a
//! [`ProblemStatusDetail`] before any rule is applied.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable status of one problem for one user.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
pub enum ProblemStatus {
    Solved,
    Attempted,
    #[default]
    Todo,
}

impl ProblemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solved => "Solved",
            Self::Attempted => "Attempted",
            Self::Todo => "Todo",
        }
    }
}

impl fmt::Display for ProblemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse result class of a judged run or submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    NotAccepted,
}

/// Canonical progress record for one (user, problem) pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatusDetail {
    pub status: ProblemStatus,
    /// First time the problem reached `Solved`. Never cleared once set.
    #[serde(default)]
    pub solved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_attempted_at: Option<DateTime<Utc>>,
}

/// A progress entry as it appears in storage.
///
/// Legacy entries are a bare status string with no timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredStatus {
    Legacy(ProblemStatus),
    Detailed(ProblemStatusDetail),
}

impl StoredStatus {
    /// Normalize into the detailed form.
    pub fn normalize(&self) -> ProblemStatusDetail {
        match self {
            StoredStatus::Legacy(status) => ProblemStatusDetail {
                status: *status,
                solved_at: None,
                last_attempted_at: None,
            },
            StoredStatus::Detailed(detail) => detail.clone(),
        }
    }

    pub fn status(&self) -> ProblemStatus {
        match self {
            StoredStatus::Legacy(status) => *status,
            StoredStatus::Detailed(detail) => detail.status,
        }
    }

    /// Parse a raw stored value, returning `None` for shapes that match
    /// neither form.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

impl From<ProblemStatusDetail> for StoredStatus {
    fn from(detail: ProblemStatusDetail) -> Self {
        StoredStatus::Detailed(detail)
    }
}

/// All progress entries of a single user, keyed by problem slug.
pub type UserProgress = BTreeMap<String, StoredStatus>;

/// Status of `slug` in `progress`, `Todo` when there is no entry.
pub fn status_of(progress: &UserProgress, slug: &str) -> ProblemStatus {
    progress
        .get(slug)
        .map(StoredStatus::status)
        .unwrap_or_default()
}

/// Decides whether a reconciled detail is worth persisting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Persist every reconciliation so `lastAttemptedAt` is always durable.
    #[default]
    Always,
    /// Skip the write when a problem stays `Solved`; repeated `Attempted`
    /// events are still written.
    SkipRepeatSolved,
}

/// Result of applying one outcome to a progress entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub detail: ProblemStatusDetail,
    /// Status before this event, `None` when no entry existed.
    pub previous: Option<ProblemStatus>,
    /// Whether the caller should merge `detail` into storage.
    pub needs_write: bool,
}

impl Reconciliation {
    /// True when this event moved the problem to `Solved` for the first time.
    pub fn newly_solved(&self) -> bool {
        self.detail.status == ProblemStatus::Solved
            && self.previous != Some(ProblemStatus::Solved)
    }
}

/// Apply `outcome` observed at `now` to the current entry.
///
/// `Solved` never regresses and `solved_at` is never moved once recorded.
pub fn reconcile(
    current: Option<&StoredStatus>,
    outcome: Outcome,
    now: DateTime<Utc>,
    policy: WritePolicy,
) -> Reconciliation {
    let previous = current.map(StoredStatus::status);
    let prior = current.map(StoredStatus::normalize).unwrap_or_default();

    let status = match (outcome, prior.status) {
        (Outcome::Accepted, _) | (Outcome::NotAccepted, ProblemStatus::Solved) => {
            ProblemStatus::Solved
        }
        (Outcome::NotAccepted, _) => ProblemStatus::Attempted,
    };

    // A legacy `Solved` entry has no solve time; only an accepted outcome
    // may supply one.
    let solved_at = match outcome {
        Outcome::Accepted => prior.solved_at.or(Some(now)),
        Outcome::NotAccepted => prior.solved_at,
    };

    let detail = ProblemStatusDetail {
        status,
        solved_at,
        last_attempted_at: Some(now),
    };

    let needs_write = match policy {
        WritePolicy::Always => true,
        WritePolicy::SkipRepeatSolved => {
            previous.is_none()
                || previous != Some(status)
                || status == ProblemStatus::Attempted
        }
    };

    Reconciliation {
        detail,
        previous,
        needs_write,
    }
}
