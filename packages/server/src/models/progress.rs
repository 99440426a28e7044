use std::collections::BTreeMap;

use common::achievement::AchievementProgress;
use common::activity::MonthlySolved;
use common::stats::ProgressStats;
use common::{ProblemStatusDetail, UserProgress};
use serde::Serialize;

/// The caller's progress map, every entry in detailed form.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProgressMapResponse {
    pub problems: BTreeMap<String, ProblemStatusDetail>,
}

impl From<UserProgress> for ProgressMapResponse {
    fn from(progress: UserProgress) -> Self {
        Self {
            problems: progress
                .into_iter()
                .map(|(slug, entry)| (slug, entry.normalize()))
                .collect(),
        }
    }
}

/// Status of one problem for the caller, in the stored camelCase shape.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemProgressResponse {
    #[schema(example = "two-sum")]
    pub problem_slug: String,
    #[serde(flatten)]
    pub detail: ProblemStatusDetail,
}

/// Six months of solved counts, oldest first.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MonthlyActivityResponse {
    pub months: Vec<MonthlySolved>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: ProgressStats,
    pub achievements: Vec<AchievementProgress>,
}
