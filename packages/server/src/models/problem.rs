use std::collections::BTreeMap;

use common::catalog::ProblemFilter;
use common::progress::{UserProgress, status_of};
use common::{Difficulty, Problem, ProblemStatus};
use serde::{Deserialize, Serialize};

/// Query parameters for problem listing. All filters are optional and combine.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ProblemListQuery {
    pub difficulty: Option<Difficulty>,
    /// Exact tag match.
    #[param(example = "Array")]
    pub tag: Option<String>,
    /// Exact category match; `Uncategorized` matches problems without one.
    #[param(example = "Interview")]
    pub category: Option<String>,
    #[param(example = "Google")]
    pub company: Option<String>,
    /// Case-insensitive title substring.
    #[param(example = "sum")]
    pub search: Option<String>,
}

impl From<ProblemListQuery> for ProblemFilter {
    fn from(query: ProblemListQuery) -> Self {
        ProblemFilter {
            difficulty: query.difficulty,
            tag: query.tag,
            category: query.category,
            company: query.company,
            search: query.search,
        }
    }
}

/// Problem summary for list views (statement omitted).
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemSummary {
    #[schema(example = "two-sum")]
    pub slug: String,
    #[schema(example = "Two Sum")]
    pub title: String,
    pub difficulty: Difficulty,
    #[schema(example = json!(["Array", "Hash Table"]))]
    pub tags: Vec<String>,
    #[schema(example = "Interview")]
    pub category: Option<String>,
    #[schema(example = json!(["Amazon", "Google"]))]
    pub companies: Vec<String>,
    #[schema(example = "50.5%")]
    pub acceptance: Option<String>,
    /// Caller's status on this problem; null for anonymous requests.
    pub status: Option<ProblemStatus>,
}

impl ProblemSummary {
    pub fn new(problem: &Problem, progress: Option<&UserProgress>) -> Self {
        Self {
            slug: problem.slug.clone(),
            title: problem.title.clone(),
            difficulty: problem.difficulty,
            tags: problem.tags.clone(),
            category: problem.category.clone(),
            companies: problem.companies.clone(),
            acceptance: problem.acceptance.clone(),
            status: progress.map(|p| status_of(p, &problem.slug)),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemListResponse {
    pub data: Vec<ProblemSummary>,
    #[schema(example = 17)]
    pub total: usize,
}

/// Full problem details.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemResponse {
    #[serde(flatten)]
    pub problem: Problem,
    /// Caller's status on this problem; null for anonymous requests.
    pub status: Option<ProblemStatus>,
}

/// One named group of problems, ordered Easy, Medium, Hard.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemGroup {
    #[schema(example = "Amazon")]
    pub name: String,
    pub problems: Vec<ProblemSummary>,
}

/// Groups in alphabetical order of name.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemGroupsResponse {
    pub groups: Vec<ProblemGroup>,
}

impl ProblemGroupsResponse {
    pub fn new(groups: BTreeMap<String, Vec<&Problem>>, progress: Option<&UserProgress>) -> Self {
        Self {
            groups: groups
                .into_iter()
                .map(|(name, problems)| ProblemGroup {
                    name,
                    problems: problems
                        .into_iter()
                        .map(|p| ProblemSummary::new(p, progress))
                        .collect(),
                })
                .collect(),
        }
    }
}
