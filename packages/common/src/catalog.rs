//! Problem catalog: the immutable set of problems served to users.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::problem::{Difficulty, Problem, slugify};

/// Category used for problems that do not declare one.
pub const UNCATEGORIZED: &str = "Uncategorized";

const BUILTIN_CATALOG: &str = include_str!("../data/problems.toml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("problem '{0}' has an empty slug")]
    EmptySlug(String),

    #[error("duplicate problem slug: {0}")]
    DuplicateSlug(String),
}

/// Optional filters applied when listing problems. All set filters must match.
#[derive(Clone, Debug, Default)]
pub struct ProblemFilter {
    pub difficulty: Option<Difficulty>,
    pub tag: Option<String>,
    pub category: Option<String>,
    pub company: Option<String>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
}

impl ProblemFilter {
    pub fn matches(&self, problem: &Problem) -> bool {
        if self.difficulty.is_some_and(|d| d != problem.difficulty) {
            return false;
        }
        if let Some(tag) = &self.tag
            && !problem.has_tag(tag)
        {
            return false;
        }
        if let Some(category) = &self.category
            && problem.category.as_deref().unwrap_or(UNCATEGORIZED) != category
        {
            return false;
        }
        if let Some(company) = &self.company
            && !problem.has_company(company)
        {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() && !problem.title.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Read access to the problem catalog.
pub trait ProblemCatalog: Send + Sync {
    /// All problems in catalog order.
    fn list_problems(&self) -> &[Problem];

    fn problem_by_slug(&self, slug: &str) -> Option<&Problem>;

    fn filter(&self, filter: &ProblemFilter) -> Vec<&Problem> {
        self.list_problems()
            .iter()
            .filter(|p| filter.matches(p))
            .collect()
    }

    /// Problems grouped by company, companies in alphabetical order.
    fn by_company(&self) -> BTreeMap<String, Vec<&Problem>> {
        let mut groups: BTreeMap<String, Vec<&Problem>> = BTreeMap::new();
        for problem in self.list_problems() {
            for company in &problem.companies {
                groups.entry(company.clone()).or_default().push(problem);
            }
        }
        sort_groups(groups)
    }

    /// Problems grouped by category, missing categories under
    /// [`UNCATEGORIZED`].
    fn by_category(&self) -> BTreeMap<String, Vec<&Problem>> {
        let mut groups: BTreeMap<String, Vec<&Problem>> = BTreeMap::new();
        for problem in self.list_problems() {
            let category = problem.category.as_deref().unwrap_or(UNCATEGORIZED);
            groups.entry(category.to_string()).or_default().push(problem);
        }
        sort_groups(groups)
    }
}

// Stable sort keeps catalog order among problems of equal difficulty.
fn sort_groups(
    mut groups: BTreeMap<String, Vec<&Problem>>,
) -> BTreeMap<String, Vec<&Problem>> {
    for problems in groups.values_mut() {
        problems.sort_by_key(|p| p.difficulty);
    }
    groups
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    problems: Vec<ProblemEntry>,
}

#[derive(Debug, Deserialize)]
struct ProblemEntry {
    slug: Option<String>,
    title: String,
    difficulty: Difficulty,
    statement: String,
    #[serde(default)]
    tags: Vec<String>,
    category: Option<String>,
    #[serde(default)]
    companies: Vec<String>,
    acceptance: Option<String>,
}

impl From<ProblemEntry> for Problem {
    fn from(entry: ProblemEntry) -> Self {
        let slug = entry.slug.unwrap_or_else(|| slugify(&entry.title));
        Problem {
            slug,
            title: entry.title,
            difficulty: entry.difficulty,
            statement: entry.statement,
            tags: dedup(entry.tags),
            category: entry.category.filter(|c| !c.trim().is_empty()),
            companies: dedup(entry.companies),
            acceptance: entry.acceptance,
        }
    }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// In-memory catalog loaded once at startup.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    problems: Vec<Problem>,
    by_slug: HashMap<String, usize>,
}

impl StaticCatalog {
    /// Build a catalog, rejecting empty or duplicate slugs.
    pub fn new(problems: Vec<Problem>) -> Result<Self, CatalogError> {
        let mut by_slug = HashMap::with_capacity(problems.len());
        for (idx, problem) in problems.iter().enumerate() {
            if problem.slug.is_empty() {
                return Err(CatalogError::EmptySlug(problem.title.clone()));
            }
            if by_slug.insert(problem.slug.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateSlug(problem.slug.clone()));
            }
        }
        Ok(Self { problems, by_slug })
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parse a TOML document with a `[[problems]]` array.
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(contents)?;
        Self::new(file.problems.into_iter().map(Problem::from).collect())
    }

    /// Load a catalog from a TOML file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_toml_str(&contents)
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

impl ProblemCatalog for StaticCatalog {
    fn list_problems(&self) -> &[Problem] {
        &self.problems
    }

    fn problem_by_slug(&self, slug: &str) -> Option<&Problem> {
        self.by_slug.get(slug).map(|&idx| &self.problems[idx])
    }
}
