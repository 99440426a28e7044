use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty of a catalog problem. Ordered `Easy < Medium < Hard`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: &'static [Difficulty] = &[Self::Easy, Self::Medium, Self::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Problem {
    #[schema(example = "two-sum")]
    pub slug: String,
    #[schema(example = "Two Sum")]
    pub title: String,
    pub difficulty: Difficulty,
    pub statement: String,
    #[schema(example = json!(["Array", "Hash Table"]))]
    pub tags: Vec<String>,
    #[schema(example = "Interview")]
    pub category: Option<String>,
    #[schema(example = json!(["Amazon", "Google"]))]
    pub companies: Vec<String>,
    /// Display-only acceptance rate.
    #[schema(example = "50.5%")]
    pub acceptance: Option<String>,
}

impl Problem {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_company(&self, company: &str) -> bool {
        self.companies.iter().any(|c| c == company)
    }
}

/// Derive a URL-safe slug from a title.
///
/// Lowercases ASCII letters, collapses every run of other characters into a
/// single `-` and trims dashes at both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
