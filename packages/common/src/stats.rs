use std::collections::BTreeSet;

use serde::Serialize;

use crate::problem::{Difficulty, Problem};
use crate::progress::{ProblemStatus, UserProgress};

/// Counts per difficulty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct DifficultyCounts {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
    pub total: u32,
}

impl DifficultyCounts {
    fn bump(&mut self, difficulty: Difficulty) {
        match difficulty {
            Difficulty::Easy => self.easy += 1,
            Difficulty::Medium => self.medium += 1,
            Difficulty::Hard => self.hard += 1,
        }
    }
}

/// Solved problems against what the catalog offers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ProgressStats {
    /// `total` counts every solved slug, including ones no longer in the
    /// catalog.
    pub solved: DifficultyCounts,
    pub available: DifficultyCounts,
    pub attempted: u32,
}

/// Slugs whose stored status is `Solved`.
pub fn solved_slugs(progress: &UserProgress) -> BTreeSet<&str> {
    progress
        .iter()
        .filter(|(_, entry)| entry.status() == ProblemStatus::Solved)
        .map(|(slug, _)| slug.as_str())
        .collect()
}

pub fn progress_stats(progress: &UserProgress, problems: &[Problem]) -> ProgressStats {
    let solved_set = solved_slugs(progress);

    let mut solved = DifficultyCounts {
        total: solved_set.len() as u32,
        ..Default::default()
    };
    let mut available = DifficultyCounts {
        total: problems.len() as u32,
        ..Default::default()
    };

    for problem in problems {
        available.bump(problem.difficulty);
        if solved_set.contains(problem.slug.as_str()) {
            solved.bump(problem.difficulty);
        }
    }

    let attempted = progress
        .values()
        .filter(|entry| entry.status() == ProblemStatus::Attempted)
        .count() as u32;

    ProgressStats {
        solved,
        available,
        attempted,
    }
}
