use serde::Serialize;

use crate::problem::Problem;
use crate::progress::UserProgress;
use crate::stats::solved_slugs;

/// A badge earned by solving a number of problems with a given tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub tag: &'static str,
    pub count: u32,
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "array-novice",
        title: "Array Apprentice",
        description: "Solve 3 problems with the \"Array\" tag.",
        tag: "Array",
        count: 3,
    },
    Achievement {
        id: "array-master",
        title: "Array Master",
        description: "Solve 10 problems with the \"Array\" tag.",
        tag: "Array",
        count: 10,
    },
    Achievement {
        id: "recursion-adept",
        title: "Recursion Adept",
        description: "Solve 5 problems involving recursion.",
        tag: "Recursion",
        count: 5,
    },
    Achievement {
        id: "string-sorcerer",
        title: "String Sorcerer",
        description: "Solve 5 problems with the \"String\" tag.",
        tag: "String",
        count: 5,
    },
    Achievement {
        id: "dp-dynamo",
        title: "DP Dynamo",
        description: "Solve 3 problems using Dynamic Programming.",
        tag: "Dynamic Programming",
        count: 3,
    },
    Achievement {
        id: "tree-navigator",
        title: "Tree Navigator",
        description: "Solve 3 problems involving binary trees.",
        tag: "Binary Tree",
        count: 3,
    },
    Achievement {
        id: "linked-list-pro",
        title: "Linked List Pro",
        description: "Solve 2 problems with the \"Linked List\" tag.",
        tag: "Linked List",
        count: 2,
    },
    Achievement {
        id: "hash-table-hero",
        title: "Hash Table Hero",
        description: "Solve 2 problems using Hash Tables.",
        tag: "Hash Table",
        count: 2,
    },
];

/// A user's standing towards one achievement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct AchievementProgress {
    #[schema(example = "array-novice")]
    pub id: String,
    #[schema(example = "Array Apprentice")]
    pub title: String,
    pub description: String,
    #[schema(example = "Array")]
    pub tag: String,
    /// Solved catalog problems carrying the tag, capped at `required`.
    pub progress: u32,
    pub required: u32,
    pub earned: bool,
}

pub fn achievement_progress(
    progress: &UserProgress,
    problems: &[Problem],
) -> Vec<AchievementProgress> {
    let solved = solved_slugs(progress);
    ACHIEVEMENTS
        .iter()
        .map(|achievement| {
            let count = problems
                .iter()
                .filter(|p| solved.contains(p.slug.as_str()) && p.has_tag(achievement.tag))
                .count() as u32;
            AchievementProgress {
                id: achievement.id.to_string(),
                title: achievement.title.to_string(),
                description: achievement.description.to_string(),
                tag: achievement.tag.to_string(),
                progress: count.min(achievement.count),
                required: achievement.count,
                earned: count >= achievement.count,
            }
        })
        .collect()
}
