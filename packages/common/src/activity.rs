//! Read-only activity views derived from a user's progress map.
//!
//! Solve times are bucketed by their UTC calendar day.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::progress::{ProblemStatus, UserProgress};

/// Number of calendar months in the monthly series.
pub const MONTH_WINDOW: u32 = 6;

/// Solved count for one calendar month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct MonthlySolved {
    /// Sortable month key, `YYYY-MM`.
    #[schema(example = "2024-06")]
    pub key: String,
    /// Abbreviated month name.
    #[schema(example = "Jun")]
    pub month: String,
    #[schema(example = 3)]
    pub solved: u32,
}

/// Contribution count for one calendar day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct DayContribution {
    #[schema(value_type = String, example = "2024-06-15")]
    pub date: NaiveDate,
    pub count: u32,
    /// Display intensity band, see [`intensity_level`].
    pub level: u8,
}

/// One year of daily contributions ending at a given day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContributionHeatmap {
    pub days: Vec<DayContribution>,
    pub total_contributions: u32,
    pub current_streak: u32,
}

/// Map a daily count onto one of five display bands.
pub fn intensity_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        6..=8 => 3,
        _ => 4,
    }
}

/// Solve counts per UTC day over every solved entry that has a solve time.
fn solves_per_day(progress: &UserProgress) -> BTreeMap<NaiveDate, u32> {
    let mut per_day = BTreeMap::new();
    for entry in progress.values() {
        let detail = entry.normalize();
        if detail.status != ProblemStatus::Solved {
            continue;
        }
        if let Some(solved_at) = detail.solved_at {
            *per_day.entry(solved_at.date_naive()).or_insert(0) += 1;
        }
    }
    per_day
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Solved problems per month for the month of `today` and the five before it,
/// oldest first.
pub fn monthly_buckets(progress: &UserProgress, today: NaiveDate) -> Vec<MonthlySolved> {
    let current_month = today.with_day(1).unwrap_or(today);

    let mut buckets: BTreeMap<String, MonthlySolved> = (0..MONTH_WINDOW)
        .filter_map(|back| current_month.checked_sub_months(Months::new(back)))
        .map(|first_day| {
            let key = month_key(first_day);
            let bucket = MonthlySolved {
                key: key.clone(),
                month: first_day.format("%b").to_string(),
                solved: 0,
            };
            (key, bucket)
        })
        .collect();

    for (day, count) in solves_per_day(progress) {
        if let Some(bucket) = buckets.get_mut(&month_key(day)) {
            bucket.solved += count;
        }
    }

    buckets.into_values().collect()
}

/// First day of the one-year window that ends at `today` inclusive.
fn window_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(12))
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .unwrap_or(today)
}

/// Daily contributions over the year ending at `today`, with the current streak.
pub fn contribution_heatmap(progress: &UserProgress, today: NaiveDate) -> ContributionHeatmap {
    let per_day = solves_per_day(progress);

    let days: Vec<DayContribution> = window_start(today)
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|date| {
            let count = per_day.get(&date).copied().unwrap_or(0);
            DayContribution {
                date,
                count,
                level: intensity_level(count),
            }
        })
        .collect();

    let total_contributions = days.iter().map(|d| d.count).sum();

    let mut current_streak = 0;
    let mut cursor = Some(today);
    while let Some(day) = cursor {
        if per_day.get(&day).copied().unwrap_or(0) == 0 {
            break;
        }
        current_streak += 1;
        cursor = day.pred_opt();
    }

    ContributionHeatmap {
        days,
        total_contributions,
        current_streak,
    }
}
