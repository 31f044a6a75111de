//! Overview metrics across the whole plan

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::history::HistoryIndex;
use crate::models::{CoverageTree, RoleAssignment, Summary};

impl Summary {
  pub fn compute(
    roles: &[RoleAssignment],
    history: &HistoryIndex,
    tree: &CoverageTree,
    today: NaiveDate,
  ) -> Self {
    let planned: BTreeSet<&str> = roles.iter().map(|r| r.exercise_id.as_str()).collect();
    let total_exercises = planned.len();
    let exercises_done_7 = planned
      .iter()
      .filter(|id| history.get(**id).is_some_and(|h| h.active_days_7 >= 1))
      .count();

    let coverage_7_percent = if total_exercises > 0 {
      percent(exercises_done_7 as f64 / total_exercises as f64 * 100.0)
    } else {
      0
    };

    // Any logged exercise counts, planned or not
    let days_since_last_activity = history
      .values()
      .filter_map(|h| h.days_since_last_done(today))
      .min();

    let mean_trend = if tree.is_empty() {
      0
    } else {
      let sum: f64 = tree.values().map(|r| r.region_bar.opacity as f64).sum();
      percent(sum / tree.len() as f64)
    };

    Self {
      days_since_last_activity,
      coverage_7_percent,
      exercises_done_7,
      total_exercises,
      mean_trend,
    }
  }
}

fn percent(value: f64) -> u8 {
  value.round().clamp(0.0, 100.0) as u8
}
