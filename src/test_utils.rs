//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - A fixed reference date
//! - Mock data factories for role assignments and activity logs
//! - Helper assertions

use crate::models::{ActivityRecord, Contribution, RoleAssignment};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Fixed "today" so every test is deterministic
pub fn today() -> NaiveDate {
  NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date")
}

/// Midday UTC on the day N days before `today()`
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  let noon = NaiveTime::from_hms_opt(12, 0, 0).expect("valid time");
  (today() - Duration::days(days)).and_time(noon).and_utc()
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Create a role assignment; the exercise name is derived from the id
pub fn mock_role(
  exercise_id: &str,
  region: &str,
  capacity: &str,
  focus: Option<&str>,
  contribution: Contribution,
) -> RoleAssignment {
  RoleAssignment {
    exercise_id: exercise_id.to_string(),
    exercise_name: format!("Exercise {}", exercise_id),
    region: region.to_string(),
    capacity: capacity.to_string(),
    focus: focus.map(str::to_string),
    contribution,
  }
}

/// One activity record per entry in `days_ago`
pub fn records_on_days(exercise_id: &str, days_ago: &[i64]) -> Vec<ActivityRecord> {
  days_ago
    .iter()
    .map(|d| ActivityRecord::new(exercise_id, datetime_days_ago(*d)))
    .collect()
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_datetime_days_ago_lands_on_calendar_day() {
    assert_eq!(datetime_days_ago(0).date_naive(), today());
    assert_eq!(datetime_days_ago(3).date_naive(), today() - Duration::days(3));
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let role = mock_role("squat", "knee", "strength", None, Contribution::High);
    assert_eq!(role.exercise_name, "Exercise squat");
    assert_eq!(role.focus_label(), "general");

    let records = records_on_days("squat", &[0, 1, 1]);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].attributed_id(), Some("squat"));
  }
}
