//! History aggregation
//!
//! One pass over the raw activity log, producing per-exercise recency and
//! distinct-active-day counts for the short (7-day) and long (21-day)
//! trailing windows.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::ScoringConfig;
use crate::models::ActivityRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseHistory {
  pub exercise_id: String,
  pub last_done_date: Option<NaiveDate>,
  /// Distinct calendar days with activity in the short window
  pub active_days_7: u32,
  /// Distinct calendar days with activity in the long window
  pub active_days_21: u32,
}

/// exercise id -> history
pub type HistoryIndex = BTreeMap<String, ExerciseHistory>;

impl ExerciseHistory {
  pub fn never_done(exercise_id: &str) -> Self {
    Self {
      exercise_id: exercise_id.to_string(),
      last_done_date: None,
      active_days_7: 0,
      active_days_21: 0,
    }
  }

  /// Whole calendar days between the last session and `today`.
  /// Sessions dated after `today` count as today.
  pub fn days_since_last_done(&self, today: NaiveDate) -> Option<i64> {
    self.last_done_date.map(|d| (today - d).num_days().max(0))
  }

  /// Build the history index from raw records
  pub fn aggregate(
    records: &[ActivityRecord],
    today: NaiveDate,
    config: &ScoringConfig,
  ) -> HistoryIndex {
    // Per exercise: latest day seen and the set of day offsets inside the long window
    let mut acc: BTreeMap<&str, (NaiveDate, BTreeSet<i64>)> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
      let Some(id) = record.attributed_id() else {
        skipped += 1;
        continue;
      };
      let day = record.day();
      let entry = acc.entry(id).or_insert_with(|| (day, BTreeSet::new()));
      if day > entry.0 {
        entry.0 = day;
      }

      let offset = (today - day).num_days();
      if (0..config.long_window_days).contains(&offset) {
        entry.1.insert(offset);
      }
    }

    if skipped > 0 {
      tracing::debug!(skipped, "ignored activity records without an exercise id");
    }

    acc
      .into_iter()
      .map(|(id, (last, offsets))| {
        let short = offsets
          .iter()
          .filter(|o| **o < config.short_window_days)
          .count();
        let history = ExerciseHistory {
          exercise_id: id.to_string(),
          last_done_date: Some(last),
          active_days_7: short as u32,
          active_days_21: offsets.len() as u32,
        };
        (id.to_string(), history)
      })
      .collect()
  }
}
