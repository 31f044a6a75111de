//! Bucket building
//!
//! Groups role assignments by (region, capacity), attaches each exercise's
//! history and partitions the bucket by contribution tier and by focus.
//! Signals are left at their cold-start values; the signal calculator
//! fills them in.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::history::{ExerciseHistory, HistoryIndex};
use crate::models::{CapacityBucket, Contribution, ExerciseEntry, RoleAssignment};

/// region -> capacity -> bucket
pub type BucketMap = BTreeMap<String, BTreeMap<String, CapacityBucket>>;

/// Build the bucket skeleton for every (region, capacity) in the plan
pub fn build_buckets(
  roles: &[RoleAssignment],
  history: &HistoryIndex,
  today: NaiveDate,
) -> BucketMap {
  // (region, capacity) -> roles in first-seen order, one per exercise
  let mut grouped: BTreeMap<(&str, &str), Vec<&RoleAssignment>> = BTreeMap::new();
  let mut seen: HashMap<(&str, &str, &str), usize> = HashMap::new();

  for role in roles {
    let key = (role.region.as_str(), role.capacity.as_str());
    let slot = grouped.entry(key).or_default();

    match seen.get(&(key.0, key.1, role.exercise_id.as_str())) {
      Some(&idx) => {
        // Same exercise prescribed twice for one capacity: strongest tier wins
        if role.contribution > slot[idx].contribution {
          slot[idx] = role;
        }
      }
      None => {
        seen.insert((key.0, key.1, role.exercise_id.as_str()), slot.len());
        slot.push(role);
      }
    }
  }

  let mut buckets = BucketMap::new();
  for ((region, capacity), members) in grouped {
    let mut bucket = CapacityBucket::new(region, capacity);

    for role in members {
      let entry = exercise_entry(role, history, today);
      bucket
        .foci
        .entry(entry.focus.clone())
        .or_default()
        .push(entry.exercise_id.clone());

      match entry.contribution {
        Contribution::High => bucket.high.push(entry),
        Contribution::Medium => bucket.medium.push(entry),
        Contribution::Low => bucket.low.push(entry),
      }
    }

    bucket.multi_focus = bucket.foci.len() > 1;

    buckets
      .entry(region.to_string())
      .or_default()
      .insert(capacity.to_string(), bucket);
  }

  buckets
}

fn exercise_entry(role: &RoleAssignment, history: &HistoryIndex, today: NaiveDate) -> ExerciseEntry {
  let never_done;
  let hist = match history.get(&role.exercise_id) {
    Some(h) => h,
    None => {
      never_done = ExerciseHistory::never_done(&role.exercise_id);
      &never_done
    }
  };

  ExerciseEntry {
    exercise_id: role.exercise_id.clone(),
    exercise_name: role.exercise_name.clone(),
    contribution: role.contribution,
    focus: role.focus_label().to_string(),
    days_since_last_done: hist.days_since_last_done(today),
    active_days_7: hist.active_days_7,
    active_days_21: hist.active_days_21,
  }
}
