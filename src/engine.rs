//! Coverage engine
//!
//! Pure function of (activity records, role assignments, today, config):
//!
//! records -> history -> buckets -> signals -> region bars -> summary
//!
//! Nothing is cached between calls and inputs are only borrowed, so
//! concurrent callers need no coordination.

use chrono::NaiveDate;

use crate::buckets::build_buckets;
use crate::config::ScoringConfig;
use crate::history::ExerciseHistory;
use crate::models::{ActivityRecord, CoverageReport, CoverageTree, RegionBucket, RoleAssignment, Summary};
use crate::region::aggregate_region;
use crate::signals::score_bucket;

/// Compute the coverage tree and summary for one plan snapshot
pub fn compute_coverage(
  records: &[ActivityRecord],
  roles: &[RoleAssignment],
  today: NaiveDate,
  config: &ScoringConfig,
) -> CoverageReport {
  let _span = tracing::debug_span!("compute_coverage", %today).entered();

  let history = ExerciseHistory::aggregate(records, today, config);
  tracing::debug!(
    records = records.len(),
    exercises_logged = history.len(),
    "aggregated activity history"
  );

  let buckets = build_buckets(roles, &history, today);
  tracing::debug!(roles = roles.len(), regions = buckets.len(), "built capacity buckets");

  let mut tree = CoverageTree::new();
  for (region, mut capacities) in buckets {
    for bucket in capacities.values_mut() {
      score_bucket(bucket, config);
    }
    let region_bar = aggregate_region(&capacities, config);
    tracing::debug!(
      region = %region,
      percent = region_bar.percent,
      color_score = region_bar.color_score,
      opacity = region_bar.opacity,
      "aggregated region"
    );
    tree.insert(
      region,
      RegionBucket {
        capacities,
        region_bar,
      },
    );
  }

  let summary = Summary::compute(roles, &history, &tree, today);
  tracing::debug!(
    coverage_7_percent = summary.coverage_7_percent,
    total_exercises = summary.total_exercises,
    mean_trend = summary.mean_trend,
    "computed coverage summary"
  );

  CoverageReport {
    as_of: today,
    tree,
    summary,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::Contribution;
  use crate::test_utils::{datetime_days_ago, mock_role, records_on_days, today};

  fn run(records: &[ActivityRecord], roles: &[RoleAssignment]) -> CoverageReport {
    compute_coverage(records, roles, today(), &ScoringConfig::default())
  }

  #[test]
  fn test_empty_plan() {
    let report = run(&records_on_days("squat", &[0, 1]), &[]);

    assert!(report.tree.is_empty());
    assert_eq!(report.summary.coverage_7_percent, 0);
    assert_eq!(report.summary.total_exercises, 0);
    assert_eq!(report.summary.days_since_last_activity, Some(0));
  }

  #[test]
  fn test_perfect_week() {
    let roles = vec![mock_role("squat", "knee", "strength", None, Contribution::High)];
    let records = records_on_days("squat", &[0, 1, 2, 3, 4, 5, 6]);

    let report = run(&records, &roles);
    let bucket = report.bucket("knee", "strength").unwrap();

    assert_eq!(bucket.signals.percent, 100.0);
    assert_eq!(bucket.signals.color_score, 100.0);
    assert!(bucket.signals.opacity >= 90.0, "opacity {}", bucket.signals.opacity);
    assert_eq!(bucket.high[0].days_since_last_done, Some(0));

    let bar = report.region_bar("knee").unwrap();
    assert_eq!(bar.percent, 100);
    assert_eq!(bar.color_score, 100);
    assert_eq!(report.summary.coverage_7_percent, 100);
    assert_eq!(report.summary.exercises_done_7, 1);
  }

  #[test]
  fn test_never_done() {
    let roles = vec![mock_role("squat", "knee", "strength", None, Contribution::High)];

    let report = run(&[], &roles);
    let bucket = report.bucket("knee", "strength").unwrap();

    assert_eq!(bucket.signals.percent, 0.0);
    assert_eq!(bucket.signals.color_score, 0.0);
    assert_eq!(bucket.signals.opacity, 0.0);
    assert_eq!(report.summary.days_since_last_activity, None);
  }

  #[test]
  fn test_multi_focus_split() {
    let roles = vec![
      mock_role("pallof", "core", "stability", Some("anti_rotation"), Contribution::High),
      mock_role("dead_bug", "core", "stability", Some("anti_extension"), Contribution::High),
    ];
    let records = records_on_days("pallof", &[0, 1, 2, 3, 4, 5, 6]);

    let report = run(&records, &roles);
    let bucket = report.bucket("core", "stability").unwrap();

    assert!(bucket.multi_focus);
    assert!((bucket.signals.percent - 40.0).abs() < 1e-9);
    assert_eq!(bucket.weakest_focus.as_deref(), Some("anti_extension"));
  }

  #[test]
  fn test_recovery_overrides_decay() {
    // Five straight days, nothing before: long-window mean alone is 5/15
    let roles = vec![
      mock_role("bridge", "hip", "strength", None, Contribution::High),
      mock_role("clam", "hip", "strength", None, Contribution::High),
    ];
    let mut records = records_on_days("bridge", &[0, 1, 2, 3, 4]);
    records.extend(records_on_days("clam", &[0, 1, 2, 3, 4]));

    let report = run(&records, &roles);
    let bucket = report.bucket("hip", "strength").unwrap();
    assert!(bucket.signals.opacity >= 90.0, "opacity {}", bucket.signals.opacity);
  }

  #[test]
  fn test_medium_only_never_above_cap() {
    let roles = vec![
      mock_role("step_up", "knee", "strength", None, Contribution::Medium),
      mock_role("lunge", "knee", "strength", None, Contribution::Medium),
    ];
    let mut records = Vec::new();
    for id in ["step_up", "lunge"] {
      records.extend(records_on_days(id, &(0..21).collect::<Vec<_>>()));
    }

    let report = run(&records, &roles);
    let bucket = report.bucket("knee", "strength").unwrap();
    assert_eq!(bucket.signals.percent, 50.0);
  }

  #[test]
  fn test_region_ignores_buckets_without_high() {
    let roles = vec![
      mock_role("squat", "knee", "strength", None, Contribution::High),
      mock_role("heel_slide", "knee", "mobility", None, Contribution::Low),
    ];
    let records = records_on_days("squat", &[0, 1, 2, 3, 4, 5, 6]);

    let report = run(&records, &roles);
    let mobility = report.bucket("knee", "mobility").unwrap();
    assert_eq!(mobility.signals.percent, 0.0);
    assert_eq!(mobility.signals.opacity, 20.0);

    let bar = report.region_bar("knee").unwrap();
    assert_eq!(bar.percent, 100);
  }

  #[test]
  fn test_low_only_region_bar_is_cold_start() {
    let roles = vec![mock_role("cat_cow", "spine", "mobility", None, Contribution::Low)];
    let records = records_on_days("cat_cow", &[0]);

    let report = run(&records, &roles);
    let bar = report.region_bar("spine").unwrap();
    assert_eq!((bar.percent, bar.color_score, bar.opacity), (0, 0, 20));

    // Recency still reads the low tier
    let bucket = report.bucket("spine", "mobility").unwrap();
    assert_eq!(bucket.signals.color_score, 100.0);
  }

  #[test]
  fn test_signals_in_range_for_mixed_plan() {
    let roles = vec![
      mock_role("a", "core", "stability", Some("anti_rotation"), Contribution::High),
      mock_role("b", "core", "stability", None, Contribution::Medium),
      mock_role("c", "core", "strength", None, Contribution::Low),
      mock_role("d", "hip", "strength", Some("abduction"), Contribution::High),
      mock_role("e", "hip", "strength", Some("extension"), Contribution::High),
      mock_role("f", "hip", "strength", None, Contribution::Medium),
    ];
    let mut records = records_on_days("a", &[0, 0, 1, 3, 8, 15, 19]);
    records.extend(records_on_days("b", &(0..30).collect::<Vec<_>>()));
    records.extend(records_on_days("d", &[12]));
    records.extend(records_on_days("f", &[2, 5, 6]));

    let report = run(&records, &roles);
    for region in report.tree.values() {
      let bar = region.region_bar;
      for v in [bar.percent, bar.color_score, bar.opacity] {
        assert!(v <= 100);
      }
      for bucket in region.capacities.values() {
        let s = bucket.signals;
        for v in [s.percent, s.color_score, s.opacity] {
          assert!((0.0..=100.0).contains(&v), "{}/{} out of range: {}", bucket.region, bucket.capacity, v);
        }
      }
    }
    assert!(report.summary.mean_trend <= 100);
  }

  #[test]
  fn test_deterministic_output() {
    let roles = vec![
      mock_role("pallof", "core", "stability", Some("anti_rotation"), Contribution::High),
      mock_role("dead_bug", "core", "stability", None, Contribution::Medium),
      mock_role("squat", "knee", "strength", None, Contribution::High),
    ];
    let mut records = records_on_days("pallof", &[0, 2, 9]);
    records.extend(records_on_days("squat", &[1, 1, 4]));

    let first = run(&records, &roles).to_json();
    let mut reversed = records.clone();
    reversed.reverse();
    let second = run(&reversed, &roles).to_json();

    assert_eq!(first, second);
    assert_eq!(first, run(&records, &roles).to_json());
  }

  #[test]
  fn test_concurrent_invocations_agree() {
    let roles = vec![mock_role("squat", "knee", "strength", None, Contribution::High)];
    let records = records_on_days("squat", &[0, 3, 5]);
    let expected = run(&records, &roles).to_json();

    std::thread::scope(|s| {
      let handles: Vec<_> = (0..4).map(|_| s.spawn(|| run(&records, &roles).to_json())).collect();
      for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
      }
    });
  }

  #[test]
  fn test_report_json_shape() {
    let roles = vec![mock_role("squat", "knee", "strength", None, Contribution::High)];
    let records = vec![ActivityRecord::new("squat", datetime_days_ago(0))];

    let json: serde_json::Value = serde_json::from_str(&run(&records, &roles).to_json()).unwrap();

    assert_eq!(json["asOf"], "2026-03-15");
    assert_eq!(json["tree"]["knee"]["_regionBar"]["colorScore"], 100);
    assert_eq!(json["tree"]["knee"]["strength"]["colorScore"], 100.0);
    assert_eq!(json["tree"]["knee"]["strength"]["high"][0]["activeDays7"], 1);
    assert_eq!(json["summary"]["coverage7Percent"], 100);
    assert_eq!(json["summary"]["daysSinceLastActivity"], 0);
    assert!(json["tree"]["knee"]["strength"].get("weakestFocus").is_none());
  }
}
