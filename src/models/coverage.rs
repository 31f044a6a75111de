use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Contribution;

/// ---------------------------------------------------------------------------
/// Exercise Entry: one prescribed exercise inside a capacity bucket
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
  pub exercise_id: String,
  pub exercise_name: String,
  pub contribution: Contribution,
  pub focus: String,
  /// None when the exercise has never been done
  pub days_since_last_done: Option<i64>,
  pub active_days_7: u32,
  pub active_days_21: u32,
}

impl ExerciseEntry {
  pub fn never_done(&self) -> bool {
    self.days_since_last_done.is_none()
  }
}

/// ---------------------------------------------------------------------------
/// Signals: the three 0-100 scores of a bucket
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signals {
  /// Density: 7-day coverage percentage
  pub percent: f64,
  /// Recency: days-since-done score
  pub color_score: f64,
  /// Trend: 21-day activity with decay and recovery
  pub opacity: f64,
}

impl Signals {
  pub fn cold_start(opacity: f64) -> Self {
    Self {
      percent: 0.0,
      color_score: 0.0,
      opacity,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Capacity Bucket: all exercises sharing (region, capacity)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityBucket {
  pub region: String,
  pub capacity: String,
  pub high: Vec<ExerciseEntry>,
  pub medium: Vec<ExerciseEntry>,
  pub low: Vec<ExerciseEntry>,
  /// Focus label -> exercise ids, "general" included
  pub foci: BTreeMap<String, Vec<String>>,
  pub multi_focus: bool,
  #[serde(flatten)]
  pub signals: Signals,
  pub color: String,
  /// Focus dragging density down in a multi-focus bucket
  #[serde(skip_serializing_if = "Option::is_none")]
  pub weakest_focus: Option<String>,
}

impl CapacityBucket {
  pub fn new(region: &str, capacity: &str) -> Self {
    Self {
      region: region.to_string(),
      capacity: capacity.to_string(),
      high: Vec::new(),
      medium: Vec::new(),
      low: Vec::new(),
      foci: BTreeMap::new(),
      multi_focus: false,
      signals: Signals::cold_start(0.0),
      color: String::new(),
      weakest_focus: None,
    }
  }

  pub fn tier(&self, contribution: Contribution) -> &[ExerciseEntry] {
    match contribution {
      Contribution::High => &self.high,
      Contribution::Medium => &self.medium,
      Contribution::Low => &self.low,
    }
  }

  pub fn high_count(&self) -> usize {
    self.high.len()
  }

  pub fn exercise_count(&self) -> usize {
    self.high.len() + self.medium.len() + self.low.len()
  }

  pub fn is_empty(&self) -> bool {
    self.exercise_count() == 0
  }
}

/// ---------------------------------------------------------------------------
/// Region Bucket: capacity buckets plus the aggregate region bar
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionBar {
  pub percent: u8,
  pub color_score: u8,
  pub opacity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionBucket {
  #[serde(flatten)]
  pub capacities: BTreeMap<String, CapacityBucket>,
  #[serde(rename = "_regionBar")]
  pub region_bar: RegionBar,
}

/// region -> { capacity -> bucket, _regionBar }
pub type CoverageTree = BTreeMap<String, RegionBucket>;

/// ---------------------------------------------------------------------------
/// Summary: overview metrics across the whole plan
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
  /// None when nothing was ever logged
  pub days_since_last_activity: Option<i64>,
  pub coverage_7_percent: u8,
  pub exercises_done_7: usize,
  pub total_exercises: usize,
  pub mean_trend: u8,
}

/// ---------------------------------------------------------------------------
/// Coverage Report: response body for the reporting endpoint
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
  pub as_of: NaiveDate,
  pub tree: CoverageTree,
  pub summary: Summary,
}

impl CoverageReport {
  /// Serialize for the response body
  pub fn to_json(&self) -> String {
    serde_json::to_string(self).unwrap_or_default()
  }

  pub fn bucket(&self, region: &str, capacity: &str) -> Option<&CapacityBucket> {
    self.tree.get(region)?.capacities.get(capacity)
  }

  pub fn region_bar(&self, region: &str) -> Option<RegionBar> {
    self.tree.get(region).map(|r| r.region_bar)
  }
}
