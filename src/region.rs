//! Region aggregation
//!
//! Collapses a region's capacity buckets into one bar. Each bucket is
//! weighted by `high_count ^ exponent`, so buckets without primary
//! exercises do not move the region average.

use std::collections::BTreeMap;

use crate::config::ScoringConfig;
use crate::models::{CapacityBucket, RegionBar};

/// Weight of a bucket in its region's average
pub fn bucket_weight(bucket: &CapacityBucket, config: &ScoringConfig) -> f64 {
  match bucket.high_count() {
    0 => 0.0,
    n => (n as f64).powf(config.region_weight_exponent),
  }
}

pub fn aggregate_region(
  capacities: &BTreeMap<String, CapacityBucket>,
  config: &ScoringConfig,
) -> RegionBar {
  let weighted: Vec<(f64, &CapacityBucket)> = capacities
    .values()
    .map(|b| (bucket_weight(b, config), b))
    .filter(|(w, _)| *w > 0.0)
    .collect();
  let total: f64 = weighted.iter().map(|(w, _)| w).sum();

  if weighted.is_empty() || total <= 0.0 {
    return RegionBar {
      percent: 0,
      color_score: 0,
      opacity: to_bar(config.cold_start_opacity),
    };
  }

  let mean_of = |pick: fn(&CapacityBucket) -> f64| -> u8 {
    let sum: f64 = weighted.iter().map(|(w, b)| w * pick(*b)).sum();
    to_bar(sum / total)
  };

  RegionBar {
    percent: mean_of(|b| b.signals.percent),
    color_score: mean_of(|b| b.signals.color_score),
    opacity: mean_of(|b| b.signals.opacity),
  }
}

fn to_bar(value: f64) -> u8 {
  if value.is_nan() {
    0
  } else {
    value.round().clamp(0.0, 100.0) as u8
  }
}
