//! Signal calculation for capacity buckets
//!
//! Three independent 0-100 signals per bucket:
//! - density (percent): short-window coverage
//! - recency (color score): days since the anchor exercises were last done
//! - trend (opacity): long-window activity with decay and recovery
//!
//! Tier semantics shared by all three:
//! - high exercises anchor the signal
//! - medium exercises add a capped bonus, or anchor when there is no high
//! - low exercises are read for recency fallback only
//!
//! Multi-focus buckets score each focus separately and blend the worst
//! focus with the rest, so one neglected focus cannot hide behind others.

use std::collections::BTreeMap;

use crate::color::color_for_score;
use crate::config::ScoringConfig;
use crate::models::{CapacityBucket, Contribution, ExerciseEntry, Signals};

/// ---------------------------------------------------------------------------
/// Worst/Others Focus Blend
/// ---------------------------------------------------------------------------

/// Result of blending per-focus scores
#[derive(Debug, Clone, PartialEq)]
pub struct FocusBlend<'a> {
  pub value: f64,
  pub worst_focus: &'a str,
  pub foci_scored: usize,
}

/// Score every focus with `score`, then blend `worst_weight * worst +
/// others_weight * mean(others)`.
///
/// The worst focus is the lowest score; on an exact tie the focus whose
/// label sorts first is taken. With a single focus, others equals worst.
pub fn combine_worst_others<'a, F>(
  foci: &BTreeMap<&'a str, Vec<&ExerciseEntry>>,
  config: &ScoringConfig,
  mut score: F,
) -> Option<FocusBlend<'a>>
where
  F: FnMut(&[&ExerciseEntry]) -> f64,
{
  let scores: Vec<(&'a str, f64)> = foci
    .iter()
    .map(|(label, members)| (*label, score(members.as_slice())))
    .collect();

  let mut worst_idx = 0;
  for (idx, (_, value)) in scores.iter().enumerate().skip(1) {
    if *value < scores[worst_idx].1 {
      worst_idx = idx;
    }
  }
  let (worst_focus, worst) = *scores.get(worst_idx)?;

  let others = if scores.len() > 1 {
    let rest: Vec<f64> = scores
      .iter()
      .enumerate()
      .filter(|(idx, _)| *idx != worst_idx)
      .map(|(_, (_, value))| *value)
      .collect();
    mean(&rest)
  } else {
    worst
  };

  Some(FocusBlend {
    value: config.worst_weight * worst + config.others_weight * others,
    worst_focus,
    foci_scored: scores.len(),
  })
}

/// High-tier exercises grouped by focus label; foci without high exercises are absent
fn high_by_focus(bucket: &CapacityBucket) -> BTreeMap<&str, Vec<&ExerciseEntry>> {
  let mut foci: BTreeMap<&str, Vec<&ExerciseEntry>> = BTreeMap::new();
  for ex in &bucket.high {
    foci.entry(ex.focus.as_str()).or_default().push(ex);
  }
  foci
}

/// ---------------------------------------------------------------------------
/// Density (short-window coverage %)
/// ---------------------------------------------------------------------------

/// Density plus, for multi-focus buckets, the focus dragging it down
pub fn density(bucket: &CapacityBucket, config: &ScoringConfig) -> (f64, Option<String>) {
  if bucket.high.is_empty() {
    // Medium-only buckets are partial evidence and never show full coverage
    if bucket.medium.is_empty() {
      return (0.0, None);
    }
    let medium: Vec<&ExerciseEntry> = bucket.medium.iter().collect();
    let pct = coverage_ratio(&medium, config) * 100.0;
    return (clamp_score(pct.min(config.medium_only_density_cap)), None);
  }

  let bonus = medium_bonus(bucket, config);

  if bucket.multi_focus {
    let foci = high_by_focus(bucket);
    if let Some(blend) =
      combine_worst_others(&foci, config, |members| coverage_ratio(members, config) * 100.0)
    {
      let weakest = (blend.foci_scored > 1).then(|| blend.worst_focus.to_string());
      return (clamp_score(blend.value + bonus), weakest);
    }
  }

  let high: Vec<&ExerciseEntry> = bucket.high.iter().collect();
  (clamp_score(coverage_ratio(&high, config) * 100.0 + bonus), None)
}

/// Mean of per-exercise `active_days_7 / window`
fn coverage_ratio(members: &[&ExerciseEntry], config: &ScoringConfig) -> f64 {
  let window = config.short_window_days as f64;
  let ratios: Vec<f64> = members
    .iter()
    .map(|ex| (ex.active_days_7 as f64 / window).min(1.0))
    .collect();
  mean(&ratios)
}

/// Capped bonus medium exercises add on top of a high-anchored density
fn medium_bonus(bucket: &CapacityBucket, config: &ScoringConfig) -> f64 {
  let high_count = bucket.high_count();
  if high_count == 0 || bucket.medium.is_empty() {
    return 0.0;
  }
  let window = config.short_window_days as f64;
  let weighted: f64 = bucket
    .medium
    .iter()
    .map(|ex| (ex.active_days_7 as f64 / window).min(1.0) * config.medium_bonus_factor)
    .sum();
  (weighted / high_count as f64 * 100.0).min(config.medium_bonus_cap)
}

/// ---------------------------------------------------------------------------
/// Recency (color score)
/// ---------------------------------------------------------------------------

/// Score for a number of days since last done, walking the configured curve
pub fn recency_score(days_since: i64, config: &ScoringConfig) -> f64 {
  let days = days_since.max(0);
  let curve = &config.recency_curve;
  let Some(&tail) = curve.last() else {
    return 0.0;
  };

  let score = match curve.get(days as usize) {
    Some(&v) => v,
    None => {
      let extra = (days - (curve.len() as i64 - 1)) as f64;
      tail - extra * config.recency_daily_penalty
    }
  };
  clamp_score(score)
}

/// The stalest exercise decides; anything never done scores 0
fn recency_for(members: &[&ExerciseEntry], config: &ScoringConfig) -> f64 {
  if members.is_empty() || members.iter().any(|ex| ex.never_done()) {
    return 0.0;
  }
  members
    .iter()
    .filter_map(|ex| ex.days_since_last_done)
    .max()
    .map_or(0.0, |days| recency_score(days, config))
}

pub fn recency(bucket: &CapacityBucket, config: &ScoringConfig) -> f64 {
  let Some(anchor) = recency_anchor(bucket) else {
    return 0.0;
  };

  if bucket.multi_focus && anchor == Contribution::High {
    let foci = high_by_focus(bucket);
    if let Some(blend) = combine_worst_others(&foci, config, |members| recency_for(members, config)) {
      return clamp_score(blend.value);
    }
  }

  let members: Vec<&ExerciseEntry> = bucket.tier(anchor).iter().collect();
  recency_for(&members, config)
}

/// high, else medium, else low
fn recency_anchor(bucket: &CapacityBucket) -> Option<Contribution> {
  [Contribution::High, Contribution::Medium, Contribution::Low]
    .into_iter()
    .find(|tier| !bucket.tier(*tier).is_empty())
}

/// ---------------------------------------------------------------------------
/// Trend (long-window opacity)
/// ---------------------------------------------------------------------------

/// Long-window base, decayed by staleness, floored by a recent burst
fn opacity_for(members: &[&ExerciseEntry], medium_only: bool, config: &ScoringConfig) -> f64 {
  if members.is_empty() {
    return config.cold_start_opacity;
  }

  let long: Vec<f64> = members.iter().map(|ex| ex.active_days_21 as f64).collect();
  let base = (mean(&long) / config.trend_reference_days).min(1.0) * 100.0;

  let freshest = members.iter().filter_map(|ex| ex.days_since_last_done).min();
  let decayed = match freshest {
    Some(days) => base * config.decay_factor(days),
    None => base,
  };

  let short: Vec<f64> = members.iter().map(|ex| ex.active_days_7 as f64).collect();
  let floor = config.recovery_floor(mean(&short), medium_only);

  clamp_score(decayed.max(floor))
}

pub fn trend(bucket: &CapacityBucket, config: &ScoringConfig) -> f64 {
  if !bucket.high.is_empty() {
    if bucket.multi_focus {
      let foci = high_by_focus(bucket);
      if let Some(blend) =
        combine_worst_others(&foci, config, |members| opacity_for(members, false, config))
      {
        return clamp_score(blend.value.round());
      }
    }
    let high: Vec<&ExerciseEntry> = bucket.high.iter().collect();
    return opacity_for(&high, false, config).round();
  }

  if !bucket.medium.is_empty() {
    let medium: Vec<&ExerciseEntry> = bucket.medium.iter().collect();
    return opacity_for(&medium, true, config).round();
  }

  // Low-only buckets carry no trend evidence
  config.cold_start_opacity
}

/// ---------------------------------------------------------------------------
/// Bucket Scoring
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BucketScore {
  pub signals: Signals,
  pub weakest_focus: Option<String>,
}

pub fn compute_signals(bucket: &CapacityBucket, config: &ScoringConfig) -> BucketScore {
  if bucket.is_empty() {
    return BucketScore {
      signals: Signals::cold_start(config.cold_start_opacity),
      weakest_focus: None,
    };
  }

  let (percent, weakest_focus) = density(bucket, config);
  let signals = Signals {
    percent,
    color_score: recency(bucket, config),
    opacity: trend(bucket, config),
  };

  BucketScore {
    signals,
    weakest_focus,
  }
}

/// Fill in the signals, color and weakest focus of a built bucket
pub fn score_bucket(bucket: &mut CapacityBucket, config: &ScoringConfig) {
  let score = compute_signals(bucket, config);
  tracing::trace!(
    region = %bucket.region,
    capacity = %bucket.capacity,
    percent = score.signals.percent,
    color_score = score.signals.color_score,
    opacity = score.signals.opacity,
    "scored capacity bucket"
  );
  bucket.color = color_for_score(score.signals.color_score);
  bucket.signals = score.signals;
  bucket.weakest_focus = score.weakest_focus;
}

fn mean(values: &[f64]) -> f64 {
  if values.is_empty() {
    0.0
  } else {
    values.iter().sum::<f64>() / values.len() as f64
  }
}

fn clamp_score(value: f64) -> f64 {
  if value.is_nan() {
    0.0
  } else {
    value.clamp(0.0, 100.0)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
