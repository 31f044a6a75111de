//! Scoring configuration
//!
//! Every tunable threshold of the engine lives in one immutable
//! `ScoringConfig`. Alternate tuning is a data change: load it from JSON
//! (partial documents overlay the defaults) or point `COVERAGE_CONFIG_PATH`
//! at a file.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::error::{CoverageError, CoverageResult};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const CONFIG_PATH_VAR: &str = "COVERAGE_CONFIG_PATH";
const REGION_WEIGHT_EXPONENT_VAR: &str = "COVERAGE_REGION_WEIGHT_EXPONENT";
const TREND_REFERENCE_DAYS_VAR: &str = "COVERAGE_TREND_REFERENCE_DAYS";

/// ---------------------------------------------------------------------------
/// Tuning Tables
/// ---------------------------------------------------------------------------

/// Trend multiplier applied once the freshest anchor exercise is `min_days` old
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayStep {
  pub min_days: i64,
  pub factor: f64,
}

/// Trend floor granted when mean short-window active days reaches `min_mean_days`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryFloor {
  pub min_mean_days: f64,
  pub high_floor: f64,
  pub medium_floor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
  /// Density window, also the divisor of per-exercise density
  pub short_window_days: i64,
  /// Trend window
  pub long_window_days: i64,
  /// Recency score for 0, 1, 2, ... days since done
  pub recency_curve: Vec<f64>,
  /// Points lost per day past the end of the curve
  pub recency_daily_penalty: f64,
  /// Mean long-window active days that counts as fully covered
  pub trend_reference_days: f64,
  /// Ordered by `min_days` descending, first match wins
  pub decay: Vec<DecayStep>,
  /// Ordered by `min_mean_days` descending, first match wins
  pub recovery: Vec<RecoveryFloor>,
  pub worst_weight: f64,
  pub others_weight: f64,
  pub medium_bonus_factor: f64,
  pub medium_bonus_cap: f64,
  pub medium_only_density_cap: f64,
  pub cold_start_opacity: f64,
  pub region_weight_exponent: f64,
}

impl Default for ScoringConfig {
  fn default() -> Self {
    Self {
      short_window_days: 7,
      long_window_days: 21,
      recency_curve: vec![100.0, 85.0, 60.0, 35.0, 15.0],
      recency_daily_penalty: 2.0,
      trend_reference_days: 15.0,
      decay: vec![
        DecayStep { min_days: 14, factor: 0.3 },
        DecayStep { min_days: 10, factor: 0.5 },
        DecayStep { min_days: 7, factor: 0.8 },
      ],
      recovery: vec![
        RecoveryFloor { min_mean_days: 5.0, high_floor: 90.0, medium_floor: 70.0 },
        RecoveryFloor { min_mean_days: 4.0, high_floor: 70.0, medium_floor: 50.0 },
        RecoveryFloor { min_mean_days: 3.0, high_floor: 50.0, medium_floor: 35.0 },
      ],
      worst_weight: 0.6,
      others_weight: 0.4,
      medium_bonus_factor: 0.4,
      medium_bonus_cap: 15.0,
      medium_only_density_cap: 50.0,
      cold_start_opacity: 20.0,
      region_weight_exponent: 1.3,
    }
  }
}

impl ScoringConfig {
  /// Parse a (possibly partial) JSON document over the defaults
  pub fn from_json(json: &str) -> CoverageResult<Self> {
    let config: Self = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_default()
  }

  /// Load from the process environment (and `.env` if present)
  pub fn from_env() -> CoverageResult<Self> {
    dotenvy::dotenv().ok();
    Self::from_env_with(|k| env::var(k).ok())
  }

  /// Testable core of `from_env`: values come from the provided lookup
  pub fn from_env_with<F>(mut get: F) -> CoverageResult<Self>
  where
    F: FnMut(&str) -> Option<String>,
  {
    let mut config = match get(CONFIG_PATH_VAR) {
      Some(path) if !path.trim().is_empty() => {
        let path = PathBuf::from(path.trim());
        let json = fs::read_to_string(&path)
          .map_err(|source| CoverageError::ConfigIo { path: path.clone(), source })?;
        tracing::debug!(path = %path.display(), "loading scoring config");
        serde_json::from_str::<Self>(&json)?
      }
      Some(_) => {
        tracing::warn!("{} is set but empty, using default scoring config", CONFIG_PATH_VAR);
        Self::default()
      }
      None => Self::default(),
    };

    if let Some(raw) = get(REGION_WEIGHT_EXPONENT_VAR) {
      config.region_weight_exponent = parse_override(REGION_WEIGHT_EXPONENT_VAR, &raw)?;
    }
    if let Some(raw) = get(TREND_REFERENCE_DAYS_VAR) {
      config.trend_reference_days = parse_override(TREND_REFERENCE_DAYS_VAR, &raw)?;
    }

    config.validate()?;
    Ok(config)
  }

  /// Check the tables are usable by the engine
  pub fn validate(&self) -> CoverageResult<()> {
    let invalid = |msg: String| Err(CoverageError::InvalidConfig(msg));

    if self.short_window_days <= 0 || self.long_window_days < self.short_window_days {
      return invalid(format!(
        "windows must satisfy 0 < short ({}) <= long ({})",
        self.short_window_days, self.long_window_days
      ));
    }
    if self.recency_curve.is_empty() {
      return invalid("recency_curve must not be empty".to_string());
    }
    if self.recency_curve.iter().any(|v| !is_score(*v)) {
      return invalid("recency_curve values must be within 0-100".to_string());
    }
    if self.recency_curve.windows(2).any(|w| w[1] > w[0]) {
      return invalid("recency_curve must be non-increasing".to_string());
    }
    if !(self.recency_daily_penalty >= 0.0) {
      return invalid("recency_daily_penalty must be >= 0".to_string());
    }
    if !(self.trend_reference_days > 0.0) {
      return invalid("trend_reference_days must be > 0".to_string());
    }
    if self.decay.windows(2).any(|w| w[1].min_days >= w[0].min_days) {
      return invalid("decay steps must be ordered by min_days descending".to_string());
    }
    if self.decay.iter().any(|s| !(0.0..=1.0).contains(&s.factor)) {
      return invalid("decay factors must be within 0-1".to_string());
    }
    if self.recovery.windows(2).any(|w| w[1].min_mean_days >= w[0].min_mean_days) {
      return invalid("recovery floors must be ordered by min_mean_days descending".to_string());
    }
    if self.recovery.iter().any(|r| !is_score(r.high_floor) || !is_score(r.medium_floor)) {
      return invalid("recovery floors must be within 0-100".to_string());
    }
    if self.worst_weight < 0.0
      || self.others_weight < 0.0
      || (self.worst_weight + self.others_weight - 1.0).abs() > 1e-9
    {
      return invalid(format!(
        "worst/others weights must be non-negative and sum to 1 (got {} + {})",
        self.worst_weight, self.others_weight
      ));
    }
    if !(self.medium_bonus_factor >= 0.0) {
      return invalid("medium_bonus_factor must be >= 0".to_string());
    }
    for (name, value) in [
      ("medium_bonus_cap", self.medium_bonus_cap),
      ("medium_only_density_cap", self.medium_only_density_cap),
      ("cold_start_opacity", self.cold_start_opacity),
    ] {
      if !is_score(value) {
        return invalid(format!("{} must be within 0-100 (got {})", name, value));
      }
    }
    if !(self.region_weight_exponent >= 0.0) {
      return invalid("region_weight_exponent must be >= 0".to_string());
    }

    Ok(())
  }

  /// Trend multiplier for the freshest anchor exercise's age
  pub fn decay_factor(&self, min_days_since: i64) -> f64 {
    self.decay
      .iter()
      .find(|step| min_days_since >= step.min_days)
      .map_or(1.0, |step| step.factor)
  }

  /// Trend floor for a mean short-window active-day count
  pub fn recovery_floor(&self, mean_active_days: f64, medium_only: bool) -> f64 {
    self.recovery
      .iter()
      .find(|r| mean_active_days >= r.min_mean_days)
      .map_or(0.0, |r| if medium_only { r.medium_floor } else { r.high_floor })
  }
}

fn is_score(value: f64) -> bool {
  (0.0..=100.0).contains(&value)
}

fn parse_override(var: &str, raw: &str) -> CoverageResult<f64> {
  raw
    .trim()
    .parse::<f64>()
    .map_err(|_| CoverageError::InvalidConfig(format!("{} is not a number: {}", var, raw)))
}
