//! Regimen coverage engine
//!
//! Scores how well a prescribed rehab regimen is being followed. Role
//! assignments (exercise -> region/capacity/focus, with a contribution tier)
//! and the activity log are turned into a region -> capacity tree of
//! density, recency and trend signals plus an overview summary.
//!
//! ```ignore
//! let config = ScoringConfig::from_env()?;
//! let report = compute_coverage(&records, &roles, today, &config);
//! let body = report.to_json();
//! ```

pub mod buckets;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod models;
pub mod region;
pub mod signals;
mod summary;

#[cfg(test)]
mod test_utils;

pub use color::color_for_score;
pub use config::ScoringConfig;
pub use engine::compute_coverage;
pub use error::{CoverageError, CoverageResult};
pub use history::{ExerciseHistory, HistoryIndex};
pub use models::{
  ActivityRecord, CapacityBucket, Contribution, CoverageReport, CoverageTree, ExerciseEntry,
  RegionBar, RegionBucket, RoleAssignment, Signals, Summary,
};
