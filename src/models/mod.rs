pub mod activity;
pub mod coverage;
pub mod role;

pub use activity::ActivityRecord;
pub use coverage::{
  CapacityBucket, CoverageReport, CoverageTree, ExerciseEntry, RegionBar, RegionBucket, Signals,
  Summary,
};
pub use role::{Contribution, RoleAssignment, GENERAL_FOCUS};
