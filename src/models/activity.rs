use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One performed exercise occurrence from the activity log.
/// The log store excludes soft-deleted entries before handing these over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
  /// Records without an exercise id cannot be attributed and are skipped
  #[serde(default)]
  pub exercise_id: Option<String>,
  pub performed_at: DateTime<Utc>,
}

impl ActivityRecord {
  pub fn new(exercise_id: impl Into<String>, performed_at: DateTime<Utc>) -> Self {
    Self {
      exercise_id: Some(exercise_id.into()),
      performed_at,
    }
  }

  /// Calendar day the record falls on (UTC)
  pub fn day(&self) -> NaiveDate {
    self.performed_at.date_naive()
  }

  /// Attributable exercise id, if any
  pub fn attributed_id(&self) -> Option<&str> {
    self.exercise_id.as_deref().filter(|id| !id.is_empty())
  }
}
