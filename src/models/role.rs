use serde::{Deserialize, Serialize};

use crate::error::CoverageError;

/// Label used for exercises whose role has no focus. Aggregation only,
/// never presented as a therapist-defined focus.
pub const GENERAL_FOCUS: &str = "general";

// ---------------------------------------------------------------------------
/// Contribution Tier: How strongly an exercise addresses a role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Contribution {
  /// Read for recency fallback only
  #[default]
  Low,
  /// Capped bonus, or fallback anchor when a bucket has no high exercises
  Medium,
  /// Anchors every signal
  High,
}

impl std::fmt::Display for Contribution {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Low => write!(f, "low"),
      Self::Medium => write!(f, "medium"),
      Self::High => write!(f, "high"),
    }
  }
}

impl std::str::FromStr for Contribution {
  type Err = CoverageError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "low" => Ok(Self::Low),
      "medium" => Ok(Self::Medium),
      "high" => Ok(Self::High),
      _ => Err(CoverageError::UnknownContribution(s.to_string())),
    }
  }
}

// ---------------------------------------------------------------------------
/// Role Assignment: exercise -> (region, capacity, focus) prescription
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
  pub exercise_id: String,
  pub exercise_name: String,
  pub region: String,
  pub capacity: String,
  #[serde(default)]
  pub focus: Option<String>,
  #[serde(default)]
  pub contribution: Contribution,
}

impl RoleAssignment {
  /// Focus label for grouping, falling back to the synthetic "general"
  pub fn focus_label(&self) -> &str {
    self.focus
      .as_deref()
      .map(str::trim)
      .filter(|f| !f.is_empty())
      .unwrap_or(GENERAL_FOCUS)
  }
}
