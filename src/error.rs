use serde::Serialize;
use std::path::PathBuf;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

/// Errors raised at the edges of the engine (configuration and ingestion).
/// Scoring itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
  #[error("Invalid scoring config: {0}")]
  InvalidConfig(String),

  #[error("Failed to parse scoring config: {0}")]
  ConfigParse(#[from] serde_json::Error),

  #[error("Failed to read scoring config at {}: {source}", path.display())]
  ConfigIo {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Unknown contribution tier: {0}")]
  UnknownContribution(String),
}

impl Serialize for CoverageError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

pub type CoverageResult<T> = Result<T, CoverageError>;
