//! Error type for `taper-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] taper_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {column} value: {value:?}")]
  UnknownValue { column: &'static str, value: String },

  /// A vote or aggregate write referenced a thread or reply that does not
  /// exist.
  #[error("vote target not found: {0}")]
  TargetNotFound(uuid::Uuid),

  #[error("vote not found for voter {voter_id} on {target_id}")]
  VoteNotFound { voter_id: uuid::Uuid, target_id: uuid::Uuid },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
