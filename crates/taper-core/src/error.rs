//! Error types for `taper-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("mood score must be between 1 and 10, got {0}")]
  InvalidMoodScore(i64),

  #[error("dose must be a non-negative number, got {0}")]
  InvalidDose(f64),

  #[error("unknown discriminant: {0:?}")]
  UnknownDiscriminant(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
