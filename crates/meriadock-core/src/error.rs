//! Error types for `meriadock-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown program status: {0:?}")]
  UnknownProgramStatus(String),

  #[error("unknown certificate type: {0:?}")]
  UnknownCertificateType(String),

  #[error("unknown support type: {0:?}")]
  UnknownSupportType(String),

  #[error("unknown completion flag: {0:?}")]
  UnknownCompletion(String),

  #[error("unknown goal compliance: {0:?}")]
  UnknownGoalCompliance(String),

  #[error("unknown interaction type: {0:?}")]
  UnknownInteractionType(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
