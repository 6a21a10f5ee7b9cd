//! Error types for the SQLite store.

use thiserror::Error;

/// Errors produced by the SQLite store.
#[derive(Debug, Error)]
pub enum Error {
  /// Underlying database failure.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored enum literal did not decode into its domain type.
  #[error("invalid literal in database: {0}")]
  Literal(#[from] meriadock_core::Error),

  /// A stored UUID column held a malformed value.
  #[error("invalid UUID in database: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored date or timestamp column held a malformed value.
  #[error("invalid timestamp in database: {0}")]
  Timestamp(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
