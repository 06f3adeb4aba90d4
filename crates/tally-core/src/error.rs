//! Error types for `tally-core`.

use thiserror::Error;

use crate::card::CardId;

/// Failure of the persistence medium, classified by the storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
  /// The underlying medium could not be reached or written.
  #[error("storage unavailable: {0}")]
  Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A persisted collection exists but cannot be deserialised into cards.
  #[error("persisted collection is corrupt: {0}")]
  Corrupt(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
  pub fn unavailable(
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Self::Unavailable(err.into())
  }

  pub fn corrupt(
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Self::Corrupt(err.into())
  }
}

/// Error returned by [`CardRepository`](crate::repository::CardRepository)
/// operations.
#[derive(Debug, Error)]
pub enum Error {
  #[error("card not found: {0}")]
  NotFound(CardId),

  #[error(transparent)]
  Storage(#[from] StorageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
