//! The [`StorageBackend`] trait — whole-collection persistence contract.
//!
//! Implemented by concrete backends (`tally-store`). Higher layers
//! ([`CardRepository`](crate::repository::CardRepository), `tally-api`)
//! depend on this abstraction, not on any particular medium.

use std::future::Future;

use crate::{card::Card, error::StorageError};

/// Abstraction over the persistence medium.
///
/// The record collection is one logical blob: [`read_all`](Self::read_all)
/// returns it and [`write_all`](Self::write_all) replaces it. Both are
/// idempotent. A failed `write_all` must leave the previously persisted
/// state authoritative — nothing beyond the medium's own write primitive is
/// guaranteed, so this is a single-writer contract, not a transactional
/// one. A medium holding no collection yet reads as the empty sequence.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes (tokio with axum).
pub trait StorageBackend: Send + Sync {
  /// Read the entire persisted collection, in persisted order.
  fn read_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Card>, StorageError>> + Send + '_;

  /// Replace the entire persisted collection with `cards`.
  fn write_all<'a>(
    &'a self,
    cards: &'a [Card],
  ) -> impl Future<Output = Result<(), StorageError>> + Send + 'a;
}
