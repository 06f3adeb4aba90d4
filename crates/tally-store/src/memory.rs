//! [`MemoryBackend`] — an in-process collection, for tests.

use tally_core::{backend::StorageBackend, card::Card, error::StorageError};
use tokio::sync::RwLock;

/// A card collection held in memory. Nothing survives the process; used
/// where the persistence medium is not the point of the test.
#[derive(Debug, Default)]
pub struct MemoryBackend {
  cards: RwLock<Vec<Card>>,
}

impl MemoryBackend {
  pub fn new() -> Self {
    Self::default()
  }
}

impl StorageBackend for MemoryBackend {
  async fn read_all(&self) -> Result<Vec<Card>, StorageError> {
    Ok(self.cards.read().await.clone())
  }

  async fn write_all(&self, cards: &[Card]) -> Result<(), StorageError> {
    *self.cards.write().await = cards.to_vec();
    Ok(())
  }
}
