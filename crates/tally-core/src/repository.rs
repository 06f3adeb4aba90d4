//! [`CardRepository`] — CRUD orchestration over a [`StorageBackend`].
//!
//! Every operation is a full read-modify-write cycle over the whole
//! collection; there is no partial or indexed persistence. Mutating
//! operations are serialised through a single in-process gate, so two
//! writers in the same process cannot interleave their cycles. Writers in
//! other processes remain unfenced — the persistence contract assumes one
//! writing process.

use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;

use crate::{
  backend::StorageBackend,
  card::{Card, CardId, CardPatch, NewCard},
  error::{Error, Result},
};

/// The CRUD layer mediating between the API and a storage backend.
///
/// Owns identifier assignment (`max(existing ids) + 1`, 1 when empty) and
/// refreshes the derived columns on every read, so callers never observe a
/// stale `daysPassed`/`totalPayment`.
pub struct CardRepository<B> {
  backend:    B,
  write_gate: Mutex<()>,
}

impl<B: StorageBackend> CardRepository<B> {
  pub fn new(backend: B) -> Self {
    Self {
      backend,
      write_gate: Mutex::new(()),
    }
  }

  /// `now` for derivation purposes, evaluated once per operation.
  fn today() -> NaiveDate {
    Local::now().date_naive()
  }

  /// The full collection, in storage order, derived fields refreshed.
  pub async fn list(&self) -> Result<Vec<Card>> {
    let mut cards = self.backend.read_all().await?;
    let today = Self::today();
    for card in &mut cards {
      card.refresh_derived(today);
    }
    Ok(cards)
  }

  /// A single card by id, derived fields refreshed. `None` if absent.
  pub async fn get(&self, id: CardId) -> Result<Option<Card>> {
    let cards = self.backend.read_all().await?;
    Ok(cards.into_iter().find(|c| c.id == id).map(|mut card| {
      card.refresh_derived(Self::today());
      card
    }))
  }

  /// Assign the next id, compute derived fields, append, persist, and
  /// return the new card. Input validation is the API boundary's job.
  pub async fn create(&self, new: NewCard) -> Result<Card> {
    let _gate = self.write_gate.lock().await;

    let mut cards = self.backend.read_all().await?;
    let id = cards.iter().map(|c| c.id).max().unwrap_or(0) + 1;
    let card = Card::from_new(id, new, Self::today());

    cards.push(card.clone());
    self.backend.write_all(&cards).await?;
    Ok(card)
  }

  /// Merge `patch` over the card with `id`, recompute derived fields,
  /// persist, and return the updated card. [`Error::NotFound`] without
  /// modification if the id is unknown.
  pub async fn update(&self, id: CardId, patch: CardPatch) -> Result<Card> {
    let _gate = self.write_gate.lock().await;

    let mut cards = self.backend.read_all().await?;
    let Some(card) = cards.iter_mut().find(|c| c.id == id) else {
      return Err(Error::NotFound(id));
    };

    patch.apply_to(card);
    card.refresh_derived(Self::today());
    let updated = card.clone();

    self.backend.write_all(&cards).await?;
    Ok(updated)
  }

  /// Remove the card with `id` if present. Returns whether a removal
  /// happened; deleting a missing id is not an error, and nothing is
  /// persisted in that case.
  pub async fn delete(&self, id: CardId) -> Result<bool> {
    let _gate = self.write_gate.lock().await;

    let mut cards = self.backend.read_all().await?;
    let before = cards.len();
    cards.retain(|c| c.id != id);
    if cards.len() == before {
      return Ok(false);
    }

    self.backend.write_all(&cards).await?;
    Ok(true)
  }
}
