//! Integration tests for the repository over the memory and file backends.

use chrono::{Duration, Local, NaiveDate};
use tally_core::{
  Error,
  backend::StorageBackend,
  card::{CardPatch, NewCard},
  error::StorageError,
  repository::CardRepository,
};

use crate::{JsonFileBackend, MemoryBackend};

fn today() -> NaiveDate {
  Local::now().date_naive()
}

fn new_card(name: &str, cnic: &str, days_ago: i64, price: f64) -> NewCard {
  NewCard {
    name:          name.into(),
    cnic:          cnic.into(),
    product:       "Refrigerator".into(),
    date_of_issue: today() - Duration::days(days_ago),
    price,
  }
}

fn repo() -> CardRepository<MemoryBackend> {
  CardRepository::new(MemoryBackend::new())
}

// ─── Id assignment ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_sequential_ids() {
  let repo = repo();
  for expected in 1..=3 {
    let card = repo.create(new_card("Alice", "111-1", 0, 10.0)).await.unwrap();
    assert_eq!(card.id, expected);
  }
}

#[tokio::test]
async fn id_is_always_greater_than_every_existing_id() {
  let repo = repo();
  repo.create(new_card("Alice", "111-1", 0, 10.0)).await.unwrap();
  repo.create(new_card("Bilal", "222-2", 0, 10.0)).await.unwrap();
  let c3 = repo.create(new_card("Chand", "333-3", 0, 10.0)).await.unwrap();

  // Deleting a low id does not free it: max+1 still advances.
  assert!(repo.delete(1).await.unwrap());
  let c4 = repo.create(new_card("Dara", "444-4", 0, 10.0)).await.unwrap();
  assert!(c4.id > c3.id);
  assert_eq!(c4.id, 4);
}

#[tokio::test]
async fn deleting_the_maximum_id_allows_its_reuse() {
  // Accepted consequence of max+1 assignment over a deletable collection.
  let repo = repo();
  repo.create(new_card("Alice", "111-1", 0, 10.0)).await.unwrap();
  let top = repo.create(new_card("Bilal", "222-2", 0, 10.0)).await.unwrap();
  assert!(repo.delete(top.id).await.unwrap());

  let reissued = repo.create(new_card("Chand", "333-3", 0, 10.0)).await.unwrap();
  assert_eq!(reissued.id, top.id);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_returns_none() {
  let repo = repo();
  assert!(repo.get(42).await.unwrap().is_none());
}

#[tokio::test]
async fn list_preserves_insertion_order() {
  let repo = repo();
  repo.create(new_card("Alice", "111-1", 0, 10.0)).await.unwrap();
  repo.create(new_card("Bilal", "222-2", 0, 10.0)).await.unwrap();
  repo.create(new_card("Chand", "333-3", 0, 10.0)).await.unwrap();

  let names: Vec<_> = repo
    .list()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.name)
    .collect();
  assert_eq!(names, ["Alice", "Bilal", "Chand"]);
}

#[tokio::test]
async fn derived_fields_are_fresh_on_read() {
  let repo = repo();
  let created = repo.create(new_card("Alice", "111-1", 9, 50.0)).await.unwrap();
  assert_eq!(created.days_passed, 10);
  assert_eq!(created.total_payment, 500.0);

  let listed = repo.list().await.unwrap();
  assert_eq!(listed[0].days_passed, 10);
  assert_eq!(listed[0].total_payment, 500.0);

  let fetched = repo.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.days_passed, 10);
  assert_eq!(fetched.total_payment, 500.0);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_missing_id_is_not_found_and_changes_nothing() {
  let repo = repo();
  repo.create(new_card("Alice", "111-1", 0, 10.0)).await.unwrap();

  let patch = CardPatch {
    name: Some("Mallory".into()),
    ..CardPatch::default()
  };
  let err = repo.update(99, patch).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(99)));

  let cards = repo.list().await.unwrap();
  assert_eq!(cards.len(), 1);
  assert_eq!(cards[0].name, "Alice");
}

#[tokio::test]
async fn partial_price_update_recomputes_total_only() {
  let repo = repo();
  let created = repo.create(new_card("Alice", "111-1", 9, 50.0)).await.unwrap();
  assert_eq!(created.total_payment, 500.0);

  let patch = CardPatch {
    price: Some(100.0),
    ..CardPatch::default()
  };
  let updated = repo.update(created.id, patch).await.unwrap();

  assert_eq!(updated.price, 100.0);
  assert_eq!(updated.days_passed, 10);
  assert_eq!(updated.total_payment, 1000.0);
  assert_eq!(updated.name, "Alice");
  assert_eq!(updated.cnic, "111-1");
  assert_eq!(updated.product, "Refrigerator");
}

#[tokio::test]
async fn update_of_issue_date_recomputes_days() {
  let repo = repo();
  let created = repo.create(new_card("Alice", "111-1", 0, 50.0)).await.unwrap();
  assert_eq!(created.days_passed, 1);

  let patch = CardPatch {
    date_of_issue: Some(today() - Duration::days(4)),
    ..CardPatch::default()
  };
  let updated = repo.update(created.id, patch).await.unwrap();
  assert_eq!(updated.days_passed, 5);
  assert_eq!(updated.total_payment, 250.0);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_twice_is_idempotent_failure() {
  let repo = repo();
  let card = repo.create(new_card("Alice", "111-1", 0, 10.0)).await.unwrap();

  assert!(repo.delete(card.id).await.unwrap());
  assert!(repo.list().await.unwrap().is_empty());

  // Second delete: false, not an error, and nothing changes.
  assert!(!repo.delete(card.id).await.unwrap());
  assert!(repo.list().await.unwrap().is_empty());
}

// ─── File backend ────────────────────────────────────────────────────────────

#[tokio::test]
async fn file_backend_initialises_empty_collection() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("data").join("cards.json");

  let backend = JsonFileBackend::open(&path).await.unwrap();
  assert!(path.exists());
  assert!(backend.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn file_backend_round_trips_order_and_content() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cards.json");

  let backend = JsonFileBackend::open(&path).await.unwrap();
  let repo = CardRepository::new(backend);
  repo.create(new_card("Alice", "111-1", 9, 50.0)).await.unwrap();
  repo.create(new_card("Bilal", "222-2", 0, 10.0)).await.unwrap();

  // writeAll(readAll()) leaves the persisted collection identical.
  let backend = JsonFileBackend::open(&path).await.unwrap();
  let before = backend.read_all().await.unwrap();
  backend.write_all(&before).await.unwrap();
  let after = backend.read_all().await.unwrap();
  assert_eq!(before, after);

  // A fresh handle sees the same records in the same order.
  let reopened = CardRepository::new(JsonFileBackend::open(&path).await.unwrap());
  let cards = reopened.list().await.unwrap();
  assert_eq!(cards.len(), 2);
  assert_eq!(cards[0].name, "Alice");
  assert_eq!(cards[1].name, "Bilal");
}

#[tokio::test]
async fn file_backend_reports_garbage_as_corrupt() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cards.json");
  std::fs::write(&path, b"{ not json ").unwrap();

  let backend = JsonFileBackend::open(&path).await.unwrap();
  let err = backend.read_all().await.unwrap_err();
  assert!(matches!(err, StorageError::Corrupt(_)));
}

#[tokio::test]
async fn file_backend_write_to_vanished_directory_is_unavailable() {
  let dir = tempfile::tempdir().unwrap();
  let sub = dir.path().join("data");
  let path = sub.join("cards.json");

  let backend = JsonFileBackend::open(&path).await.unwrap();
  std::fs::remove_dir_all(&sub).unwrap();

  let err = backend.write_all(&[]).await.unwrap_err();
  assert!(matches!(err, StorageError::Unavailable(_)));
}
