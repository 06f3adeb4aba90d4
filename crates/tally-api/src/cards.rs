//! Handlers for `/cards` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/cards` | Full collection, storage order |
//! | `POST`   | `/cards` | Body: required card fields minus `id`; 201 + created card |
//! | `GET`    | `/cards/{id}` | 400 if id not numeric, 404 if unknown |
//! | `PUT`    | `/cards/{id}` | Partial body; derived fields recomputed server-side |
//! | `DELETE` | `/cards/{id}` | `{"success":true}`; deleting a missing id is 404 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde_json::json;
use tally_core::{
  backend::StorageBackend,
  card::{Card, CardId, CardPatch, NewCard},
  repository::CardRepository,
};

use crate::error::ApiError;

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn today() -> NaiveDate {
  Local::now().date_naive()
}

/// Parse a path id, rejecting non-numeric values as a client error.
fn parse_id(raw: &str) -> Result<CardId, ApiError> {
  raw
    .parse()
    .map_err(|_| ApiError::BadRequest(format!("invalid id: {raw:?}")))
}

/// Decode a JSON body into `T`.
///
/// Bodies arrive as raw [`serde_json::Value`] so that a missing field or a
/// wrong type (unparsable `dateOfIssue`, non-numeric `price`) maps to a
/// `400` naming the field, rather than the Json extractor's default `422`.
fn decode<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
  serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /cards`
pub async fn list<B>(
  State(repo): State<Arc<CardRepository<B>>>,
) -> Result<Json<Vec<Card>>, ApiError>
where
  B: StorageBackend + 'static,
{
  let cards = repo.list().await?;
  Ok(Json(cards))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /cards` — returns 201 + the stored [`Card`].
pub async fn create<B>(
  State(repo): State<Arc<CardRepository<B>>>,
  Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError>
where
  B: StorageBackend + 'static,
{
  let new_card: NewCard = decode(body)?;
  new_card
    .validate(today())
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let card = repo.create(new_card).await?;
  Ok((StatusCode::CREATED, Json(card)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /cards/{id}`
pub async fn get_one<B>(
  State(repo): State<Arc<CardRepository<B>>>,
  Path(raw_id): Path<String>,
) -> Result<Json<Card>, ApiError>
where
  B: StorageBackend + 'static,
{
  let id = parse_id(&raw_id)?;
  let card = repo
    .get(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("card {id} not found")))?;
  Ok(Json(card))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /cards/{id}` — partial body; unset fields keep their values.
/// `daysPassed`/`totalPayment` in the body are ignored and recomputed.
pub async fn update<B>(
  State(repo): State<Arc<CardRepository<B>>>,
  Path(raw_id): Path<String>,
  Json(body): Json<serde_json::Value>,
) -> Result<Json<Card>, ApiError>
where
  B: StorageBackend + 'static,
{
  let id = parse_id(&raw_id)?;
  let patch: CardPatch = decode(body)?;
  patch
    .validate(today())
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let card = repo.update(id, patch).await?;
  Ok(Json(card))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /cards/{id}` — body `{"success":true}` when a removal happened.
pub async fn delete_one<B>(
  State(repo): State<Arc<CardRepository<B>>>,
  Path(raw_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  B: StorageBackend + 'static,
{
  let id = parse_id(&raw_id)?;
  let removed = repo.delete(id).await?;
  if !removed {
    return Err(ApiError::NotFound(format!("card {id} not found")));
  }
  Ok(Json(json!({ "success": true })))
}
