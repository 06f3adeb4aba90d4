//! [`BlobBackend`] — the card collection in a remote object store.
//!
//! Speaks plain HTTP: `GET {base_url}/{key}` to read, `PUT` to replace,
//! with an optional bearer token. Any blob service exposing
//! read/write/existence semantics over those verbs works.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use tally_core::{backend::StorageBackend, card::Card, error::StorageError};

/// Connection settings for a blob-store backend.
#[derive(Debug, Clone)]
pub struct BlobConfig {
  /// Service root, e.g. `https://blob.example.com/store`.
  pub base_url: String,
  /// Object name for the collection, e.g. `cards.json`.
  pub key:      String,
  /// Bearer token, if the service requires one.
  pub token:    Option<String>,
}

/// A card collection persisted as one named object in a remote store.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct BlobBackend {
  client: Client,
  config: BlobConfig,
}

impl BlobBackend {
  pub fn new(config: BlobConfig) -> Result<Self, StorageError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(StorageError::unavailable)?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/{}",
      self.config.base_url.trim_end_matches('/'),
      self.config.key
    )
  }

  fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
    match &self.config.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }
}

impl StorageBackend for BlobBackend {
  async fn read_all(&self) -> Result<Vec<Card>, StorageError> {
    let resp = self
      .authorize(self.client.get(self.url()))
      .send()
      .await
      .map_err(StorageError::unavailable)?;

    // No object yet: first use reads as the empty collection.
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(Vec::new());
    }

    let bytes = resp
      .error_for_status()
      .map_err(StorageError::unavailable)?
      .bytes()
      .await
      .map_err(StorageError::unavailable)?;

    serde_json::from_slice(&bytes).map_err(StorageError::corrupt)
  }

  async fn write_all(&self, cards: &[Card]) -> Result<(), StorageError> {
    let resp = self
      .authorize(self.client.put(self.url()).json(&cards))
      .send()
      .await
      .map_err(StorageError::unavailable)?;

    resp
      .error_for_status()
      .map_err(StorageError::unavailable)?;
    Ok(())
  }
}
