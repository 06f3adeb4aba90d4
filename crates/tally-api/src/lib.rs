//! JSON REST API for the Tally card ledger.
//!
//! Exposes an axum [`Router`] backed by any
//! [`StorageBackend`](tally_core::backend::StorageBackend) through a
//! [`CardRepository`]. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tally_api::api_router(repo.clone()))
//! ```

pub mod cards;
pub mod error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use serde::Deserialize;
use tally_core::{backend::StorageBackend, repository::CardRepository};

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` merged
/// with `TALLY_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:  String,
  #[serde(default = "default_port")]
  pub port:  u16,
  #[serde(default)]
  pub store: StoreConfig,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
  7117
}

/// Which persistence medium backs the card collection.
///
/// ```toml
/// [store.file]
/// path = "data/cards.json"
///
/// # — or —
///
/// [store.blob]
/// base_url = "https://blob.example.com/store"
/// key      = "cards.json"
/// token    = "..."
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreConfig {
  /// A single JSON file on the local filesystem.
  File { path: PathBuf },
  /// A remote object store speaking HTTP GET/PUT.
  Blob {
    base_url: String,
    key:      String,
    token:    Option<String>,
  },
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self::File {
      path: PathBuf::from("data/cards.json"),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `repo`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<B>(repo: Arc<CardRepository<B>>) -> Router<()>
where
  B: StorageBackend + 'static,
{
  Router::new()
    .route("/cards", get(cards::list::<B>).post(cards::create::<B>))
    .route(
      "/cards/{id}",
      get(cards::get_one::<B>)
        .put(cards::update::<B>)
        .delete(cards::delete_one::<B>),
    )
    .with_state(repo)
}
