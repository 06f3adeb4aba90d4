//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use tally_core::error::StorageError;
use thiserror::Error;

/// An error returned by an API handler. Error bodies are
/// `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("storage error: {0}")]
  Storage(#[from] StorageError),
}

impl From<tally_core::Error> for ApiError {
  fn from(err: tally_core::Error) -> Self {
    match err {
      tally_core::Error::NotFound(id) => {
        Self::NotFound(format!("card {id} not found"))
      }
      tally_core::Error::Storage(e) => Self::Storage(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      Self::NotFound(m) => (StatusCode::NOT_FOUND, m),
      Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      Self::Storage(e) => {
        // Backend detail goes to the log; clients get a generic message.
        tracing::error!(error = %e, "storage failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "internal server error".to_string(),
        )
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
