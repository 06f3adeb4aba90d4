//! Async HTTP client wrapping the tally JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use tally_core::card::{Card, CardId, CardPatch, NewCard};

/// Connection settings for the tally API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the tally JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{path}", self.config.base_url.trim_end_matches('/'))
  }

  /// Turn a non-success response into an error carrying the server's
  /// `{"error": ...}` message when one is present.
  async fn check(response: Response) -> Result<Response> {
    if response.status().is_success() {
      return Ok(response);
    }
    let status = response.status();
    let message = response
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v.get("error")?.as_str().map(String::from))
      .unwrap_or_else(|| status.to_string());
    Err(anyhow!("{message}"))
  }

  pub async fn list_cards(&self) -> Result<Vec<Card>> {
    let response = self
      .client
      .get(self.url("/cards"))
      .send()
      .await
      .context("listing cards")?;
    Ok(Self::check(response).await?.json().await?)
  }

  pub async fn create_card(&self, new: &NewCard) -> Result<Card> {
    let response = self
      .client
      .post(self.url("/cards"))
      .json(new)
      .send()
      .await
      .context("creating card")?;
    Ok(Self::check(response).await?.json().await?)
  }

  pub async fn update_card(&self, id: CardId, patch: &CardPatch) -> Result<Card> {
    let response = self
      .client
      .put(self.url(&format!("/cards/{id}")))
      .json(patch)
      .send()
      .await
      .context("updating card")?;
    Ok(Self::check(response).await?.json().await?)
  }

  pub async fn delete_card(&self, id: CardId) -> Result<()> {
    let response = self
      .client
      .delete(self.url(&format!("/cards/{id}")))
      .send()
      .await
      .context("deleting card")?;
    Self::check(response).await?;
    Ok(())
  }
}
