//! tally-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! configured storage backend, and serves the card API over HTTP under
//! `/api`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use tally_api::{ServerConfig, StoreConfig};
use tally_core::{backend::StorageBackend, repository::CardRepository};
use tally_store::{BlobBackend, BlobConfig, JsonFileBackend};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Tally card ledger server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TALLY"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let app = match &server_cfg.store {
    StoreConfig::File { path } => {
      let path = expand_tilde(path);
      let backend = JsonFileBackend::open(&path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      tracing::info!(path = %path.display(), "using JSON file store");
      app_router(backend)
    }
    StoreConfig::Blob {
      base_url,
      key,
      token,
    } => {
      let backend = BlobBackend::new(BlobConfig {
        base_url: base_url.clone(),
        key:      key.clone(),
        token:    token.clone(),
      })
      .context("failed to build blob store client")?;
      tracing::info!(%base_url, %key, "using blob store");
      app_router(backend)
    }
  };

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Assemble the full application router around `backend`.
fn app_router<B: StorageBackend + 'static>(backend: B) -> Router {
  let repo = Arc::new(CardRepository::new(backend));
  Router::new()
    .nest("/api", tally_api::api_router(repo))
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
