//! [`JsonFileBackend`] — the card collection as one JSON file on disk.

use std::{io, path::PathBuf};

use tally_core::{backend::StorageBackend, card::Card, error::StorageError};
use tokio::fs;

/// A card collection persisted as a single pretty-printed JSON array.
///
/// Cloning is cheap — only the path is held; every operation opens the
/// file anew.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
  path: PathBuf,
}

impl JsonFileBackend {
  /// Open a backend at `path`, creating parent directories and
  /// initialising the file to an empty collection if it does not exist.
  pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
    let path = path.into();

    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent)
        .await
        .map_err(StorageError::unavailable)?;
    }

    match fs::metadata(&path).await {
      Ok(_) => {}
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        fs::write(&path, b"[]")
          .await
          .map_err(StorageError::unavailable)?;
        tracing::debug!(path = %path.display(), "initialised empty collection");
      }
      Err(e) => return Err(StorageError::unavailable(e)),
    }

    Ok(Self { path })
  }

  /// The file this backend reads and writes.
  pub fn path(&self) -> &std::path::Path {
    &self.path
  }
}

impl StorageBackend for JsonFileBackend {
  async fn read_all(&self) -> Result<Vec<Card>, StorageError> {
    let bytes = match fs::read(&self.path).await {
      Ok(bytes) => bytes,
      // A vanished file reads as the empty collection, same as first use.
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(StorageError::unavailable(e)),
    };
    serde_json::from_slice(&bytes).map_err(StorageError::corrupt)
  }

  async fn write_all(&self, cards: &[Card]) -> Result<(), StorageError> {
    let json =
      serde_json::to_vec_pretty(cards).map_err(StorageError::unavailable)?;

    // Write a sibling temp file and rename over the target, so a failed
    // write leaves the prior persisted state authoritative.
    let tmp = self.path.with_extension("tmp");
    fs::write(&tmp, &json)
      .await
      .map_err(StorageError::unavailable)?;
    fs::rename(&tmp, &self.path)
      .await
      .map_err(StorageError::unavailable)?;
    Ok(())
  }
}
