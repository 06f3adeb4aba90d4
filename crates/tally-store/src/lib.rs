//! Storage backends for the Tally card ledger.
//!
//! Three interchangeable [`StorageBackend`](tally_core::backend::StorageBackend)
//! implementations: a local JSON file, a remote HTTP blob store, and an
//! in-memory collection for tests.

mod blob;
mod file;
mod memory;

pub use blob::{BlobBackend, BlobConfig};
pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

#[cfg(test)]
mod tests;
