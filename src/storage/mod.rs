//! Byte-level document storage.
//!
//! A [`StorageProvider`] moves opaque document bytes in and out of named
//! collections. Serialization lives one layer up in the repository, so a
//! provider never needs to know what a document means.

pub mod file;

pub use file::FileStorageProvider;

use thiserror::Error;

/// Errors surfaced by a storage provider or by document (de)serialization
/// in the repository layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O failure while touching a collection. Missing documents are not
    /// errors — reads report them as `None` and deletes as `false`.
    #[error("i/o error on collection '{collection}': {source}")]
    Io {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    /// A directly-read document that exists on disk but does not parse.
    #[error("malformed document {collection}/{id}: {source}")]
    Decode {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// A document that failed to serialize on the write path.
    #[error("failed to encode document for collection '{collection}': {source}")]
    Encode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(collection: &str, source: std::io::Error) -> Self {
        Self::Io {
            collection: collection.to_string(),
            source,
        }
    }
}

/// Per-collection, per-document persistence.
///
/// Contract:
/// - `write` creates any missing namespace structure.
/// - `read` returns `None` for a missing document, never an error.
/// - `read_all` skips unreadable entries silently.
/// - `delete` reports whether a removal occurred.
/// - `create_collection` / `drop_collection` are idempotent.
///
/// Permission and I/O failures during writes and deletes propagate to the
/// caller; nothing here retries.
pub trait StorageProvider: Send + Sync {
    /// Persist one document, overwriting any previous version.
    fn write(&self, collection: &str, id: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Read one document, or `None` if it does not exist.
    fn read(&self, collection: &str, id: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Read every document in a collection. A missing collection yields an
    /// empty vec; entries that cannot be read are skipped.
    fn read_all(&self, collection: &str) -> Result<Vec<Vec<u8>>, StorageError>;

    /// Remove one document. Returns `true` if a removal occurred.
    fn delete(&self, collection: &str, id: &str) -> Result<bool, StorageError>;

    /// Create the namespace for a collection. No-op if it already exists.
    fn create_collection(&self, collection: &str) -> Result<(), StorageError>;

    /// Remove a collection and everything in it. No-op if it does not exist.
    fn drop_collection(&self, collection: &str) -> Result<(), StorageError>;
}
