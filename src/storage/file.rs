//! Flat-file storage provider.
//!
//! Documents live under `<root>/<collection>/documents/<id>.json`, one file
//! per document. The layout is deliberately human-readable: a collection is a
//! directory you can list, a document is a JSON file you can open.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{StorageError, StorageProvider};

/// Storage provider backed by one JSON file per document.
pub struct FileStorageProvider {
    root: PathBuf,
}

impl FileStorageProvider {
    /// Create a provider rooted at `root`. Nothing is touched on disk until
    /// the first write or `create_collection`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn documents_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection).join("documents")
    }

    fn document_path(&self, collection: &str, id: &str) -> PathBuf {
        self.documents_dir(collection).join(format!("{id}.json"))
    }
}

impl StorageProvider for FileStorageProvider {
    fn write(&self, collection: &str, id: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.document_path(collection, id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(collection, e))?;
        }
        std::fs::write(&path, data).map_err(|e| StorageError::io(collection, e))
    }

    fn read(&self, collection: &str, id: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.document_path(collection, id);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(collection, e)),
        }
    }

    fn read_all(&self, collection: &str) -> Result<Vec<Vec<u8>>, StorageError> {
        let dir = self.documents_dir(collection);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(collection, e)),
        };

        let mut documents = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(collection, error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match std::fs::read(&path) {
                Ok(bytes) => documents.push(bytes),
                Err(e) => {
                    tracing::debug!(collection, path = %path.display(), error = %e, "skipping unreadable document");
                }
            }
        }
        Ok(documents)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<bool, StorageError> {
        let path = self.document_path(collection, id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(collection, e)),
        }
    }

    fn create_collection(&self, collection: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(self.documents_dir(collection))
            .map_err(|e| StorageError::io(collection, e))
    }

    fn drop_collection(&self, collection: &str) -> Result<(), StorageError> {
        let path = self.root.join(collection);
        match std::fs::remove_dir_all(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(collection, e)),
        }
    }
}
