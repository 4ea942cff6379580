//! Generic document repository.
//!
//! [`Repository<T>`] layers typed CRUD on top of a byte-level
//! [`StorageProvider`]: it owns document identity and timestamps, and applies
//! the [`Filter`] mini-language, sorting, and pagination in memory after a
//! full collection scan. Collections are small per-project graphs; scanning
//! is the storage model, not an accident.

pub mod filter;
pub mod query;

pub use filter::Filter;
pub use query::{Direction, PaginatedResult, Pagination, QueryOptions, Sort, DEFAULT_LIMIT};

use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::storage::{StorageError, StorageProvider};

/// Identity and timestamp fields carried by every document.
///
/// `id` is opaque and immutable once assigned; `updated_at` is refreshed on
/// every update. Timestamps are RFC 3339 strings, so lexicographic sort order
/// is chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(rename = "_id")]
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl DocumentMeta {
    /// Resolve the metadata fields by their wire names.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "_id" => Some(Cow::Borrowed(&self.id)),
            "created_at" => Some(Cow::Borrowed(&self.created_at)),
            "updated_at" => Some(Cow::Borrowed(&self.updated_at)),
            _ => None,
        }
    }
}

/// A persisted record belonging to exactly one named collection.
///
/// `field` is the seam the filter and sort machinery evaluates through: it
/// resolves a wire-format field name ("name", "projectId", "_id", ...) to the
/// document's value, or `None` when the field is absent. Each collection type
/// decides which of its fields are addressable, which is where per-collection
/// query semantics live.
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection this document type persists into.
    const COLLECTION: &'static str;

    fn meta(&self) -> &DocumentMeta;
    fn meta_mut(&mut self) -> &mut DocumentMeta;

    /// Look up a field by its wire name, including the metadata fields.
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// Typed CRUD over one collection.
pub struct Repository<T: Document> {
    storage: Arc<dyn StorageProvider>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            storage,
            _marker: PhantomData,
        }
    }

    /// Persist a new document: assigns a fresh random identifier, stamps both
    /// timestamps to the current instant, and returns the stored document.
    pub fn create(&self, mut doc: T) -> Result<T, StorageError> {
        let now = chrono::Utc::now().to_rfc3339();
        let meta = doc.meta_mut();
        meta.id = uuid::Uuid::new_v4().to_string();
        meta.created_at = now.clone();
        meta.updated_at = now;

        self.write(&doc)?;
        Ok(doc)
    }

    /// Direct lookup by id. `None` for a missing id, never an error.
    pub fn find_by_id(&self, id: &str) -> Result<Option<T>, StorageError> {
        let Some(bytes) = self.storage.read(T::COLLECTION, id)? else {
            return Ok(None);
        };
        let doc = serde_json::from_slice(&bytes).map_err(|e| StorageError::Decode {
            collection: T::COLLECTION.to_string(),
            id: id.to_string(),
            source: e,
        })?;
        Ok(Some(doc))
    }

    /// Load the entire collection, filter, sort, and slice one page.
    pub fn find_many(
        &self,
        filter: &Filter,
        options: QueryOptions,
    ) -> Result<PaginatedResult<T>, StorageError> {
        let mut docs = self.load_all()?;
        docs.retain(|doc| filter.matches(doc));
        if let Some(sort) = &options.sort {
            sort.apply(&mut docs);
        }
        Ok(query::paginate(docs, &options))
    }

    /// Every document matching `filter`, unpaginated. Cascades and graph
    /// hydration must see the whole result set, not the first page.
    pub fn find_all(&self, filter: &Filter) -> Result<Vec<T>, StorageError> {
        let mut docs = self.load_all()?;
        docs.retain(|doc| filter.matches(doc));
        Ok(docs)
    }

    /// Merge a mutation onto the existing document, refresh `updated_at`, and
    /// persist. `None` if the id does not exist — an update never creates.
    pub fn update(
        &self,
        id: &str,
        mutate: impl FnOnce(&mut T),
    ) -> Result<Option<T>, StorageError> {
        let Some(mut doc) = self.find_by_id(id)? else {
            return Ok(None);
        };
        mutate(&mut doc);
        doc.meta_mut().updated_at = chrono::Utc::now().to_rfc3339();

        self.write(&doc)?;
        Ok(Some(doc))
    }

    /// Remove a document. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, StorageError> {
        self.storage.delete(T::COLLECTION, id)
    }

    /// Whether any document matches `filter`.
    pub fn exists(&self, filter: &Filter) -> Result<bool, StorageError> {
        let result = self.find_many(filter, QueryOptions::with_limit(1))?;
        Ok(!result.data.is_empty())
    }

    fn write(&self, doc: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(doc).map_err(|e| StorageError::Encode {
            collection: T::COLLECTION.to_string(),
            source: e,
        })?;
        self.storage.write(T::COLLECTION, &doc.meta().id, &bytes)
    }

    /// Full collection scan. Documents that fail to parse are skipped with a
    /// warning, matching the storage contract for unreadable entries.
    fn load_all(&self) -> Result<Vec<T>, StorageError> {
        let mut docs = Vec::new();
        for bytes in self.storage.read_all(T::COLLECTION)? {
            match serde_json::from_slice(&bytes) {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    tracing::warn!(collection = T::COLLECTION, error = %e, "skipping malformed document");
                }
            }
        }
        Ok(docs)
    }
}
