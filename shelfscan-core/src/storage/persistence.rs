//! Catalog persistence on top of a key-value store

use super::{KeyValueStore, StorageResult};
use crate::error::StorageError;
use crate::types::Book;
use std::sync::Arc;

/// Slot name the catalog is stored under
pub const DEFAULT_STORAGE_KEY: &str = "bookList";

/// Loads and saves the whole catalog as one JSON value
#[derive(Clone)]
pub struct CatalogPersistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CatalogPersistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the saved catalog
    ///
    /// An empty slot or an unreadable value both yield an empty catalog.
    pub async fn load(&self) -> StorageResult<Vec<Book>> {
        let Some(data) = self.store.get(&self.key).await? else {
            tracing::debug!(key = %self.key, "No saved catalog, starting empty");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Book>>(&data) {
            Ok(books) => {
                tracing::debug!(key = %self.key, count = books.len(), "Loaded catalog");
                Ok(books)
            }
            Err(e) => {
                tracing::warn!(key = %self.key, "Saved catalog is malformed, starting empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the saved catalog with `books`
    pub async fn save(&self, books: &[Book]) -> StorageResult<()> {
        let data =
            serde_json::to_string(books).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.store.set(&self.key, &data).await?;
        tracing::debug!(key = %self.key, count = books.len(), "Saved catalog");
        Ok(())
    }
}
