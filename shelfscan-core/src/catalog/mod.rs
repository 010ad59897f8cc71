//! The catalog store
//!
//! Owns the ordered list of books together with its persistence adapter. Every public
//! mutation writes the full list back to storage before returning; if that write fails the
//! in-memory list is restored, so memory and storage agree after every call.

mod collation;

pub use collation::compare_titles;

use crate::error::{CatalogError, StorageError};
use crate::storage::CatalogPersistence;
use crate::types::{Book, BookId};

/// Ordered, persisted collection of books
pub struct Catalog {
    books: Vec<Book>,
    persistence: CatalogPersistence,
}

impl Catalog {
    /// Hydrate the catalog from storage
    pub async fn open(persistence: CatalogPersistence) -> Result<Self, StorageError> {
        let books = persistence.load().await?;
        tracing::info!(count = books.len(), "Opened catalog");
        Ok(Self { books, persistence })
    }

    /// Books in display order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Current display position of a book
    pub fn position(&self, id: BookId) -> Option<usize> {
        self.books.iter().position(|b| b.id == id)
    }

    /// Add a book, re-sort by title and persist
    ///
    /// Duplicates are accepted; two scans of the same ISBN give two records.
    pub async fn add(&mut self, book: Book) -> Result<BookId, CatalogError> {
        let id = book.id;
        let previous = self.books.clone();

        self.books.push(book);
        self.books.sort_by(|a, b| compare_titles(&a.title, &b.title));

        self.commit(previous).await?;
        tracing::info!(%id, count = self.books.len(), "Added book");
        Ok(id)
    }

    /// Remove the book with the given id and persist
    pub async fn delete(&mut self, id: BookId) -> Result<Book, CatalogError> {
        let position = self
            .position(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        self.remove_at(position).await
    }

    /// Remove the book at `position` in display order and persist
    ///
    /// Positions shift after every mutation; prefer [`Catalog::delete`] when the caller
    /// holds a possibly stale or filtered listing.
    pub async fn delete_at(&mut self, position: usize) -> Result<Book, CatalogError> {
        if position >= self.books.len() {
            return Err(CatalogError::OutOfRange {
                position,
                len: self.books.len(),
            });
        }
        self.remove_at(position).await
    }

    async fn remove_at(&mut self, position: usize) -> Result<Book, CatalogError> {
        let previous = self.books.clone();
        let removed = self.books.remove(position);

        self.commit(previous).await?;
        tracing::info!(id = %removed.id, title = %removed.title, "Deleted book");
        Ok(removed)
    }

    /// Books whose title or author contains `query`, case-insensitively
    ///
    /// A blank query matches everything. The catalog itself is left untouched.
    pub fn filter(&self, query: &str) -> Vec<&Book> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.books.iter().collect();
        }
        self.books
            .iter()
            .filter(|b| b.matches_lowercase(&needle))
            .collect()
    }

    /// Replace the whole catalog, keeping the given order, and persist
    pub async fn replace_all(&mut self, books: Vec<Book>) -> Result<(), CatalogError> {
        let previous = std::mem::replace(&mut self.books, books);
        self.commit(previous).await?;
        tracing::info!(count = self.books.len(), "Replaced catalog");
        Ok(())
    }

    /// Persist the current list, restoring `previous` if the write fails
    async fn commit(&mut self, previous: Vec<Book>) -> Result<(), CatalogError> {
        if let Err(e) = self.persistence.save(&self.books).await {
            tracing::error!("Failed to persist catalog, rolling back: {}", e);
            self.books = previous;
            return Err(CatalogError::Persist(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, StorageResult, DEFAULT_STORAGE_KEY};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    async fn empty_catalog() -> (Catalog, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let catalog = Catalog::open(CatalogPersistence::new(store.clone()))
            .await
            .unwrap();
        (catalog, store)
    }

    async fn persisted(store: &MemoryStore) -> Vec<Book> {
        let data = store.get(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
        serde_json::from_str(&data).unwrap()
    }

    fn titles(catalog: &Catalog) -> Vec<&str> {
        catalog.books().iter().map(|b| b.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_add_keeps_title_order_and_persists() {
        let (mut catalog, store) = empty_catalog().await;

        catalog.add(Book::new("Neuromancer")).await.unwrap();
        catalog.add(Book::new("dune")).await.unwrap();
        catalog.add(Book::new("Hyperion")).await.unwrap();

        assert_eq!(titles(&catalog), vec!["dune", "Hyperion", "Neuromancer"]);
        assert_eq!(persisted(&store).await, catalog.books());
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let (mut catalog, _) = empty_catalog().await;
        let first = catalog.add(Book::new("Dune")).await.unwrap();
        let second = catalog.add(Book::new("Dune")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let (mut catalog, store) = empty_catalog().await;
        catalog.add(Book::new("A")).await.unwrap();
        let b = catalog.add(Book::new("B")).await.unwrap();
        catalog.add(Book::new("C")).await.unwrap();

        let removed = catalog.delete(b).await.unwrap();

        assert_eq!(removed.title, "B");
        assert_eq!(titles(&catalog), vec!["A", "C"]);
        assert!(catalog.get(b).is_none());
        assert_eq!(persisted(&store).await.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let (mut catalog, _) = empty_catalog().await;
        catalog.add(Book::new("A")).await.unwrap();

        let result = catalog.delete(uuid::Uuid::new_v4()).await;

        assert!(matches!(result, Err(CatalogError::NotFound(_))));
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_at_position() {
        let (mut catalog, _) = empty_catalog().await;
        catalog.add(Book::new("B")).await.unwrap();
        catalog.add(Book::new("A")).await.unwrap();

        let removed = catalog.delete_at(0).await.unwrap();
        assert_eq!(removed.title, "A");
        assert_eq!(titles(&catalog), vec!["B"]);

        let result = catalog.delete_at(5).await;
        assert!(matches!(
            result,
            Err(CatalogError::OutOfRange { position: 5, len: 1 })
        ));
    }

    #[tokio::test]
    async fn test_filter_matches_title_or_author() {
        let (mut catalog, _) = empty_catalog().await;
        catalog
            .add(Book::new("Dune").with_author("Frank Herbert"))
            .await
            .unwrap();
        catalog
            .add(Book::new("Foundation").with_author("Isaac Asimov"))
            .await
            .unwrap();

        let by_title: Vec<_> = catalog
            .filter("DUNE")
            .into_iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(by_title, vec!["Dune"]);

        let by_author: Vec<_> = catalog
            .filter("asimov")
            .into_iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(by_author, vec!["Foundation"]);

        assert_eq!(catalog.filter("  ").len(), 2);
        assert!(catalog.filter("tolkien").is_empty());
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_replace_all_keeps_given_order() {
        let (mut catalog, store) = empty_catalog().await;
        catalog.add(Book::new("Old")).await.unwrap();

        catalog
            .replace_all(vec![Book::new("Z"), Book::new("A")])
            .await
            .unwrap();

        assert_eq!(titles(&catalog), vec!["Z", "A"]);
        assert_eq!(persisted(&store).await, catalog.books());
    }

    #[tokio::test]
    async fn test_reopen_restores_catalog() {
        let (mut catalog, store) = empty_catalog().await;
        catalog.add(Book::new("Dune")).await.unwrap();

        let reopened = Catalog::open(CatalogPersistence::new(store)).await.unwrap();
        assert_eq!(reopened.books(), catalog.books());
    }

    /// Store whose writes can be switched off
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::BackendError("disk full".to_string()));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> StorageResult<()> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let store = Arc::new(FlakyStore::default());
        let mut catalog = Catalog::open(CatalogPersistence::new(store.clone()))
            .await
            .unwrap();
        let a = catalog.add(Book::new("A")).await.unwrap();

        store.fail_writes.store(true, Ordering::SeqCst);

        assert!(catalog.add(Book::new("B")).await.is_err());
        assert!(catalog.delete(a).await.is_err());
        assert!(catalog.replace_all(Vec::new()).await.is_err());

        assert_eq!(titles(&catalog), vec!["A"]);
        assert_eq!(catalog.get(a).map(|b| b.title.as_str()), Some("A"));
    }
}
