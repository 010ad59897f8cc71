//! Capture → lookup → commit pipeline
//!
//! Each user-initiated add runs as a sequence of typed stages. Starting a new operation
//! through [`Pipeline::begin`] cancels the one before it, so a second scan or search
//! supersedes the first instead of racing it into the catalog.

use crate::catalog::Catalog;
use crate::error::PipelineError;
use crate::lookup::Resolver;
use crate::scan::{BarcodeDecoder, ScanConfig, ScanSession};
use crate::types::{Book, Isbn, LookupRecord};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// What the user handed us
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    Isbn(Isbn),
    Title(String),
}

/// Primary lookup result
#[derive(Debug, Clone)]
pub struct Resolved(pub LookupRecord);

/// Lookup result after the classification fallback, as a catalog record
#[derive(Debug, Clone)]
pub struct Enriched(pub Book);

/// A book that made it into the catalog
#[derive(Debug, Clone)]
pub struct Committed {
    pub book: Book,
    /// Display position right after the insert
    pub position: usize,
    /// Catalog size right after the insert
    pub len: usize,
}

/// Holds the token of the operation in flight
#[derive(Default)]
pub struct OperationSlot {
    current: Mutex<CancellationToken>,
}

impl OperationSlot {
    /// Cancel the current operation and hand out a token for a new one
    pub fn begin(&self) -> CancellationToken {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.cancel();
        *current = CancellationToken::new();
        current.clone()
    }
}

/// Drives captures through lookup into the catalog
pub struct Pipeline {
    resolver: Resolver,
    catalog: Arc<RwLock<Catalog>>,
    slot: OperationSlot,
}

impl Pipeline {
    pub fn new(resolver: Resolver, catalog: Arc<RwLock<Catalog>>) -> Self {
        Self {
            resolver,
            catalog,
            slot: OperationSlot::default(),
        }
    }

    pub fn catalog(&self) -> Arc<RwLock<Catalog>> {
        self.catalog.clone()
    }

    /// Start a new operation, superseding any operation still in flight
    pub fn begin(&self) -> CancellationToken {
        self.slot.begin()
    }

    /// Look up a typed or pasted ISBN and add it
    pub async fn add_by_isbn(
        &self,
        text: &str,
        token: CancellationToken,
    ) -> Result<Committed, PipelineError> {
        let isbn = Isbn::parse(text)?;
        self.run(Capture::Isbn(isbn), token).await
    }

    /// Search for a title and add the first match
    pub async fn add_by_title(
        &self,
        text: &str,
        token: CancellationToken,
    ) -> Result<Committed, PipelineError> {
        self.run(Capture::Title(text.to_string()), token).await
    }

    /// Scan one barcode and add the book it names
    pub async fn scan_and_add(
        &self,
        decoder: &mut dyn BarcodeDecoder,
        config: &ScanConfig,
        token: CancellationToken,
    ) -> Result<Committed, PipelineError> {
        let code = ScanSession::capture_once(decoder, config, &token).await?;
        let isbn = Isbn::parse(&code)?;
        self.run(Capture::Isbn(isbn), token).await
    }

    /// Run every stage after capture
    pub async fn run(
        &self,
        capture: Capture,
        token: CancellationToken,
    ) -> Result<Committed, PipelineError> {
        let resolved = self.resolve(&capture, &token).await?;
        let enriched = self.enrich(resolved, &token).await?;
        self.commit(enriched, &token).await
    }

    async fn resolve(
        &self,
        capture: &Capture,
        token: &CancellationToken,
    ) -> Result<Resolved, PipelineError> {
        let record = match capture {
            Capture::Isbn(isbn) => cancellable(token, self.resolver.lookup_isbn(isbn)).await?,
            Capture::Title(text) => cancellable(token, self.resolver.lookup_title(text)).await?,
        };
        Ok(Resolved(record?))
    }

    async fn enrich(
        &self,
        resolved: Resolved,
        token: &CancellationToken,
    ) -> Result<Enriched, PipelineError> {
        let record = cancellable(token, self.resolver.enrich(resolved.0)).await?;
        Ok(Enriched(record.into_book()))
    }

    async fn commit(
        &self,
        enriched: Enriched,
        token: &CancellationToken,
    ) -> Result<Committed, PipelineError> {
        let mut catalog = self.catalog.write().await;
        // Checked under the lock so a superseded operation can never land
        if token.is_cancelled() {
            tracing::info!(title = %enriched.0.title, "Dropping superseded result");
            return Err(PipelineError::Superseded);
        }

        let book = enriched.0;
        let id = catalog.add(book.clone()).await?;
        Ok(Committed {
            book,
            position: catalog.position(id).unwrap_or_default(),
            len: catalog.len(),
        })
    }
}

/// Await `fut` unless `token` is cancelled first
async fn cancellable<T>(
    token: &CancellationToken,
    fut: impl Future<Output = T>,
) -> Result<T, PipelineError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(PipelineError::Superseded),
        value = fut => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LookupError, ScanError};
    use crate::lookup::testing::FakeSource;
    use crate::lookup::MetadataSource;
    use crate::scan::LineDecoder;
    use crate::storage::{CatalogPersistence, KeyValueStore, MemoryStore, DEFAULT_STORAGE_KEY};
    use async_trait::async_trait;
    use tokio::io::BufReader;
    use tokio::sync::Notify;

    fn dune() -> LookupRecord {
        LookupRecord {
            author: Some("Frank Herbert".to_string()),
            category: Some("Fiction".to_string()),
            ..LookupRecord::new("Dune")
        }
    }

    async fn pipeline_with(source: impl MetadataSource + 'static) -> (Pipeline, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let catalog = Catalog::open(CatalogPersistence::new(store.clone()))
            .await
            .unwrap();
        let resolver = Resolver::new(Arc::new(source), None);
        (
            Pipeline::new(resolver, Arc::new(RwLock::new(catalog))),
            store,
        )
    }

    #[tokio::test]
    async fn test_title_search_adds_book() {
        let (pipeline, store) = pipeline_with(FakeSource::default().with_title(dune())).await;

        let committed = pipeline
            .add_by_title("Dune", pipeline.begin())
            .await
            .unwrap();

        assert_eq!(committed.book.title, "Dune");
        assert_eq!(committed.book.author, "Frank Herbert");
        assert_eq!(committed.book.category, "Fiction");
        assert_eq!(committed.len, 1);

        let saved = store.get(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
        let saved: Vec<Book> = serde_json::from_str(&saved).unwrap();
        assert_eq!(saved, vec![committed.book]);
    }

    #[tokio::test]
    async fn test_failed_lookup_leaves_catalog_and_store_untouched() {
        let (pipeline, store) = pipeline_with(FakeSource::offline()).await;

        let result = pipeline.add_by_title("Dune", pipeline.begin()).await;

        assert!(matches!(
            result,
            Err(PipelineError::Lookup(LookupError::Network(_)))
        ));
        assert!(pipeline.catalog().read().await.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalid_isbn_rejected_before_lookup() {
        let source = Arc::new(FakeSource::default());
        let store = Arc::new(MemoryStore::new());
        let catalog = Catalog::open(CatalogPersistence::new(store)).await.unwrap();
        let pipeline = Pipeline::new(
            Resolver::new(source.clone(), None),
            Arc::new(RwLock::new(catalog)),
        );

        let result = pipeline.add_by_isbn("123", pipeline.begin()).await;

        assert!(matches!(
            result,
            Err(PipelineError::Lookup(LookupError::InvalidIsbn(_)))
        ));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_scan_and_add() {
        let (pipeline, _) =
            pipeline_with(FakeSource::default().with_isbn("9780441172719", dune())).await;
        let mut decoder = LineDecoder::new(BufReader::new(b"9780441172719\n" as &[u8]));

        let committed = pipeline
            .scan_and_add(&mut decoder, &ScanConfig::default(), pipeline.begin())
            .await
            .unwrap();

        assert_eq!(committed.book.title, "Dune");
        assert!(!decoder.is_active());
    }

    #[tokio::test]
    async fn test_scan_with_closed_input_adds_nothing() {
        let (pipeline, _) = pipeline_with(FakeSource::default()).await;
        let mut decoder = LineDecoder::new(BufReader::new(b"" as &[u8]));

        let result = pipeline
            .scan_and_add(&mut decoder, &ScanConfig::default(), pipeline.begin())
            .await;

        assert!(matches!(
            result,
            Err(PipelineError::Scan(ScanError::Closed))
        ));
        assert!(pipeline.catalog().read().await.is_empty());
    }

    /// Holds "Slow" lookups until released
    struct GatedSource {
        inner: FakeSource,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl MetadataSource for GatedSource {
        fn name(&self) -> &str {
            "gated"
        }

        async fn lookup_isbn(&self, isbn: &Isbn) -> Result<LookupRecord, LookupError> {
            self.inner.lookup_isbn(isbn).await
        }

        async fn lookup_title(&self, title: &str) -> Result<LookupRecord, LookupError> {
            if title == "Slow" {
                self.entered.notify_one();
                self.release.notified().await;
            }
            self.inner.lookup_title(title).await
        }
    }

    #[tokio::test]
    async fn test_newer_operation_supersedes_older() {
        let source = Arc::new(GatedSource {
            inner: FakeSource::default()
                .with_title(dune())
                .with_title(LookupRecord::new("Slow")),
            entered: Notify::new(),
            release: Notify::new(),
        });
        let store = Arc::new(MemoryStore::new());
        let catalog = Catalog::open(CatalogPersistence::new(store)).await.unwrap();
        let pipeline = Pipeline::new(
            Resolver::new(source.clone(), None),
            Arc::new(RwLock::new(catalog)),
        );

        let first = pipeline.add_by_title("Slow", pipeline.begin());
        let second = async {
            source.entered.notified().await;
            pipeline.add_by_title("Dune", pipeline.begin()).await
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(first, Err(PipelineError::Superseded)));
        assert_eq!(second.unwrap().book.title, "Dune");

        let catalog = pipeline.catalog();
        let catalog = catalog.read().await;
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.books()[0].title, "Dune");
    }

    #[test]
    fn test_slot_cancels_previous_token() {
        let slot = OperationSlot::default();
        let first = slot.begin();
        let second = slot.begin();

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }
}
