//! Bibliographic metadata lookups
//!
//! A [`Resolver`] queries a primary [`MetadataSource`] and, when the first result carries no
//! classification code, asks a secondary source for one by title. Only the first result of
//! each query is used.

mod google_books;
mod http;
mod open_library;

pub use google_books::{GoogleBooksSource, VolumesResponse, GOOGLE_BOOKS_BASE_URL};
pub use http::build_client;
pub use open_library::{OpenLibrarySource, SearchResponse, OPEN_LIBRARY_BASE_URL};

use crate::config::{Config, SourceKind};
use crate::error::LookupError;
use crate::types::{Book, Isbn, LookupRecord};
use async_trait::async_trait;
use std::sync::Arc;

/// A remote bibliographic service
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// First result for an ISBN
    async fn lookup_isbn(&self, isbn: &Isbn) -> Result<LookupRecord, LookupError>;

    /// First result for a free-text title
    async fn lookup_title(&self, title: &str) -> Result<LookupRecord, LookupError>;

    /// Classification code of the first result for `title`, if it has one
    async fn lookup_classification(&self, title: &str) -> Result<Option<String>, LookupError> {
        Ok(self.lookup_title(title).await?.classification_code)
    }
}

/// Primary lookup plus classification fallback
#[derive(Clone)]
pub struct Resolver {
    primary: Arc<dyn MetadataSource>,
    secondary: Option<Arc<dyn MetadataSource>>,
}

impl Resolver {
    pub fn new(
        primary: Arc<dyn MetadataSource>,
        secondary: Option<Arc<dyn MetadataSource>>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Build the configured HTTP sources
    pub fn from_config(config: &Config) -> Result<Self, LookupError> {
        let client = build_client(config.http_timeout)?;
        let make = |kind: SourceKind| -> Arc<dyn MetadataSource> {
            match kind {
                SourceKind::GoogleBooks => Arc::new(GoogleBooksSource::new(
                    client.clone(),
                    config.google_api_key.clone(),
                )),
                SourceKind::OpenLibrary => Arc::new(OpenLibrarySource::new(client.clone())),
            }
        };

        Ok(Self::new(
            make(config.primary_source),
            config.secondary_source.map(make),
        ))
    }

    /// Look up an ISBN on the primary source
    pub async fn lookup_isbn(&self, isbn: &Isbn) -> Result<LookupRecord, LookupError> {
        tracing::info!(%isbn, source = self.primary.name(), "Looking up ISBN");
        self.primary.lookup_isbn(isbn).await
    }

    /// Look up a title on the primary source
    pub async fn lookup_title(&self, text: &str) -> Result<LookupRecord, LookupError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LookupError::EmptyQuery);
        }
        tracing::info!(title = %text, source = self.primary.name(), "Looking up title");
        self.primary.lookup_title(text).await
    }

    /// Fill a missing classification code from the secondary source
    ///
    /// Never fails: any error or empty answer leaves the code absent, which becomes "N/A".
    pub async fn enrich(&self, mut record: LookupRecord) -> LookupRecord {
        if record.has_classification() {
            return record;
        }
        let Some(secondary) = &self.secondary else {
            return record;
        };

        match secondary.lookup_classification(&record.title).await {
            Ok(Some(code)) => {
                tracing::debug!(title = %record.title, %code, source = secondary.name(), "Found classification");
                record.classification_code = Some(code);
            }
            Ok(None) => {
                tracing::debug!(title = %record.title, source = secondary.name(), "No classification");
            }
            Err(e) => {
                tracing::warn!(title = %record.title, source = secondary.name(), "Classification lookup failed: {}", e);
            }
        }
        record
    }

    /// Resolve an ISBN into a catalog record
    pub async fn resolve_by_isbn(&self, isbn: &Isbn) -> Result<Book, LookupError> {
        let record = self.lookup_isbn(isbn).await?;
        Ok(self.enrich(record).await.into_book())
    }

    /// Resolve a free-text title into a catalog record
    pub async fn resolve_by_title(&self, text: &str) -> Result<Book, LookupError> {
        let record = self.lookup_title(text).await?;
        Ok(self.enrich(record).await.into_book())
    }
}
