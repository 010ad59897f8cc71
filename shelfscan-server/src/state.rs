//! Application state

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use shelfscan_core::lookup::Resolver;
use shelfscan_core::pipeline::Pipeline;
use shelfscan_core::storage::{CatalogPersistence, KeyValueStore, LocalStore};
use shelfscan_core::{BookId, Catalog, Config};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The catalog, shared with the pipeline
    pub catalog: Arc<RwLock<Catalog>>,

    /// Add operations; a new one supersedes whatever is in flight
    pub pipeline: Arc<Pipeline>,

    /// Channel for SSE events
    pub event_tx: broadcast::Sender<ServerEvent>,
}

/// Catalog changes pushed to connected clients
#[derive(Debug, Clone)]
pub enum CatalogEvent {
    /// A lookup succeeded and the book was stored
    BookAdded {
        id: BookId,
        title: String,
        position: usize,
    },

    /// A book was removed
    BookDeleted { id: BookId, title: String },

    /// The catalog was replaced from an import
    CatalogImported { count: usize },

    /// An operation failed
    Error { message: String },
}

/// A catalog change and when it happened
#[derive(Debug, Clone)]
pub struct ServerEvent {
    pub at: DateTime<Utc>,
    pub change: CatalogEvent,
}

impl AppState {
    /// Create application state from the loaded configuration
    pub async fn new(config: &Config) -> Result<Self> {
        // Default to local storage in current directory
        let data_dir = config
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("./shelfscan_data"));
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        tracing::info!(data_dir = %data_dir.display(), "Using data directory");

        let resolver = Resolver::from_config(config)?;
        Self::with_store(
            Arc::new(LocalStore::new(data_dir)),
            &config.storage_key,
            resolver,
        )
        .await
    }

    /// Create application state over an explicit store and resolver
    pub async fn with_store(
        store: Arc<dyn KeyValueStore>,
        storage_key: &str,
        resolver: Resolver,
    ) -> Result<Self> {
        let catalog = Catalog::open(CatalogPersistence::with_key(store, storage_key)).await?;
        let catalog = Arc::new(RwLock::new(catalog));
        let pipeline = Arc::new(Pipeline::new(resolver, catalog.clone()));
        let (event_tx, _) = broadcast::channel(100);

        Ok(Self {
            catalog,
            pipeline,
            event_tx,
        })
    }

    /// Subscribe to server events
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.event_tx.subscribe()
    }

    /// Broadcast a catalog change
    pub fn broadcast(&self, change: CatalogEvent) {
        // Ignore errors (no subscribers)
        let _ = self.event_tx.send(ServerEvent {
            at: Utc::now(),
            change,
        });
    }
}
