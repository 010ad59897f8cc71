//! CLI command implementations

mod add;
mod delete;
mod labels;
mod list;
mod transfer;

pub use add::{add_isbn, add_title, scan};
pub use delete::delete;
pub use labels::labels;
pub use list::list;
pub use transfer::{export, import};

use anyhow::{Context as _, Result};
use shelfscan_core::storage::{CatalogPersistence, LocalStore};
use shelfscan_core::{Catalog, Config};
use std::path::PathBuf;
use std::sync::Arc;

/// Settings shared by every command
pub struct Context {
    pub config: Config,
    pub data_dir: PathBuf,
}

impl Context {
    /// Resolve settings; `data_dir` from the command line wins over the environment
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let config = Config::from_env();
        let data_dir = match data_dir.or_else(|| config.data_dir.clone()) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        tracing::debug!(data_dir = %data_dir.display(), "Using data directory");
        Ok(Self { config, data_dir })
    }

    /// Open the persisted catalog
    pub async fn open_catalog(&self) -> Result<Catalog> {
        let store = Arc::new(LocalStore::new(&self.data_dir));
        let persistence = CatalogPersistence::with_key(store, self.config.storage_key.clone());
        Catalog::open(persistence)
            .await
            .with_context(|| format!("Failed to open catalog in {}", self.data_dir.display()))
    }
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("shelfscan"))
        .context("Could not determine a data directory; pass --data-dir")
}
