//! Shelfscan Core Library
//!
//! This crate provides the catalog types and the capture → lookup → catalog pipeline for the
//! Shelfscan personal library cataloguing tool. Barcode decoders, metadata services and the
//! persistent store are reached through traits so the binaries can plug in real backends and
//! tests can plug in fakes.

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod lookup;
pub mod pipeline;
pub mod presentation;
pub mod scan;
pub mod storage;
pub mod types;

pub use catalog::Catalog;
pub use config::{Config, CorsOrigins, SourceKind};
pub use error::{
    CatalogError, ImportError, LookupError, PipelineError, Result, ScanError, ShelfError,
    StorageError,
};
pub use types::{Book, BookId, Isbn, LookupRecord};
