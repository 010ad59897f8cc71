//! Error types for Shelfscan Core

use thiserror::Error;

/// Result type alias using ShelfError
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Top-level error type for all Shelfscan operations
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while querying a bibliographic metadata service
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("No results for {0}")]
    NotFound(String),

    #[error("Invalid ISBN: {0}")]
    InvalidIsbn(String),

    #[error("Search query is empty")]
    EmptyQuery,
}

/// Errors raised by catalog mutations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Book not found: {0}")]
    NotFound(String),

    #[error("Position {position} out of range for catalog of {len} books")]
    OutOfRange { position: usize, len: usize },

    #[error("Failed to persist catalog: {0}")]
    Persist(#[from] StorageError),
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Serialization failed: {0}")]
    Serialize(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Errors raised when reading an exported catalog file
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Json(String),

    #[error("Expected a list of books, found {0}")]
    NotASequence(&'static str),

    #[error("Entry {index} is not a book record: {reason}")]
    Record { index: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a barcode scan session
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to initialize scanner: {0}")]
    Init(String),

    #[error("Scanner is already active")]
    AlreadyActive,

    #[error("Scanner is not active")]
    NotActive,

    #[error("Failed to read from scanner: {0}")]
    Input(String),

    #[error("Scanner input closed before a code was detected")]
    Closed,

    #[error("Scan cancelled")]
    Cancelled,
}

/// Errors raised by the capture → lookup → commit pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Operation superseded by a newer request")]
    Superseded,

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
