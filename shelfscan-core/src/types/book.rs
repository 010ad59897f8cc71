//! The Book record stored in the catalog

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier assigned to every catalogued book
pub type BookId = Uuid;

/// Author used when a lookup reports no authors
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Category used when a lookup reports no categories
pub const DEFAULT_CATEGORY: &str = "General";

/// Classification code used when neither service knows one
pub const NO_CLASSIFICATION: &str = "N/A";

/// Cover shown when a lookup has no thumbnail
pub const PLACEHOLDER_COVER_URL: &str = "https://via.placeholder.com/128x195?text=No+Cover";

/// A catalogued book
///
/// The ISBN used to find the book is not kept; it is only a lookup key.
/// Every field other than `title` has a default so that records written by older
/// versions, or hand-edited import files, still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, generated when the record is created or first loaded
    #[serde(default = "Uuid::new_v4")]
    pub id: BookId,

    /// Book title
    #[serde(default)]
    pub title: String,

    /// Primary author
    #[serde(default = "default_author")]
    pub author: String,

    /// Primary subject/genre
    #[serde(default = "default_category")]
    pub category: String,

    /// Library classification code (Dewey or LCC), best-effort
    #[serde(default = "default_classification")]
    pub classification_code: String,

    /// Cover thumbnail URL
    #[serde(default = "default_cover")]
    pub cover_image_url: String,
}

fn default_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_classification() -> String {
    NO_CLASSIFICATION.to_string()
}

fn default_cover() -> String {
    PLACEHOLDER_COVER_URL.to_string()
}

impl Book {
    /// Create a new book with the given title and every other field defaulted
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: default_author(),
            category: default_category(),
            classification_code: default_classification(),
            cover_image_url: default_cover(),
        }
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the classification code
    pub fn with_classification(mut self, code: impl Into<String>) -> Self {
        self.classification_code = code.into();
        self
    }

    /// Set the cover image URL
    pub fn with_cover(mut self, url: impl Into<String>) -> Self {
        self.cover_image_url = url.into();
        self
    }

    /// Whether the title or author contains `needle` (case-insensitive)
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }
}
