//! Normalized metadata lookup results

use super::book::{Book, DEFAULT_CATEGORY, NO_CLASSIFICATION, PLACEHOLDER_COVER_URL, UNKNOWN_AUTHOR};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// First result of a metadata lookup, before defaults are applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupRecord {
    pub title: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub classification_code: Option<String>,
    pub cover_image_url: Option<String>,
    /// ISBNs the service reported for this edition
    pub identifiers: Vec<String>,
}

impl LookupRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Convert into a catalog record, filling absent fields with their defaults
    pub fn into_book(self) -> Book {
        Book {
            id: Uuid::new_v4(),
            title: self.title,
            author: non_blank(self.author).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            category: non_blank(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            classification_code: non_blank(self.classification_code)
                .unwrap_or_else(|| NO_CLASSIFICATION.to_string()),
            cover_image_url: non_blank(self.cover_image_url)
                .unwrap_or_else(|| PLACEHOLDER_COVER_URL.to_string()),
        }
    }

    pub fn has_classification(&self) -> bool {
        self.classification_code
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
