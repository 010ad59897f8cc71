//! Core catalog types

mod book;
mod isbn;
mod record;

pub use book::{
    Book, BookId, DEFAULT_CATEGORY, NO_CLASSIFICATION, PLACEHOLDER_COVER_URL, UNKNOWN_AUTHOR,
};
pub use isbn::Isbn;
pub use record::LookupRecord;
