//! Catalog export and import files
//!
//! An export is the full catalog as a pretty-printed JSON array. Import accepts the same
//! shape and checks only that the top level is an array of objects; missing fields take
//! their defaults. A repeated `id` is replaced with a fresh one so ids stay unique.

use crate::error::ImportError;
use crate::types::Book;
use serde_json::Value;
use std::collections::HashSet;
use std::io::{Read, Write};
use uuid::Uuid;

/// Suggested file name for downloads
pub const EXPORT_FILE_NAME: &str = "book-catalog.json";

/// Serialize the catalog for download
pub fn export_to_string(books: &[Book]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(books)
}

/// Write the catalog export to `writer`
pub fn export_to_writer(books: &[Book], writer: &mut dyn Write) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, books)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Parse an export produced by this tool (or by hand)
pub fn import_from_str(data: &str) -> Result<Vec<Book>, ImportError> {
    let value: Value = serde_json::from_str(data).map_err(|e| ImportError::Json(e.to_string()))?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => return Err(ImportError::NotASequence(kind_of(&other))),
    };

    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            if !entry.is_object() {
                return Err(ImportError::Record {
                    index,
                    reason: format!("expected an object, found {}", kind_of(&entry)),
                });
            }
            let mut book: Book = serde_json::from_value(entry).map_err(|e| ImportError::Record {
                index,
                reason: e.to_string(),
            })?;
            if !seen.insert(book.id) {
                let fresh = Uuid::new_v4();
                tracing::warn!(index, duplicate = %book.id, %fresh, "Reassigning repeated book id");
                book.id = fresh;
                seen.insert(fresh);
            }
            Ok(book)
        })
        .collect()
}

/// Read and parse an export from `reader`
pub fn import_from_reader(reader: &mut dyn Read) -> Result<Vec<Book>, ImportError> {
    let mut data = String::new();
    reader.read_to_string(&mut data)?;
    import_from_str(&data)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
