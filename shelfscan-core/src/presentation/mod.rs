//! Catalog listings and label sheets

mod labels;

pub use labels::{
    generate_labels, render_label_sheet, truncate, Label, LabelSelection, SheetConfig,
    LABEL_TITLE_CHARS,
};

use crate::types::Book;

/// One line per book: "{title} by {author}"
///
/// Rebuilt from scratch on every call.
pub fn render_list<'a>(books: impl IntoIterator<Item = &'a Book>) -> String {
    books
        .into_iter()
        .map(|b| format!("{} by {}\n", b.title, b.author))
        .collect()
}
