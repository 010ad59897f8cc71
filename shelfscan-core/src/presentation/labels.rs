//! Printable spine/shelf labels
//!
//! Labels are rendered as a standalone HTML page with print CSS; the host's browser or
//! print dialog does the actual printing.

use crate::types::{Book, BookId};
use serde::Serialize;
use std::collections::HashSet;

/// Characters of title kept on a label before it is cut
pub const LABEL_TITLE_CHARS: usize = 20;

/// One printed label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub title: String,
    pub author: String,
    pub category: String,
    pub classification_code: String,
}

impl From<&Book> for Label {
    fn from(book: &Book) -> Self {
        Self {
            title: truncate(&book.title, LABEL_TITLE_CHARS),
            author: book.author.clone(),
            category: book.category.clone(),
            classification_code: book.classification_code.clone(),
        }
    }
}

/// Which books to print labels for
#[derive(Debug, Clone, Default)]
pub enum LabelSelection {
    #[default]
    All,
    Only(Vec<BookId>),
}

/// Labels for the selected books, in catalog order
///
/// Ids that are not in the catalog are ignored.
pub fn generate_labels(books: &[Book], selection: &LabelSelection) -> Vec<Label> {
    match selection {
        LabelSelection::All => books.iter().map(Label::from).collect(),
        LabelSelection::Only(ids) => {
            let wanted: HashSet<&BookId> = ids.iter().collect();
            books
                .iter()
                .filter(|b| wanted.contains(&b.id))
                .map(Label::from)
                .collect()
        }
    }
}

/// Cut `s` to `max` characters, marking the cut with "..."
pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
        None => s.to_string(),
    }
}

/// Label sheet layout
#[derive(Debug, Clone)]
pub struct SheetConfig {
    /// Label width (e.g., "63.5mm")
    pub label_width: String,
    /// Label height (e.g., "38.1mm")
    pub label_height: String,
    /// Gap between labels
    pub gap: String,
    /// Base font size
    pub font_size: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        // Common 3x7 A4 address label stock
        Self {
            label_width: "63.5mm".to_string(),
            label_height: "38.1mm".to_string(),
            gap: "2.5mm".to_string(),
            font_size: "10pt".to_string(),
        }
    }
}

/// Render labels as a printable HTML document
pub fn render_label_sheet(labels: &[Label], config: &SheetConfig) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Book labels</title>
<style>
  body {{ margin: 0; font-family: sans-serif; font-size: {}; }}
  .labels {{ display: flex; flex-wrap: wrap; gap: {}; }}
  .label {{ width: {}; height: {}; box-sizing: border-box; padding: 2mm; border: 1px dashed #999; overflow: hidden; }}
  .label p {{ margin: 0 0 1mm 0; }}
  .label .code {{ font-family: monospace; }}
  @media print {{ .label {{ border: none; }} .label {{ break-inside: avoid; }} }}
</style>
</head>
<body>
<div class="labels">
"#,
        config.font_size, config.gap, config.label_width, config.label_height,
    ));

    for label in labels {
        html.push_str(&format!(
            r#"  <div class="label">
    <p><b>{}</b></p>
    <p>{}</p>
    <p>{}</p>
    <p class="code">{}</p>
  </div>
"#,
            escape_html(&label.title),
            escape_html(&label.author),
            escape_html(&label.category),
            escape_html(&label.classification_code),
        ));
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// Escape text for HTML element content
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
