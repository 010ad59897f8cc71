//! List command implementation

use super::Context;
use anyhow::Result;
use shelfscan_core::Book;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Table row for the catalog listing
#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Class")]
    classification_code: String,
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            classification_code: book.classification_code.clone(),
        }
    }
}

fn render_table(books: &[&Book]) -> String {
    let rows: Vec<BookRow> = books.iter().map(|b| BookRow::from(*b)).collect();
    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

/// Print the catalog, optionally filtered by title/author
pub async fn list(ctx: &Context, filter: Option<&str>, json: bool) -> Result<()> {
    let catalog = ctx.open_catalog().await?;
    let books = catalog.filter(filter.unwrap_or_default());

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    if books.is_empty() {
        if catalog.is_empty() {
            println!("The catalog is empty");
        } else {
            println!("No books match the filter");
        }
        return Ok(());
    }

    println!("{}", render_table(&books));
    println!("\n{} of {} books", books.len(), catalog.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_one_row_per_book() {
        let dune = Book::new("Dune").with_classification("813.54");
        let emma = Book::new("Emma").with_author("Jane Austen");
        let table = render_table(&[&dune, &emma]);

        assert!(table.contains("Title"));
        assert!(table.contains(&dune.id.to_string()));
        assert!(table.contains("813.54"));
        assert!(table.contains("Jane Austen"));
        // Rounded style: top border, header, separator, two rows, bottom border
        assert_eq!(table.lines().count(), 6);
    }
}
