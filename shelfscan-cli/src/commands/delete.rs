//! Delete command implementation

use super::Context;
use anyhow::{Context as _, Result};
use uuid::Uuid;

/// Delete a book by its id
pub async fn delete(ctx: &Context, id: &str) -> Result<()> {
    let id = Uuid::parse_str(id.trim()).with_context(|| format!("'{}' is not a book id", id))?;

    let mut catalog = ctx.open_catalog().await?;
    let removed = catalog.delete(id).await?;

    println!("Deleted '{}' by {}", removed.title, removed.author);
    Ok(())
}
