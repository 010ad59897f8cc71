//! Labels command implementation

use super::Context;
use anyhow::{Context as _, Result};
use shelfscan_core::presentation::{
    generate_labels, render_label_sheet, LabelSelection, SheetConfig,
};
use std::path::Path;
use uuid::Uuid;

/// Write a printable label sheet for the selected books
pub async fn labels(ctx: &Context, ids: &[String], output: &Path) -> Result<()> {
    let selection = if ids.is_empty() {
        LabelSelection::All
    } else {
        let ids = ids
            .iter()
            .map(|id| {
                Uuid::parse_str(id.trim()).with_context(|| format!("'{}' is not a book id", id))
            })
            .collect::<Result<Vec<_>>>()?;
        LabelSelection::Only(ids)
    };

    let catalog = ctx.open_catalog().await?;
    let labels = generate_labels(catalog.books(), &selection);
    if labels.is_empty() {
        anyhow::bail!("No books selected for labels");
    }

    let html = render_label_sheet(&labels, &SheetConfig::default());
    std::fs::write(output, html)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(count = labels.len(), "Rendered label sheet");
    println!("Wrote {} labels to {}", labels.len(), output.display());
    Ok(())
}
