//! Export and import commands

use super::Context;
use anyhow::{Context as _, Result};
use shelfscan_core::export::{export_to_writer, import_from_reader};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write the whole catalog to a JSON file
pub async fn export(ctx: &Context, output: &Path) -> Result<()> {
    let catalog = ctx.open_catalog().await?;

    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    export_to_writer(catalog.books(), &mut writer)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Exported {} books to {}", catalog.len(), output.display());
    Ok(())
}

/// Replace the catalog with the contents of a JSON export
pub async fn import(ctx: &Context, input: &Path) -> Result<()> {
    let file =
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let books = import_from_reader(&mut BufReader::new(file))
        .with_context(|| format!("Failed to import {}", input.display()))?;

    let mut catalog = ctx.open_catalog().await?;
    let previous = catalog.len();
    catalog.replace_all(books).await?;

    tracing::info!(previous, imported = catalog.len(), "Replaced catalog");
    println!("Imported {} books (replaced {})", catalog.len(), previous);
    Ok(())
}
