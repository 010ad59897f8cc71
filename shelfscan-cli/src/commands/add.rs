//! Add commands: ISBN, title search and barcode scan

use super::Context;
use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use shelfscan_core::lookup::Resolver;
use shelfscan_core::pipeline::{Committed, Pipeline};
use shelfscan_core::scan::{LineDecoder, ScanConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

async fn pipeline(ctx: &Context) -> Result<Pipeline> {
    let catalog = ctx.open_catalog().await?;
    let resolver =
        Resolver::from_config(&ctx.config).context("Failed to set up metadata lookups")?;
    Ok(Pipeline::new(resolver, Arc::new(RwLock::new(catalog))))
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    Ok(pb)
}

fn report(committed: &Committed) {
    let book = &committed.book;
    println!("Added '{}' by {}", book.title, book.author);
    println!("  Category:       {}", book.category);
    println!("  Classification: {}", book.classification_code);
    println!("  Id:             {}", book.id);
    println!("Catalog now holds {} books", committed.len);
}

/// Look up an ISBN and add the book
pub async fn add_isbn(ctx: &Context, isbn: &str) -> Result<()> {
    let pipeline = pipeline(ctx).await?;

    let pb = spinner(&format!("Looking up ISBN {}...", isbn))?;
    let result = pipeline.add_by_isbn(isbn, pipeline.begin()).await;
    pb.finish_and_clear();

    let committed = result.with_context(|| format!("Could not add ISBN {}", isbn))?;
    report(&committed);
    Ok(())
}

/// Search for a title and add the first match
pub async fn add_title(ctx: &Context, title: &str) -> Result<()> {
    let pipeline = pipeline(ctx).await?;

    let pb = spinner(&format!("Searching for '{}'...", title))?;
    let result = pipeline.add_by_title(title, pipeline.begin()).await;
    pb.finish_and_clear();

    let committed = result.with_context(|| format!("Could not add '{}'", title))?;
    report(&committed);
    Ok(())
}

/// Read a single barcode from stdin and add the book
pub async fn scan(ctx: &Context) -> Result<()> {
    let pipeline = pipeline(ctx).await?;
    let token = pipeline.begin();

    // Ctrl-C abandons the scan without touching the catalog
    let cancel = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    eprintln!("Scan a barcode (or type an ISBN-13 and press Enter)...");
    let mut decoder = LineDecoder::stdin();
    let committed = pipeline
        .scan_and_add(&mut decoder, &ScanConfig::default(), token)
        .await
        .context("Scan failed")?;

    report(&committed);
    Ok(())
}
