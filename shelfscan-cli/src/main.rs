//! Shelfscan CLI - catalogue your bookshelf from the terminal

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shelfscan_core::export::EXPORT_FILE_NAME;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelfscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the catalog (defaults to the platform data directory)
    #[arg(long, global = true, env = "SHELFSCAN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalogued books
    List {
        /// Only show books whose title or author contains this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up a book by ISBN and add it
    AddIsbn {
        /// ISBN-10 or ISBN-13 (hyphens allowed)
        isbn: String,
    },

    /// Search for a book by title and add the first match
    AddTitle {
        /// Title to search for
        title: String,
    },

    /// Read one barcode from a scanner (or stdin) and add the book
    Scan,

    /// Delete a book by id
    Delete {
        /// Book id as shown by `list`
        id: String,
    },

    /// Export the catalog to a JSON file
    Export {
        /// Output file path
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
    },

    /// Replace the catalog with the contents of an exported JSON file
    Import {
        /// Input file path
        input: PathBuf,
    },

    /// Write a printable label sheet (HTML)
    Labels {
        /// Only print labels for these book ids (repeatable); all books when omitted
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Output file path
        #[arg(short, long, default_value = "labels.html")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "shelfscan_cli=debug,shelfscan_core=debug"
    } else {
        "shelfscan_cli=info,shelfscan_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = commands::Context::new(cli.data_dir)?;

    match cli.command {
        Commands::List { filter, json } => commands::list(&ctx, filter.as_deref(), json).await,

        Commands::AddIsbn { isbn } => commands::add_isbn(&ctx, &isbn).await,

        Commands::AddTitle { title } => commands::add_title(&ctx, &title).await,

        Commands::Scan => commands::scan(&ctx).await,

        Commands::Delete { id } => commands::delete(&ctx, &id).await,

        Commands::Export { output } => commands::export(&ctx, &output).await,

        Commands::Import { input } => commands::import(&ctx, &input).await,

        Commands::Labels { ids, output } => commands::labels(&ctx, &ids, &output).await,
    }
}
