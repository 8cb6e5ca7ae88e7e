use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "docsift",
    about = "Semantic search over scraped documentation pages"
)]
pub struct Cli {
    /// Override the vector store URL
    #[arg(long, global = true)]
    pub store_url: Option<String>,

    /// Override the target collection name
    #[arg(short = 'c', long, global = true)]
    pub collection: Option<String>,

    /// Embedding backend: 'api' or 'local'
    #[arg(long, global = true)]
    pub embedder: Option<String>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the target collection in the vector store
    Init(InitArgs),
    /// Segment and index pre-fetched pages
    Ingest(IngestArgs),
    /// Search indexed blocks by semantic similarity
    Search(SearchArgs),
    /// List collections in the vector store
    Collections,
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Init --

#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Drop and recreate the collection if it already exists
    #[arg(long)]
    pub recreate: bool,
}

// -- Ingest --

#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// JSON file mapping page URLs to their Markdown text
    pub pages: PathBuf,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query
    pub query: String,

    /// Number of results to return
    #[arg(short = 'n', long, default_value = "10")]
    pub top_k: usize,

    /// Restrict results to these block types (repeatable)
    #[arg(long = "block-type")]
    pub block_types: Vec<String>,

    /// Print relevance scores
    #[arg(long)]
    pub score: bool,

    /// Open the top result in a browser
    #[arg(long)]
    pub open: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "docsift",
            &mut std::io::stdout(),
        );
    }
}
