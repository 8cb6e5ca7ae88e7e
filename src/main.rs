use clap::Parser;
use kdam::{BarExt, tqdm};
use tracing_subscriber::EnvFilter;

use docsift::{
    cli::{Cli, Command},
    config::Settings,
    embedder,
    error::{Error, Result},
    ingestion::{self, IngestReport},
    search::{self, QueryEngine, SystemOpener},
    store::{QdrantStore, VectorStore},
};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("DOCSIFT_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let mut settings = Settings::from_env()?;
    if let Some(url) = cli.store_url {
        settings.store_url = url;
    }
    if let Some(name) = cli.collection {
        settings.collection = name;
    }
    if let Some(kind) = cli.embedder.as_deref() {
        settings.embedder = kind.parse()?;
    }

    let store = QdrantStore::new(&settings.store_url)?;

    match cli.command {
        Command::Init(args) => {
            cmd_init(&store, &settings, args.recreate)?;
        }
        Command::Ingest(args) => {
            cmd_ingest(&store, &settings, &args.pages)?;
        }
        Command::Search(args) => {
            cmd_search(&store, &settings, &args)?;
        }
        Command::Collections => {
            cmd_collections(&store)?;
        }
        Command::Completions(args) => args.generate(),
    }

    Ok(())
}

fn cmd_init(
    store: &dyn VectorStore,
    settings: &Settings,
    recreate: bool,
) -> Result<()> {
    let existing = store.list_collections()?;
    if existing.iter().any(|name| name == &settings.collection) {
        if !recreate {
            return Err(Error::Config(format!(
                "collection '{}' already exists (use --recreate to drop it)",
                settings.collection
            )));
        }
        store.delete_collection(&settings.collection)?;
    }

    let dimension = settings.embedder.dimension();
    store.create_collection(&settings.collection, dimension)?;

    println!(
        "Created collection '{}' ({dimension} dimensions, {} embedder)",
        settings.collection,
        settings.embedder.as_str()
    );
    Ok(())
}

fn cmd_ingest(
    store: &dyn VectorStore,
    settings: &Settings,
    pages_path: &std::path::Path,
) -> Result<()> {
    let pages = ingestion::load_pages(pages_path)?;
    if pages.is_empty() {
        println!("No pages to ingest.");
        return Ok(());
    }

    let embedder = embedder::build_embedder(settings)?;

    let mut progress = tqdm!(total = pages.len(), desc = "indexing");
    let mut totals = IngestReport::default();

    // Chunked so the bar advances between store round-trips.
    for chunk in pages.chunks(32) {
        let report = ingestion::ingest_pages(
            store,
            embedder.as_ref(),
            &settings.collection,
            chunk,
        )?;
        totals.merge(report);
        let _ = progress.update(chunk.len());
    }
    eprintln!();

    println!(
        "Indexed {} blocks ({} pages skipped, {} without body content)",
        totals.indexed, totals.skipped, totals.empty
    );
    Ok(())
}

fn cmd_search(
    store: &dyn VectorStore,
    settings: &Settings,
    args: &docsift::cli::SearchArgs,
) -> Result<()> {
    let embedder = embedder::build_embedder(settings)?;
    let engine =
        QueryEngine::new(store, embedder.as_ref(), settings.collection.clone());

    let block_types = (!args.block_types.is_empty())
        .then(|| args.block_types.clone());

    search::run_search(
        &engine,
        &SystemOpener,
        &args.query,
        args.top_k,
        block_types,
        args.score,
        args.open,
    )?;
    Ok(())
}

fn cmd_collections(store: &dyn VectorStore) -> Result<()> {
    let collections = store.list_collections()?;
    if collections.is_empty() {
        println!("No collections.");
    } else {
        for name in &collections {
            println!("{name}");
        }
    }
    Ok(())
}
