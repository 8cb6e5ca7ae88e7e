//! Filtered vector-search query engine.
//!
//! [`QueryEngine`] borrows the process-wide store handle and embedding
//! backend, verifies the target collection exists, and maps raw store
//! hits into [`SearchResult`]s, preserving the store's ranking order.

use std::process::Command;

use crate::{
    embedder::Embedder,
    error::{Error, Result},
    store::VectorStore,
};

pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_BLOCK_TYPE: &str = "text";

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Human-navigable location: `url#section_anchor`.
    pub locator: String,
    pub text: String,
    pub score: f32,
}

/// `None` or an empty list means "prose text only".
pub fn normalize_block_types(block_types: Option<Vec<String>>) -> Vec<String> {
    match block_types {
        Some(types) if !types.is_empty() => types,
        _ => vec![DEFAULT_BLOCK_TYPE.to_string()],
    }
}

pub struct QueryEngine<'a> {
    store: &'a dyn VectorStore,
    embedder: &'a dyn Embedder,
    collection: String,
}

impl<'a> QueryEngine<'a> {
    pub fn new(
        store: &'a dyn VectorStore,
        embedder: &'a dyn Embedder,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embedder,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Run a filtered top-k similarity search.
    ///
    /// Fails with [`Error::CollectionNotFound`] (listing the collections
    /// that do exist) when the target collection is absent, so a caller
    /// can tell a misconfigured name from an empty result.
    pub fn search(
        &self,
        query: &str,
        top_k: usize,
        block_types: Option<Vec<String>>,
    ) -> Result<Vec<SearchResult>> {
        let existing = self.store.list_collections()?;
        if !existing.iter().any(|name| name == &self.collection) {
            return Err(Error::CollectionNotFound {
                name: self.collection.clone(),
                existing,
            });
        }

        let vector = self.embedder.embed(query)?;
        let block_types = normalize_block_types(block_types);
        let hits =
            self.store
                .search(&self.collection, &vector, &block_types, top_k)?;

        Ok(hits
            .into_iter()
            .map(|hit| SearchResult {
                locator: format!(
                    "{}#{}",
                    hit.payload.url, hit.payload.section_anchor
                ),
                text: hit.payload.text,
                score: hit.score,
            })
            .collect())
    }
}

/// Undo the parenthesis escaping left over from Markdown conversion.
pub fn unescape_parens(s: &str) -> String {
    s.replace("\\(", "(").replace("\\)", ")")
}

/// Pretty-print ranked results for terminal consumption.
pub fn print_results(query: &str, results: &[SearchResult], show_score: bool) {
    println!("{}", "=".repeat(80));
    println!("{:^80}", format!("Query: {query}"));
    println!("{}", "=".repeat(80));

    if results.is_empty() {
        println!("No results found.");
        return;
    }

    for (i, result) in results.iter().enumerate() {
        println!("{}) {}", i + 1, result.locator);
        println!("--> {}", unescape_parens(&result.text));
        if show_score {
            println!("Score: {}", result.score);
        }
        println!("{}", "-".repeat(80));
    }
}

/// Capability to open a result locator for the user.
///
/// Kept behind a trait so the search path stays testable without a
/// display; the production implementation shells out to the platform
/// opener.
pub trait LocatorOpener {
    fn open(&self, locator: &str) -> Result<()>;
}

pub struct SystemOpener;

impl LocatorOpener for SystemOpener {
    fn open(&self, locator: &str) -> Result<()> {
        let status = open_command(locator).status()?;
        if !status.success() {
            return Err(Error::ExternalService(format!(
                "failed to open '{locator}' in a browser"
            )));
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn open_command(locator: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(locator);
    cmd
}

#[cfg(target_os = "windows")]
fn open_command(locator: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", locator]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_command(locator: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(locator);
    cmd
}

/// Search, print, and optionally open the top hit.
pub fn run_search(
    engine: &QueryEngine<'_>,
    opener: &dyn LocatorOpener,
    query: &str,
    top_k: usize,
    block_types: Option<Vec<String>>,
    show_score: bool,
    open_top_hit: bool,
) -> Result<Vec<SearchResult>> {
    let results = engine.search(query, top_k, block_types)?;
    print_results(query, &results, show_score);

    if open_top_hit
        && let Some(top) = results.first()
    {
        opener.open(&top.locator)?;
    }

    Ok(results)
}
