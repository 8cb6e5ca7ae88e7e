//! Batch ingestion: pages in, indexed points out.
//!
//! Fetching is someone else's job; ingestion starts from a JSON file
//! mapping page URLs to their already-converted Markdown. Segmentation is
//! pure and runs in parallel across pages; embedding and upserts stay
//! sequential. A page whose embedding call fails is logged and skipped,
//! the batch keeps going.

use std::{collections::BTreeMap, path::Path};

use rayon::prelude::*;
use uuid::Uuid;

use crate::{
    block::TextBlock,
    embedder::Embedder,
    error::Result,
    store::{PointRecord, VectorStore},
};

/// Points buffered per store upsert.
const UPSERT_BATCH: usize = 64;

/// One fetched page, ready for segmentation.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub markdown: String,
}

/// Load pages from a JSON object of `{url: markdown}` pairs.
pub fn load_pages(path: &Path) -> Result<Vec<Page>> {
    let raw = std::fs::read_to_string(path)?;
    let map: BTreeMap<String, String> = serde_json::from_str(&raw)?;
    Ok(map
        .into_iter()
        .map(|(url, markdown)| Page { url, markdown })
        .collect())
}

/// Outcome counts for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Blocks embedded and written to the store.
    pub indexed: usize,
    /// Pages dropped after an embedding failure.
    pub skipped: usize,
    /// Pages with no body content (no boundary marker).
    pub empty: usize,
}

impl IngestReport {
    pub fn merge(&mut self, other: IngestReport) {
        self.indexed += other.indexed;
        self.skipped += other.skipped;
        self.empty += other.empty;
    }
}

/// Segment, embed, and upsert a batch of pages into `collection`.
///
/// Embedding failures are per-page: reported via `tracing::warn` and
/// counted as skipped. Store failures abort the run.
pub fn ingest_pages(
    store: &dyn VectorStore,
    embedder: &dyn Embedder,
    collection: &str,
    pages: &[Page],
) -> Result<IngestReport> {
    // No shared state between page segmentations.
    let blocks: Vec<Option<TextBlock>> = pages
        .par_iter()
        .map(|page| TextBlock::from_page(&page.url, &page.markdown))
        .collect();

    let mut report = IngestReport::default();
    let mut batch: Vec<PointRecord> = Vec::new();

    for (page, block) in pages.iter().zip(blocks) {
        let Some(block) = block else {
            tracing::debug!(url = %page.url, "page has no body content");
            report.empty += 1;
            continue;
        };

        let vector = match embedder.embed(&block.content) {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!(
                    url = %page.url,
                    %err,
                    "skipping page: embedding failed"
                );
                report.skipped += 1;
                continue;
            }
        };

        batch.push(PointRecord {
            id: Uuid::new_v4().simple().to_string(),
            vector,
            payload: block.payload(),
        });
        report.indexed += 1;

        if batch.len() >= UPSERT_BATCH {
            store.upsert(collection, &batch)?;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        store.upsert(collection, &batch)?;
    }

    Ok(report)
}
