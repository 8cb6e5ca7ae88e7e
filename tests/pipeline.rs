//! End-to-end pipeline test: segment pages, embed them with a
//! deterministic stub, index into an in-memory store, and query back.

use std::cell::RefCell;
use std::collections::HashMap;

use docsift::{
    Embedder, Error, QueryEngine, Result, VectorStore,
    ingestion::{self, Page},
    store::{PointRecord, ScoredHit},
};

/// In-memory dot-product store, single-threaded like the CLI.
#[derive(Default)]
struct MemoryStore {
    collections: RefCell<HashMap<String, Vec<PointRecord>>>,
}

impl VectorStore for MemoryStore {
    fn list_collections(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> =
            self.collections.borrow().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn create_collection(&self, name: &str, _dimension: usize) -> Result<()> {
        self.collections
            .borrow_mut()
            .insert(name.to_string(), Vec::new());
        Ok(())
    }

    fn delete_collection(&self, name: &str) -> Result<()> {
        self.collections.borrow_mut().remove(name);
        Ok(())
    }

    fn upsert(&self, collection: &str, points: &[PointRecord]) -> Result<()> {
        let mut collections = self.collections.borrow_mut();
        let stored = collections.get_mut(collection).ok_or_else(|| {
            Error::ExternalService(format!(
                "no such collection: {collection}"
            ))
        })?;
        stored.extend_from_slice(points);
        Ok(())
    }

    fn search(
        &self,
        collection: &str,
        vector: &[f32],
        block_types: &[String],
        limit: usize,
    ) -> Result<Vec<ScoredHit>> {
        let collections = self.collections.borrow();
        let stored = collections.get(collection).ok_or_else(|| {
            Error::ExternalService(format!(
                "no such collection: {collection}"
            ))
        })?;

        let mut hits: Vec<ScoredHit> = stored
            .iter()
            .filter(|point| {
                block_types.iter().any(|bt| *bt == point.payload.block_type)
            })
            .map(|point| ScoredHit {
                payload: point.payload.clone(),
                score: dot(vector, &point.vector),
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        Ok(hits)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Counts keyword occurrences; same vector space for queries and pages.
#[derive(Debug)]
struct KeywordEmbedder;

const KEYWORDS: [&str; 3] = ["mesh", "lighting", "audio"];

impl Embedder for KeywordEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(KEYWORDS
            .iter()
            .map(|kw| lower.matches(kw).count() as f32)
            .collect())
    }

    fn dimension(&self) -> usize {
        KEYWORDS.len()
    }
}

fn page(url: &str, markdown: &str) -> Page {
    Page {
        url: url.to_string(),
        markdown: markdown.to_string(),
    }
}

fn sample_pages() -> Vec<Page> {
    vec![
        page(
            "https://docs.example.com/5.1/static-meshes/",
            "Breadcrumbs\n\n\nStatic Meshes\n--\n\n\nA static mesh is \
             geometry. See [the mesh editor](https://docs.example.com/e) \
             for mesh tools.",
        ),
        page(
            "https://docs.example.com/5.1/lighting-basics/",
            "Breadcrumbs\n\n\nLighting\n--\n\n\nLighting basics: place \
             lights, build lighting, preview lighting.",
        ),
        // Furniture only, never indexed.
        page("https://docs.example.com/5.1/nav/", "On this page\nLinks"),
    ]
}

#[test]
fn ingest_then_search_ranks_by_similarity() {
    let store = MemoryStore::default();
    store.create_collection("docs", KeywordEmbedder.dimension()).unwrap();

    let report =
        ingestion::ingest_pages(&store, &KeywordEmbedder, "docs", &sample_pages())
            .unwrap();
    assert_eq!(report.indexed, 2);
    assert_eq!(report.empty, 1);

    let engine = QueryEngine::new(&store, &KeywordEmbedder, "docs");
    let results = engine.search("mesh", 2, None).unwrap();

    assert_eq!(results.len(), 2);
    assert!(
        results[0]
            .locator
            .ends_with("static-meshes/#static-meshes")
    );
    assert!(results[0].score > results[1].score);

    // The indexed text is clean: the link resolved to its visible text.
    assert!(results[0].text.contains("the mesh editor"));
    assert!(!results[0].text.contains("](https://docs.example.com/e)"));
    assert!(!results[0].text.contains("Breadcrumbs"));
}

#[test]
fn searching_a_missing_collection_is_a_hard_error() {
    let store = MemoryStore::default();
    store.create_collection("a", 3).unwrap();
    store.create_collection("b", 3).unwrap();

    let engine = QueryEngine::new(&store, &KeywordEmbedder, "docs");
    let err = engine.search("mesh", 5, None).unwrap_err();

    match err {
        Error::CollectionNotFound { name, existing } => {
            assert_eq!(name, "docs");
            assert_eq!(existing, vec!["a".to_string(), "b".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn block_type_filter_excludes_everything_else() {
    let store = MemoryStore::default();
    store.create_collection("docs", 3).unwrap();
    ingestion::ingest_pages(&store, &KeywordEmbedder, "docs", &sample_pages())
        .unwrap();

    let engine = QueryEngine::new(&store, &KeywordEmbedder, "docs");

    // Everything indexed today is prose text; filtering on another type
    // must come back empty rather than falling through.
    let results = engine
        .search("mesh", 5, Some(vec!["code".to_string()]))
        .unwrap();
    assert!(results.is_empty());
}
