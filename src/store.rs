//! Vector store abstraction and the Qdrant REST implementation.
//!
//! The store is an external collaborator: everything in this crate talks
//! to it through the [`VectorStore`] trait so tests can substitute an
//! in-memory stub. [`QdrantStore`] is the production implementation, a
//! minimal blocking REST client covering the handful of endpoints the
//! pipeline needs.

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    block::BlockPayload,
    error::{Error, Result},
};

/// HNSW breadth used for approximate search (`hnsw_ef`).
pub const SEARCH_BREADTH: u64 = 128;

/// One indexed record: a fresh unique id, the embedding vector, and the
/// block payload. Re-ingesting a URL creates new ids; nothing is merged.
#[derive(Debug, Clone, Serialize)]
pub struct PointRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: BlockPayload,
}

/// A raw search hit: payload plus the store's similarity score.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredHit {
    pub payload: BlockPayload,
    pub score: f32,
}

/// The nearest-neighbor store the pipeline writes to and queries.
///
/// One long-lived handle per process, reused across calls; concurrent use
/// of a single handle is the caller's problem to serialize.
pub trait VectorStore {
    fn list_collections(&self) -> Result<Vec<String>>;

    /// Create a collection for dot-product search over `dimension`-wide
    /// vectors.
    fn create_collection(&self, name: &str, dimension: usize) -> Result<()>;

    fn delete_collection(&self, name: &str) -> Result<()>;

    fn upsert(&self, collection: &str, points: &[PointRecord]) -> Result<()>;

    /// Approximate nearest-neighbor search restricted to the given block
    /// types, best-first, at most `limit` hits, payloads included.
    fn search(
        &self,
        collection: &str,
        vector: &[f32],
        block_types: &[String],
        limit: usize,
    ) -> Result<Vec<ScoredHit>>;
}

/// Disjunctive block-type predicate: match any of the given types.
pub fn block_type_filter(block_types: &[String]) -> serde_json::Value {
    let should: Vec<serde_json::Value> = block_types
        .iter()
        .map(|bt| {
            json!({
                "key": "block_type",
                "match": { "value": bt },
            })
        })
        .collect();

    json!({ "must": [{ "should": should }] })
}

// -- Qdrant REST client --

pub const DEFAULT_STORE_URL: &str = "http://localhost:6333";

pub struct QdrantStore {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct CollectionsResponse {
    result: CollectionsResult,
}

#[derive(Deserialize)]
struct CollectionsResult {
    collections: Vec<CollectionDescription>,
}

#[derive(Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<ScoredHit>,
}

impl QdrantStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(Error::ExternalService(format!(
            "vector store request failed ({status}): {body}"
        )))
    }
}

impl VectorStore for QdrantStore {
    fn list_collections(&self) -> Result<Vec<String>> {
        let response =
            self.client.get(self.url("/collections")).send()?;
        let parsed: CollectionsResponse = Self::check(response)?.json()?;
        Ok(parsed
            .result
            .collections
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    fn create_collection(&self, name: &str, dimension: usize) -> Result<()> {
        let body = json!({
            "vectors": { "size": dimension, "distance": "Dot" },
        });
        let response = self
            .client
            .put(self.url(&format!("/collections/{name}")))
            .json(&body)
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    fn delete_collection(&self, name: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/collections/{name}")))
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    fn upsert(&self, collection: &str, points: &[PointRecord]) -> Result<()> {
        let body = json!({ "points": points });
        let response = self
            .client
            .put(self.url(&format!("/collections/{collection}/points?wait=true")))
            .json(&body)
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    fn search(
        &self,
        collection: &str,
        vector: &[f32],
        block_types: &[String],
        limit: usize,
    ) -> Result<Vec<ScoredHit>> {
        let body = json!({
            "vector": vector,
            "filter": block_type_filter(block_types),
            "limit": limit,
            "with_payload": true,
            "params": { "hnsw_ef": SEARCH_BREADTH, "exact": false },
        });
        let response = self
            .client
            .post(self.url(&format!("/collections/{collection}/points/search")))
            .json(&body)
            .send()?;
        let parsed: SearchResponse = Self::check(response)?.json()?;
        Ok(parsed.result)
    }
}
