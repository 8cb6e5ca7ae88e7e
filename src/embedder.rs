//! Query/document embedding backends.
//!
//! Everything downstream only needs the [`Embedder`] capability: text in,
//! float vector out. Two concrete backends exist, selected once at
//! configuration time via [`EmbedderKind`]: a remote OpenAI-style API
//! (1536 dimensions) and a local inference server (768 dimensions). The
//! collection must have been created with the matching dimensionality.

use std::{str::FromStr, time::Duration};

use reqwest::{
    blocking::Client,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};

use crate::{
    config::Settings,
    error::{Error, Result},
};

/// Vector width of the remote API model (`text-embedding-ada-002`).
pub const API_DIMENSION: usize = 1536;

/// Vector width of the local instruction-tuned model.
pub const LOCAL_DIMENSION: usize = 768;

/// Model requested from the remote embeddings API.
pub const DEFAULT_API_MODEL: &str = "text-embedding-ada-002";

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Capability to turn text into an embedding vector.
///
/// Implementations are synchronous and request-scoped; retry policy
/// belongs to the serving layer, not to callers of this trait.
pub trait Embedder: std::fmt::Debug {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Width of the vectors produced by [`Embedder::embed`].
    fn dimension(&self) -> usize;
}

/// Which embedding backend to use. Parsed from configuration or the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    /// Remote OpenAI-style embeddings API.
    Api,
    /// Local inference server.
    Local,
}

impl EmbedderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedderKind::Api => "api",
            EmbedderKind::Local => "local",
        }
    }

    /// Vector width the backend produces; the collection must match.
    pub fn dimension(&self) -> usize {
        match self {
            EmbedderKind::Api => API_DIMENSION,
            EmbedderKind::Local => LOCAL_DIMENSION,
        }
    }
}

impl FromStr for EmbedderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "api" | "api-based" => Ok(EmbedderKind::Api),
            "local" | "local-model-based" => Ok(EmbedderKind::Local),
            other => Err(Error::InvalidEmbedder(other.to_string())),
        }
    }
}

/// Construct the configured embedding backend.
pub fn build_embedder(settings: &Settings) -> Result<Box<dyn Embedder>> {
    match settings.embedder {
        EmbedderKind::Api => {
            let api_key = settings.api_key.as_deref().ok_or_else(|| {
                Error::Config(
                    "the api embedder requires an API key (DOCSIFT_API_KEY)"
                        .to_string(),
                )
            })?;
            Ok(Box::new(ApiEmbedder::new(api_key, &settings.api_base_url)?))
        }
        EmbedderKind::Local => {
            Ok(Box::new(LocalEmbedder::new(&settings.embed_url)?))
        }
    }
}

// -- Remote API backend --

/// Blocking client for an OpenAI-style `/embeddings` endpoint.
#[derive(Debug)]
pub struct ApiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    data: Vec<ApiVector>,
}

#[derive(Deserialize)]
struct ApiVector {
    embedding: Vec<f32>,
}

impl ApiEmbedder {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        let auth = format!("Bearer {}", api_key.trim());
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| Error::Config("invalid API key".to_string()))?,
        );
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/embeddings",
                base_url.trim_end_matches('/')
            ),
            model: DEFAULT_API_MODEL.to_string(),
        })
    }
}

impl Embedder for ApiEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = ApiRequest {
            model: &self.model,
            input: text,
        };
        let response = self.client.post(&self.endpoint).json(&request).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::ExternalService(format!(
                "embedding request failed ({status}): {body}"
            )));
        }

        let parsed: ApiResponse = response.json()?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|v| v.embedding)
            .ok_or_else(|| {
                Error::ExternalService(
                    "embedding response contained no vectors".to_string(),
                )
            })
    }

    fn dimension(&self) -> usize {
        API_DIMENSION
    }
}

// -- Local inference backend --

/// Blocking client for a local text-embeddings inference server
/// (TEI-style `POST /embed` with an `inputs` field).
#[derive(Debug)]
pub struct LocalEmbedder {
    client: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct LocalRequest<'a> {
    inputs: &'a str,
}

impl LocalEmbedder {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/embed", base_url.trim_end_matches('/')),
        })
    }
}

impl Embedder for LocalEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = LocalRequest { inputs: text };
        let response = self.client.post(&self.endpoint).json(&request).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::ExternalService(format!(
                "local embedding request failed ({status}): {body}"
            )));
        }

        let mut vectors: Vec<Vec<f32>> = response.json()?;
        if vectors.is_empty() {
            return Err(Error::ExternalService(
                "local embedding response contained no vectors".to_string(),
            ));
        }
        Ok(vectors.swap_remove(0))
    }

    fn dimension(&self) -> usize {
        LOCAL_DIMENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_both_spellings() {
        assert_eq!("api".parse::<EmbedderKind>().unwrap(), EmbedderKind::Api);
        assert_eq!(
            "api-based".parse::<EmbedderKind>().unwrap(),
            EmbedderKind::Api
        );
        assert_eq!(
            "local".parse::<EmbedderKind>().unwrap(),
            EmbedderKind::Local
        );
        assert_eq!(
            "local-model-based".parse::<EmbedderKind>().unwrap(),
            EmbedderKind::Local
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "magic".parse::<EmbedderKind>().unwrap_err();
        assert!(matches!(err, Error::InvalidEmbedder(name) if name == "magic"));
    }

    #[test]
    fn kinds_disagree_on_dimension() {
        assert_eq!(EmbedderKind::Api.dimension(), 1536);
        assert_eq!(EmbedderKind::Local.dimension(), 768);
    }

    #[test]
    fn api_embedder_requires_key() {
        let settings = Settings {
            embedder: EmbedderKind::Api,
            api_key: None,
            ..Settings::default()
        };
        let err = build_embedder(&settings).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
