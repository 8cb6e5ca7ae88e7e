//! Process configuration.
//!
//! A single [`Settings`] value is built once at startup (defaults, then
//! environment overrides, then CLI flags) and passed down by reference.
//! Nothing in the crate reads the environment after this point.

use crate::{
    embedder::EmbedderKind,
    error::Result,
    store::DEFAULT_STORE_URL,
};

pub const DEFAULT_COLLECTION: &str = "docsift";
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBED_URL: &str = "http://localhost:8080";

pub const STORE_URL_ENV: &str = "DOCSIFT_STORE_URL";
pub const COLLECTION_ENV: &str = "DOCSIFT_COLLECTION";
pub const EMBEDDER_ENV: &str = "DOCSIFT_EMBEDDER";
pub const API_KEY_ENV: &str = "DOCSIFT_API_KEY";
pub const API_BASE_URL_ENV: &str = "DOCSIFT_API_BASE_URL";
pub const EMBED_URL_ENV: &str = "DOCSIFT_EMBED_URL";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the vector store.
    pub store_url: String,
    /// Name of the collection holding the indexed blocks.
    pub collection: String,
    /// Which embedding backend to use.
    pub embedder: EmbedderKind,
    /// API key for the remote embedding backend.
    pub api_key: Option<String>,
    /// Base URL of the remote embeddings API.
    pub api_base_url: String,
    /// Base URL of the local inference server.
    pub embed_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            embedder: EmbedderKind::Local,
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            embed_url: DEFAULT_EMBED_URL.to_string(),
        }
    }
}

impl Settings {
    /// Defaults overlaid with any `DOCSIFT_*` environment overrides.
    ///
    /// Fails only when `DOCSIFT_EMBEDDER` names an unknown backend.
    pub fn from_env() -> Result<Self> {
        let mut settings = Settings::default();

        if let Ok(value) = std::env::var(STORE_URL_ENV) {
            settings.store_url = value;
        }
        if let Ok(value) = std::env::var(COLLECTION_ENV) {
            settings.collection = value;
        }
        if let Ok(value) = std::env::var(EMBEDDER_ENV) {
            settings.embedder = value.parse()?;
        }
        if let Ok(value) = std::env::var(API_KEY_ENV) {
            settings.api_key = Some(value);
        }
        if let Ok(value) = std::env::var(API_BASE_URL_ENV) {
            settings.api_base_url = value;
        }
        if let Ok(value) = std::env::var(EMBED_URL_ENV) {
            settings.embed_url = value;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_local_and_unauthenticated() {
        let settings = Settings::default();
        assert_eq!(settings.store_url, "http://localhost:6333");
        assert_eq!(settings.collection, "docsift");
        assert_eq!(settings.embedder, EmbedderKind::Local);
        assert!(settings.api_key.is_none());
    }
}
