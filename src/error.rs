pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("external service error: {0}")]
    ExternalService(String),

    #[error(
        "collection '{name}' does not exist; existing collections: {existing:?}"
    )]
    CollectionNotFound { name: String, existing: Vec<String> },

    #[error("unknown embedder '{0}' (expected 'api' or 'local')")]
    InvalidEmbedder(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// Reserved for future input validation; segmentation itself never
    /// fails on valid UTF-8 text.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}
