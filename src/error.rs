//! Error types for the store, the generation provider and configuration.

use thiserror::Error;

/// Startup configuration failures. These are the only errors that abort the
/// process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GOOGLE_API_KEY is not set; add it to the environment or a .env file")]
    MissingApiKey,
}

/// Failures from the hosted generation call, tagged so callers can tell
/// retryable conditions (rate limits, transport faults) from fatal ones
/// (bad credentials).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("authentication with the generation provider failed: {0}")]
    Auth(String),

    #[error("generation provider rate limit reached: {0}")]
    Quota(String),

    #[error("generation provider returned an error: {0}")]
    Api(String),

    #[error("network failure calling the generation provider: {0}")]
    Network(#[from] reqwest::Error),

    #[error("generation provider returned no usable candidate")]
    EmptyResponse,
}

impl ProviderError {
    /// Whether a later identical call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Quota(_) | ProviderError::Network(_))
    }
}

/// Failures from the data store, split between reaching the server and
/// executing a statement on it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not connect to MySQL: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("statement execution failed: {0}")]
    Statement(#[source] sqlx::Error),
}
