use thiserror::Error;

/// Errors raised while fetching candidate pools.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider was built without any source.
    #[error("no pool sources configured")]
    NoSources,
    /// Every source failed or timed out.
    #[error("all {attempted} pool sources failed")]
    AllSourcesFailed { attempted: usize },
    /// A source did not answer in time.
    #[error("pool source {name} timed out after {timeout_ms} ms")]
    Timeout { name: String, timeout_ms: u64 },
    /// Snapshot file could not be read.
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    /// Snapshot document is not valid JSON.
    #[error("snapshot parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// HTTP request failed or returned an error status.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
