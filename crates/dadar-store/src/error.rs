use thiserror::Error;

/// Errors returned by document store reads and writes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend refused the request (HTTP 401/403).
    #[error("permission denied for {url} (HTTP {status})")]
    PermissionDenied { status: u16, url: String },

    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A document or field value the decoder could not interpret.
    #[error("malformed value in {context}: {reason}")]
    MalformedValue { context: String, reason: String },

    #[error("pagination limit reached for {collection}: exceeded {max_pages} pages")]
    PaginationLimit { collection: String, max_pages: usize },

    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),
}
