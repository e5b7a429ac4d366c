//! Typed errors for the article extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. None of these escape
//! [`Pipeline::run`](crate::Pipeline::run); they are absorbed into
//! [`FieldStatus`](crate::FieldStatus) values there.

use thiserror::Error;

/// Errors from a single network fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS or body-read failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with something other than 200
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Request exceeded the per-request timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// URL could not be parsed or is not http(s)
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// The per-run fetch budget refused the request
    #[error("fetch budget exhausted")]
    BudgetExhausted,

    /// Building the HTTP client failed
    #[error("client build error: {0}")]
    Client(String),
}

/// Errors from turning fetched HTML into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Both the readability pass and the DOM fallback failed
    #[error("could not extract content from {url}: {reason}")]
    Parse { url: String, reason: String },

    /// A site profile contains a selector the parser rejects
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Fetch failed before extraction could start
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

/// Errors from rendering a prompt template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    /// Template references a variable that was never defined
    #[error("missing prompt variable: {0}")]
    MissingVariable(String),

    /// Unbalanced `{` or `}` at the given byte offset
    #[error("malformed template at byte {position}: {reason}")]
    MalformedTemplate { position: usize, reason: String },
}

/// Errors from a completion backend.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Missing credentials or invalid settings
    #[error("configuration error: {0}")]
    Config(String),

    /// Network failure talking to the backend
    #[error("network error: {0}")]
    Network(String),

    /// Backend rejected the request
    #[error("API error: {0}")]
    Api(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
