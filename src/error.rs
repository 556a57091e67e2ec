//! Error types for scholarfetch.
//!
//! Library functions return `Result<T, FetchError>`. Only usage errors and
//! transport faults travel through this type; a page that yields no usable
//! article is reported as `Ok(None)`, not as an error.

use thiserror::Error;

/// Main error type for retrieval operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// `fetch` was called before the shared client was opened
    #[error("Retriever not initialized: call open() before fetch()")]
    NotInitialized,

    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Rate limited by the external source
    #[error("Rate limited, retry after {0}s")]
    RateLimited(u64),

    /// Source returned a non-success status
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Status description
        message: String,
    },

    /// Markup or selector error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl FetchError {
    /// True for faults raised by the network layer or the remote source.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FetchError::Network(_) | FetchError::RateLimited(_) | FetchError::Api { .. }
        )
    }
}

/// Result type alias using `FetchError`
pub type Result<T> = std::result::Result<T, FetchError>;
