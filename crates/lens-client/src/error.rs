//! Transport construction errors.

use thiserror::Error;

/// Errors raised while building an [`crate::HttpTransport`].
///
/// Request-time failures are never reported here; they are normalized into
/// [`lens_core::TransportError`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// The underlying `reqwest::Client` could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The configured base URL does not form a valid endpoint URL.
    #[error("invalid service URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The base URL uses a scheme other than http or https.
    #[error("unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
}
