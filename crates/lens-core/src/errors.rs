//! Normalized transport error.
//!
//! Every way a call to the analysis service can fail (unreachable host,
//! non-success status, unreadable body, throttling) collapses into a single
//! [`TransportError`] whose message is ready to show to a user. The
//! [`FailureKind`] is kept for logging; callers above the transport only
//! display the message.

use std::fmt;

use thiserror::Error;

/// What went wrong underneath a [`TransportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The request never produced a response (connect, DNS, timeout, abort).
    Network,
    /// The service answered with a non-success status.
    Http,
    /// The service answered with success but the body could not be decoded.
    Parse,
    /// An HTTP failure whose status or detail text signals throttling.
    RateLimited,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Http => "http",
            Self::Parse => "parse",
            Self::RateLimited => "rate_limited",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error shape all transport failures are converted into.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    kind: FailureKind,
    message: String,
}

impl TransportError {
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Network, message)
    }

    #[must_use]
    pub fn http(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Http, message)
    }

    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Parse, message)
    }

    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(FailureKind::RateLimited, message)
    }

    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    /// User-presentable text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
