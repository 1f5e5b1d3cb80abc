//! # lens-client
//!
//! HTTP transport to the uxlens analysis service.
//!
//! [`HttpTransport`] implements [`InsightsApi`] over two JSON endpoints:
//! - `GET  {base}/{prefix}/analyze` → [`AnalysisResult`]
//! - `POST {base}/{prefix}/chat`    → [`ChatReply`]
//!
//! Every failure is normalized into a [`TransportError`] (see [`http`]). No
//! retries are attempted.

pub mod http;

mod error;

pub use error::BuildError;
pub use http::{Operation, RATE_LIMIT_NOTICE};

use async_trait::async_trait;
use lens_config::ApiConfig;
use lens_core::responses::{AnalysisResult, ChatReply, ChatRequest};
use lens_core::{InsightsApi, TransportError};
use reqwest::Url;

use crate::http::{decode_response, network_failure};

/// reqwest-backed client for the analysis service.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    analyze_url: Url,
    chat_url: Url,
}

impl HttpTransport {
    /// Build a transport with its own `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the configured base URL is not an absolute
    /// http(s) URL or the underlying client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, BuildError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("uxlens/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Self::with_client(http, config)
    }

    /// Build a transport around an existing client (shared pools, proxies).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidUrl`] or [`BuildError::UnsupportedScheme`]
    /// for a base URL the service cannot be reached at.
    pub fn with_client(http: reqwest::Client, config: &ApiConfig) -> Result<Self, BuildError> {
        Ok(Self {
            http,
            analyze_url: endpoint_url(config, Operation::Analyze)?,
            chat_url: endpoint_url(config, Operation::Chat)?,
        })
    }

    #[must_use]
    pub const fn analyze_url(&self) -> &Url {
        &self.analyze_url
    }

    #[must_use]
    pub const fn chat_url(&self) -> &Url {
        &self.chat_url
    }
}

fn endpoint_url(config: &ApiConfig, operation: Operation) -> Result<Url, BuildError> {
    let raw = config.endpoint(operation.route());
    let url = Url::parse(&raw).map_err(|source| BuildError::InvalidUrl {
        url: raw.clone(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(BuildError::UnsupportedScheme(other.to_string())),
    }
}

#[async_trait]
impl InsightsApi for HttpTransport {
    async fn run_analysis(&self) -> Result<AnalysisResult, TransportError> {
        tracing::debug!(url = %self.analyze_url, "GET analyze");
        let resp = self
            .http
            .get(self.analyze_url.clone())
            .send()
            .await
            .map_err(|error| network_failure(&error, Operation::Analyze))?;

        let result: AnalysisResult = decode_response(resp, Operation::Analyze).await?;
        tracing::debug!(insights = result.insights.len(), "analysis received");
        Ok(result)
    }

    async fn ask(&self, question: &str) -> Result<ChatReply, TransportError> {
        tracing::debug!(url = %self.chat_url, chars = question.len(), "POST chat");
        let body = ChatRequest {
            question: question.to_string(),
        };
        let resp = self
            .http
            .post(self.chat_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|error| network_failure(&error, Operation::Chat))?;

        decode_response(resp, Operation::Chat).await
    }
}
