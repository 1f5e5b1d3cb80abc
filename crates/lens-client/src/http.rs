//! Response normalization for the analysis service.
//!
//! Centralizes status-code checks, `detail` extraction, rate-limit
//! reclassification and body decoding so [`crate::HttpTransport`] stays
//! focused on request construction. Every failure leaves this module as a
//! [`TransportError`] with a user-presentable message.

use lens_core::TransportError;
use serde::de::DeserializeOwned;

/// Shown instead of raw upstream throttling text.
pub const RATE_LIMIT_NOTICE: &str =
    "The assistant is receiving too many requests right now. Please wait a moment and try again.";

/// Longest raw body excerpt surfaced as an error message.
const MAX_BODY_EXCERPT_CHARS: usize = 300;

/// The two remote operations, with their route and fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Analyze,
    Chat,
}

impl Operation {
    /// Route below the configured path prefix.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Chat => "chat",
        }
    }

    /// Message used when nothing more specific is available.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Analyze => "Failed to fetch insights",
            Self::Chat => "Failed to send question",
        }
    }
}

/// Decode a successful response body or normalize a failed one.
///
/// # Errors
///
/// - non-success status → [`FailureKind::Http`] or [`FailureKind::RateLimited`]
/// - body cannot be read → [`FailureKind::Network`]
/// - body is not the expected JSON → [`FailureKind::Parse`]
///
/// [`FailureKind::Http`]: lens_core::FailureKind::Http
/// [`FailureKind::RateLimited`]: lens_core::FailureKind::RateLimited
/// [`FailureKind::Network`]: lens_core::FailureKind::Network
/// [`FailureKind::Parse`]: lens_core::FailureKind::Parse
pub async fn decode_response<T: DeserializeOwned>(
    resp: reqwest::Response,
    operation: Operation,
) -> Result<T, TransportError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(normalize_failure(status.as_u16(), &body, operation));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|error| network_failure(&error, operation))?;

    serde_json::from_slice(&bytes).map_err(|error| {
        tracing::warn!(operation = operation.route(), %error, "undecodable response body");
        TransportError::parse(format!(
            "{}: unexpected response from server",
            operation.default_message()
        ))
    })
}

/// Normalize a request that never produced a response.
#[must_use]
pub fn network_failure(error: &reqwest::Error, operation: Operation) -> TransportError {
    tracing::warn!(
        operation = operation.route(),
        timeout = error.is_timeout(),
        connect = error.is_connect(),
        %error,
        "request failed before a response arrived"
    );
    TransportError::network(operation.default_message())
}

/// Turn a non-success status and its body into a displayable error.
///
/// Message resolution, first match wins:
/// 1. string `detail` field of a JSON body
/// 2. `msg` entries of a list-valued `detail` (validation errors), joined
/// 3. the trimmed raw body, capped to a short excerpt
/// 4. the operation's default message
///
/// A `429` status, or a resolved message carrying the throttling signature,
/// is replaced by [`RATE_LIMIT_NOTICE`].
#[must_use]
pub fn normalize_failure(status: u16, body: &str, operation: Operation) -> TransportError {
    let message = failure_message(body);

    let throttled = status == 429 || message.as_deref().is_some_and(is_rate_limit_signature);
    let error = if throttled {
        TransportError::rate_limited(RATE_LIMIT_NOTICE)
    } else {
        TransportError::http(message.unwrap_or_else(|| operation.default_message().to_string()))
    };

    tracing::warn!(
        operation = operation.route(),
        status,
        kind = %error.kind(),
        "service returned a failure status"
    );
    error
}

/// Upstream throttling text: an embedded `429` or a capacity notice.
#[must_use]
pub fn is_rate_limit_signature(text: &str) -> bool {
    text.contains("429") || text.to_ascii_lowercase().contains("capacity exceeded")
}

/// A JSON object body speaks only through `detail`; anything else is shown
/// as raw text.
fn failure_message(body: &str) -> Option<String> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) if value.is_object() => extract_detail(&value),
        _ => body_excerpt(body),
    }
}

fn extract_detail(value: &serde_json::Value) -> Option<String> {
    match value.get("detail")? {
        serde_json::Value::String(detail) => {
            let detail = detail.trim();
            (!detail.is_empty()).then(|| detail.to_string())
        }
        serde_json::Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

fn body_excerpt(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if body.chars().count() <= MAX_BODY_EXCERPT_CHARS {
        return Some(body.to_string());
    }
    let mut excerpt: String = body.chars().take(MAX_BODY_EXCERPT_CHARS).collect();
    excerpt.push('…');
    Some(excerpt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_core::FailureKind;
    use lens_core::responses::ChatReply;
    use rstest::rstest;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[rstest]
    #[case::string_detail(500, r#"{"detail": "Dataset error: file missing"}"#, "Dataset error: file missing")]
    #[case::validation_list(
        422,
        r#"{"detail": [{"loc": ["body", "question"], "msg": "String should have at least 3 characters"}]}"#,
        "String should have at least 3 characters"
    )]
    #[case::raw_text(502, "Bad Gateway", "Bad Gateway")]
    #[case::json_without_detail(500, r#"{"error": "boom"}"#, "Failed to send question")]
    #[case::empty_body(503, "", "Failed to send question")]
    #[case::blank_detail(500, r#"{"detail": "   "}"#, "Failed to send question")]
    #[case::null_detail(500, r#"{"detail": null}"#, "Failed to send question")]
    #[case::empty_validation_list(422, r#"{"detail": []}"#, "Failed to send question")]
    #[case::json_scalar_is_raw_text(500, "42", "42")]
    fn http_failure_messages(#[case] status: u16, #[case] body: &str, #[case] expected: &str) {
        let err = normalize_failure(status, body, Operation::Chat);
        assert_eq!(err.kind(), FailureKind::Http);
        assert_eq!(err.message(), expected);
    }

    #[test]
    fn validation_entries_are_joined() {
        let body = r#"{"detail": [{"msg": "too short"}, {"msg": "not a question"}]}"#;
        let err = normalize_failure(422, body, Operation::Chat);
        assert_eq!(err.message(), "too short; not a question");
    }

    #[rstest]
    #[case::detail_with_status_code(500, r#"{"detail": "rate limit: 429 capacity exceeded"}"#)]
    #[case::capacity_only(502, r#"{"detail": "Chat completion failed: Service tier Capacity Exceeded"}"#)]
    #[case::upstream_status(502, r#"{"detail": "Mistral API error (status 429): slow down"}"#)]
    #[case::status_429_without_body(429, "")]
    #[case::raw_text_signature(503, "429 Too Many Requests")]
    fn rate_limit_is_replaced_by_notice(#[case] status: u16, #[case] body: &str) {
        let err = normalize_failure(status, body, Operation::Chat);
        assert_eq!(err.kind(), FailureKind::RateLimited);
        assert_eq!(err.message(), RATE_LIMIT_NOTICE);
    }

    #[test]
    fn long_raw_body_is_capped() {
        let body = "x".repeat(1000);
        let err = normalize_failure(500, &body, Operation::Analyze);
        assert_eq!(err.message().chars().count(), MAX_BODY_EXCERPT_CHARS + 1);
        assert!(err.message().ends_with('…'));
    }

    #[test]
    fn default_message_per_operation() {
        assert_eq!(
            normalize_failure(500, "", Operation::Analyze).message(),
            "Failed to fetch insights"
        );
        assert_eq!(
            normalize_failure(500, "", Operation::Chat).message(),
            "Failed to send question"
        );
    }

    #[tokio::test]
    async fn decode_success_body() {
        let resp = mock_response(200, r#"{"answer": "Focus on returning visitors."}"#);
        let reply: ChatReply = decode_response(resp, Operation::Chat).await.unwrap();
        assert_eq!(reply.answer, "Focus on returning visitors.");
    }

    #[tokio::test]
    async fn decode_failure_status_uses_detail() {
        let resp = mock_response(502, r#"{"detail": "Analysis service error: empty completion"}"#);
        let err = decode_response::<ChatReply>(resp, Operation::Chat)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Http);
        assert_eq!(err.message(), "Analysis service error: empty completion");
    }

    #[tokio::test]
    async fn decode_malformed_body_is_parse_failure() {
        let resp = mock_response(200, "<html>maintenance</html>");
        let err = decode_response::<ChatReply>(resp, Operation::Chat)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
        assert_eq!(
            err.message(),
            "Failed to send question: unexpected response from server"
        );
    }

    #[tokio::test]
    async fn decode_wrong_shape_is_parse_failure() {
        let resp = mock_response(200, r#"{"reply": "wrong field"}"#);
        let err = decode_response::<ChatReply>(resp, Operation::Chat)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
    }

    #[test]
    fn signature_is_case_insensitive_for_capacity() {
        assert!(is_rate_limit_signature("CAPACITY EXCEEDED"));
        assert!(is_rate_limit_signature("HTTP 429"));
        assert!(!is_rate_limit_signature("capacity planning"));
    }
}
