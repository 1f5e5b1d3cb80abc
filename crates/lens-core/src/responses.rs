//! Wire types for the analysis and chat endpoints.
//!
//! These structs define the JSON shape of `GET /analyze` and `POST /chat`
//! exchanges with the analysis service.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AnalysisMetrics, Insight};

/// Result of one analysis run. Produced atomically; never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalysisResult {
    pub summary: String,
    pub insights: Vec<Insight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<AnalysisMetrics>,
}

impl AnalysisResult {
    /// Look up an insight by its identifier.
    #[must_use]
    pub fn insight(&self, id: &str) -> Option<&Insight> {
        self.insights.iter().find(|insight| insight.id == id)
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChatRequest {
    pub question: String,
}

/// Response from `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: String,
    /// IDs of insights referenced in the answer. `null` and absent both mean none.
    #[serde(default)]
    pub used_insights: Option<Vec<String>>,
}

impl ChatReply {
    #[must_use]
    pub fn cited_insights(&self) -> &[String] {
        self.used_insights.as_deref().unwrap_or_default()
    }
}
