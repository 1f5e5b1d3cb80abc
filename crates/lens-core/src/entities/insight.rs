use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Severity;

/// One structured finding produced by an analysis run. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Insight {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    /// Quantitative data supporting the insight.
    pub metric_evidence: String,
    /// Probable behavioral or UX root cause.
    pub hypothesized_cause: String,
    pub recommendation: String,
    /// User group most affected.
    pub target_segment: String,
}
