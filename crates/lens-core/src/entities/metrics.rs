use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Raw figures the service computed from the dataset before generating insights.
///
/// Extra breakdown tables the service may attach are ignored on decode.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalysisMetrics {
    pub total_sessions: u64,
    pub total_conversions: u64,
    /// Percentage, already multiplied by 100.
    pub conversion_rate: f64,
    /// Fraction in `0.0..=1.0`.
    pub avg_bounce_rate: f64,
    /// Fraction in `0.0..=1.0`.
    pub avg_exit_rate: f64,
    pub avg_page_value: f64,
    pub weekend_sessions: u64,
    pub weekday_sessions: u64,
    pub weekend_conversion_rate: f64,
    pub weekday_conversion_rate: f64,
}
