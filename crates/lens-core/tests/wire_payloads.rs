//! Decoding of analysis service payloads and JsonSchema validation of the
//! published wire types.

use lens_core::entities::{Insight, Message};
use lens_core::enums::{Role, Severity};
use lens_core::responses::{AnalysisResult, ChatReply, ChatRequest};
use pretty_assertions::assert_eq;
use rstest::rstest;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

const ANALYZE_FIXTURE: &str = r#"{
    "summary": "Returning visitors convert at half the rate of new visitors.",
    "insights": [
        {
            "id": "insight-1",
            "title": "Returning visitors stall at checkout",
            "severity": "high",
            "metric_evidence": "Returning visitors convert at 13.9% vs 24.9% for new visitors",
            "hypothesized_cause": "Saved carts expire before returning sessions resume",
            "recommendation": "Persist carts for 30 days and surface them on the landing page",
            "target_segment": "Returning_Visitor"
        },
        {
            "id": "insight-2",
            "title": "Weekend traffic under-converts",
            "severity": "low",
            "metric_evidence": "Weekend conversion 17.4% vs weekday 15.1%",
            "hypothesized_cause": "Promotions run on weekdays only",
            "recommendation": "Schedule one promotion on Saturdays",
            "target_segment": "Weekend shoppers"
        }
    ],
    "metrics": {
        "total_sessions": 12330,
        "total_conversions": 1908,
        "conversion_rate": 15.47,
        "avg_bounce_rate": 0.022,
        "avg_exit_rate": 0.043,
        "avg_page_value": 5.89,
        "weekend_sessions": 2868,
        "weekday_sessions": 9462,
        "weekend_conversion_rate": 17.4,
        "weekday_conversion_rate": 14.89,
        "visitor_type_breakdown": {
            "Returning_Visitor": { "sessions": 10551, "conversion_rate": 13.93 }
        },
        "top_converting_months": [{ "month": "Nov", "conversion_rate": 25.35 }]
    }
}"#;

#[test]
fn decodes_full_analysis_payload() {
    let result: AnalysisResult = serde_json::from_str(ANALYZE_FIXTURE).unwrap();

    assert_eq!(result.insights.len(), 2);
    assert_eq!(result.insights[0].severity, Severity::High);
    assert_eq!(result.insights[1].target_segment, "Weekend shoppers");

    let metrics = result.metrics.as_ref().expect("metrics present");
    assert_eq!(metrics.total_sessions, 12330);
    assert_eq!(metrics.weekend_sessions + metrics.weekday_sessions, 12330);
}

#[test]
fn insight_lookup_by_id() {
    let result: AnalysisResult = serde_json::from_str(ANALYZE_FIXTURE).unwrap();
    assert_eq!(
        result.insight("insight-2").map(|i| i.title.as_str()),
        Some("Weekend traffic under-converts")
    );
    assert!(result.insight("insight-9").is_none());
}

#[test]
fn metrics_block_is_optional() {
    let result: AnalysisResult =
        serde_json::from_str(r#"{ "summary": "S", "insights": [] }"#).unwrap();
    assert!(result.metrics.is_none());
    assert!(result.insights.is_empty());

    let encoded = serde_json::to_value(&result).unwrap();
    assert!(encoded.get("metrics").is_none());
}

#[test]
fn unknown_severity_rejects_whole_payload() {
    let payload = ANALYZE_FIXTURE.replacen("\"high\"", "\"critical\"", 1);
    assert!(serde_json::from_str::<AnalysisResult>(&payload).is_err());
}

#[test]
fn missing_insight_field_rejects_whole_payload() {
    let payload =
        ANALYZE_FIXTURE.replacen("\"target_segment\": \"Weekend shoppers\"", "\"x\": 1", 1);
    assert!(serde_json::from_str::<AnalysisResult>(&payload).is_err());
}

#[rstest]
#[case::absent(r#"{ "answer": "A" }"#, &[])]
#[case::null(r#"{ "answer": "A", "used_insights": null }"#, &[])]
#[case::listed(r#"{ "answer": "A", "used_insights": ["insight-1"] }"#, &["insight-1"])]
fn chat_reply_used_insights(#[case] body: &str, #[case] expected: &[&str]) {
    let reply: ChatReply = serde_json::from_str(body).unwrap();
    assert_eq!(reply.answer, "A");
    assert_eq!(reply.cited_insights(), expected);
}

#[test]
fn chat_request_encodes_question_only() {
    let body = serde_json::to_value(ChatRequest {
        question: "Why do returning visitors drop?".into(),
    })
    .unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "question": "Why do returning visitors drop?" })
    );
}

#[test]
fn analysis_result_matches_its_schema() {
    let result: AnalysisResult = serde_json::from_str(ANALYZE_FIXTURE).unwrap();
    let schema = serde_json::to_value(schema_for!(AnalysisResult)).unwrap();
    let instance = serde_json::to_value(&result).unwrap();
    let errors = validate_against_schema(&schema, &instance);
    assert!(errors.is_empty(), "schema validation failed: {errors:?}");
}

#[test]
fn insight_schema_rejects_unknown_severity() {
    let schema = serde_json::to_value(schema_for!(Insight)).unwrap();
    let instance = serde_json::json!({
        "id": "1",
        "title": "T",
        "severity": "urgent",
        "metric_evidence": "e",
        "hypothesized_cause": "c",
        "recommendation": "r",
        "target_segment": "s"
    });
    assert!(!validate_against_schema(&schema, &instance).is_empty());
}

#[test]
fn message_constructors_set_role() {
    assert_eq!(Message::user("hi").role, Role::User);
    assert_eq!(Message::assistant("hello").role, Role::Assistant);

    let schema = serde_json::to_value(schema_for!(Message)).unwrap();
    let instance = serde_json::to_value(Message::assistant("hello")).unwrap();
    assert!(validate_against_schema(&schema, &instance).is_empty());
}
