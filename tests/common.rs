//! Common test utilities for building surveys and answers.
use bunki::prelude::*;
use serde_json::json;

/// Builds a section from a JSON fixture, going through the same decoder a
/// persisted survey would.
#[allow(dead_code)]
pub fn section(value: serde_json::Value) -> Section {
    serde_json::from_value(value).expect("invalid section fixture")
}

/// A condition on `question_id` as it appears inside a condition group.
#[allow(dead_code)]
pub fn condition(
    question_id: &str,
    question_type: &str,
    operator: &str,
    value: serde_json::Value,
) -> serde_json::Value {
    json!({
        "questionId": question_id,
        "questionType": question_type,
        "operator": operator,
        "value": value,
    })
}

/// A single-group rule.
#[allow(dead_code)]
pub fn rule(
    id: &str,
    priority: i64,
    conditions: Vec<serde_json::Value>,
    next_section_id: Option<&str>,
) -> serde_json::Value {
    json!({
        "id": id,
        "priority": priority,
        "groupOperator": "AND",
        "conditionGroups": [{
            "id": format!("{}-g1", id),
            "conditionOperator": "AND",
            "conditions": conditions,
        }],
        "nextSectionId": next_section_id,
    })
}

/// Scenario A: S1 branches on Q1 with two prioritized rules and no default.
///
/// `yes` -> S3 (priority 10), `no` -> S2 (priority 5), anything else walks to S2.
#[allow(dead_code)]
pub fn scenario_a() -> Vec<Section> {
    vec![
        section(json!({
            "id": "S1",
            "order": 0,
            "questions": [{"id": "Q1", "type": "radio"}],
            "branching": {
                "rules": [
                    rule("R1", 10, vec![condition("Q1", "radio", "equals", json!("yes"))], Some("S3")),
                    rule("R2", 5, vec![condition("Q1", "radio", "equals", json!("no"))], Some("S2")),
                ]
            }
        })),
        section(json!({"id": "S2", "order": 1, "questions": [{"id": "Q2", "type": "text"}]})),
        section(json!({"id": "S3", "order": 2, "questions": [{"id": "Q3", "type": "scale"}]})),
    ]
}

/// Scenario B: S1 uses the legacy format with two conditions matching `a`.
#[allow(dead_code)]
pub fn scenario_b() -> Vec<Section> {
    vec![
        section(json!({
            "id": "S1",
            "order": 0,
            "questions": [{"id": "Q1", "type": "select"}],
            "branching": {
                "questionId": "Q1",
                "conditions": [
                    {"operator": "equals", "value": "a", "nextSectionId": "S5"},
                    {"operator": "equals", "value": "a", "nextSectionId": "S9"}
                ]
            }
        })),
        section(json!({"id": "S2", "order": 1})),
        section(json!({"id": "S5", "order": 5})),
        section(json!({"id": "S9", "order": 9})),
    ]
}

/// Three plain sections with no branching, declared out of order.
#[allow(dead_code)]
pub fn linear_sections() -> Vec<Section> {
    vec![
        section(json!({"id": "end", "order": 30})),
        section(json!({"id": "start", "order": 10})),
        section(json!({"id": "middle", "order": 20})),
    ]
}

#[allow(dead_code)]
pub fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}
