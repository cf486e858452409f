//! Tests for the authoring-time flow validator.
mod common;
use bunki::prelude::*;
use bunki::validator::{collect_issues, supported_operators, supports};
use common::*;
use serde_json::json;

#[test]
fn test_valid_surveys_have_no_errors() {
    for sections in [scenario_a(), linear_sections()] {
        let result = validate_flow(&sections);
        assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
        assert!(result.errors.is_empty());
    }
}

#[test]
fn test_unknown_next_section_names_owner() {
    let sections = vec![
        section(json!({
            "id": "intro",
            "order": 0,
            "questions": [{"id": "Q1", "type": "radio"}],
            "branching": {
                "rules": [rule("R1", 1, vec![condition("Q1", "radio", "equals", json!("x"))], Some("ghost"))],
                "defaultNextSectionId": "phantom"
            }
        })),
    ];

    let result = validate_flow(&sections);
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors[0].contains("intro"));
    assert!(result.errors[0].contains("ghost"));
    assert!(result.errors[1].contains("phantom"));

    let issues = collect_issues(&sections);
    assert_eq!(
        issues[0],
        FlowIssue::UnknownNextSection {
            section_id: "intro".to_string(),
            location: "rule 'R1'".to_string(),
            target: "ghost".to_string(),
        }
    );
}

#[test]
fn test_null_targets_are_valid() {
    let sections = vec![section(json!({
        "id": "S1",
        "order": 0,
        "questions": [{"id": "Q1", "type": "text"}],
        "branching": {
            "rules": [rule("end", 1, vec![condition("Q1", "text", "is_blank", json!(null))], None)]
        }
    }))];
    assert!(validate_flow(&sections).is_valid);
}

#[test]
fn test_unknown_question_references() {
    let sections = vec![
        section(json!({
            "id": "S1",
            "order": 0,
            "questions": [{"id": "Q1", "type": "text"}],
            "branching": {
                "rules": [{
                    "id": "R1",
                    "priority": 1,
                    "nextSectionId": "S2",
                    "conditionGroups": [{
                        "id": "g1",
                        "conditions": [
                            {"questionId": "Q404", "questionType": "text", "operator": "equals", "value": "a"},
                            {"questionId": "Q2", "sectionId": "S2", "questionType": "text", "operator": "equals", "value": "a"},
                            {"questionId": "Q1", "sectionId": "S2", "questionType": "text", "operator": "equals", "value": "a"},
                            {"questionId": "Q1", "sectionId": "S404", "questionType": "text", "operator": "equals", "value": "a"}
                        ]
                    }]
                }]
            }
        })),
        section(json!({"id": "S2", "order": 1, "questions": [{"id": "Q2", "type": "text"}]})),
    ];

    let issues = collect_issues(&sections);
    assert_eq!(issues.len(), 3, "{:?}", issues);
    assert!(matches!(
        &issues[0],
        FlowIssue::UnknownQuestion { question_id, section_id, .. } if question_id == "Q404" && section_id == "S1"
    ));
    // Q1 exists, but not in the referenced section S2.
    assert!(matches!(
        &issues[1],
        FlowIssue::UnknownQuestion { question_id, .. } if question_id == "Q1"
    ));
    assert!(matches!(
        &issues[2],
        FlowIssue::UnknownReferencedSection { referenced_section_id, .. } if referenced_section_id == "S404"
    ));
}

#[test]
fn test_operator_type_compatibility() {
    assert!(supports(QuestionType::Text, Operator::IsBlank));
    assert!(!supports(QuestionType::Text, Operator::LessThan));
    assert!(supports(QuestionType::Date, Operator::Between));
    assert!(!supports(QuestionType::Scale, Operator::Contains));
    assert!(supports(QuestionType::Checkbox, Operator::Contains));
    assert!(!supports(QuestionType::Radio, Operator::IsBlank));
    assert!(supported_operators(QuestionType::Informational).is_empty());
    assert!(!supports(QuestionType::Text, Operator::Unknown));

    let sections = vec![section(json!({
        "id": "S1",
        "order": 0,
        "questions": [{"id": "Q1", "type": "scale"}],
        "branching": {
            "rules": [rule("R1", 1, vec![condition("Q1", "scale", "contains", json!("3"))], None)]
        }
    }))];
    let result = validate_flow(&sections);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("contains"));
    assert!(result.errors[0].contains("scale"));
}

#[test]
fn test_declared_type_mismatch_and_malformed_range() {
    let sections = vec![section(json!({
        "id": "S1",
        "order": 0,
        "questions": [{"id": "Q1", "type": "scale"}],
        "branching": {
            "rules": [rule("R1", 1, vec![
                condition("Q1", "text", "equals", json!("3")),
                condition("Q1", "scale", "between", json!("1-5")),
            ], None)]
        }
    }))];

    let issues = collect_issues(&sections);
    assert_eq!(issues.len(), 2, "{:?}", issues);
    assert!(matches!(
        issues[0],
        FlowIssue::QuestionTypeMismatch {
            declared: QuestionType::Text,
            actual: QuestionType::Scale,
            ..
        }
    ));
    assert!(matches!(issues[1], FlowIssue::MalformedRange { .. }));
}

#[test]
fn test_legacy_checks() {
    let mut sections = scenario_b();
    assert!(validate_flow(&sections).is_valid);

    sections[0] = section(json!({
        "id": "S1",
        "order": 0,
        "questions": [{"id": "Q1", "type": "select"}],
        "branching": {
            "questionId": "Q1",
            "conditions": [
                {"operator": "greater_than", "value": "3", "nextSectionId": "S2"},
                {"operator": "equals", "value": "a", "nextSectionId": "nowhere"}
            ],
            "defaultNextSectionId": null
        }
    }));
    let issues = collect_issues(&sections);
    assert_eq!(issues.len(), 2, "{:?}", issues);
    assert!(matches!(
        issues[0],
        FlowIssue::UnsupportedOperator {
            operator: Operator::GreaterThan,
            question_type: QuestionType::Select,
            ..
        }
    ));
    assert!(matches!(issues[1], FlowIssue::UnknownNextSection { .. }));

    sections[0] = section(json!({
        "id": "S1",
        "order": 0,
        "branching": {"questionId": "missing", "conditions": []}
    }));
    let result = validate_flow(&sections);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("missing"));
}

#[test]
fn test_duplicate_ids_and_orders() {
    let sections = vec![
        section(json!({"id": "A", "order": 1})),
        section(json!({"id": "B", "order": 1})),
        section(json!({"id": "A", "order": 2})),
    ];
    let issues = collect_issues(&sections);
    assert_eq!(issues.len(), 2, "{:?}", issues);
    assert!(matches!(
        &issues[0],
        FlowIssue::DuplicateOrder { section_id, other_section_id, order: 1 } if section_id == "B" && other_section_id == "A"
    ));
    assert!(matches!(&issues[1], FlowIssue::DuplicateSectionId { section_id } if section_id == "A"));
}

#[test]
fn test_builder_validation_modes() {
    let broken = vec![section(json!({
        "id": "S1",
        "order": 0,
        "branching": {"rules": [rule("R1", 1, vec![], Some("ghost"))]}
    }))];

    let rejected = Survey::builder(broken.clone())
        .validation(ValidationMode::Reject)
        .build();
    match rejected {
        Err(SurveyError::Invalid(result)) => assert_eq!(result.errors.len(), 1),
        other => panic!("expected rejection, got {:?}", other.map(|s| s.sections().len())),
    }

    let warned = Survey::builder(broken.clone()).build().unwrap();
    assert!(!warned.validate().is_valid);

    let skipped = Survey::builder(broken)
        .validation(ValidationMode::Skip)
        .build()
        .unwrap();
    assert_eq!(skipped.sections().len(), 1);
}

#[test]
fn test_validation_result_serializes_camel_case() {
    let result = validate_flow(&scenario_a());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["isValid"], true);
    assert!(json["errors"].as_array().unwrap().is_empty());
}

#[test]
fn test_malformed_condition_is_reported() {
    let sections = vec![section(json!({
        "id": "S1",
        "order": 0,
        "questions": [{"id": "Q1", "type": "text"}],
        "branching": {
            "rules": [{
                "id": "R1",
                "conditionGroups": [{"id": "g", "conditions": [{"operator": "equals", "value": "x"}]}]
            }]
        }
    }))];

    let issues = collect_issues(&sections);
    assert_eq!(
        issues,
        vec![FlowIssue::MalformedCondition {
            section_id: "S1".to_string(),
            location: "rule 'R1' group 'g' condition #0".to_string(),
        }]
    );
}

#[test]
fn test_unscoped_condition_prefers_owning_section() {
    // Q1 exists in both sections with different types; S1's own question decides.
    let sections = vec![
        section(json!({"id": "S0", "order": 0, "questions": [{"id": "Q1", "type": "text"}]})),
        section(json!({
            "id": "S1",
            "order": 1,
            "questions": [{"id": "Q1", "type": "scale"}],
            "branching": {
                "rules": [rule("R1", 1, vec![condition("Q1", "scale", "greater_than", json!(3))], None)]
            }
        })),
    ];
    let result = validate_flow(&sections);
    assert!(result.is_valid, "{:?}", result.errors);

    // A question only found in an earlier section still resolves.
    let sections = vec![
        section(json!({"id": "S0", "order": 0, "questions": [{"id": "Q0", "type": "text"}]})),
        section(json!({
            "id": "S1",
            "order": 1,
            "branching": {
                "rules": [rule("R1", 1, vec![condition("Q0", "text", "is_blank", json!(null))], None)]
            }
        })),
    ];
    assert!(validate_flow(&sections).is_valid);
}
