//! Tests for operator semantics per question type.
use bunki::evaluator::operator::evaluate;
use bunki::prelude::*;

fn eval(op: Operator, answer: Option<&str>, value: ConditionValue, kind: QuestionType) -> bool {
    evaluate(op, answer, &value, kind)
}

#[test]
fn test_equals_is_exact_string_comparison() {
    let yes = ConditionValue::scalar("yes");
    assert!(eval(Operator::Equals, Some("yes"), yes.clone(), QuestionType::Radio));
    assert!(!eval(Operator::Equals, Some("Yes"), yes.clone(), QuestionType::Radio));
    assert!(eval(Operator::NotEquals, Some("no"), yes.clone(), QuestionType::Radio));
    assert!(!eval(Operator::NotEquals, Some("yes"), yes, QuestionType::Radio));
}

#[test]
fn test_contains_is_case_insensitive() {
    let value = ConditionValue::scalar("yes");
    assert!(eval(Operator::Contains, Some("Yes"), value.clone(), QuestionType::Text));
    assert!(eval(Operator::Contains, Some("OH YES please"), value.clone(), QuestionType::Text));
    assert!(!eval(Operator::NotContains, Some("Yes"), value.clone(), QuestionType::Text));
    assert!(eval(Operator::NotContains, Some("nope"), value, QuestionType::Text));
}

#[test]
fn test_blank_operators() {
    let empty = ConditionValue::Empty;
    assert!(eval(Operator::IsBlank, None, empty.clone(), QuestionType::Text));
    assert!(eval(Operator::IsBlank, Some("   "), empty.clone(), QuestionType::Text));
    assert!(!eval(Operator::IsBlank, Some("x"), empty.clone(), QuestionType::Text));
    assert!(!eval(Operator::IsNotBlank, None, empty.clone(), QuestionType::Text));
    assert!(!eval(Operator::IsNotBlank, Some(""), empty.clone(), QuestionType::Text));
    assert!(eval(Operator::IsNotBlank, Some(" x "), empty, QuestionType::Text));
}

#[test]
fn test_numeric_comparisons() {
    let five = ConditionValue::scalar("5");
    assert!(eval(Operator::LessThan, Some("4.5"), five.clone(), QuestionType::Scale));
    assert!(!eval(Operator::LessThan, Some("5"), five.clone(), QuestionType::Scale));
    assert!(eval(Operator::GreaterThan, Some("10"), five.clone(), QuestionType::Scale));
    // Numeric, not lexicographic: "10" > "5".
    assert!(!eval(Operator::LessThan, Some("10"), five, QuestionType::Scale));
}

#[test]
fn test_unparseable_operands_fail_closed() {
    let five = ConditionValue::scalar("5");
    assert!(!eval(Operator::LessThan, Some("abc"), five.clone(), QuestionType::Scale));
    assert!(!eval(Operator::GreaterThan, Some("abc"), five.clone(), QuestionType::Scale));
    assert!(!eval(Operator::LessThan, Some(""), five.clone(), QuestionType::Scale));
    assert!(!eval(Operator::GreaterThan, Some("NaN"), five, QuestionType::Scale));
    assert!(!eval(
        Operator::LessThan,
        Some("3"),
        ConditionValue::scalar("many"),
        QuestionType::Scale
    ));
}

#[test]
fn test_between_is_inclusive() {
    let range = ConditionValue::range("1", "5");
    assert!(eval(Operator::Between, Some("1"), range.clone(), QuestionType::Scale));
    assert!(eval(Operator::Between, Some("5"), range.clone(), QuestionType::Scale));
    assert!(eval(Operator::Between, Some("3"), range.clone(), QuestionType::Scale));
    assert!(!eval(Operator::Between, Some("0.99"), range.clone(), QuestionType::Scale));
    assert!(!eval(Operator::Between, Some("6"), range, QuestionType::Scale));
}

#[test]
fn test_between_requires_two_value_range() {
    assert!(!eval(
        Operator::Between,
        Some("3"),
        ConditionValue::scalar("1,5"),
        QuestionType::Scale
    ));
    assert!(!eval(
        Operator::Between,
        Some("3"),
        ConditionValue::List(vec!["1".into(), "3".into(), "5".into()]),
        QuestionType::Scale
    ));
    assert!(!eval(
        Operator::Between,
        Some("3"),
        ConditionValue::range("1", "x"),
        QuestionType::Scale
    ));
}

#[test]
fn test_date_comparisons_are_chronological() {
    let cutoff = ConditionValue::scalar("2024-03-01");
    assert!(eval(Operator::LessThan, Some("2024-02-29"), cutoff.clone(), QuestionType::Date));
    assert!(eval(
        Operator::GreaterThan,
        Some("2024-03-01T00:00:01Z"),
        cutoff.clone(),
        QuestionType::Date
    ));
    assert!(!eval(Operator::LessThan, Some("not a date"), cutoff, QuestionType::Date));

    let quarter = ConditionValue::range("2024-01-01", "2024-03-31");
    assert!(eval(Operator::Between, Some("2024-03-31"), quarter.clone(), QuestionType::Date));
    assert!(!eval(Operator::Between, Some("2024-04-01"), quarter, QuestionType::Date));
}

#[test]
fn test_date_questions_do_not_compare_numerically() {
    // Plain numbers are not dates, so the comparison fails closed.
    assert!(!eval(
        Operator::LessThan,
        Some("1"),
        ConditionValue::scalar("2"),
        QuestionType::Date
    ));
}

#[test]
fn test_time_comparisons() {
    let noon = ConditionValue::scalar("12:00");
    assert!(eval(Operator::LessThan, Some("09:30"), noon.clone(), QuestionType::Time));
    assert!(eval(Operator::GreaterThan, Some("12:00:01"), noon.clone(), QuestionType::Time));
    assert!(eval(
        Operator::Between,
        Some("12:00"),
        ConditionValue::range("08:00", "12:00"),
        QuestionType::Time
    ));
    // A time of day and a full timestamp are not comparable.
    assert!(!eval(
        Operator::LessThan,
        Some("2024-01-01T08:00:00"),
        noon,
        QuestionType::Time
    ));
}

#[test]
fn test_unknown_operator_never_matches() {
    assert!(!eval(
        Operator::Unknown,
        Some("x"),
        ConditionValue::scalar("x"),
        QuestionType::Text
    ));
    assert!(!eval(Operator::Unknown, None, ConditionValue::Empty, QuestionType::Text));
}

#[test]
fn test_operators_on_absent_answer() {
    for op in Operator::ALL {
        let expected = op == Operator::IsBlank;
        assert_eq!(
            eval(op, None, ConditionValue::scalar("x"), QuestionType::Text),
            expected,
            "operator {} on an absent answer",
            op
        );
    }
}
