use super::json_to_text;
use crate::error::BranchingDecodeError;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::cmp::Reverse;
use std::fmt;

/// Key of the explicit format tag. Historical payloads do not carry it.
pub const FORMAT_TAG: &str = "format";

/// The comparison applied between an answer and a condition's target value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    IsBlank,
    IsNotBlank,
    LessThan,
    GreaterThan,
    Between,
    /// Any operator string this version does not recognize. Never matches.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::NotContains,
        Operator::IsBlank,
        Operator::IsNotBlank,
        Operator::LessThan,
        Operator::GreaterThan,
        Operator::Between,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::IsBlank => "is_blank",
            Operator::IsNotBlank => "is_not_blank",
            Operator::LessThan => "less_than",
            Operator::GreaterThan => "greater_than",
            Operator::Between => "between",
            Operator::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the results of several conditions (or groups) are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LogicalOperator {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl LogicalOperator {
    /// `OR` in any letter case; everything else, including a missing value, is `AND`.
    pub fn from_json(value: &JsonValue) -> Self {
        match value.as_str() {
            Some(text) if text.trim().eq_ignore_ascii_case("or") => LogicalOperator::Or,
            _ => LogicalOperator::And,
        }
    }
}

impl<'de> Deserialize<'de> for LogicalOperator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        Ok(LogicalOperator::from_json(&raw))
    }
}

/// The target value of a condition: a scalar, or an inclusive range for `between`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConditionValue {
    #[default]
    Empty,
    Scalar(String),
    Range(String, String),
    /// An array that is not a two-value range.
    List(Vec<String>),
}

impl ConditionValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        ConditionValue::Scalar(value.into())
    }

    pub fn range(low: impl Into<String>, high: impl Into<String>) -> Self {
        ConditionValue::Range(low.into(), high.into())
    }

    /// Decodes a raw JSON value, coercing numbers and booleans to text.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => ConditionValue::Empty,
            JsonValue::Array(items) if items.len() == 2 => {
                ConditionValue::Range(json_to_text(&items[0]), json_to_text(&items[1]))
            }
            JsonValue::Array(items) => ConditionValue::List(items.iter().map(json_to_text).collect()),
            other => ConditionValue::Scalar(json_to_text(other)),
        }
    }

    /// The value as a single string, as used by the string-based operators.
    pub fn as_text(&self) -> String {
        match self {
            ConditionValue::Empty => String::new(),
            ConditionValue::Scalar(value) => value.clone(),
            ConditionValue::Range(low, high) => format!("{low},{high}"),
            ConditionValue::List(items) => items.join(","),
        }
    }

    pub fn as_range(&self) -> Option<(&str, &str)> {
        match self {
            ConditionValue::Range(low, high) => Some((low.as_str(), high.as_str())),
            _ => None,
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Scalar(value.to_string())
    }
}

impl From<(&str, &str)> for ConditionValue {
    fn from((low, high): (&str, &str)) -> Self {
        ConditionValue::range(low, high)
    }
}

impl Serialize for ConditionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConditionValue::Empty => serializer.serialize_none(),
            ConditionValue::Scalar(value) => serializer.serialize_str(value),
            ConditionValue::Range(low, high) => [low, high].serialize(serializer),
            ConditionValue::List(items) => items.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ConditionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        Ok(ConditionValue::from_json(&raw))
    }
}

/// A single comparison against one question's answer.
///
/// Decoding never fails: a condition without a usable `questionId` becomes a
/// malformed condition that never matches and that the validator reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Empty for a malformed condition.
    pub question_id: String,
    /// The section holding the question, when it is not resolvable by id alone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    pub operator: Operator,
    pub value: ConditionValue,
    pub question_type: super::QuestionType,
}

impl Condition {
    pub fn new(
        question_id: impl Into<String>,
        question_type: super::QuestionType,
        operator: Operator,
        value: impl Into<ConditionValue>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            section_id: None,
            operator,
            value: value.into(),
            question_type,
        }
    }

    /// A placeholder for a condition that could not be decoded.
    pub fn malformed() -> Self {
        Self::new(String::new(), Default::default(), Operator::Unknown, ConditionValue::Empty)
    }

    pub fn is_malformed(&self) -> bool {
        self.question_id.is_empty()
    }

    pub fn from_json(value: &JsonValue) -> Self {
        let Some(fields) = value.as_object() else {
            tracing::warn!(condition = %value, "condition is not an object; it will never match");
            return Self::malformed();
        };
        let Some(question_id) = text_field(fields, "questionId").filter(|id| !id.is_empty()) else {
            tracing::warn!(condition = %value, "condition has no questionId; it will never match");
            return Self::malformed();
        };
        Self {
            question_id,
            section_id: text_field(fields, "sectionId"),
            operator: enum_field(fields, "operator"),
            value: fields.get("value").map(ConditionValue::from_json).unwrap_or_default(),
            question_type: enum_field(fields, "questionType"),
        }
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        Ok(Condition::from_json(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionGroup {
    pub id: String,
    pub conditions: Vec<Condition>,
    pub condition_operator: LogicalOperator,
}

impl ConditionGroup {
    /// A group that is not an object decodes with no conditions, so it never passes.
    pub fn from_json(value: &JsonValue) -> Self {
        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);
        Self {
            id: text_field(fields, "id").unwrap_or_default(),
            conditions: list_field(fields, "conditions", Condition::from_json),
            condition_operator: fields
                .get("conditionOperator")
                .map(LogicalOperator::from_json)
                .unwrap_or_default(),
        }
    }
}

impl<'de> Deserialize<'de> for ConditionGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        Ok(ConditionGroup::from_json(&raw))
    }
}

/// A prioritized decision unit of the enhanced format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub priority: i64,
    pub condition_groups: Vec<ConditionGroup>,
    pub group_operator: LogicalOperator,
    /// `None` ends the survey when the rule matches.
    pub next_section_id: Option<String>,
}

impl Rule {
    /// A rule that is not an object decodes with no groups, so it never matches.
    pub fn from_json(value: &JsonValue) -> Self {
        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);
        Self {
            id: text_field(fields, "id").unwrap_or_default(),
            priority: fields.get("priority").and_then(integer).unwrap_or_default(),
            condition_groups: list_field(fields, "conditionGroups", ConditionGroup::from_json),
            group_operator: fields
                .get("groupOperator")
                .map(LogicalOperator::from_json)
                .unwrap_or_default(),
            next_section_id: text_field(fields, "nextSectionId"),
        }
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        Ok(Rule::from_json(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedBranching {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_next_section_id: Option<String>,
}

impl EnhancedBranching {
    /// Rules in evaluation order: highest priority first, declaration order on ties.
    pub fn rules_by_priority(&self) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .enumerate()
            .sorted_by_key(|(index, rule)| (Reverse(rule.priority), *index))
            .map(|(_, rule)| rule)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCondition {
    pub operator: Operator,
    pub value: ConditionValue,
    pub next_section_id: Option<String>,
}

impl LegacyCondition {
    /// An unreadable operator decodes as [`Operator::Unknown`], so the condition never matches.
    pub fn from_json(value: &JsonValue) -> Self {
        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);
        Self {
            operator: enum_field(fields, "operator"),
            value: fields.get("value").map(ConditionValue::from_json).unwrap_or_default(),
            next_section_id: text_field(fields, "nextSectionId"),
        }
    }
}

impl<'de> Deserialize<'de> for LegacyCondition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        Ok(LegacyCondition::from_json(&raw))
    }
}

/// Strings as-is, numbers in their JS text form; anything else is absent.
fn text_field(fields: &Map<String, JsonValue>, key: &str) -> Option<String> {
    match fields.get(key)? {
        JsonValue::String(text) => Some(text.clone()),
        number @ JsonValue::Number(_) => Some(json_to_text(number)),
        _ => None,
    }
}

/// Decodes a unit-variant enum, falling back to its default.
fn enum_field<T: DeserializeOwned + Default>(fields: &Map<String, JsonValue>, key: &str) -> T {
    fields
        .get(key)
        .and_then(|value| T::deserialize(value).ok())
        .unwrap_or_default()
}

fn list_field<T>(
    fields: &Map<String, JsonValue>,
    key: &str,
    decode: impl Fn(&JsonValue) -> T,
) -> Vec<T> {
    fields
        .get(key)
        .and_then(JsonValue::as_array)
        .map(|items| items.iter().map(decode).collect())
        .unwrap_or_default()
}

fn integer(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(number) => number.as_i64().or_else(|| number.as_f64().map(|n| n as i64)),
        JsonValue::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// The original single-question, first-match format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyBranching {
    pub question_id: String,
    #[serde(default)]
    pub conditions: Vec<LegacyCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_next_section_id: Option<String>,
}

/// A section's branching configuration.
///
/// Serialization always writes the `format` tag; decoding accepts the tag or,
/// for untagged historical payloads, sniffs the shape: a `rules` field means
/// enhanced, a `questionId` field means legacy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum Branching {
    Enhanced(EnhancedBranching),
    Legacy(LegacyBranching),
}

impl Branching {
    pub fn default_next_section_id(&self) -> Option<&str> {
        match self {
            Branching::Enhanced(config) => config.default_next_section_id.as_deref(),
            Branching::Legacy(config) => config.default_next_section_id.as_deref(),
        }
    }

    /// Strictly decodes a branching payload, tagged or untagged.
    pub fn from_value(value: JsonValue) -> Result<Self, BranchingDecodeError> {
        let JsonValue::Object(mut fields) = value else {
            return Err(BranchingDecodeError::NotAnObject(value.to_string()));
        };

        match fields.remove(FORMAT_TAG) {
            Some(JsonValue::String(tag)) => match tag.as_str() {
                "enhanced" => decode_enhanced(fields),
                "legacy" => decode_legacy(fields),
                _ => Err(BranchingDecodeError::UnknownFormat(tag)),
            },
            Some(other) => Err(BranchingDecodeError::UnknownFormat(other.to_string())),
            None if fields.contains_key("rules") => decode_enhanced(fields),
            None if fields.contains_key("questionId") => decode_legacy(fields),
            None => Err(BranchingDecodeError::UnrecognizedShape),
        }
    }
}

fn decode_enhanced(fields: Map<String, JsonValue>) -> Result<Branching, BranchingDecodeError> {
    serde_json::from_value(JsonValue::Object(fields))
        .map(Branching::Enhanced)
        .map_err(|e| BranchingDecodeError::Invalid {
            format: "enhanced",
            message: e.to_string(),
        })
}

fn decode_legacy(fields: Map<String, JsonValue>) -> Result<Branching, BranchingDecodeError> {
    serde_json::from_value(JsonValue::Object(fields))
        .map(Branching::Legacy)
        .map_err(|e| BranchingDecodeError::Invalid {
            format: "legacy",
            message: e.to_string(),
        })
}

impl From<EnhancedBranching> for Branching {
    fn from(config: EnhancedBranching) -> Self {
        Branching::Enhanced(config)
    }
}

impl From<LegacyBranching> for Branching {
    fn from(config: LegacyBranching) -> Self {
        Branching::Legacy(config)
    }
}

impl<'de> Deserialize<'de> for Branching {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        Branching::from_value(raw).map_err(serde::de::Error::custom)
    }
}

/// Decodes an optional branching field without ever failing the enclosing section.
///
/// Accepts the config inline or as a JSON-encoded string (a JSON column exported
/// as text). Anything unrecognized becomes `None`, so the section falls back to
/// its order.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Branching>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(raw.and_then(decode_lenient))
}

/// Lenient counterpart of [`Branching::from_value`].
pub fn decode_lenient(raw: JsonValue) -> Option<Branching> {
    let raw = match raw {
        JsonValue::Null => return None,
        JsonValue::String(text) if text.trim().is_empty() => return None,
        JsonValue::String(text) => match serde_json::from_str::<JsonValue>(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "branching column is not valid JSON; using section order");
                return None;
            }
        },
        other => other,
    };
    if raw.is_null() {
        return None;
    }

    match Branching::from_value(raw) {
        Ok(branching) => Some(branching),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unrecognized branching config; using section order");
            None
        }
    }
}
