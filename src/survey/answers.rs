use super::json_to_text;
use ahash::AHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::borrow::Cow;

/// A submitted answer: one value, or several for multi-select questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multiple(Vec<String>),
}

impl AnswerValue {
    /// The answer as one string. Multiple values are joined with `,` and compared
    /// as that string, not as a set.
    pub fn as_joined(&self) -> Cow<'_, str> {
        match self {
            AnswerValue::Single(value) => Cow::Borrowed(value),
            AnswerValue::Multiple(values) => Cow::Owned(values.join(",")),
        }
    }

    /// Returns `None` for `null`, which is treated as unanswered.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Null => None,
            JsonValue::Array(items) => Some(AnswerValue::Multiple(
                items.iter().map(json_to_text).collect(),
            )),
            other => Some(AnswerValue::Single(json_to_text(other))),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Single(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Single(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(values: Vec<String>) -> Self {
        AnswerValue::Multiple(values)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(values: Vec<&str>) -> Self {
        AnswerValue::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

/// Per-respondent answers keyed by question id. A missing key means the
/// question was not answered, which is different from an empty answer.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AnswerMap(AHashMap<String, AnswerValue>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn insert(
        &mut self,
        question_id: impl Into<String>,
        value: impl Into<AnswerValue>,
    ) -> Option<AnswerValue> {
        self.0.insert(question_id.into(), value.into())
    }

    pub fn with(mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(question_id, value);
        self
    }

    /// Merges a freshly submitted section's answers, overwriting earlier ones.
    pub fn merge(&mut self, submitted: AnswerMap) {
        self.0.extend(submitted.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<AnswerValue>> FromIterator<(K, V)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for AnswerMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = AHashMap::<String, JsonValue>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .filter_map(|(id, value)| AnswerValue::from_json(&value).map(|v| (id, v)))
                .collect(),
        ))
    }
}
