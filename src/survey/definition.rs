use super::branching::{self, Branching};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered page of questions within a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    /// The sole fallback ordering key when no branching decision is made.
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(
        default,
        deserialize_with = "branching::deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub branching: Option<Branching>,
}

impl Section {
    pub fn new(id: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            order,
            title: None,
            questions: Vec::new(),
            branching: None,
        }
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn with_branching(mut self, branching: impl Into<Branching>) -> Self {
        self.branching = Some(branching.into());
        self
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

/// A single question. Only its identity and type matter for branching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Question {
    pub fn new(id: impl Into<String>, kind: QuestionType) -> Self {
        Self {
            id: id.into(),
            kind,
            title: None,
        }
    }
}

/// The data kind of a question, which gates both evaluation semantics and the
/// operators an author may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Text,
    Paragraph,
    Radio,
    Checkbox,
    Select,
    Scale,
    Date,
    Time,
    Informational,
    #[serde(other)]
    Unknown,
}

impl QuestionType {
    pub const ALL: [QuestionType; 9] = [
        QuestionType::Text,
        QuestionType::Paragraph,
        QuestionType::Radio,
        QuestionType::Checkbox,
        QuestionType::Select,
        QuestionType::Scale,
        QuestionType::Date,
        QuestionType::Time,
        QuestionType::Informational,
    ];

    /// Whether ordering comparisons on this type are chronological.
    pub fn is_temporal(self) -> bool {
        matches!(self, QuestionType::Date | QuestionType::Time)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Paragraph => "paragraph",
            QuestionType::Radio => "radio",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Select => "select",
            QuestionType::Scale => "scale",
            QuestionType::Date => "date",
            QuestionType::Time => "time",
            QuestionType::Informational => "informational",
            QuestionType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
