use crate::survey::{Operator, QuestionType};
use crate::validator::ValidationResult;
use thiserror::Error;

/// Diagnostics produced by the flow validator.
///
/// Every variant names the section that owns the offending configuration, so an
/// authoring tool can point the author at the right page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowIssue {
    #[error("Section '{section_id}': duplicate section id")]
    DuplicateSectionId { section_id: String },

    #[error("Section '{section_id}': order {order} is also used by section '{other_section_id}'")]
    DuplicateOrder {
        section_id: String,
        other_section_id: String,
        order: i64,
    },

    #[error("Section '{section_id}': {location} references unknown question '{question_id}'")]
    UnknownQuestion {
        section_id: String,
        location: String,
        question_id: String,
    },

    #[error(
        "Section '{section_id}': {location} references question '{question_id}' in unknown section '{referenced_section_id}'"
    )]
    UnknownReferencedSection {
        section_id: String,
        location: String,
        question_id: String,
        referenced_section_id: String,
    },

    #[error("Section '{section_id}': {location} points to unknown next section '{target}'")]
    UnknownNextSection {
        section_id: String,
        location: String,
        target: String,
    },

    #[error(
        "Section '{section_id}': {location} uses operator '{operator}', which is not supported for '{question_type}' questions"
    )]
    UnsupportedOperator {
        section_id: String,
        location: String,
        operator: Operator,
        question_type: QuestionType,
    },

    #[error(
        "Section '{section_id}': {location} declares question '{question_id}' as '{declared}', but it is a '{actual}' question"
    )]
    QuestionTypeMismatch {
        section_id: String,
        location: String,
        question_id: String,
        declared: QuestionType,
        actual: QuestionType,
    },

    #[error("Section '{section_id}': {location} is malformed and never matches")]
    MalformedCondition { section_id: String, location: String },

    #[error("Section '{section_id}': {location} uses 'between' without a two-value range")]
    MalformedRange { section_id: String, location: String },
}

/// Errors raised by the strict branching decoder.
#[derive(Error, Debug, Clone)]
pub enum BranchingDecodeError {
    #[error("Branching config must be a JSON object, found: {0}")]
    NotAnObject(String),

    #[error("Branching config has an unknown format tag: '{0}'")]
    UnknownFormat(String),

    #[error("Branching config has neither 'rules' nor 'questionId'")]
    UnrecognizedShape,

    #[error("Invalid {format} branching config: {message}")]
    Invalid {
        format: &'static str,
        message: String,
    },
}

/// Errors that can occur while loading or building a survey snapshot.
#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Failed to parse survey JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read survey file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Survey failed validation with {} error(s)", .0.errors.len())]
    Invalid(ValidationResult),

    #[error(transparent)]
    Conversion(#[from] SurveyConversionError),
}

/// Errors that can occur when converting a host's persisted format into bunki `Section`s.
#[derive(Error, Debug, Clone)]
pub enum SurveyConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
