pub mod answers;
pub mod branching;
pub mod conversion;
pub mod definition;

pub use answers::*;
pub use branching::{
    Branching, Condition, ConditionGroup, ConditionValue, EnhancedBranching, LegacyBranching,
    LegacyCondition, LogicalOperator, Operator, Rule,
};
pub use conversion::*;
pub use definition::*;

use crate::error::SurveyError;
use crate::resolver::{self, NavigationDecision};
use crate::simulator::{self, FlowWalk};
use crate::validator::{self, ValidationResult};
use serde_json::Value as JsonValue;
use std::fs;

/// What [`SurveyBuilder::build`] does with validator findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Do not run the validator.
    Skip,
    /// Log every finding with `tracing::warn!` and build anyway.
    #[default]
    Warn,
    /// Refuse to build a survey with findings.
    Reject,
}

/// An immutable snapshot of a survey's sections.
///
/// The snapshot owns no per-respondent state; every call takes the answers it
/// evaluates, so one `Survey` can serve any number of respondents concurrently.
#[derive(Debug, Clone)]
pub struct Survey {
    sections: Vec<Section>,
}

pub struct SurveyBuilder<S> {
    source: S,
    mode: ValidationMode,
}

impl<S: IntoSurvey> SurveyBuilder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            mode: ValidationMode::default(),
        }
    }

    pub fn validation(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(self) -> Result<Survey, SurveyError> {
        let sections = self.source.into_sections()?;
        match self.mode {
            ValidationMode::Skip => {}
            ValidationMode::Warn => {
                for issue in validator::collect_issues(&sections) {
                    tracing::warn!(%issue, "survey flow issue");
                }
            }
            ValidationMode::Reject => {
                let result = validator::validate_flow(&sections);
                if !result.is_valid {
                    return Err(SurveyError::Invalid(result));
                }
            }
        }
        Ok(Survey { sections })
    }
}

impl Survey {
    pub fn builder<S: IntoSurvey>(source: S) -> SurveyBuilder<S> {
        SurveyBuilder::new(source)
    }

    /// Parses a survey document: either an array of sections or an object with
    /// a `sections` array.
    pub fn from_json(json: &str) -> Result<Self, SurveyError> {
        Self::builder(parse_sections(json)?).build()
    }

    pub fn from_file(path: &str) -> Result<Self, SurveyError> {
        let content = fs::read_to_string(path).map_err(|source| SurveyError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// The section with the lowest `order`, where a respondent starts.
    pub fn first_section(&self) -> Option<&Section> {
        resolver::order::first_section(&self.sections)
    }

    /// Decides where a respondent goes after submitting `current_section_id`.
    pub fn resolve(&self, current_section_id: &str, answers: &AnswerMap) -> NavigationDecision {
        match self.section(current_section_id) {
            Some(current) => resolver::resolve_next(current, answers, &self.sections),
            None => {
                tracing::warn!(
                    section = current_section_id,
                    "current section not found; ending survey"
                );
                NavigationDecision::order_walk(None)
            }
        }
    }

    pub fn validate(&self) -> ValidationResult {
        validator::validate_flow(&self.sections)
    }

    /// Replays the path a respondent with `answers` would take from `start_section_id`.
    pub fn simulate<'a>(&'a self, start_section_id: &str, answers: &'a AnswerMap) -> FlowWalk<'a> {
        simulator::simulate(start_section_id, answers, &self.sections)
    }
}

/// Decodes the sections of a survey document without building a snapshot.
pub fn parse_sections(json: &str) -> Result<Vec<Section>, SurveyError> {
    let document: JsonValue = serde_json::from_str(json)?;
    let sections = match document {
        JsonValue::Object(mut fields) if fields.contains_key("sections") => {
            let sections = fields.remove("sections").unwrap_or(JsonValue::Null);
            serde_json::from_value(sections)?
        }
        other => serde_json::from_value(other)?,
    };
    Ok(sections)
}

/// Coerces a raw JSON scalar to the string the operators compare against.
pub(crate) fn json_to_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        JsonValue::Null => String::new(),
        JsonValue::Array(items) => items.iter().map(json_to_text).collect::<Vec<_>>().join(","),
        JsonValue::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => float_to_text(float),
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

/// Writes a float the way the survey host prints numbers: `5.0` is `"5"`, `1e3` is `"1000"`.
pub(crate) fn float_to_text(float: f64) -> String {
    if float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64 {
        (float as i64).to_string()
    } else {
        float.to_string()
    }
}
