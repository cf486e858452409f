use crate::error::SurveyError;
use crate::survey::AnswerMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;

/// A respondent's answers as stored in a JSON file, optionally with the section
/// they just submitted.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSheet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_section_id: Option<String>,
    #[serde(default)]
    pub answers: AnswerMap,
}

impl AnswerSheet {
    /// Load an answer sheet from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, SurveyError> {
        let content = fs::read_to_string(path).map_err(|source| SurveyError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Accepts either a full sheet (`{"answers": {...}}`) or a bare answer map.
    pub fn from_json(json: &str) -> Result<Self, SurveyError> {
        let raw: JsonValue = serde_json::from_str(json)?;
        let is_sheet = raw
            .as_object()
            .is_some_and(|fields| fields.contains_key("answers"));
        if is_sheet {
            Ok(serde_json::from_value(raw)?)
        } else {
            Ok(Self {
                current_section_id: None,
                answers: serde_json::from_value(raw)?,
            })
        }
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }
}
