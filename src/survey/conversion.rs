use super::Section;
use crate::error::SurveyConversionError;

/// A trait for host data models that can be converted into bunki `Section`s.
///
/// Hosts usually persist sections as rows with the branching config in a JSON
/// column. Implementing this trait on those rows is the translation layer between
/// the host's storage format and the resolver.
///
/// # Example
///
/// ```rust,no_run
/// use bunki::prelude::*;
/// use bunki::error::SurveyConversionError;
///
/// struct SectionRow { id: String, position: i64, branching_column: Option<String> }
/// struct SurveyRows { rows: Vec<SectionRow> }
///
/// impl IntoSurvey for SurveyRows {
///     fn into_sections(self) -> std::result::Result<Vec<Section>, SurveyConversionError> {
///         Ok(self
///             .rows
///             .into_iter()
///             .map(|row| {
///                 let mut section = Section::new(row.id, row.position);
///                 section.branching = row
///                     .branching_column
///                     .and_then(|column| serde_json::from_str(&column).ok())
///                     .and_then(bunki::survey::branching::decode_lenient);
///                 section
///             })
///             .collect())
///     }
/// }
/// ```
pub trait IntoSurvey {
    /// Consumes the object and converts it into the sections of one survey.
    fn into_sections(self) -> Result<Vec<Section>, SurveyConversionError>;
}

impl IntoSurvey for Vec<Section> {
    fn into_sections(self) -> Result<Vec<Section>, SurveyConversionError> {
        Ok(self)
    }
}
