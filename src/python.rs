use crate::resolver::NavigationDecision;
use crate::survey::{AnswerMap, AnswerValue, Survey, ValidationMode, float_to_text};
use crate::validator::ValidationResult;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyList, PyTuple};

impl<'py> IntoPyObject<'py> for NavigationDecision {
    type Target = PyDict;
    type Output = Bound<'py, Self::Target>;
    type Error = PyErr;

    fn into_pyobject(self, py: Python<'py>) -> Result<Self::Output, Self::Error> {
        let dict = PyDict::new(py);
        // None maps to Python None, which means the survey ends.
        dict.set_item("next_section_id", self.next_section_id)?;
        dict.set_item("is_end", self.is_end)?;
        dict.set_item("reason", self.via.to_string())?;
        Ok(dict)
    }
}

impl<'py> IntoPyObject<'py> for ValidationResult {
    type Target = PyDict;
    type Output = Bound<'py, Self::Target>;
    type Error = PyErr;

    fn into_pyobject(self, py: Python<'py>) -> Result<Self::Output, Self::Error> {
        let dict = PyDict::new(py);
        dict.set_item("is_valid", self.is_valid)?;
        dict.set_item("errors", self.errors)?;
        Ok(dict)
    }
}

/// A survey branching resolver.
///
/// The survey definition is parsed once on initialization; `resolve` can then
/// be called for any number of respondents.
#[pyclass(name = "Bunki")]
struct BunkiPy {
    survey: Survey,
}

#[pymethods]
impl BunkiPy {
    /// Parses a survey definition.
    ///
    /// Args:
    ///     survey_json (str): A JSON array of sections, or an object with a
    ///         `sections` array. Branching configs may be enhanced or legacy.
    ///
    /// Raises:
    ///     ValueError: If the JSON cannot be parsed.
    #[new]
    fn new(survey_json: &str) -> PyResult<Self> {
        let sections = crate::survey::parse_sections(survey_json)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?;
        let survey = Survey::builder(sections)
            .validation(ValidationMode::Skip)
            .build()
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?;
        Ok(BunkiPy { survey })
    }

    /// Decides the next section after `current_section_id`.
    ///
    /// Args:
    ///     current_section_id (str): The section the respondent just submitted.
    ///     answers (dict): Question ids mapped to a string, or to a list of
    ///         strings for multi-select questions. Missing keys are unanswered.
    ///
    /// Returns:
    ///     dict: `next_section_id` (str | None), `is_end` (bool) and `reason` (str).
    fn resolve(
        &self,
        current_section_id: &str,
        answers: &Bound<'_, PyDict>,
    ) -> PyResult<NavigationDecision> {
        let mut answer_map = AnswerMap::new();
        for (key, value) in answers.iter() {
            if value.is_none() {
                continue;
            }
            let question_id: String = key.extract()?;
            let answer = if value.is_instance_of::<PyList>() || value.is_instance_of::<PyTuple>() {
                let items = value
                    .try_iter()?
                    .map(|item| item.and_then(|item| answer_text(&item)))
                    .collect::<PyResult<Vec<String>>>()?;
                AnswerValue::Multiple(items)
            } else {
                AnswerValue::Single(answer_text(&value)?)
            };
            answer_map.insert(question_id, answer);
        }
        Ok(self.survey.resolve(current_section_id, &answer_map))
    }

    /// Runs the authoring-time flow validator.
    ///
    /// Returns:
    ///     dict: `is_valid` (bool) and `errors` (list[str]).
    fn validate(&self) -> ValidationResult {
        self.survey.validate()
    }
}

/// Coerces a Python scalar to the text the operators compare, matching how JSON
/// scalars are read: `True` is `"true"` and `5.0` is `"5"`.
fn answer_text(value: &Bound<'_, PyAny>) -> PyResult<String> {
    if let Ok(text) = value.extract::<String>() {
        return Ok(text);
    }
    if value.is_instance_of::<PyBool>() {
        return Ok(value.is_truthy()?.to_string());
    }
    if value.is_instance_of::<PyFloat>() {
        return Ok(float_to_text(value.extract::<f64>()?));
    }
    Ok(value.str()?.to_string())
}

/// Survey branching resolution for Python.
#[pymodule]
fn bunki(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<BunkiPy>()?;
    Ok(())
}
