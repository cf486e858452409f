//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the bunki crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let survey = Survey::from_file("path/to/survey.json")?;
//! let sheet = AnswerSheet::from_file("path/to/answers.json")?;
//!
//! let decision = survey.resolve("intro", sheet.answers());
//! println!("Next: {:?} (end: {})", decision.next_section_id, decision.is_end);
//! # Ok(())
//! # }
//! ```

// Survey model
pub use crate::survey::{
    AnswerMap, AnswerValue, Branching, Condition, ConditionGroup, ConditionValue,
    EnhancedBranching, IntoSurvey, LegacyBranching, LegacyCondition, LogicalOperator, Operator,
    Question, QuestionType, Rule, Section, Survey, SurveyBuilder, ValidationMode,
};

// Resolution, validation and simulation
pub use crate::evaluator::Predicate;
pub use crate::resolver::{DecisionSource, NavigationDecision, resolve_next};
pub use crate::simulator::{FlowWalk, SimulatedPath, WalkOutcome, simulate};
pub use crate::validator::{ValidationResult, validate_flow};

// Data files
pub use crate::data::AnswerSheet;

// Error types
pub use crate::error::{BranchingDecodeError, FlowIssue, SurveyConversionError, SurveyError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
