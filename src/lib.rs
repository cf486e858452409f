//! # Bunki - Survey Branching Resolver
//!
//! **Bunki** decides which section of a multi-section survey a respondent sees
//! next. Given the section they just submitted and every answer so far, it
//! evaluates the section's branching configuration and returns a single
//! navigation decision: a section id, or the end of the survey.
//!
//! ## Branching formats
//!
//! Two persisted formats co-exist and both decode into [`survey::Branching`]:
//!
//! 1.  **Enhanced**: `{"rules": [...], "defaultNextSectionId": ...}`. Rules are
//!     made of condition groups combined with AND/OR. The highest-priority
//!     matching rule wins; equal priorities resolve to the earliest-declared rule.
//! 2.  **Legacy**: `{"questionId": ..., "conditions": [...]}`. One question, and
//!     the first matching condition in declaration order wins.
//!
//! When nothing matches, the default next section is used, and failing that the
//! section with the next-higher `order`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let survey = Survey::from_json(r#"[
//!         {"id": "intro", "order": 0,
//!          "questions": [{"id": "q1", "type": "radio"}],
//!          "branching": {"rules": [{
//!              "id": "r1", "priority": 10, "nextSectionId": "details",
//!              "conditionGroups": [{"id": "g1", "conditionOperator": "AND",
//!                  "conditions": [{"questionId": "q1", "operator": "equals",
//!                                  "value": "yes", "questionType": "radio"}]}]
//!          }]}},
//!         {"id": "general", "order": 1},
//!         {"id": "details", "order": 2}
//!     ]"#)?;
//!
//!     let answers = AnswerMap::new().with("q1", "yes");
//!     let decision = survey.resolve("intro", &answers);
//!
//!     match decision.next_section_id {
//!         Some(next) => println!("-> Go to '{}' ({})", next, decision.via),
//!         None => println!("-> End of survey ({})", decision.via),
//!     }
//!
//!     let report = survey.validate();
//!     println!("Flow valid: {}", report.is_valid);
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod error;
pub mod evaluator;
pub mod prelude;
pub mod resolver;
pub mod simulator;
pub mod survey;
pub mod validator;

#[cfg(feature = "python-bindings")]
mod python;
