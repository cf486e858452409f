//! Authoring-time checks over a survey's branching configuration.
//!
//! The validator never runs during live resolution and never blocks anything
//! itself: it collects every finding and leaves the decision to the caller.

use crate::error::FlowIssue;
use crate::survey::{
    Branching, Condition, ConditionValue, EnhancedBranching, LegacyBranching, Operator,
    QuestionType, Section,
};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_issues(issues: &[FlowIssue]) -> Self {
        Self {
            is_valid: issues.is_empty(),
            errors: issues.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Operators an author may use on a question of the given type.
pub fn supported_operators(question_type: QuestionType) -> &'static [Operator] {
    use Operator::*;
    match question_type {
        QuestionType::Text | QuestionType::Paragraph => {
            &[Equals, NotEquals, Contains, NotContains, IsBlank, IsNotBlank]
        }
        QuestionType::Scale | QuestionType::Date | QuestionType::Time => {
            &[Equals, NotEquals, LessThan, GreaterThan, Between]
        }
        QuestionType::Radio | QuestionType::Select | QuestionType::Checkbox => {
            &[Equals, NotEquals, Contains, NotContains]
        }
        QuestionType::Informational | QuestionType::Unknown => &[],
    }
}

pub fn supports(question_type: QuestionType, operator: Operator) -> bool {
    supported_operators(question_type).contains(&operator)
}

pub fn validate_flow(sections: &[Section]) -> ValidationResult {
    ValidationResult::from_issues(&collect_issues(sections))
}

/// Runs every check and returns the typed findings in section order.
pub fn collect_issues(sections: &[Section]) -> Vec<FlowIssue> {
    FlowValidator::new(sections).run()
}

struct FlowValidator<'a> {
    sections: &'a [Section],
    section_index: AHashMap<&'a str, &'a Section>,
    issues: Vec<FlowIssue>,
}

impl<'a> FlowValidator<'a> {
    fn new(sections: &'a [Section]) -> Self {
        let mut section_index = AHashMap::new();
        for section in sections {
            section_index.entry(section.id.as_str()).or_insert(section);
        }
        Self {
            sections,
            section_index,
            issues: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<FlowIssue> {
        self.check_section_identity();
        for section in self.sections {
            match &section.branching {
                Some(Branching::Enhanced(config)) => self.check_enhanced(section, config),
                Some(Branching::Legacy(config)) => self.check_legacy(section, config),
                None => {}
            }
        }
        self.issues
    }

    fn check_section_identity(&mut self) {
        let mut seen_ids = AHashSet::new();
        let mut seen_orders: AHashMap<i64, &str> = AHashMap::new();
        for section in self.sections {
            if !seen_ids.insert(section.id.as_str()) {
                self.issues.push(FlowIssue::DuplicateSectionId {
                    section_id: section.id.clone(),
                });
                continue;
            }
            if let Some(other) = seen_orders.insert(section.order, &section.id) {
                self.issues.push(FlowIssue::DuplicateOrder {
                    section_id: section.id.clone(),
                    other_section_id: other.to_string(),
                    order: section.order,
                });
            }
        }
    }

    fn check_enhanced(&mut self, section: &Section, config: &EnhancedBranching) {
        for rule in &config.rules {
            let rule_location = format!("rule '{}'", rule.id);
            self.check_target(section, &rule_location, rule.next_section_id.as_deref());
            for group in &rule.condition_groups {
                for (index, condition) in group.conditions.iter().enumerate() {
                    let location =
                        format!("{} group '{}' condition #{}", rule_location, group.id, index);
                    self.check_condition(section, &location, condition);
                }
            }
        }
        self.check_target(
            section,
            "default next section",
            config.default_next_section_id.as_deref(),
        );
    }

    fn check_legacy(&mut self, section: &Section, config: &LegacyBranching) {
        let question_type = match self.find_question(section, &config.question_id) {
            Some(kind) => Some(kind),
            None => {
                self.issues.push(FlowIssue::UnknownQuestion {
                    section_id: section.id.clone(),
                    location: "legacy branching".to_string(),
                    question_id: config.question_id.clone(),
                });
                None
            }
        };

        for (index, condition) in config.conditions.iter().enumerate() {
            let location = format!("legacy condition #{}", index);
            self.check_target(section, &location, condition.next_section_id.as_deref());
            if let Some(question_type) = question_type {
                self.check_operator(section, &location, condition.operator, question_type);
            }
            self.check_range(section, &location, condition.operator, &condition.value);
        }
        self.check_target(
            section,
            "default next section",
            config.default_next_section_id.as_deref(),
        );
    }

    /// Without a `sectionId`, the question is looked up in the owning section
    /// first and then in every other section, since conditions may branch on
    /// answers given earlier in the survey.
    fn check_condition(&mut self, section: &Section, location: &str, condition: &Condition) {
        if condition.is_malformed() {
            self.issues.push(FlowIssue::MalformedCondition {
                section_id: section.id.clone(),
                location: location.to_string(),
            });
            return;
        }
        let actual = match &condition.section_id {
            Some(referenced) => match self.section_index.get(referenced.as_str()) {
                Some(owner) => owner.question(&condition.question_id).map(|q| q.kind),
                None => {
                    self.issues.push(FlowIssue::UnknownReferencedSection {
                        section_id: section.id.clone(),
                        location: location.to_string(),
                        question_id: condition.question_id.clone(),
                        referenced_section_id: referenced.clone(),
                    });
                    return;
                }
            },
            None => self.find_question(section, &condition.question_id),
        };

        match actual {
            None => self.issues.push(FlowIssue::UnknownQuestion {
                section_id: section.id.clone(),
                location: location.to_string(),
                question_id: condition.question_id.clone(),
            }),
            Some(actual) if actual != condition.question_type => {
                self.issues.push(FlowIssue::QuestionTypeMismatch {
                    section_id: section.id.clone(),
                    location: location.to_string(),
                    question_id: condition.question_id.clone(),
                    declared: condition.question_type,
                    actual,
                })
            }
            Some(_) => {}
        }

        self.check_operator(section, location, condition.operator, condition.question_type);
        self.check_range(section, location, condition.operator, &condition.value);
    }

    fn check_operator(
        &mut self,
        section: &Section,
        location: &str,
        operator: Operator,
        question_type: QuestionType,
    ) {
        if !supports(question_type, operator) {
            self.issues.push(FlowIssue::UnsupportedOperator {
                section_id: section.id.clone(),
                location: location.to_string(),
                operator,
                question_type,
            });
        }
    }

    fn check_range(
        &mut self,
        section: &Section,
        location: &str,
        operator: Operator,
        value: &ConditionValue,
    ) {
        if operator == Operator::Between && value.as_range().is_none() {
            self.issues.push(FlowIssue::MalformedRange {
                section_id: section.id.clone(),
                location: location.to_string(),
            });
        }
    }

    fn check_target(&mut self, section: &Section, location: &str, target: Option<&str>) {
        if let Some(target) = target {
            if !self.section_index.contains_key(target) {
                self.issues.push(FlowIssue::UnknownNextSection {
                    section_id: section.id.clone(),
                    location: location.to_string(),
                    target: target.to_string(),
                });
            }
        }
    }

    /// A question of `section`, or failing that of any section.
    fn find_question(&self, section: &Section, question_id: &str) -> Option<QuestionType> {
        section
            .question(question_id)
            .or_else(|| self.sections.iter().find_map(|s| s.question(question_id)))
            .map(|q| q.kind)
    }
}
