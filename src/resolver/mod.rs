use crate::evaluator::{Predicate, operator};
use crate::survey::{
    AnswerMap, Branching, EnhancedBranching, LegacyBranching, QuestionType, Section,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod order;

/// Where a respondent goes next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDecision {
    /// `None` ends the survey.
    pub next_section_id: Option<String>,
    pub is_end: bool,
    pub via: DecisionSource,
}

impl NavigationDecision {
    fn to_target(next_section_id: Option<String>, via: DecisionSource) -> Self {
        Self {
            is_end: next_section_id.is_none(),
            next_section_id,
            via,
        }
    }

    pub(crate) fn order_walk(next: Option<&Section>) -> Self {
        Self::to_target(next.map(|s| s.id.clone()), DecisionSource::OrderWalk)
    }
}

/// Which part of the configuration produced a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DecisionSource {
    Rule { rule_id: String, priority: i64 },
    LegacyCondition { index: usize },
    Default,
    OrderWalk,
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionSource::Rule { rule_id, priority } => {
                write!(f, "rule '{}' (priority {}) matched", rule_id, priority)
            }
            DecisionSource::LegacyCondition { index } => {
                write!(f, "legacy condition #{} matched", index)
            }
            DecisionSource::Default => write!(f, "no condition matched, default next section"),
            DecisionSource::OrderWalk => write!(f, "section order"),
        }
    }
}

/// Computes the single next hop from `current` for a respondent's answers.
///
/// Pure and total: it reads its inputs, never fails, and only ever looks one
/// transition ahead, so cyclic configurations cannot make it loop.
pub fn resolve_next(
    current: &Section,
    answers: &AnswerMap,
    sections: &[Section],
) -> NavigationDecision {
    let decision = match &current.branching {
        None => NavigationDecision::order_walk(order::next_section(current, sections)),
        Some(Branching::Enhanced(config)) => resolve_enhanced(current, config, answers, sections),
        Some(Branching::Legacy(config)) => resolve_legacy(current, config, answers, sections),
    };

    tracing::debug!(
        section = %current.id,
        next = ?decision.next_section_id,
        is_end = decision.is_end,
        via = %decision.via,
        "resolved next section"
    );
    decision
}

fn resolve_enhanced(
    current: &Section,
    config: &EnhancedBranching,
    answers: &AnswerMap,
    sections: &[Section],
) -> NavigationDecision {
    if let Some(rule) = config.rules_by_priority().find(|rule| rule.evaluate(answers)) {
        return NavigationDecision::to_target(
            rule.next_section_id.clone(),
            DecisionSource::Rule {
                rule_id: rule.id.clone(),
                priority: rule.priority,
            },
        );
    }
    fallback(config.default_next_section_id.as_deref(), current, sections)
}

fn resolve_legacy(
    current: &Section,
    config: &LegacyBranching,
    answers: &AnswerMap,
    sections: &[Section],
) -> NavigationDecision {
    let Some(answer) = answers.get(&config.question_id) else {
        return NavigationDecision::order_walk(order::next_section(current, sections));
    };
    let answer = answer.as_joined();
    let question_type = question_type_of(&config.question_id, current, sections);

    let matched = config.conditions.iter().enumerate().find(|(_, condition)| {
        operator::evaluate(
            condition.operator,
            Some(&*answer),
            &condition.value,
            question_type,
        )
    });
    if let Some((index, condition)) = matched {
        return NavigationDecision::to_target(
            condition.next_section_id.clone(),
            DecisionSource::LegacyCondition { index },
        );
    }
    fallback(config.default_next_section_id.as_deref(), current, sections)
}

fn fallback(default: Option<&str>, current: &Section, sections: &[Section]) -> NavigationDecision {
    match default {
        Some(target) => NavigationDecision::to_target(Some(target.to_string()), DecisionSource::Default),
        None => NavigationDecision::order_walk(order::next_section(current, sections)),
    }
}

/// Legacy configs name a question of their own section; other sections are
/// searched before falling back to text semantics.
fn question_type_of(question_id: &str, current: &Section, sections: &[Section]) -> QuestionType {
    current
        .question(question_id)
        .or_else(|| sections.iter().find_map(|s| s.question(question_id)))
        .map_or(QuestionType::Text, |q| q.kind)
}
