//! Condition, group and rule evaluation against a respondent's answers.
//!
//! Every level is a [`Predicate`]. Groups and rules combine their children with
//! a [`LogicalOperator`]; an empty group or rule never passes.

use crate::survey::{AnswerMap, Condition, ConditionGroup, LogicalOperator, Operator, Rule};

pub mod operator;

/// Anything that passes or fails against an answer map.
pub trait Predicate {
    fn evaluate(&self, answers: &AnswerMap) -> bool;
}

impl Predicate for Condition {
    fn evaluate(&self, answers: &AnswerMap) -> bool {
        match answers.get(&self.question_id) {
            None => self.operator == Operator::IsBlank,
            Some(answer) => operator::evaluate(
                self.operator,
                Some(&*answer.as_joined()),
                &self.value,
                self.question_type,
            ),
        }
    }
}

impl Predicate for ConditionGroup {
    fn evaluate(&self, answers: &AnswerMap) -> bool {
        combine(self.condition_operator, &self.conditions, answers)
    }
}

impl Predicate for Rule {
    fn evaluate(&self, answers: &AnswerMap) -> bool {
        combine(self.group_operator, &self.condition_groups, answers)
    }
}

fn combine<P: Predicate>(operator: LogicalOperator, items: &[P], answers: &AnswerMap) -> bool {
    if items.is_empty() {
        return false;
    }
    match operator {
        LogicalOperator::And => items.iter().all(|item| item.evaluate(answers)),
        LogicalOperator::Or => items.iter().any(|item| item.evaluate(answers)),
    }
}
