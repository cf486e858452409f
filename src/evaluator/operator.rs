use crate::survey::{ConditionValue, Operator, QuestionType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::cmp::Ordering;

const DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Applies `operator` to an answer (already joined to one string) and a target value.
///
/// `answer` is `None` when the question was not answered. Operands that cannot
/// be parsed make the comparison false; this function never panics.
pub fn evaluate(
    operator: Operator,
    answer: Option<&str>,
    value: &ConditionValue,
    question_type: QuestionType,
) -> bool {
    let answer = match (operator, answer) {
        (Operator::IsBlank, answer) => return answer.is_none_or(|a| a.trim().is_empty()),
        (Operator::IsNotBlank, answer) => return answer.is_some_and(|a| !a.trim().is_empty()),
        (_, None) => return false,
        (_, Some(answer)) => answer,
    };

    match operator {
        Operator::Equals => answer == value.as_text(),
        Operator::NotEquals => answer != value.as_text(),
        Operator::Contains => contains_ignore_case(answer, &value.as_text()),
        Operator::NotContains => !contains_ignore_case(answer, &value.as_text()),
        Operator::LessThan => {
            compare(answer, &value.as_text(), question_type) == Some(Ordering::Less)
        }
        Operator::GreaterThan => {
            compare(answer, &value.as_text(), question_type) == Some(Ordering::Greater)
        }
        Operator::Between => value.as_range().is_some_and(|(low, high)| {
            matches!(
                compare(answer, low, question_type),
                Some(Ordering::Greater | Ordering::Equal)
            ) && matches!(
                compare(answer, high, question_type),
                Some(Ordering::Less | Ordering::Equal)
            )
        }),
        Operator::IsBlank | Operator::IsNotBlank | Operator::Unknown => false,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Orders two operands chronologically for date/time questions, numerically otherwise.
fn compare(left: &str, right: &str, question_type: QuestionType) -> Option<Ordering> {
    if question_type.is_temporal() {
        let left = Instant::parse(left, question_type)?;
        let right = Instant::parse(right, question_type)?;
        left.compare(&right)
    } else {
        parse_number(left)?.partial_cmp(&parse_number(right)?)
    }
}

pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// A point in time as written in a date or time answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Instant {
    DateTime(NaiveDateTime),
    TimeOfDay(NaiveTime),
}

impl Instant {
    pub(crate) fn parse(text: &str, question_type: QuestionType) -> Option<Self> {
        let text = text.trim();
        if question_type == QuestionType::Time {
            if let Some(time) = parse_time_of_day(text) {
                return Some(Instant::TimeOfDay(time));
            }
        }
        parse_date_time(text).map(Instant::DateTime)
    }

    /// Instants of different kinds are not comparable.
    fn compare(&self, other: &Instant) -> Option<Ordering> {
        match (self, other) {
            (Instant::DateTime(a), Instant::DateTime(b)) => Some(a.cmp(b)),
            (Instant::TimeOfDay(a), Instant::TimeOfDay(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
