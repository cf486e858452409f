use crate::resolver::resolve_next;
use crate::survey::{AnswerMap, Section};
use serde::Serialize;

/// How a simulated walk stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WalkOutcome {
    /// The resolver ended the survey.
    Completed,
    /// A decision pointed at a section id that does not exist.
    DanglingSection { section_id: String },
    /// The starting section does not exist.
    UnknownStart { section_id: String },
    /// The step bound was hit, which means the authored rules loop.
    Truncated,
}

/// Lazily replays the sections a respondent would visit.
///
/// At most `sections.len() + 1` sections are yielded, so a cyclic configuration
/// still terminates.
pub struct FlowWalk<'a> {
    sections: &'a [Section],
    answers: &'a AnswerMap,
    pending: Option<&'a Section>,
    steps: usize,
    limit: usize,
    outcome: Option<WalkOutcome>,
}

impl<'a> FlowWalk<'a> {
    /// `None` while the walk is still in progress.
    pub fn outcome(&self) -> Option<&WalkOutcome> {
        self.outcome.as_ref()
    }

    /// Drives the walk to its end and collects the visited section ids.
    pub fn into_path(mut self) -> SimulatedPath {
        let visited = self.by_ref().map(|s| s.id.clone()).collect();
        SimulatedPath {
            visited,
            outcome: self.outcome.unwrap_or(WalkOutcome::Completed),
        }
    }
}

impl<'a> Iterator for FlowWalk<'a> {
    type Item = &'a Section;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.pending.take()?;
        if self.steps >= self.limit {
            tracing::warn!(
                section = %current.id,
                limit = self.limit,
                "flow simulation hit its step bound; the branching rules form a cycle"
            );
            self.outcome = Some(WalkOutcome::Truncated);
            return None;
        }
        self.steps += 1;

        match resolve_next(current, self.answers, self.sections).next_section_id {
            None => self.outcome = Some(WalkOutcome::Completed),
            Some(next_id) => match self.sections.iter().find(|s| s.id == next_id) {
                Some(next) => self.pending = Some(next),
                None => {
                    self.outcome = Some(WalkOutcome::DanglingSection {
                        section_id: next_id,
                    })
                }
            },
        }
        Some(current)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedPath {
    pub visited: Vec<String>,
    pub outcome: WalkOutcome,
}

impl SimulatedPath {
    pub fn completed(&self) -> bool {
        self.outcome == WalkOutcome::Completed
    }

    pub fn truncated(&self) -> bool {
        self.outcome == WalkOutcome::Truncated
    }
}

/// Starts a walk at `start_section_id`.
pub fn simulate<'a>(
    start_section_id: &str,
    answers: &'a AnswerMap,
    sections: &'a [Section],
) -> FlowWalk<'a> {
    let start = sections.iter().find(|s| s.id == start_section_id);
    let outcome = match start {
        Some(_) => None,
        None => Some(WalkOutcome::UnknownStart {
            section_id: start_section_id.to_string(),
        }),
    };
    FlowWalk {
        sections,
        answers,
        pending: start,
        steps: 0,
        limit: sections.len() + 1,
        outcome,
    }
}
