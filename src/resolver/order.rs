use crate::survey::Section;
use itertools::Itertools;

/// The section structurally following `current` by ascending `order`.
///
/// Returns `None` when `current` is the last section or is not part of `sections`.
pub fn next_section<'a>(current: &Section, sections: &'a [Section]) -> Option<&'a Section> {
    next_section_by_id(&current.id, sections)
}

pub fn next_section_by_id<'a>(current_id: &str, sections: &'a [Section]) -> Option<&'a Section> {
    let ordered: Vec<&Section> = sections.iter().sorted_by_key(|s| s.order).collect();
    let position = ordered.iter().position(|s| s.id == current_id)?;
    ordered.get(position + 1).copied()
}

/// The section with the lowest `order`; the first declared wins a tie.
pub fn first_section(sections: &[Section]) -> Option<&Section> {
    sections.iter().min_by_key(|s| s.order)
}
