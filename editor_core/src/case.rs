//! Case conversion of the selection or the word under the cursor.

use crate::buffer::Buffer;
use crate::cursor::Selection;
use crate::edit::{EditOperation, EditPlan, PlannedSelection};
use crate::words::word_at;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseType {
    Upper,
    Lower,
    Title,
    /// Cycles upper, lower, title, upper.
    Next,
}

pub fn to_upper_case(text: impl Iterator<Item = char>) -> String {
    text.flat_map(char::to_uppercase).collect()
}

pub fn to_lower_case(text: impl Iterator<Item = char>) -> String {
    text.flat_map(char::to_lowercase).collect()
}

/// Capitalises the first letter of every word and lowercases the rest.
pub fn to_title_case(text: impl Iterator<Item = char>) -> String {
    let mut res = String::new();
    text.fold(true, |word_start, c| {
        if !c.is_alphanumeric() {
            res.push(c);
            return c.is_whitespace() || word_start;
        }
        if word_start {
            res.extend(c.to_uppercase());
        } else {
            res.extend(c.to_lowercase());
        }
        false
    });
    res
}

/// Picks the case `Next` moves to from the current text.
fn next_case(text: &str) -> CaseType {
    if text == to_upper_case(text.chars()) {
        CaseType::Lower
    } else if text == to_lower_case(text.chars()) {
        CaseType::Title
    } else {
        CaseType::Upper
    }
}

fn convert(text: &str, case: CaseType) -> String {
    match case {
        CaseType::Upper => to_upper_case(text.chars()),
        CaseType::Lower => to_lower_case(text.chars()),
        CaseType::Title => to_title_case(text.chars()),
        CaseType::Next => convert(text, next_case(text)),
    }
}

/// Converts the case of the selected text, or of the word at a bare cursor.
pub fn transform_case<B: Buffer + ?Sized>(
    buffer: &B,
    selection: Selection,
    case: CaseType,
) -> EditPlan {
    let (from, to) = if selection.is_point() {
        match word_at(buffer, selection.head) {
            Some(range) => range,
            None => {
                log::debug!("transform_case: no word at {:?}", selection.head);
                return EditPlan::unchanged(selection);
            }
        }
    } else {
        selection.range()
    };

    let text = buffer.get_range(from, to);
    let converted = convert(&text, case);
    if converted == text {
        return EditPlan::unchanged(selection);
    }

    let start = buffer.pos_to_offset(from);
    let end = start + converted.chars().count();
    let planned = if selection.is_point() {
        let cursor = buffer.pos_to_offset(selection.head).min(end);
        PlannedSelection::cursor_at(cursor)
    } else if selection.is_reversed() {
        PlannedSelection::offsets(end, start)
    } else {
        PlannedSelection::offsets(start, end)
    };

    EditPlan::single(
        EditOperation::Replace {
            start,
            end: buffer.pos_to_offset(to),
            text: converted,
        },
        planned,
    )
}
