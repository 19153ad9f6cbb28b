//! Reordering sentences.
//!
//! Moving a sentence either swaps it with its neighbour, or, when a blank line
//! separates it from the next sentence in that direction, relocates it to the
//! near edge of the adjacent paragraph.

use super::scanner::{
    sentence_at, sentence_end_col, step_into_sentence_body, trim_trailing_space, walk_backward,
    walk_forward, Walk,
};
use super::select::snap_to_sentences;
use crate::buffer::Buffer;
use crate::cursor::{is_blank, line_end_pos, line_start_pos, Position, Selection};
use crate::edit::{EditOperation, EditPlan, PlannedSelection};

/// The sentence span being moved, trimmed of trailing spaces.
struct Unit {
    start: Position,
    end: Position,
    text: String,
}

impl Unit {
    fn resolve<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> Option<Self> {
        let (start, end) = snap_to_sentences(buffer, selection);
        let end_chars = buffer.line_chars(end.line);
        let floor = if end.line == start.line { start.col } else { 0 };
        let end = Position::new(end.line, trim_trailing_space(&end_chars, floor, end.col));
        if end <= start {
            return None;
        }
        Some(Self {
            start,
            end,
            text: buffer.get_range(start, end),
        })
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Moves the sentence under the selection after the next one.
pub fn move_sentence_down<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> EditPlan {
    let Some(unit) = Unit::resolve(buffer, selection) else {
        log::debug!("move_sentence_down: no sentence at {:?}", selection.head);
        return EditPlan::unchanged(selection);
    };

    let plan = match walk_forward(buffer, unit.end, true) {
        Walk::Content(partner_start) => swap_down(buffer, &unit, partner_start),
        Walk::Blank(line) => relocate_down(buffer, &unit, line),
        Walk::Edge => None,
    };
    plan.unwrap_or_else(|| {
        log::debug!("move_sentence_down: nothing below {:?}", unit.end);
        EditPlan::unchanged(selection)
    })
}

/// Moves the sentence under the selection before the previous one.
pub fn move_sentence_up<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> EditPlan {
    let Some(unit) = Unit::resolve(buffer, selection) else {
        log::debug!("move_sentence_up: no sentence at {:?}", selection.head);
        return EditPlan::unchanged(selection);
    };

    let plan = match walk_backward(buffer, unit.start, true) {
        Walk::Content(partner_end) => swap_up(buffer, &unit, partner_end),
        Walk::Blank(line) => relocate_up(buffer, &unit, line),
        Walk::Edge => None,
    };
    plan.unwrap_or_else(|| {
        log::debug!("move_sentence_up: nothing above {:?}", unit.start);
        EditPlan::unchanged(selection)
    })
}

fn swap_down<B: Buffer + ?Sized>(
    buffer: &B,
    unit: &Unit,
    partner_start: Position,
) -> Option<EditPlan> {
    let chars = buffer.line_chars(partner_start.line);
    let end_col = sentence_end_col(&chars, partner_start.col);
    let partner_end = Position::new(
        partner_start.line,
        trim_trailing_space(&chars, partner_start.col, end_col),
    );
    let partner = buffer.get_range(partner_start, partner_end);

    let mut separator = buffer.get_range(unit.end, partner_start);
    if separator.is_empty() && !partner.ends_with(char::is_whitespace) {
        separator.push(' ');
    }

    let start = buffer.pos_to_offset(unit.start);
    let end = buffer.pos_to_offset(partner_end);
    let new_start = start + partner.chars().count() + separator.chars().count();
    let plan = EditPlan::single(
        EditOperation::Replace {
            start,
            end,
            text: format!("{partner}{separator}{}", unit.text),
        },
        PlannedSelection::offsets(new_start, new_start + unit.len()),
    );
    log::trace!("move_sentence_down: swap {plan:?}");
    Some(plan)
}

fn swap_up<B: Buffer + ?Sized>(buffer: &B, unit: &Unit, partner_end: Position) -> Option<EditPlan> {
    let chars = buffer.line_chars(partner_end.line);
    let body = step_into_sentence_body(&chars, partner_end.col).max(1) - 1;
    let (start_col, _) = sentence_at(&chars, body);
    let partner_start = Position::new(partner_end.line, start_col);
    let partner = buffer.get_range(partner_start, partner_end);

    let mut separator = buffer.get_range(partner_end, unit.start);
    if separator.is_empty() {
        separator.push(' ');
    }

    let start = buffer.pos_to_offset(partner_start);
    let end = buffer.pos_to_offset(unit.end);
    let plan = EditPlan::single(
        EditOperation::Replace {
            start,
            end,
            text: format!("{}{separator}{partner}", unit.text),
        },
        PlannedSelection::offsets(start, start + unit.len()),
    );
    log::trace!("move_sentence_up: swap {plan:?}");
    Some(plan)
}

/// Moves the unit to the start of the paragraph after the blank run at `blank`.
fn relocate_down<B: Buffer + ?Sized>(buffer: &B, unit: &Unit, blank: usize) -> Option<EditPlan> {
    let target = (blank + 1..buffer.line_count()).find(|&l| !is_blank(&buffer.get_line(l)))?;

    let start_chars = buffer.line_chars(unit.start.line);
    let prefix = buffer.get_range(line_start_pos(unit.start.line), unit.start);
    let (delete_start, delete_end) = if is_blank(&prefix) {
        (
            buffer.pos_to_offset(line_start_pos(unit.start.line)),
            buffer.pos_to_offset(line_start_pos(unit.end.line + 1)),
        )
    } else {
        let mut col = unit.start.col;
        while col > 0 && start_chars[col - 1].is_whitespace() {
            col -= 1;
        }
        (
            buffer.pos_to_offset(Position::new(unit.start.line, col)),
            buffer.pos_to_offset(line_end_pos(buffer, unit.end.line)),
        )
    };

    let insert_at = buffer.pos_to_offset(line_start_pos(target)) - (delete_end - delete_start);
    let plan = EditPlan::new(
        vec![
            EditOperation::Delete {
                start: delete_start,
                end: delete_end,
            },
            EditOperation::Insert {
                position: insert_at,
                text: unit.text.clone(),
            },
        ],
        vec![PlannedSelection::offsets(insert_at, insert_at + unit.len())],
    );
    log::trace!("move_sentence_down: relocate {plan:?}");
    Some(plan)
}

/// Moves the unit to the end of the paragraph before the blank run at `blank`.
fn relocate_up<B: Buffer + ?Sized>(buffer: &B, unit: &Unit, blank: usize) -> Option<EditPlan> {
    let target = (0..blank).rev().find(|&l| !is_blank(&buffer.get_line(l)))?;

    let target_chars = buffer.line_chars(target);
    let content_end = trim_trailing_space(&target_chars, 0, target_chars.len());
    let insert_at = buffer.pos_to_offset(Position::new(target, content_end));

    let end_chars = buffer.line_chars(unit.end.line);
    let suffix = buffer.get_range(unit.end, line_end_pos(buffer, unit.end.line));
    let (delete_start, delete_end) = if is_blank(&suffix) {
        if unit.end.line < buffer.last_line() {
            (
                buffer.pos_to_offset(line_start_pos(unit.start.line)),
                buffer.pos_to_offset(line_start_pos(unit.end.line + 1)),
            )
        } else {
            (
                buffer.pos_to_offset(line_end_pos(buffer, unit.start.line - 1)),
                buffer.pos_to_offset(line_end_pos(buffer, unit.end.line)),
            )
        }
    } else {
        let mut col = unit.end.col;
        while col < end_chars.len() && end_chars[col].is_whitespace() {
            col += 1;
        }
        (
            buffer.pos_to_offset(unit.start),
            buffer.pos_to_offset(Position::new(unit.end.line, col)),
        )
    };

    let plan = EditPlan::new(
        vec![
            EditOperation::Delete {
                start: delete_start,
                end: delete_end,
            },
            EditOperation::Insert {
                position: insert_at,
                text: unit.text.clone(),
            },
        ],
        vec![PlannedSelection::offsets(insert_at, insert_at + unit.len())],
    );
    log::trace!("move_sentence_up: relocate {plan:?}");
    Some(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;

    fn pos(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    fn run(buffer: &mut TextBuffer, plan: EditPlan) -> Selection {
        let selections = plan.apply(buffer).unwrap();
        assert_eq!(selections.len(), 1);
        selections[0]
    }

    #[test]
    fn test_move_down_swaps_on_line() {
        let mut buffer = TextBuffer::from_str("One. Two.");
        let plan = move_sentence_down(&buffer, Selection::new(pos(0, 0), pos(0, 5)));
        let sel = run(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "Two. One.");
        assert_eq!(sel, Selection::new(pos(0, 5), pos(0, 9)));
    }

    #[test]
    fn test_move_down_then_up_restores() {
        let mut buffer = TextBuffer::from_str("Alpha one. Beta two. Gamma three.");
        let plan = move_sentence_down(&buffer, Selection::point(pos(0, 2)));
        let sel = run(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "Beta two. Alpha one. Gamma three.");
        assert_eq!(sel, Selection::new(pos(0, 10), pos(0, 20)));

        let plan = move_sentence_up(&buffer, sel);
        let sel = run(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "Alpha one. Beta two. Gamma three.");
        assert_eq!(sel, Selection::new(pos(0, 0), pos(0, 10)));
    }

    #[test]
    fn test_move_down_across_line_break() {
        let mut buffer = TextBuffer::from_lines(&["First.", "Second."]);
        let plan = move_sentence_down(&buffer, Selection::point(pos(0, 1)));
        let sel = run(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["Second.", "First."]);
        assert_eq!(sel, Selection::new(pos(1, 0), pos(1, 6)));
    }

    #[test]
    fn test_move_down_fused_sentences_get_separator() {
        let mut buffer = TextBuffer::from_str("A.B.");
        let plan = move_sentence_down(&buffer, Selection::new(pos(0, 0), pos(0, 2)));
        let sel = run(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "B. A.");
        assert_eq!(sel, Selection::new(pos(0, 3), pos(0, 5)));
    }

    #[test]
    fn test_move_down_into_next_paragraph() {
        let mut buffer = TextBuffer::from_lines(&["Last line.", "", "Next para."]);
        let plan = move_sentence_down(&buffer, Selection::point(pos(0, 3)));
        let sel = run(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "\nLast line.Next para.");
        assert_eq!(sel, Selection::new(pos(1, 0), pos(1, 10)));
    }

    #[test]
    fn test_move_down_tail_sentence_into_next_paragraph() {
        let mut buffer = TextBuffer::from_lines(&["A. B.", "", "C."]);
        let plan = move_sentence_down(&buffer, Selection::point(pos(0, 4)));
        let sel = run(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["A.", "", "B.C."]);
        assert_eq!(sel, Selection::new(pos(2, 0), pos(2, 2)));
    }

    #[test]
    fn test_move_down_last_paragraph_is_noop() {
        let buffer = TextBuffer::from_lines(&["A.", "", "B."]);
        let sel = Selection::point(pos(2, 1));
        let plan = move_sentence_down(&buffer, sel);
        assert!(plan.is_read_only());
        assert_eq!(plan, EditPlan::unchanged(sel));
    }

    #[test]
    fn test_move_up_into_previous_paragraph() {
        let mut buffer = TextBuffer::from_lines(&["A.", "", "B."]);
        let plan = move_sentence_up(&buffer, Selection::point(pos(2, 1)));
        let sel = run(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "A.B.\n");
        assert_eq!(sel, Selection::new(pos(0, 2), pos(0, 4)));
    }

    #[test]
    fn test_move_up_leading_sentence_keeps_rest_of_line() {
        let mut buffer = TextBuffer::from_lines(&["Top.", "", "Mid. End.", "Tail."]);
        let plan = move_sentence_up(&buffer, Selection::point(pos(2, 0)));
        let sel = run(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["Top.Mid.", "", "End.", "Tail."]);
        assert_eq!(sel, Selection::new(pos(0, 4), pos(0, 8)));
    }

    #[test]
    fn test_move_up_at_document_start_is_noop() {
        let buffer = TextBuffer::from_str("First. Second.");
        let sel = Selection::point(pos(0, 2));
        assert!(move_sentence_up(&buffer, sel).is_read_only());
    }

    #[test]
    fn test_move_on_blank_line_is_noop() {
        let buffer = TextBuffer::from_lines(&["A.", "   ", "B."]);
        let sel = Selection::point(pos(1, 1));
        assert!(move_sentence_down(&buffer, sel).is_read_only());
        assert!(move_sentence_up(&buffer, sel).is_read_only());
    }

    #[test]
    fn test_move_multi_sentence_selection() {
        let mut buffer = TextBuffer::from_str("A one. B two. C three.");
        let plan = move_sentence_down(&buffer, Selection::new(pos(0, 0), pos(0, 14)));
        let sel = run(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "C three. A one. B two.");
        assert_eq!(sel, Selection::new(pos(0, 9), pos(0, 22)));
    }
}
