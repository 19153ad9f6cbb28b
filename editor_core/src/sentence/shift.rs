//! Moving a selection from one sentence to a neighbouring one.

use super::scanner::{sentence_at, step_into_sentence_body, walk_backward, walk_forward, Walk};
use crate::buffer::Buffer;
use crate::cursor::{Position, Selection};

/// Selects the sentence after the selection, skipping whitespace and line
/// breaks. At the end of the document the selection is returned unchanged.
pub fn shift_selection_to_next_sentence<B: Buffer + ?Sized>(
    buffer: &B,
    selection: Selection,
) -> Selection {
    let (_, to) = selection.range();
    match walk_forward(buffer, to, false) {
        Walk::Content(pos) => {
            let (start, end) = sentence_at(&buffer.line_chars(pos.line), pos.col);
            Selection::new(Position::new(pos.line, start), Position::new(pos.line, end))
        }
        Walk::Blank(_) | Walk::Edge => {
            log::debug!("shift_selection_to_next_sentence: no sentence after {to:?}");
            selection
        }
    }
}

/// Selects the sentence before the selection, skipping whitespace and line
/// breaks. At the start of the document the selection is returned unchanged.
pub fn shift_selection_to_previous_sentence<B: Buffer + ?Sized>(
    buffer: &B,
    selection: Selection,
) -> Selection {
    let (from, _) = selection.range();
    let probe = if from.col > 0 {
        Position::new(from.line, from.col - 1)
    } else if from.line > 0 {
        Position::new(from.line - 1, buffer.line_len(from.line - 1))
    } else {
        return selection;
    };

    // The char right before `from` may be the tail of the previous sentence;
    // step over whitespace first so the probe lands inside its body.
    match walk_backward(buffer, probe, false) {
        Walk::Content(pos) => {
            let chars = buffer.line_chars(pos.line);
            let body = step_into_sentence_body(&chars, pos.col).max(1) - 1;
            let (start, end) = sentence_at(&chars, body);
            Selection::new(Position::new(pos.line, start), Position::new(pos.line, end))
        }
        Walk::Blank(_) | Walk::Edge => {
            log::debug!("shift_selection_to_previous_sentence: no sentence before {from:?}");
            selection
        }
    }
}
