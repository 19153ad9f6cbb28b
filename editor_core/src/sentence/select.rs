//! Building and narrowing selections at sentence granularity.

use super::scanner::{find_sentence_end, find_sentence_start, sentence_at, sentence_end_col};
use super::shift::shift_selection_to_next_sentence;
use crate::buffer::Buffer;
use crate::cursor::{is_blank, Position, Selection};
use regex::Regex;
use std::sync::LazyLock;

/// A terminator run with its closing delimiters and the spaces after it.
static TERMINATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.!?]+["')\]}*_`]*[ \t]*"#).expect("valid terminator regex"));

/// Selects the sentence around the selection's start.
///
/// A selection lying on a single blank line selects that whole line, through
/// the start of the next one.
pub fn select_sentence<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> Selection {
    let bounds = selection.boundaries();
    let from = bounds.from;
    let line = buffer.get_line(from.line);

    let within_line = bounds.to.line == from.line
        || (bounds.to == Position::new(from.line + 1, 0) && from.col == 0);
    if is_blank(&line) && within_line {
        let head = if from.line < buffer.last_line() {
            Position::new(from.line + 1, 0)
        } else {
            Position::new(from.line, buffer.line_len(from.line))
        };
        return Selection::new(Position::new(from.line, 0), head);
    }

    let chars: Vec<char> = line.chars().collect();
    let (start, end) = sentence_at(&chars, from.col);
    Selection::new(Position::new(from.line, start), Position::new(from.line, end))
}

/// Narrows a multi-sentence selection by dropping its last sentence.
pub fn reduce_sentence_selection<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> Selection {
    if selection.is_point() {
        return selection;
    }

    let bounds = selection.boundaries();
    let from = bounds.from;
    if bounds.has_trailing_newline {
        let line = bounds.to.line - 1;
        return Selection::new(from, Position::new(line, buffer.line_len(line)));
    }

    let text = buffer.get_range(from, bounds.to);
    let ends: Vec<usize> = TERMINATOR_RUN
        .find_iter(&text)
        .filter(|m| {
            let rest = &text[m.end()..];
            rest.is_empty()
                || rest.starts_with(char::is_whitespace)
                || m.as_str().ends_with([' ', '\t'])
        })
        .map(|m| text[..m.end()].chars().count())
        .collect();

    if ends.len() >= 2 {
        let from_offset = buffer.pos_to_offset(from);
        let new_to = from_offset + ends[ends.len() - 2];
        if new_to > from_offset {
            return Selection::new(from, buffer.offset_to_pos(new_to));
        }
    }

    log::debug!("reduce_sentence_selection: falling back to the sentence at {from:?}");
    select_sentence(buffer, Selection::point(from))
}

/// Grows a selection by the sentence that follows it.
pub fn expand_sentence_selection<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> Selection {
    if selection.is_point() {
        return select_sentence(buffer, selection);
    }

    let next = shift_selection_to_next_sentence(buffer, selection);
    if next == selection {
        return selection;
    }
    let (from, _) = selection.range();
    let (_, next_end) = next.range();
    Selection::new(from, next_end)
}

/// Selects from the head back to the start of its sentence.
pub fn select_to_start_of_sentence<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> Selection {
    Selection::new(selection.head, find_sentence_start(buffer, selection.head))
}

/// Selects from the head forward to the end of its sentence.
pub fn select_to_end_of_sentence<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> Selection {
    Selection::new(selection.head, find_sentence_end(buffer, selection.head))
}

/// Snaps a selection outward to whole sentences.
///
/// A bare cursor snaps to the sentence around it. A range keeps a `to` that
/// already sits between sentences instead of swallowing the next one.
pub(crate) fn snap_to_sentences<B: Buffer + ?Sized>(
    buffer: &B,
    selection: Selection,
) -> (Position, Position) {
    let bounds = selection.boundaries();
    let from_chars = buffer.line_chars(bounds.from.line);
    let (start, point_end) = sentence_at(&from_chars, bounds.from.col);
    let start = Position::new(bounds.from.line, start);

    if selection.is_point() {
        return (start, Position::new(bounds.from.line, point_end));
    }

    let mut to = bounds.to;
    if bounds.has_trailing_newline {
        to = Position::new(to.line - 1, buffer.line_len(to.line - 1));
    }
    let to_chars = buffer.line_chars(to.line);
    let end_col = if to.col == 0 {
        sentence_end_col(&to_chars, 0)
    } else {
        sentence_at(&to_chars, to.col - 1).1.max(to.col)
    };
    (start, Position::new(to.line, end_col).max(start))
}
