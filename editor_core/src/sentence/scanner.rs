//! Single-line sentence boundary scanning.
//!
//! A sentence runs from just after the previous terminator run (`.`, `!`,
//! `?`), its closing delimiters and the whitespace after them, through the next
//! terminator run, its closing delimiters and the spaces that follow on the
//! same line. Both scans stop at the line boundaries; callers that need to
//! cross lines or paragraphs walk explicitly with [`walk_forward`] and
//! [`walk_backward`].

use crate::buffer::Buffer;
use crate::cursor::{is_blank, Position};

/// Sentence terminators.
pub const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Characters that may close a sentence after its terminator: quotes,
/// brackets and markdown emphasis or code markers.
pub const CLOSING_DELIMITERS: [char; 8] = ['"', '\'', ')', ']', '}', '*', '_', '`'];

pub fn is_terminator(c: char) -> bool {
    TERMINATORS.contains(&c)
}

pub fn is_closing_delimiter(c: char) -> bool {
    CLOSING_DELIMITERS.contains(&c)
}

fn is_inline_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Returns the start of the sentence containing `pos`, never leaving its line.
pub fn find_sentence_start<B: Buffer + ?Sized>(buffer: &B, pos: Position) -> Position {
    let chars = buffer.line_chars(pos.line);
    Position::new(pos.line, sentence_start_col(&chars, pos.col))
}

/// Returns the end of the first sentence ending at or after `pos`, never
/// leaving its line.
pub fn find_sentence_end<B: Buffer + ?Sized>(buffer: &B, pos: Position) -> Position {
    let chars = buffer.line_chars(pos.line);
    Position::new(pos.line, sentence_end_col(&chars, pos.col))
}

/// Column form of [`find_sentence_start`].
pub fn sentence_start_col(chars: &[char], col: usize) -> usize {
    let mut i = col.min(chars.len());
    while i > 0 {
        if !chars[i - 1].is_whitespace() {
            i -= 1;
            continue;
        }

        let mut ws_start = i - 1;
        while ws_start > 0 && chars[ws_start - 1].is_whitespace() {
            ws_start -= 1;
        }
        let mut j = ws_start;
        while j > 0 && is_closing_delimiter(chars[j - 1]) {
            j -= 1;
        }
        if j > 0 && is_terminator(chars[j - 1]) {
            return skip_whitespace(chars, ws_start);
        }
        i = ws_start;
    }
    0
}

/// Column form of [`find_sentence_end`].
pub fn sentence_end_col(chars: &[char], col: usize) -> usize {
    let len = chars.len();
    let mut i = col.min(len);
    while i < len {
        if is_terminator(chars[i]) {
            while i < len && is_terminator(chars[i]) {
                i += 1;
            }
            return skip_sentence_tail(chars, i);
        }
        i += 1;
    }
    len
}

/// Returns `(start, end)` columns of the sentence the caret at `col` belongs to.
///
/// A caret in the line's indentation belongs to the first sentence of the
/// line. A caret in the tail of a sentence (after its terminator, inside its
/// closing delimiters or trailing spaces) belongs to that sentence rather than
/// to the next one.
pub fn sentence_at(chars: &[char], col: usize) -> (usize, usize) {
    let indent = chars.iter().take_while(|c| c.is_whitespace()).count();
    let col = col.min(chars.len()).max(indent);

    let start = sentence_start_col(chars, col).max(indent);
    let end = if start < col && ends_sentence(chars, col) {
        skip_sentence_tail(chars, col)
    } else {
        sentence_end_col(chars, col)
    };
    (start, end.max(start))
}

/// Returns true if the text before `col` finishes a sentence: a terminator,
/// optionally followed by closing delimiters and spaces.
pub fn ends_sentence(chars: &[char], col: usize) -> bool {
    let mut i = col.min(chars.len());
    while i > 0 && is_inline_space(chars[i - 1]) {
        i -= 1;
    }
    while i > 0 && is_closing_delimiter(chars[i - 1]) {
        i -= 1;
    }
    i > 0 && is_terminator(chars[i - 1])
}

/// Moves back from `col` over closing delimiters and then over a terminator
/// run, landing inside the body of the sentence that ends there.
pub fn step_into_sentence_body(chars: &[char], col: usize) -> usize {
    let mut i = col.min(chars.len());
    while i > 0 && is_closing_delimiter(chars[i - 1]) {
        i -= 1;
    }
    while i > 0 && is_terminator(chars[i - 1]) {
        i -= 1;
    }
    i
}

/// Moves back from `end` over trailing spaces, but not before `start`.
pub fn trim_trailing_space(chars: &[char], start: usize, end: usize) -> usize {
    let mut end = end.min(chars.len());
    while end > start && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    end
}

fn skip_sentence_tail(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && is_closing_delimiter(chars[i]) {
        i += 1;
    }
    while i < chars.len() && is_inline_space(chars[i]) {
        i += 1;
    }
    i
}

fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

/// Where a whitespace walk across lines stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Content resumes here. Walking forward this is the first
    /// non-whitespace char; walking backward the char before it is the last
    /// non-whitespace char.
    Content(Position),
    /// A blank line was reached on this line (only when stopping at blanks).
    Blank(usize),
    /// The document edge was reached.
    Edge,
}

/// Skips whitespace forward from `pos`, moving to following lines as needed.
pub fn walk_forward<B: Buffer + ?Sized>(buffer: &B, pos: Position, stop_at_blank: bool) -> Walk {
    let mut line = pos.line;
    let mut col = pos.col;
    loop {
        let chars = buffer.line_chars(line);
        col = skip_whitespace(&chars, col);
        if col < chars.len() {
            return Walk::Content(Position::new(line, col));
        }
        if line >= buffer.last_line() {
            return Walk::Edge;
        }
        line += 1;
        col = 0;
        if stop_at_blank && is_blank(&buffer.get_line(line)) {
            return Walk::Blank(line);
        }
    }
}

/// Skips whitespace backward from `pos`, moving to previous lines as needed.
pub fn walk_backward<B: Buffer + ?Sized>(buffer: &B, pos: Position, stop_at_blank: bool) -> Walk {
    let mut line = pos.line;
    let mut col = pos.col;
    loop {
        let chars = buffer.line_chars(line);
        col = col.min(chars.len());
        while col > 0 && chars[col - 1].is_whitespace() {
            col -= 1;
        }
        if col > 0 {
            return Walk::Content(Position::new(line, col));
        }
        if line == 0 {
            return Walk::Edge;
        }
        line -= 1;
        col = buffer.line_len(line);
        if stop_at_blank && is_blank(&buffer.get_line(line)) {
            return Walk::Blank(line);
        }
    }
}
