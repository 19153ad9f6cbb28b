//! Expanding a selection to the enclosing brackets or quotes.
//!
//! The first expansion selects the content between the innermost enclosing
//! pair. When the content is already selected exactly, the pair itself is
//! added; repeating after that moves on to the next pair outward.

use crate::buffer::Buffer;
use crate::cursor::{Position, Selection};

pub const BRACKETS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];
pub const QUOTES: [char; 3] = ['"', '\'', '`'];

fn is_open_bracket(c: char) -> bool {
    BRACKETS.iter().any(|&(open, _)| open == c)
}

fn is_close_bracket(c: char) -> bool {
    BRACKETS.iter().any(|&(_, close)| close == c)
}

fn get_pair(c: char) -> (char, char) {
    BRACKETS
        .iter()
        .copied()
        .find(|&(open, close)| open == c || close == c)
        .unwrap_or((c, c))
}

/// Picks content or content-plus-pair for a pair at `(open, close)` char
/// offsets, where `open` and `close` index the delimiters themselves.
fn grow<B: Buffer + ?Sized>(buffer: &B, selection: Selection, open: usize, close: usize) -> Selection {
    let (from, to) = selection.range();
    let inner = (buffer.offset_to_pos(open + 1), buffer.offset_to_pos(close));
    let (start, end) = if (from, to) == inner {
        (buffer.offset_to_pos(open), buffer.offset_to_pos(close + 1))
    } else {
        inner
    };
    if selection.is_reversed() {
        Selection::new(end, start)
    } else {
        Selection::new(start, end)
    }
}

/// Finds the innermost bracket pair around `from..to`. Returns the delimiter
/// offsets.
fn enclosing_brackets(chars: &[char], from: usize, to: usize) -> Option<(usize, usize)> {
    let mut scan = from;
    loop {
        let open = find_unmatched_open(chars, scan)?;
        if let Some(close) = find_matching_close(chars, open) {
            if close >= to {
                return Some((open, close));
            }
        }
        scan = open;
    }
}

/// Walks back from `before` to the nearest opening bracket that is not closed
/// in between.
fn find_unmatched_open(chars: &[char], before: usize) -> Option<usize> {
    let mut stack = Vec::new();
    for i in (0..before.min(chars.len())).rev() {
        let c = chars[i];
        if is_close_bracket(c) {
            stack.push(c);
        } else if is_open_bracket(c) {
            let (_, close) = get_pair(c);
            if stack.last() == Some(&close) {
                stack.pop();
            } else {
                return Some(i);
            }
        }
    }
    None
}

fn find_matching_close(chars: &[char], open: usize) -> Option<usize> {
    let (open_char, close_char) = get_pair(chars[open]);
    let mut depth = 0usize;
    for (i, &c) in chars.iter().enumerate().skip(open) {
        if c == open_char {
            depth += 1;
        } else if c == close_char {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Selects inside the innermost enclosing `()`, `[]` or `{}`.
pub fn expand_selection_to_brackets<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> Selection {
    let text = buffer.get_range(Position::new(0, 0), buffer.offset_to_pos(buffer.len_chars()));
    let chars: Vec<char> = text.chars().collect();
    let (from, to) = selection.range();
    let (from, to) = (buffer.pos_to_offset(from), buffer.pos_to_offset(to));

    // Content that is already selected exactly grows to include its pair.
    if from > 0 && to < chars.len() && is_open_bracket(chars[from - 1]) {
        let (_, close) = get_pair(chars[from - 1]);
        if chars[to] == close && find_matching_close(&chars, from - 1) == Some(to) {
            return grow(buffer, selection, from - 1, to);
        }
    }

    match enclosing_brackets(&chars, from, to) {
        Some((open, close)) => grow(buffer, selection, open, close),
        None => {
            log::debug!("expand_selection_to_brackets: no enclosing pair");
            selection
        }
    }
}

/// Selects inside the innermost quotes enclosing the selection on its line.
pub fn expand_selection_to_quotes<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> Selection {
    let (from, to) = selection.range();
    if from.line != to.line {
        return selection;
    }
    let chars = buffer.line_chars(from.line);

    let pair = QUOTES
        .iter()
        .filter_map(|&q| {
            let open = chars[..from.col.min(chars.len())].iter().rposition(|&c| c == q)?;
            let close = to.col + chars.get(to.col..)?.iter().position(|&c| c == q)?;
            Some((open, close))
        })
        .max_by_key(|&(open, _)| open);

    let Some((open, close)) = pair else {
        log::debug!("expand_selection_to_quotes: no enclosing quotes");
        return selection;
    };

    let line_start = buffer.pos_to_offset(Position::new(from.line, 0));
    grow(buffer, selection, line_start + open, line_start + close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;

    fn pos(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    #[test]
    fn test_brackets_content_then_pair_then_outer() {
        let buffer = TextBuffer::from_str("f(a, [b, c])");
        let sel = expand_selection_to_brackets(&buffer, Selection::point(pos(0, 7)));
        assert_eq!(sel, Selection::new(pos(0, 6), pos(0, 10)));

        let sel = expand_selection_to_brackets(&buffer, sel);
        assert_eq!(sel, Selection::new(pos(0, 5), pos(0, 11)));

        let sel = expand_selection_to_brackets(&buffer, sel);
        assert_eq!(sel, Selection::new(pos(0, 2), pos(0, 11)));
    }

    #[test]
    fn test_brackets_skip_closed_pairs() {
        let buffer = TextBuffer::from_lines(&["{", "  (x) y", "}"]);
        let sel = expand_selection_to_brackets(&buffer, Selection::point(pos(1, 6)));
        assert_eq!(sel, Selection::new(pos(0, 1), pos(2, 0)));
    }

    #[test]
    fn test_brackets_none() {
        let buffer = TextBuffer::from_str("plain (text)");
        let sel = Selection::point(pos(0, 2));
        assert_eq!(expand_selection_to_brackets(&buffer, sel), sel);
    }

    #[test]
    fn test_quotes() {
        let buffer = TextBuffer::from_str("say \"it's fine\" now");
        let sel = expand_selection_to_quotes(&buffer, Selection::point(pos(0, 12)));
        assert_eq!(sel, Selection::new(pos(0, 5), pos(0, 14)));

        let sel = expand_selection_to_quotes(&buffer, sel);
        assert_eq!(sel, Selection::new(pos(0, 4), pos(0, 15)));
    }

    #[test]
    fn test_quotes_none() {
        let buffer = TextBuffer::from_str("no quotes here");
        let sel = Selection::point(pos(0, 3));
        assert_eq!(expand_selection_to_quotes(&buffer, sel), sel);
    }
}
