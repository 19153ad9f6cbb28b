//! Positions, selections and the small range helpers every operation uses.

use crate::buffer::Buffer;

/// Represents a position in the buffer as (line, column).
/// Both are 0-indexed; the column counts chars.
///
/// Positions order by line first, then column, which is document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// A text selection with an anchor and a head position.
/// When anchor == head, there is no active selection (just a cursor).
///
/// The anchor may come after the head in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// The fixed end of the selection.
    pub anchor: Position,
    /// The moving end of the selection (where the caret is).
    pub head: Position,
}

impl Selection {
    /// Creates a selection from anchor to head.
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// Creates a cursor (empty selection) at the given position.
    pub fn point(pos: Position) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Returns true if there's an active selection (anchor != head).
    pub fn has_selection(&self) -> bool {
        self.anchor != self.head
    }

    /// Returns true if the selection is a bare cursor.
    pub fn is_point(&self) -> bool {
        !self.has_selection()
    }

    /// Returns the start and end of the selection (ordered).
    pub fn range(&self) -> (Position, Position) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }

    /// Returns the order-normalized form of this selection.
    pub fn boundaries(&self) -> BoundaryPair {
        let (from, to) = self.range();
        BoundaryPair {
            from,
            to,
            has_trailing_newline: to.col == 0 && to.line > from.line,
        }
    }

    /// Returns true if the anchor comes after the head.
    pub fn is_reversed(&self) -> bool {
        self.anchor > self.head
    }
}

/// A selection's boundaries in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryPair {
    pub from: Position,
    pub to: Position,
    /// True when `to` sits at the start of a line below `from`: the selection
    /// touches the newline that ends the previous line but owns nothing of
    /// `to`'s line.
    pub has_trailing_newline: bool,
}

/// Returns the position at the start of a line.
pub fn line_start_pos(line: usize) -> Position {
    Position::new(line, 0)
}

/// Returns the position at the end of a line (before the newline).
pub fn line_end_pos<B: Buffer + ?Sized>(buffer: &B, line: usize) -> Position {
    Position::new(line, buffer.line_len(line))
}

/// Returns the leading whitespace of a line of text.
pub fn leading_whitespace(text: &str) -> &str {
    let trimmed = text.trim_start();
    &text[..text.len() - trimmed.len()]
}

/// Returns true if a line holds nothing but whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Returns the column of the first non-whitespace character of a line,
/// or the line length if it is blank.
pub fn first_non_whitespace_col<B: Buffer + ?Sized>(buffer: &B, line: usize) -> usize {
    leading_whitespace(&buffer.get_line(line)).chars().count()
}

/// Clamps a position to valid buffer bounds.
pub fn clamp_position<B: Buffer + ?Sized>(buffer: &B, pos: Position) -> Position {
    let line = pos.line.min(buffer.last_line());
    Position::new(line, pos.col.min(buffer.line_len(line)))
}

/// Sorts selections into document order and merges the ones that overlap.
///
/// Two bare cursors at the same spot collapse into one; a cursor touching a
/// range is absorbed by it.
pub fn normalize_selections(mut selections: Vec<Selection>) -> Vec<Selection> {
    if selections.len() <= 1 {
        return selections;
    }

    selections.sort_by_key(|s| s.range().0);

    let mut merged: Vec<Selection> = Vec::with_capacity(selections.len());
    for sel in selections {
        let Some(last) = merged.last_mut() else {
            merged.push(sel);
            continue;
        };
        let (a_from, a_to) = last.range();
        let (b_from, b_to) = sel.range();

        let overlaps = b_from < a_to || (b_from == a_to && (last.is_point() || sel.is_point()));
        if overlaps || (a_from, a_to) == (b_from, b_to) {
            let start = a_from.min(b_from);
            let end = a_to.max(b_to);
            *last = if last.is_reversed() {
                Selection::new(end, start)
            } else {
                Selection::new(start, end)
            };
        } else {
            merged.push(sel);
        }
    }
    merged
}
