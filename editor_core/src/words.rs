//! Word expansion and occurrence selection.

use crate::buffer::Buffer;
use crate::cursor::{Position, Selection};
use crate::edit::EditPlan;
use crate::search::{find_all, is_word_char, Query};

/// Flags deciding how occurrence search treats the current selection.
///
/// A selection produced by word expansion searches for whole words; one the
/// user made by hand searches for plain substrings. The host reports every
/// selection change through [`SelectionModes::record_selection_change`];
/// changes made by the commands here are flagged as programmatic first so
/// they are not mistaken for manual ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionModes {
    pub manual_selection: bool,
    pub programmatic_change: bool,
}

impl SelectionModes {
    /// Notes that the selection changed.
    pub fn record_selection_change(&mut self) {
        if self.programmatic_change {
            self.programmatic_change = false;
        } else {
            self.manual_selection = true;
        }
    }

    pub fn set_manual_selection(&mut self, manual: bool) {
        self.manual_selection = manual;
    }

    pub fn set_programmatic_change(&mut self, programmatic: bool) {
        self.programmatic_change = programmatic;
    }
}

/// Returns the word touching `pos` on its line, preferring the word to the
/// right of the position.
pub fn word_at<B: Buffer + ?Sized>(buffer: &B, pos: Position) -> Option<(Position, Position)> {
    let chars = buffer.line_chars(pos.line);
    let col = pos.col.min(chars.len());
    let probe = if col < chars.len() && is_word_char(chars[col]) {
        col
    } else if col > 0 && is_word_char(chars[col - 1]) {
        col - 1
    } else {
        return None;
    };

    let mut start = probe;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = probe;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    Some((Position::new(pos.line, start), Position::new(pos.line, end)))
}

/// Expands bare cursors to the words under them; once every selection holds
/// text, adds the next occurrence of the most recent selection's text.
pub fn select_word_or_next_occurrence<B: Buffer + ?Sized>(
    buffer: &B,
    selections: &[Selection],
    modes: &mut SelectionModes,
) -> EditPlan {
    let Some(&last) = selections.last() else {
        return EditPlan::new(Vec::new(), Vec::new());
    };

    if selections.iter().any(Selection::is_point) {
        let expanded: Vec<Selection> = selections
            .iter()
            .map(|sel| match word_at(buffer, sel.head).filter(|_| sel.is_point()) {
                Some((start, end)) => Selection::new(start, end),
                None => *sel,
            })
            .collect();
        modes.set_manual_selection(false);
        modes.set_programmatic_change(true);
        return EditPlan::select_all(expanded);
    }

    let (from, to) = last.range();
    let query = Query::new(buffer.get_range(from, to), !modes.manual_selection);
    let taken: Vec<(usize, usize)> = selections
        .iter()
        .map(|s| {
            let (a, b) = s.range();
            (buffer.pos_to_offset(a), buffer.pos_to_offset(b))
        })
        .collect();

    let matches = find_all(buffer, &query);
    let after = buffer.pos_to_offset(to);
    let next = matches
        .iter()
        .filter(|m| m.start >= after)
        .chain(matches.iter())
        .find(|m| !taken.contains(&(m.start, m.end)));

    let Some(next) = next else {
        log::debug!("select_word_or_next_occurrence: no further occurrence of {:?}", query.text);
        return EditPlan::select_all(selections.iter().copied());
    };

    let mut result = selections.to_vec();
    result.push(next.to_selection(buffer));
    modes.set_programmatic_change(true);
    EditPlan::select_all(result)
}

/// Selects every occurrence of the first selection's text, or of the word
/// under a bare cursor.
pub fn select_all_occurrences<B: Buffer + ?Sized>(
    buffer: &B,
    selections: &[Selection],
    modes: &mut SelectionModes,
) -> EditPlan {
    let Some(&first) = selections.first() else {
        return EditPlan::new(Vec::new(), Vec::new());
    };

    let query = if first.is_point() {
        let Some((start, end)) = word_at(buffer, first.head) else {
            log::debug!("select_all_occurrences: no word at {:?}", first.head);
            return EditPlan::select_all(selections.iter().copied());
        };
        modes.set_manual_selection(false);
        Query::new(buffer.get_range(start, end), true)
    } else {
        let (from, to) = first.range();
        Query::new(buffer.get_range(from, to), !modes.manual_selection)
    };

    modes.set_programmatic_change(true);
    EditPlan::select_all(find_all(buffer, &query).iter().map(|m| m.to_selection(buffer)))
}
