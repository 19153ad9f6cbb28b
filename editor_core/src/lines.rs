//! Line-level editing: inserting, deleting, joining and copying lines.

use crate::buffer::Buffer;
use crate::cursor::{leading_whitespace, line_end_pos, line_start_pos, Position, Selection};
use crate::edit::{EditOperation, EditPlan, PlannedSelection};
use crate::settings::Settings;
use regex::Regex;
use std::sync::LazyLock;

/// A markdown list marker: bullet, number, or quote, optionally followed by a
/// task checkbox.
static LIST_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-|\+|\*|\d+\.|>) (\[.\] )?").expect("valid list prefix regex")
});

/// Counts lines removed during one batch of `delete_selected_lines` calls.
///
/// The host runs the delete once per original selection; every call sees the
/// buffer as left by the previous ones, so the selection lines it is given
/// have to be shifted up by what was already removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineDeleteBatch {
    pub lines_deleted: usize,
    /// Last original line claimed so far in this batch.
    pub covered_through: Option<usize>,
}

impl LineDeleteBatch {
    /// Starts iteration `iteration` of a batch; the first one resets the count.
    pub fn begin(&mut self, iteration: usize) {
        if iteration == 0 {
            self.lines_deleted = 0;
            self.covered_through = None;
        }
    }

    /// Narrows an original selection to the lines no earlier call of the batch
    /// has claimed. Returns `None` when every line it covers is already gone.
    ///
    /// Selections must be claimed in document order.
    pub fn claim(&mut self, selection: Selection) -> Option<Selection> {
        let (first, last) = covered_lines(selection);
        let claimed = match self.covered_through {
            Some(covered) if last <= covered => return None,
            Some(covered) if first <= covered => {
                let start = Position::new(covered + 1, 0);
                let (_, to) = selection.range();
                if selection.is_reversed() {
                    Selection::new(to, start)
                } else {
                    Selection::new(start, to)
                }
            }
            _ => selection,
        };
        self.covered_through = Some(self.covered_through.map_or(last, |c| c.max(last)));
        Some(claimed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBoundary {
    Start,
    End,
}

/// Returns the list marker a line starts with, including its indentation.
pub fn list_prefix(line: &str) -> Option<&str> {
    LIST_PREFIX.find(line).map(|m| m.as_str())
}

/// Returns the marker for the item after one with `prefix`: numbers count up
/// and checkboxes start unchecked.
pub fn next_list_prefix(prefix: &str) -> String {
    let Some(caps) = LIST_PREFIX.captures(prefix) else {
        return prefix.to_string();
    };
    let indent = leading_whitespace(prefix);
    let marker = &caps[1];
    let marker = match marker.strip_suffix('.').and_then(|n| n.parse::<u64>().ok()) {
        Some(n) => format!("{}.", n + 1),
        None => marker.to_string(),
    };
    let checkbox = if caps.get(2).is_some() { "[ ] " } else { "" };
    format!("{indent}{marker} {checkbox}")
}

/// The last line a selection covers; a selection ending at column 0 of a
/// later line does not cover that line.
/// The first and last line a line command on `selection` acts on. A range
/// ending at column 0 does not cover its last line.
pub fn covered_lines(selection: Selection) -> (usize, usize) {
    (selection.range().0.line, last_covered_line(selection))
}

fn last_covered_line(selection: Selection) -> usize {
    let bounds = selection.boundaries();
    if bounds.has_trailing_newline {
        bounds.to.line - 1
    } else {
        bounds.to.line
    }
}

/// The indentation, and list marker if enabled, for a line inserted next to
/// `line`.
fn continuation(line: &str, settings: &Settings, increment: bool) -> String {
    match list_prefix(line).filter(|_| settings.auto_insert_list_prefix) {
        Some(prefix) if increment => next_list_prefix(prefix),
        // Same marker, unchecked.
        Some(prefix) => match prefix.find('[') {
            Some(open) => format!("{}[ ] ", &prefix[..open]),
            None => prefix.to_string(),
        },
        None => leading_whitespace(line).to_string(),
    }
}

/// Opens a new line below the selection's head, keeping indentation and
/// continuing list items. On an empty list item the marker is removed
/// instead.
pub fn insert_line_below<B: Buffer + ?Sized>(
    buffer: &B,
    selection: Selection,
    settings: &Settings,
) -> EditPlan {
    let line = selection.head.line;
    let text = buffer.get_line(line);
    let end = buffer.pos_to_offset(line_end_pos(buffer, line));

    if settings.auto_insert_list_prefix {
        if let Some(prefix) = list_prefix(&text) {
            if prefix.len() == text.len() {
                let start = buffer.pos_to_offset(line_start_pos(line));
                return EditPlan::single(
                    EditOperation::Delete { start, end },
                    PlannedSelection::cursor_at(start),
                );
            }
        }
    }

    let inserted = format!("\n{}", continuation(&text, settings, true));
    let cursor = end + inserted.chars().count();
    EditPlan::single(
        EditOperation::Insert {
            position: end,
            text: inserted,
        },
        PlannedSelection::cursor_at(cursor),
    )
}

/// Opens a new line above the selection's head, keeping indentation and the
/// current list marker.
pub fn insert_line_above<B: Buffer + ?Sized>(
    buffer: &B,
    selection: Selection,
    settings: &Settings,
) -> EditPlan {
    let line = selection.head.line;
    let text = buffer.get_line(line);
    let start = buffer.pos_to_offset(line_start_pos(line));

    let lead = continuation(&text, settings, false);
    let cursor = start + lead.chars().count();
    EditPlan::single(
        EditOperation::Insert {
            position: start,
            text: format!("{lead}\n"),
        },
        PlannedSelection::cursor_at(cursor),
    )
}

/// Deletes every line the selection touches.
///
/// `selection` is the selection as it was before the batch started; `batch`
/// carries the number of lines earlier calls of the same batch removed.
pub fn delete_selected_lines<B: Buffer + ?Sized>(
    buffer: &B,
    selection: Selection,
    batch: &mut LineDeleteBatch,
) -> EditPlan {
    let (from, _) = selection.range();
    let first = from.line.saturating_sub(batch.lines_deleted);
    let last = last_covered_line(selection)
        .saturating_sub(batch.lines_deleted)
        .min(buffer.last_line());
    let first = first.min(last);
    let col = selection.head.col;

    let (start, end, cursor) = if last == buffer.last_line() {
        if first == 0 {
            (0, buffer.len_chars(), Position::new(0, 0))
        } else {
            let above = first - 1;
            (
                buffer.pos_to_offset(line_end_pos(buffer, above)),
                buffer.pos_to_offset(line_end_pos(buffer, last)),
                Position::new(above, col.min(buffer.line_len(above))),
            )
        }
    } else {
        (
            buffer.pos_to_offset(line_start_pos(first)),
            buffer.pos_to_offset(line_start_pos(last + 1)),
            Position::new(first, col.min(buffer.line_len(last + 1))),
        )
    };

    batch.lines_deleted += last - first + 1;
    EditPlan::single(
        EditOperation::Delete { start, end },
        PlannedSelection::fixed(Selection::point(cursor)),
    )
}

/// Deletes from the head back to the start of its line. At column 0 the
/// line break before it goes instead.
pub fn delete_to_start_of_line<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> EditPlan {
    let head = selection.head;
    let from = if head.col > 0 {
        line_start_pos(head.line)
    } else if head.line > 0 {
        line_end_pos(buffer, head.line - 1)
    } else {
        log::debug!("delete_to_start_of_line: already at document start");
        return EditPlan::unchanged(selection);
    };

    let start = buffer.pos_to_offset(from);
    EditPlan::single(
        EditOperation::Delete {
            start,
            end: buffer.pos_to_offset(head),
        },
        PlannedSelection::cursor_at(start),
    )
}

/// Deletes from the head to the end of its line. At the line end the line
/// break after it goes instead.
pub fn delete_to_end_of_line<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> EditPlan {
    let head = selection.head;
    let to = if head.col < buffer.line_len(head.line) {
        line_end_pos(buffer, head.line)
    } else if head.line < buffer.last_line() {
        line_start_pos(head.line + 1)
    } else {
        log::debug!("delete_to_end_of_line: already at document end");
        return EditPlan::unchanged(selection);
    };

    let start = buffer.pos_to_offset(head);
    EditPlan::single(
        EditOperation::Delete {
            start,
            end: buffer.pos_to_offset(to),
        },
        PlannedSelection::cursor_at(start),
    )
}

/// Joins the selected lines, or the head's line with the next one, into one
/// line separated by single spaces. List markers of the joined lines are
/// dropped. The cursor lands at the last join point.
pub fn join_lines<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> EditPlan {
    let (from, to) = selection.range();
    let first = from.line;
    let last = if to.line > first { to.line } else { first + 1 };
    if last > buffer.last_line() {
        log::debug!("join_lines: no line below {first}");
        return EditPlan::unchanged(selection);
    }

    let head_text = buffer.get_line(first);
    let mut joined = String::new();
    let mut last_join = 0;
    for line in first + 1..=last {
        let text = buffer.get_line(line);
        let body = match list_prefix(&text) {
            Some(prefix) => &text[prefix.len()..],
            None => text.trim_start(),
        };
        let body = body.trim_end();
        last_join = joined.chars().count();
        if body.is_empty() {
            continue;
        }
        let glued = joined.is_empty() && (head_text.is_empty() || head_text.ends_with(char::is_whitespace));
        if !glued {
            joined.push(' ');
        }
        joined.push_str(body);
    }

    let start = buffer.pos_to_offset(line_end_pos(buffer, first));
    let end = buffer.pos_to_offset(line_end_pos(buffer, last));
    EditPlan::single(
        EditOperation::Replace {
            start,
            end,
            text: joined,
        },
        PlannedSelection::cursor_at(start + last_join),
    )
}

/// Copies the selected lines above themselves. The selection stays on the
/// upper copy.
pub fn copy_line_up<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> EditPlan {
    let first = selection.range().0.line;
    let last = last_covered_line(selection);
    let text = buffer.get_range(line_start_pos(first), line_end_pos(buffer, last));

    EditPlan::single(
        EditOperation::Insert {
            position: buffer.pos_to_offset(line_start_pos(first)),
            text: format!("{text}\n"),
        },
        PlannedSelection::fixed(selection),
    )
}

/// Copies the selected lines below themselves. The selection follows the
/// lower copy.
pub fn copy_line_down<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> EditPlan {
    let first = selection.range().0.line;
    let last = last_covered_line(selection);
    let text = buffer.get_range(line_start_pos(first), line_end_pos(buffer, last));
    let shift = last - first + 1;

    let moved = |pos: Position| Position::new(pos.line + shift, pos.col);
    EditPlan::single(
        EditOperation::Insert {
            position: buffer.pos_to_offset(line_end_pos(buffer, last)),
            text: format!("\n{text}"),
        },
        PlannedSelection::fixed(Selection::new(moved(selection.anchor), moved(selection.head))),
    )
}

/// Selects the lines the selection touches, through the start of the line
/// after them. Repeating grows the selection one line at a time.
pub fn select_line<B: Buffer + ?Sized>(buffer: &B, selection: Selection) -> Selection {
    let (from, to) = selection.range();
    let head = if to.line < buffer.last_line() {
        line_start_pos(to.line + 1)
    } else {
        line_end_pos(buffer, to.line)
    };
    Selection::new(line_start_pos(from.line), head)
}

/// Moves the cursor to the start of the selection's first line or the end of
/// its last line.
pub fn go_to_line_boundary<B: Buffer + ?Sized>(
    buffer: &B,
    selection: Selection,
    boundary: LineBoundary,
) -> Selection {
    let (from, to) = selection.range();
    match boundary {
        LineBoundary::Start => Selection::point(line_start_pos(from.line)),
        LineBoundary::End => Selection::point(line_end_pos(buffer, to.line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;

    fn pos(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    fn apply(buffer: &mut TextBuffer, plan: EditPlan) -> Selection {
        plan.apply(buffer).unwrap()[0]
    }

    #[test]
    fn test_list_prefix() {
        assert_eq!(list_prefix("- item"), Some("- "));
        assert_eq!(list_prefix("  12. step"), Some("  12. "));
        assert_eq!(list_prefix("- [x] done"), Some("- [x] "));
        assert_eq!(list_prefix("> quote"), Some("> "));
        assert_eq!(list_prefix("-no space"), None);
        assert_eq!(list_prefix("plain"), None);
    }

    #[test]
    fn test_next_list_prefix() {
        assert_eq!(next_list_prefix("  9. "), "  10. ");
        assert_eq!(next_list_prefix("- [x] "), "- [ ] ");
        assert_eq!(next_list_prefix("* "), "* ");
    }

    #[test]
    fn test_insert_line_below_keeps_indent() {
        let mut buffer = TextBuffer::from_lines(&["    code", "next"]);
        let plan = insert_line_below(&buffer, Selection::point(pos(0, 2)), &Settings::default());
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["    code", "    ", "next"]);
        assert_eq!(sel, Selection::point(pos(1, 4)));
    }

    #[test]
    fn test_insert_line_below_continues_list() {
        let mut buffer = TextBuffer::from_str("1. first");
        let plan = insert_line_below(&buffer, Selection::point(pos(0, 3)), &Settings::default());
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["1. first", "2. "]);
        assert_eq!(sel, Selection::point(pos(1, 3)));
    }

    #[test]
    fn test_insert_line_below_without_list_prefix_setting() {
        let settings = Settings {
            auto_insert_list_prefix: false,
            ..Settings::default()
        };
        let mut buffer = TextBuffer::from_str("  - item");
        let plan = insert_line_below(&buffer, Selection::point(pos(0, 0)), &settings);
        apply(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["  - item", "  "]);
    }

    #[test]
    fn test_insert_line_below_on_empty_item_clears_it() {
        let mut buffer = TextBuffer::from_lines(&["- one", "- "]);
        let plan = insert_line_below(&buffer, Selection::point(pos(1, 2)), &Settings::default());
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["- one", ""]);
        assert_eq!(sel, Selection::point(pos(1, 0)));
    }

    #[test]
    fn test_insert_line_above() {
        let mut buffer = TextBuffer::from_lines(&["top", "  - [x] task"]);
        let plan = insert_line_above(&buffer, Selection::point(pos(1, 5)), &Settings::default());
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["top", "  - [ ] ", "  - [x] task"]);
        assert_eq!(sel, Selection::point(pos(1, 8)));
    }

    #[test]
    fn test_delete_selected_lines_middle() {
        let mut buffer = TextBuffer::from_lines(&["a", "bb", "ccc", "d"]);
        let mut batch = LineDeleteBatch::default();
        let plan = delete_selected_lines(&buffer, Selection::new(pos(1, 0), pos(2, 2)), &mut batch);
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["a", "d"]);
        assert_eq!(sel, Selection::point(pos(1, 1)));
        assert_eq!(batch.lines_deleted, 2);
    }

    #[test]
    fn test_delete_selected_lines_last_line() {
        let mut buffer = TextBuffer::from_lines(&["one", "two"]);
        let mut batch = LineDeleteBatch::default();
        let plan = delete_selected_lines(&buffer, Selection::point(pos(1, 2)), &mut batch);
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "one");
        assert_eq!(sel, Selection::point(pos(0, 2)));
    }

    #[test]
    fn test_delete_only_line() {
        let mut buffer = TextBuffer::from_str("alone");
        let mut batch = LineDeleteBatch::default();
        let plan = delete_selected_lines(&buffer, Selection::point(pos(0, 3)), &mut batch);
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "");
        assert_eq!(sel, Selection::point(pos(0, 0)));
    }

    #[test]
    fn test_delete_selected_lines_batch_shifts_lines() {
        let mut buffer = TextBuffer::from_lines(&["0", "1", "2", "3", "4"]);
        let cursors = [Selection::point(pos(1, 0)), Selection::point(pos(3, 0))];
        let mut batch = LineDeleteBatch::default();
        for (i, sel) in cursors.iter().enumerate() {
            batch.begin(i);
            let plan = delete_selected_lines(&buffer, *sel, &mut batch);
            plan.apply(&mut buffer).unwrap();
        }
        assert_eq!(buffer.lines(), vec!["0", "2", "4"]);

        batch.begin(0);
        assert_eq!(batch.lines_deleted, 0);
    }

    #[test]
    fn test_batch_claims_each_line_once() {
        let mut batch = LineDeleteBatch::default();
        batch.begin(0);
        let first = Selection::new(pos(0, 0), pos(1, 1));
        assert_eq!(batch.claim(first), Some(first));

        batch.begin(1);
        assert_eq!(batch.claim(Selection::point(pos(1, 2))), None);

        batch.begin(2);
        assert_eq!(
            batch.claim(Selection::new(pos(3, 1), pos(1, 3))),
            Some(Selection::new(pos(3, 1), pos(2, 0)))
        );
        assert_eq!(batch.covered_through, Some(3));

        batch.begin(0);
        assert_eq!(batch.covered_through, None);
    }

    #[test]
    fn test_delete_selection_ending_at_line_start() {
        let mut buffer = TextBuffer::from_lines(&["a", "b", "c"]);
        let mut batch = LineDeleteBatch::default();
        let plan = delete_selected_lines(&buffer, Selection::new(pos(0, 0), pos(1, 0)), &mut batch);
        apply(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["b", "c"]);
        assert_eq!(batch.lines_deleted, 1);
    }

    #[test]
    fn test_delete_to_line_edges() {
        let mut buffer = TextBuffer::from_lines(&["hello world", "next"]);
        let plan = delete_to_start_of_line(&buffer, Selection::point(pos(0, 6)));
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.get_line(0), "world");
        assert_eq!(sel, Selection::point(pos(0, 0)));

        let plan = delete_to_end_of_line(&buffer, Selection::point(pos(0, 5)));
        apply(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "worldnext");

        let plan = delete_to_end_of_line(&buffer, Selection::point(pos(0, 2)));
        apply(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "wo");
    }

    #[test]
    fn test_delete_to_start_at_column_zero_joins() {
        let mut buffer = TextBuffer::from_lines(&["ab", "cd"]);
        let plan = delete_to_start_of_line(&buffer, Selection::point(pos(1, 0)));
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "abcd");
        assert_eq!(sel, Selection::point(pos(0, 2)));

        let origin = Selection::point(pos(0, 0));
        assert!(delete_to_start_of_line(&buffer, origin).is_read_only());
    }

    #[test]
    fn test_join_lines_strips_markers() {
        let mut buffer = TextBuffer::from_lines(&["- first", "  - second", "third"]);
        let plan = join_lines(&buffer, Selection::point(pos(0, 0)));
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["- first second", "third"]);
        assert_eq!(sel, Selection::point(pos(0, 7)));
    }

    #[test]
    fn test_join_selected_lines() {
        let mut buffer = TextBuffer::from_lines(&["a", "  b", "", "c"]);
        let plan = join_lines(&buffer, Selection::new(pos(0, 0), pos(3, 1)));
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.to_string(), "a b c");
        assert_eq!(sel, Selection::point(pos(0, 3)));
    }

    #[test]
    fn test_join_last_line_is_noop() {
        let buffer = TextBuffer::from_lines(&["a", "b"]);
        assert!(join_lines(&buffer, Selection::point(pos(1, 0))).is_read_only());
    }

    #[test]
    fn test_copy_lines() {
        let mut buffer = TextBuffer::from_lines(&["x", "y"]);
        let plan = copy_line_down(&buffer, Selection::point(pos(0, 1)));
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["x", "x", "y"]);
        assert_eq!(sel, Selection::point(pos(1, 1)));

        let plan = copy_line_up(&buffer, Selection::new(pos(1, 0), pos(2, 1)));
        let sel = apply(&mut buffer, plan);
        assert_eq!(buffer.lines(), vec!["x", "x", "y", "x", "y"]);
        assert_eq!(sel, Selection::new(pos(1, 0), pos(2, 1)));
    }

    #[test]
    fn test_select_line_grows() {
        let buffer = TextBuffer::from_lines(&["one", "two", "three"]);
        let sel = select_line(&buffer, Selection::point(pos(0, 1)));
        assert_eq!(sel, Selection::new(pos(0, 0), pos(1, 0)));
        let sel = select_line(&buffer, sel);
        assert_eq!(sel, Selection::new(pos(0, 0), pos(2, 0)));
        let sel = select_line(&buffer, sel);
        assert_eq!(sel, Selection::new(pos(0, 0), pos(2, 5)));
    }

    #[test]
    fn test_go_to_line_boundary() {
        let buffer = TextBuffer::from_lines(&["one", "three"]);
        let sel = Selection::new(pos(0, 1), pos(1, 2));
        assert_eq!(
            go_to_line_boundary(&buffer, sel, LineBoundary::Start),
            Selection::point(pos(0, 0))
        );
        assert_eq!(
            go_to_line_boundary(&buffer, sel, LineBoundary::End),
            Selection::point(pos(1, 5))
        );
    }
}
