//! Adding cursors.

use crate::buffer::Buffer;
use crate::cursor::{line_end_pos, line_start_pos, Position, Selection};
use crate::edit::EditPlan;
use crate::settings::CodeEditor;

fn cursor_on_line<B: Buffer + ?Sized>(buffer: &B, line: usize, col: usize) -> Selection {
    Selection::point(Position::new(line, col.min(buffer.line_len(line))))
}

/// Adds a cursor one line above every selection's head.
pub fn insert_cursor_above<B: Buffer + ?Sized>(buffer: &B, selections: &[Selection]) -> EditPlan {
    let mut result = selections.to_vec();
    for sel in selections {
        if sel.head.line > 0 {
            result.push(cursor_on_line(buffer, sel.head.line - 1, sel.head.col));
        }
    }
    EditPlan::select_all(result)
}

/// Adds a cursor one line below every selection's head.
pub fn insert_cursor_below<B: Buffer + ?Sized>(buffer: &B, selections: &[Selection]) -> EditPlan {
    let mut result = selections.to_vec();
    for sel in selections {
        if sel.head.line < buffer.last_line() {
            result.push(cursor_on_line(buffer, sel.head.line + 1, sel.head.col));
        }
    }
    EditPlan::select_all(result)
}

/// Splits a single multi-line selection into one selection per line.
///
/// Following VS Code, each line gets a cursor at its end (the last line at
/// the selection's end). Following Sublime Text, each line keeps its selected
/// part instead.
pub fn add_cursors_to_selection_ends<B: Buffer + ?Sized>(
    buffer: &B,
    selections: &[Selection],
    emulate: CodeEditor,
) -> EditPlan {
    let [selection] = selections else {
        log::debug!("add_cursors_to_selection_ends: needs exactly one selection");
        return EditPlan::select_all(selections.iter().copied());
    };

    let (from, to) = selection.range();
    let result = (from.line..=to.line).map(|line| {
        let end = if line == to.line {
            to
        } else {
            line_end_pos(buffer, line)
        };
        match emulate {
            CodeEditor::VsCode => Selection::point(end),
            CodeEditor::Sublime => {
                let start = if line == from.line {
                    from
                } else {
                    line_start_pos(line)
                };
                Selection::new(start, end)
            }
        }
    });
    EditPlan::select_all(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;

    fn pos(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    fn resolve(plan: EditPlan) -> Vec<Selection> {
        let mut buffer = TextBuffer::new();
        plan.apply(&mut buffer).unwrap()
    }

    #[test]
    fn test_insert_cursor_above_and_below() {
        let buffer = TextBuffer::from_lines(&["long line", "ab", "long line"]);
        let above = resolve(insert_cursor_above(&buffer, &[Selection::point(pos(2, 6))]));
        assert_eq!(above, vec![Selection::point(pos(2, 6)), Selection::point(pos(1, 2))]);

        let below = resolve(insert_cursor_below(&buffer, &[Selection::point(pos(0, 4))]));
        assert_eq!(below, vec![Selection::point(pos(0, 4)), Selection::point(pos(1, 2))]);
    }

    #[test]
    fn test_no_cursor_past_document_edges() {
        let buffer = TextBuffer::from_str("only");
        let sel = [Selection::point(pos(0, 1))];
        assert_eq!(resolve(insert_cursor_above(&buffer, &sel)), sel.to_vec());
        assert_eq!(resolve(insert_cursor_below(&buffer, &sel)), sel.to_vec());
    }

    #[test]
    fn test_selection_ends_vscode() {
        let buffer = TextBuffer::from_lines(&["one", "two", "three"]);
        let sel = [Selection::new(pos(0, 1), pos(2, 2))];
        let result = resolve(add_cursors_to_selection_ends(&buffer, &sel, CodeEditor::VsCode));
        assert_eq!(
            result,
            vec![
                Selection::point(pos(0, 3)),
                Selection::point(pos(1, 3)),
                Selection::point(pos(2, 2))
            ]
        );
    }

    #[test]
    fn test_selection_ends_sublime() {
        let buffer = TextBuffer::from_lines(&["one", "two", "three"]);
        let sel = [Selection::new(pos(0, 1), pos(2, 2))];
        let result = resolve(add_cursors_to_selection_ends(&buffer, &sel, CodeEditor::Sublime));
        assert_eq!(
            result,
            vec![
                Selection::new(pos(0, 1), pos(0, 3)),
                Selection::new(pos(1, 0), pos(1, 3)),
                Selection::new(pos(2, 0), pos(2, 2))
            ]
        );
    }

    #[test]
    fn test_selection_ends_needs_single_selection() {
        let buffer = TextBuffer::from_lines(&["one", "two"]);
        let sels = [Selection::point(pos(0, 0)), Selection::point(pos(1, 0))];
        let plan = add_cursors_to_selection_ends(&buffer, &sels, CodeEditor::VsCode);
        assert_eq!(resolve(plan), sels.to_vec());
    }
}
