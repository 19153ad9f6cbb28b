//! Main editor logic: a buffer, its selections, and command execution.

use crate::buffer::{Buffer, TextBuffer};
use crate::case::transform_case;
use crate::command::{Command, Scope};
use crate::cursor::{clamp_position, normalize_selections, Position, Selection};
use crate::edit::{EditError, EditPlan};
use crate::lines::{
    copy_line_down, copy_line_up, delete_selected_lines, delete_to_end_of_line,
    delete_to_start_of_line, go_to_line_boundary, insert_line_above, insert_line_below,
    join_lines, select_line, LineDeleteBatch,
};
use crate::multi_cursor::{add_cursors_to_selection_ends, insert_cursor_above, insert_cursor_below};
use crate::sentence::{
    expand_sentence_selection, move_sentence_down, move_sentence_up, reduce_sentence_selection,
    select_sentence, select_to_end_of_sentence, select_to_start_of_sentence,
    shift_selection_to_next_sentence, shift_selection_to_previous_sentence,
};
use crate::settings::Settings;
use crate::surround::{expand_selection_to_brackets, expand_selection_to_quotes};
use crate::words::{select_all_occurrences, select_word_or_next_occurrence, SelectionModes};
use std::io;
use std::path::{Path, PathBuf};

/// The main editor state.
#[derive(Debug, Clone)]
pub struct Editor {
    /// The text buffer.
    buffer: TextBuffer,
    /// Selections in document order, never overlapping. Never empty.
    selections: Vec<Selection>,
    settings: Settings,
    /// Word/occurrence search modes.
    modes: SelectionModes,
    /// Current file path, if any.
    file_path: Option<PathBuf>,
    /// Whether the buffer has unsaved changes.
    modified: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Creates a new empty editor.
    pub fn new() -> Self {
        Self::with_buffer(TextBuffer::new())
    }

    /// Creates an editor over the given buffer with a cursor at its start.
    pub fn with_buffer(buffer: TextBuffer) -> Self {
        Self {
            buffer,
            selections: vec![Selection::default()],
            settings: Settings::default(),
            modes: SelectionModes::default(),
            file_path: None,
            modified: false,
        }
    }

    /// Opens a file in the editor.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        self.buffer = TextBuffer::from_file(path)?;
        self.selections = vec![Selection::default()];
        self.modes = SelectionModes::default();
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Saves the buffer to the current file path.
    pub fn save(&mut self) -> io::Result<()> {
        if let Some(path) = &self.file_path {
            self.buffer.save_to_file(path)?;
            self.modified = false;
            Ok(())
        } else {
            Err(io::Error::new(io::ErrorKind::Other, "No file path set"))
        }
    }

    /// Saves the buffer to a new file path.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        self.buffer.save_to_file(path)?;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Returns the current file path.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Returns whether the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns a reference to the buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Replaces the selections, as a user selecting text would.
    pub fn set_selections(&mut self, selections: Vec<Selection>) {
        self.store_selections(selections);
        self.modes.record_selection_change();
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn modes(&self) -> SelectionModes {
        self.modes
    }

    /// Runs a command against every selection.
    pub fn execute(&mut self, command: Command) -> Result<(), EditError> {
        log::debug!("executing {command} on {} selection(s)", self.selections.len());
        let before = self.selections.clone();

        let result = match command.scope() {
            Scope::AllSelections => {
                let plan = self.plan_for_all(command);
                self.apply(&plan)?
            }
            scope => self.run_per_selection(command, scope)?,
        };

        self.store_selections(result);
        if self.selections != before {
            self.modes.record_selection_change();
        }
        Ok(())
    }

    fn plan_for_all(&mut self, command: Command) -> EditPlan {
        let buffer = &self.buffer;
        let selections = &self.selections;
        match command {
            Command::SelectWordOrNextOccurrence => {
                select_word_or_next_occurrence(buffer, selections, &mut self.modes)
            }
            Command::SelectAllOccurrences => {
                select_all_occurrences(buffer, selections, &mut self.modes)
            }
            Command::InsertCursorAbove => insert_cursor_above(buffer, selections),
            Command::InsertCursorBelow => insert_cursor_below(buffer, selections),
            Command::AddCursorsToSelectionEnds => {
                add_cursors_to_selection_ends(buffer, selections, self.settings.emulate)
            }
            _ => EditPlan::select_all(selections.iter().copied()),
        }
    }

    /// Runs `command` once per selection in document order. Each run sees the
    /// buffer as left by the previous ones; selections not yet processed and
    /// results already produced are carried through every edit.
    fn run_per_selection(
        &mut self,
        command: Command,
        scope: Scope,
    ) -> Result<Vec<Selection>, EditError> {
        let originals = self.selections.clone();
        let mut pending = originals.clone();
        let mut done: Vec<Selection> = Vec::with_capacity(pending.len());
        let mut handled_lines: Vec<usize> = Vec::new();
        let mut batch = LineDeleteBatch::default();

        for i in 0..pending.len() {
            let line = originals[i].head.line;
            if scope == Scope::Line && handled_lines.contains(&line) {
                done.push(pending[i]);
                continue;
            }
            handled_lines.push(line);

            let plan = match scope {
                Scope::LineDelete => {
                    batch.begin(i);
                    let Some(claimed) = batch.claim(originals[i]) else {
                        log::debug!("delete_selected_lines: lines of {:?} already deleted", originals[i]);
                        continue;
                    };
                    delete_selected_lines(&self.buffer, claimed, &mut batch)
                }
                _ => plan_for_selection(&self.buffer, &self.settings, command, pending[i]),
            };

            let carried: Vec<(usize, usize)> = done
                .iter()
                .chain(&pending[i + 1..])
                .map(|s| (self.buffer.pos_to_offset(s.anchor), self.buffer.pos_to_offset(s.head)))
                .collect();
            let results = self.apply(&plan)?;

            let remapped: Vec<Selection> = carried
                .iter()
                .map(|&(anchor, head)| {
                    Selection::new(
                        self.buffer.offset_to_pos(plan.map_offset(anchor)),
                        self.buffer.offset_to_pos(plan.map_offset(head)),
                    )
                })
                .collect();
            let (earlier, later) = remapped.split_at(done.len());
            done = earlier.to_vec();
            pending.truncate(i + 1);
            pending.extend_from_slice(later);
            done.extend(results);
        }
        Ok(done)
    }

    fn apply(&mut self, plan: &EditPlan) -> Result<Vec<Selection>, EditError> {
        let selections = plan.apply(&mut self.buffer)?;
        if !plan.is_read_only() {
            self.modified = true;
        }
        Ok(selections)
    }

    fn store_selections(&mut self, selections: Vec<Selection>) {
        let clamped: Vec<Selection> = selections
            .into_iter()
            .map(|s| {
                Selection::new(
                    clamp_position(&self.buffer, s.anchor),
                    clamp_position(&self.buffer, s.head),
                )
            })
            .collect();
        let normalized = normalize_selections(clamped);
        self.selections = if normalized.is_empty() {
            vec![Selection::point(Position::default())]
        } else {
            normalized
        };
    }
}

fn plan_for_selection(
    buffer: &TextBuffer,
    settings: &Settings,
    command: Command,
    sel: Selection,
) -> EditPlan {
    let select = EditPlan::select;
    match command {
        Command::SelectSentence => select(select_sentence(buffer, sel)),
        Command::ReduceSentenceSelection => select(reduce_sentence_selection(buffer, sel)),
        Command::ExpandSentenceSelection => select(expand_sentence_selection(buffer, sel)),
        Command::SelectToStartOfSentence => select(select_to_start_of_sentence(buffer, sel)),
        Command::SelectToEndOfSentence => select(select_to_end_of_sentence(buffer, sel)),
        Command::ShiftToNextSentence => select(shift_selection_to_next_sentence(buffer, sel)),
        Command::ShiftToPreviousSentence => {
            select(shift_selection_to_previous_sentence(buffer, sel))
        }
        Command::MoveSentenceUp => move_sentence_up(buffer, sel),
        Command::MoveSentenceDown => move_sentence_down(buffer, sel),
        Command::InsertLineAbove => insert_line_above(buffer, sel, settings),
        Command::InsertLineBelow => insert_line_below(buffer, sel, settings),
        Command::DeleteToStartOfLine => delete_to_start_of_line(buffer, sel),
        Command::DeleteToEndOfLine => delete_to_end_of_line(buffer, sel),
        Command::JoinLines => join_lines(buffer, sel),
        Command::CopyLineUp => copy_line_up(buffer, sel),
        Command::CopyLineDown => copy_line_down(buffer, sel),
        Command::SelectLine => select(select_line(buffer, sel)),
        Command::GoToLineBoundary(boundary) => select(go_to_line_boundary(buffer, sel, boundary)),
        Command::TransformCase(case) => transform_case(buffer, sel, case),
        Command::ExpandSelectionToBrackets => select(expand_selection_to_brackets(buffer, sel)),
        Command::ExpandSelectionToQuotes => select(expand_selection_to_quotes(buffer, sel)),
        Command::DeleteSelectedLines
        | Command::SelectWordOrNextOccurrence
        | Command::SelectAllOccurrences
        | Command::InsertCursorAbove
        | Command::InsertCursorBelow
        | Command::AddCursorsToSelectionEnds => EditPlan::unchanged(sel),
    }
}
