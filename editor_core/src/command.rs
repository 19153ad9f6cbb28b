//! User-facing command names.

use crate::case::CaseType;
use crate::lines::LineBoundary;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // Sentences
    SelectSentence,
    ReduceSentenceSelection,
    ExpandSentenceSelection,
    SelectToStartOfSentence,
    SelectToEndOfSentence,
    ShiftToNextSentence,
    ShiftToPreviousSentence,
    MoveSentenceUp,
    MoveSentenceDown,
    // Lines
    InsertLineAbove,
    InsertLineBelow,
    DeleteSelectedLines,
    DeleteToStartOfLine,
    DeleteToEndOfLine,
    JoinLines,
    CopyLineUp,
    CopyLineDown,
    SelectLine,
    GoToLineBoundary(LineBoundary),
    // Words, case and pairs
    SelectWordOrNextOccurrence,
    SelectAllOccurrences,
    TransformCase(CaseType),
    ExpandSelectionToBrackets,
    ExpandSelectionToQuotes,
    // Cursors
    InsertCursorAbove,
    InsertCursorBelow,
    AddCursorsToSelectionEnds,
}

/// How the editor feeds selections to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Once per selection.
    Selection,
    /// Once per selection, skipping selections on a line already handled.
    Line,
    /// Once per original selection, with the batch line counter.
    LineDelete,
    /// Once, with every selection.
    AllSelections,
}

const NAMES: &[(&str, Command)] = &[
    ("select-sentence", Command::SelectSentence),
    ("reduce-sentence-selection", Command::ReduceSentenceSelection),
    ("expand-sentence-selection", Command::ExpandSentenceSelection),
    ("select-to-start-of-sentence", Command::SelectToStartOfSentence),
    ("select-to-end-of-sentence", Command::SelectToEndOfSentence),
    ("shift-to-next-sentence", Command::ShiftToNextSentence),
    ("shift-to-previous-sentence", Command::ShiftToPreviousSentence),
    ("move-sentence-up", Command::MoveSentenceUp),
    ("move-sentence-down", Command::MoveSentenceDown),
    ("insert-line-above", Command::InsertLineAbove),
    ("insert-line-below", Command::InsertLineBelow),
    ("delete-selected-lines", Command::DeleteSelectedLines),
    ("delete-to-start-of-line", Command::DeleteToStartOfLine),
    ("delete-to-end-of-line", Command::DeleteToEndOfLine),
    ("join-lines", Command::JoinLines),
    ("copy-line-up", Command::CopyLineUp),
    ("copy-line-down", Command::CopyLineDown),
    ("select-line", Command::SelectLine),
    ("go-to-line-start", Command::GoToLineBoundary(LineBoundary::Start)),
    ("go-to-line-end", Command::GoToLineBoundary(LineBoundary::End)),
    ("select-word-or-next-occurrence", Command::SelectWordOrNextOccurrence),
    ("select-all-occurrences", Command::SelectAllOccurrences),
    ("transform-to-uppercase", Command::TransformCase(CaseType::Upper)),
    ("transform-to-lowercase", Command::TransformCase(CaseType::Lower)),
    ("transform-to-titlecase", Command::TransformCase(CaseType::Title)),
    ("toggle-case", Command::TransformCase(CaseType::Next)),
    ("expand-selection-to-brackets", Command::ExpandSelectionToBrackets),
    ("expand-selection-to-quotes", Command::ExpandSelectionToQuotes),
    ("insert-cursor-above", Command::InsertCursorAbove),
    ("insert-cursor-below", Command::InsertCursorBelow),
    ("add-cursors-to-selection-ends", Command::AddCursorsToSelectionEnds),
];

impl Command {
    /// Every command, in the order they are listed to users.
    pub fn all() -> impl Iterator<Item = Command> {
        NAMES.iter().map(|&(_, command)| command)
    }

    /// The kebab-case name the command is invoked by.
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|&&(_, command)| command == self)
            .map(|&(name, _)| name)
            .unwrap_or_default()
    }

    pub fn scope(self) -> Scope {
        match self {
            Command::InsertLineAbove
            | Command::InsertLineBelow
            | Command::JoinLines
            | Command::CopyLineUp
            | Command::CopyLineDown => Scope::Line,
            Command::DeleteSelectedLines => Scope::LineDelete,
            Command::SelectWordOrNextOccurrence
            | Command::SelectAllOccurrences
            | Command::InsertCursorAbove
            | Command::InsertCursorBelow
            | Command::AddCursorsToSelectionEnds => Scope::AllSelections,
            _ => Scope::Selection,
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|&&(name, _)| name == s)
            .map(|&(_, command)| command)
            .ok_or_else(|| CommandError::Unknown(s.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
