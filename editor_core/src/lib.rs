//! Editor Core - Sentence-aware editing and selection logic.
//!
//! This crate contains the buffer model, the editing commands and the editor
//! that runs them over multiple selections. It has no dependencies on any
//! windowing or rendering system.

pub mod buffer;
pub mod case;
pub mod command;
pub mod cursor;
pub mod edit;
pub mod editor;
pub mod lines;
pub mod multi_cursor;
pub mod search;
pub mod sentence;
pub mod settings;
pub mod surround;
pub mod words;

pub use buffer::{Buffer, TextBuffer};
pub use case::CaseType;
pub use command::{Command, CommandError, Scope};
pub use cursor::{BoundaryPair, Position, Selection};
pub use edit::{EditError, EditOperation, EditPlan, Mark, PlannedSelection};
pub use editor::Editor;
pub use lines::{LineBoundary, LineDeleteBatch};
pub use settings::{CodeEditor, Settings, SettingsError};
pub use words::SelectionModes;
