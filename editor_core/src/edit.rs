//! Edit plans.
//!
//! Mutating operations work in two phases. The plan phase reads a snapshot of
//! the buffer and computes every offset, length and resulting selection up
//! front. The apply phase performs the mutations and then resolves the
//! resulting selection, mapping only offsets that were already computed back
//! through [`Buffer::offset_to_pos`] on the mutated buffer. Positions are never
//! read in between writes.

use crate::buffer::Buffer;
use crate::cursor::{Position, Selection};
use thiserror::Error;

/// Errors raised while applying an [`EditPlan`] to a buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("edit range {start}..{end} exceeds buffer length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },
    #[error("edit range is inverted (start={start}, end={end})")]
    InvalidRange { start: usize, end: usize },
}

/// A single buffer mutation over char offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Insert text at position.
    Insert { position: usize, text: String },
    /// Delete the text in `start..end`.
    Delete { start: usize, end: usize },
    /// Replace the text in `start..end`.
    Replace {
        start: usize,
        end: usize,
        text: String,
    },
}

impl EditOperation {
    /// Returns the replaced span, in offsets before this operation.
    pub fn span(&self) -> (usize, usize) {
        match self {
            EditOperation::Insert { position, .. } => (*position, *position),
            EditOperation::Delete { start, end } => (*start, *end),
            EditOperation::Replace { start, end, .. } => (*start, *end),
        }
    }

    /// Returns the text written by this operation.
    pub fn text(&self) -> &str {
        match self {
            EditOperation::Insert { text, .. } | EditOperation::Replace { text, .. } => text,
            EditOperation::Delete { .. } => "",
        }
    }

    /// Returns the length of the buffer after this operation, given its
    /// length before.
    fn resulting_len(&self, len: usize) -> usize {
        let (start, end) = self.span();
        len - (end - start) + self.text().chars().count()
    }

    /// Maps an offset from before this operation to after it.
    ///
    /// Offsets before the span are untouched, offsets at or after its end
    /// shift by the length change, and offsets inside a removed span collapse
    /// to its start. A cursor sitting exactly at an insertion point ends up
    /// after the inserted text.
    pub fn map_offset(&self, offset: usize) -> usize {
        let (start, end) = self.span();
        if offset < start {
            offset
        } else if offset >= end {
            offset - (end - start) + self.text().chars().count()
        } else {
            start
        }
    }
}

/// One end of a planned selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// A position that is already final.
    Position(Position),
    /// A char offset into the buffer as it is after the plan is applied.
    Offset(usize),
}

impl Mark {
    fn resolve<B: Buffer + ?Sized>(self, buffer: &B) -> Position {
        match self {
            Mark::Position(pos) => pos,
            Mark::Offset(offset) => buffer.offset_to_pos(offset),
        }
    }
}

/// A selection whose ends are resolved once the plan has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedSelection {
    pub anchor: Mark,
    pub head: Mark,
}

impl PlannedSelection {
    /// A selection that does not depend on the edits.
    pub fn fixed(selection: Selection) -> Self {
        Self {
            anchor: Mark::Position(selection.anchor),
            head: Mark::Position(selection.head),
        }
    }

    /// A selection between two post-edit offsets.
    pub fn offsets(anchor: usize, head: usize) -> Self {
        Self {
            anchor: Mark::Offset(anchor),
            head: Mark::Offset(head),
        }
    }

    /// A cursor at a post-edit offset.
    pub fn cursor_at(offset: usize) -> Self {
        Self::offsets(offset, offset)
    }

    fn resolve<B: Buffer + ?Sized>(&self, buffer: &B) -> Selection {
        Selection::new(self.anchor.resolve(buffer), self.head.resolve(buffer))
    }
}

/// The ordered edits of one operation plus the selections that result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPlan {
    /// The operations, applied in order. Each operation's offsets refer to the
    /// buffer as left by the operations before it.
    pub operations: Vec<EditOperation>,
    /// The selections to set once the operations are applied.
    pub selections: Vec<PlannedSelection>,
}

impl EditPlan {
    pub fn new(operations: Vec<EditOperation>, selections: Vec<PlannedSelection>) -> Self {
        Self {
            operations,
            selections,
        }
    }

    /// A plan that only repositions the selection.
    pub fn select(selection: Selection) -> Self {
        Self::new(Vec::new(), vec![PlannedSelection::fixed(selection)])
    }

    /// A plan that only repositions several selections.
    pub fn select_all(selections: impl IntoIterator<Item = Selection>) -> Self {
        Self::new(
            Vec::new(),
            selections.into_iter().map(PlannedSelection::fixed).collect(),
        )
    }

    /// The no-op plan: nothing changes and the selection is kept.
    pub fn unchanged(selection: Selection) -> Self {
        Self::select(selection)
    }

    /// A plan with a single operation.
    pub fn single(operation: EditOperation, selection: PlannedSelection) -> Self {
        Self::new(vec![operation], vec![selection])
    }

    /// Returns true if the plan does not touch the buffer.
    pub fn is_read_only(&self) -> bool {
        self.operations.is_empty()
    }

    /// Maps an offset from before the plan to after it.
    pub fn map_offset(&self, offset: usize) -> usize {
        self.operations
            .iter()
            .fold(offset, |offset, op| op.map_offset(offset))
    }

    /// Checks every operation against the buffer length it will see.
    fn validate(&self, mut len: usize) -> Result<(), EditError> {
        for op in &self.operations {
            let (start, end) = op.span();
            if start > end {
                return Err(EditError::InvalidRange { start, end });
            }
            if end > len {
                return Err(EditError::RangeOutOfBounds { start, end, len });
            }
            len = op.resulting_len(len);
        }
        Ok(())
    }

    /// Applies the operations to the buffer and resolves the selections.
    ///
    /// The whole plan is validated before the first write, so a failing plan
    /// leaves the buffer untouched.
    pub fn apply<B: Buffer + ?Sized>(&self, buffer: &mut B) -> Result<Vec<Selection>, EditError> {
        self.validate(buffer.len_chars())?;

        for op in &self.operations {
            let (start, end) = op.span();
            let from = buffer.offset_to_pos(start);
            match op {
                EditOperation::Insert { text, .. } => buffer.replace_range(text, from, None),
                EditOperation::Delete { .. } | EditOperation::Replace { .. } => {
                    let to = buffer.offset_to_pos(end);
                    buffer.replace_range(op.text(), from, Some(to));
                }
            }
        }

        Ok(self.selections.iter().map(|s| s.resolve(buffer)).collect())
    }
}
