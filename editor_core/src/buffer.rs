//! Text buffer implementation using ropey.
//!
//! Every editing operation in this crate talks to the text through the
//! [`Buffer`] trait, which is the small line/column contract a host editor has
//! to provide. [`TextBuffer`] is the rope-backed implementation used by the
//! bundled [`Editor`](crate::Editor) and by the tests.

use crate::cursor::Position;
use ropey::Rope;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// The host text-buffer capability consumed by the editing operations.
///
/// Offsets are char offsets. They are only meaningful for the buffer state
/// they were computed from; after `replace_range` every offset past the edit
/// point is stale.
pub trait Buffer {
    /// Returns the text of a line without its line terminator.
    /// Lines past the end of the buffer read as empty.
    fn get_line(&self, line: usize) -> String;

    /// Returns the number of lines. An empty buffer has one line.
    fn line_count(&self) -> usize;

    /// Returns the text between two positions (in any order).
    fn get_range(&self, from: Position, to: Position) -> String;

    /// Replaces the text between `from` and `to` with `text`.
    /// Omitting `to` inserts at `from`.
    fn replace_range(&mut self, text: &str, from: Position, to: Option<Position>);

    /// Converts a position to a char offset, clamping out-of-range positions.
    fn pos_to_offset(&self, pos: Position) -> usize;

    /// Converts a char offset to a position, clamping past the buffer end.
    fn offset_to_pos(&self, offset: usize) -> Position;

    /// Returns the index of the last line.
    fn last_line(&self) -> usize {
        self.line_count().saturating_sub(1)
    }

    /// Returns the length of a line in chars.
    fn line_len(&self, line: usize) -> usize {
        self.get_line(line).chars().count()
    }

    /// Returns the chars of a line, for column-indexed scanning.
    fn line_chars(&self, line: usize) -> Vec<char> {
        self.get_line(line).chars().collect()
    }

    /// Returns the total number of chars in the buffer.
    fn len_chars(&self) -> usize {
        let last = self.last_line();
        self.pos_to_offset(Position::new(last, self.line_len(last)))
    }
}

/// A text buffer backed by a rope data structure.
/// Provides efficient text operations for large files.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Creates a new empty text buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Creates a text buffer from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Creates a text buffer from a list of lines joined with `\n`.
    pub fn from_lines(lines: &[&str]) -> Self {
        Self::from_str(&lines.join("\n"))
    }

    /// Loads a text buffer from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let rope = Rope::from_reader(reader)?;
        Ok(Self { rope })
    }

    /// Saves the buffer to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.rope.write_to(&mut writer)?;
        writer.flush()
    }

    /// Returns the total number of lines in the buffer.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Inserts a string at the given character index.
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let idx = char_idx.min(self.rope.len_chars());
        self.rope.insert(idx, text);
    }

    /// Removes text in the given character range.
    pub fn remove(&mut self, start: usize, end: usize) {
        let start = start.min(self.rope.len_chars());
        let end = end.min(self.rope.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// Returns the text in the given character range.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let len = self.rope.len_chars();
        let (start, end) = (start.min(len), end.min(len));
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    /// Converts a character index to a (line, column) position.
    /// Both line and column are 0-indexed.
    pub fn char_to_line_col(&self, char_idx: usize) -> (usize, usize) {
        let char_idx = char_idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_idx);
        let line_start = self.rope.line_to_char(line);
        let col = char_idx - line_start;
        (line, col)
    }

    /// Converts a (line, column) position to a character index.
    /// Both line and column are 0-indexed.
    pub fn line_col_to_char(&self, line: usize, col: usize) -> usize {
        if line >= self.len_lines() {
            return self.rope.len_chars();
        }
        let line_start = self.rope.line_to_char(line);
        let line_len = self.line_len_chars(line);
        line_start + col.min(line_len)
    }

    /// Returns the length of a line in characters (excluding newline).
    pub fn line_len_chars(&self, line: usize) -> usize {
        if line >= self.len_lines() {
            return 0;
        }
        let line_slice = self.rope.line(line);
        let len = line_slice.len_chars();
        // Subtract newline character if present
        if len > 0 && line_slice.char(len - 1) == '\n' {
            return len - 1;
        }
        len
    }

    /// Returns the line at the given index as a string.
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.len_lines() {
            None
        } else {
            let mut s = self.rope.line(line).to_string();
            // Remove trailing newline for consistency
            if s.ends_with('\n') {
                s.pop();
            }
            Some(s)
        }
    }

    /// Returns the entire buffer as a string.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }

    /// Returns every line of the buffer.
    pub fn lines(&self) -> Vec<String> {
        (0..self.len_lines()).filter_map(|i| self.line(i)).collect()
    }
}

impl Buffer for TextBuffer {
    fn get_line(&self, line: usize) -> String {
        self.line(line).unwrap_or_default()
    }

    fn line_count(&self) -> usize {
        self.len_lines()
    }

    fn get_range(&self, from: Position, to: Position) -> String {
        let a = self.pos_to_offset(from);
        let b = self.pos_to_offset(to);
        self.slice(a.min(b), a.max(b))
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Option<Position>) {
        let start = self.pos_to_offset(from);
        let end = to.map(|to| self.pos_to_offset(to)).unwrap_or(start);
        let (start, end) = (start.min(end), start.max(end));
        self.remove(start, end);
        self.insert(start, text);
    }

    fn pos_to_offset(&self, pos: Position) -> usize {
        self.line_col_to_char(pos.line, pos.col)
    }

    fn offset_to_pos(&self, offset: usize) -> Position {
        let (line, col) = self.char_to_line_col(offset);
        Position::new(line, col)
    }

    fn line_len(&self, line: usize) -> usize {
        self.line_len_chars(line)
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }
}
