//! Occurrence search over the whole buffer.

use crate::buffer::Buffer;
use crate::cursor::{Position, Selection};

/// A search match in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Start character position (inclusive).
    pub start: usize,
    /// End character position (exclusive).
    pub end: usize,
}

impl SearchMatch {
    /// Creates a new search match.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the match in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Converts the match to a selection with the head at its end.
    pub fn to_selection<B: Buffer + ?Sized>(&self, buffer: &B) -> Selection {
        Selection::new(buffer.offset_to_pos(self.start), buffer.offset_to_pos(self.end))
    }
}

/// Returns true for characters that make up words.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// What to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    /// Only accept matches that are not glued to other word characters.
    pub whole_word: bool,
}

impl Query {
    pub fn new(text: impl Into<String>, whole_word: bool) -> Self {
        Self {
            text: text.into(),
            whole_word,
        }
    }
}

/// Finds all non-overlapping, case-sensitive matches in document order.
pub fn find_all<B: Buffer + ?Sized>(buffer: &B, query: &Query) -> Vec<SearchMatch> {
    if query.text.is_empty() {
        return Vec::new();
    }

    let text = buffer.get_range(Position::new(0, 0), buffer.offset_to_pos(buffer.len_chars()));
    let query_len = query.text.chars().count();
    let mut matches = Vec::new();

    // Byte offsets from `match_indices` are turned into char offsets as we go.
    let mut chars_before = 0;
    let mut bytes_seen = 0;
    for (byte_start, _) in text.match_indices(query.text.as_str()) {
        chars_before += text[bytes_seen..byte_start].chars().count();
        bytes_seen = byte_start;

        let byte_end = byte_start + query.text.len();
        if query.whole_word && !is_isolated(&text, byte_start, byte_end) {
            continue;
        }
        matches.push(SearchMatch::new(chars_before, chars_before + query_len));
    }
    matches
}

fn is_isolated(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;

    #[test]
    fn test_search_basic() {
        let buffer = TextBuffer::from_str("hello world hello");
        let matches = find_all(&buffer, &Query::new("hello", false));
        assert_eq!(matches, vec![SearchMatch::new(0, 5), SearchMatch::new(12, 17)]);
        assert_eq!(matches[0].len(), 5);
    }

    #[test]
    fn test_search_case_sensitive() {
        let buffer = TextBuffer::from_str("Hello HELLO hello");
        let matches = find_all(&buffer, &Query::new("hello", false));
        assert_eq!(matches, vec![SearchMatch::new(12, 17)]);
    }

    #[test]
    fn test_whole_word() {
        let buffer = TextBuffer::from_str("cat concat cat_ cat.");
        let substr = find_all(&buffer, &Query::new("cat", false));
        assert_eq!(substr.len(), 4);

        let words = find_all(&buffer, &Query::new("cat", true));
        assert_eq!(words, vec![SearchMatch::new(0, 3), SearchMatch::new(16, 19)]);
    }

    #[test]
    fn test_multibyte_offsets() {
        let buffer = TextBuffer::from_str("añb\nñ x ñ");
        let matches = find_all(&buffer, &Query::new("ñ", false));
        assert_eq!(
            matches,
            vec![SearchMatch::new(1, 2), SearchMatch::new(4, 5), SearchMatch::new(8, 9)]
        );
        assert_eq!(
            matches[2].to_selection(&buffer),
            Selection::new(Position::new(1, 4), Position::new(1, 5))
        );
    }

    #[test]
    fn test_search_empty_query() {
        let buffer = TextBuffer::from_str("hello world");
        assert!(find_all(&buffer, &Query::new("", false)).is_empty());
        assert!(find_all(&buffer, &Query::new("xyz", false)).is_empty());
    }
}
