//! Sentence-aware navigation and reordering.
//!
//! [`scanner`] finds sentence boundaries within one line. The other modules
//! bridge lines and paragraphs explicitly on top of it.

pub mod scanner;
mod select;
mod shift;
mod swap;

pub use scanner::{find_sentence_end, find_sentence_start};
pub use select::{
    expand_sentence_selection, reduce_sentence_selection, select_sentence,
    select_to_end_of_sentence, select_to_start_of_sentence,
};
pub use shift::{shift_selection_to_next_sentence, shift_selection_to_previous_sentence};
pub use swap::{move_sentence_down, move_sentence_up};
