//! String utilities for the domain layer.
//!
//! The lexical heuristics only ever look at ASCII letters and word
//! boundaries, so everything here is byte-offset safe for UTF-8 input.

/// Truncate a string to `max_chars` characters, appending `...` when cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}

/// Keep only the ASCII letters of a word (`"What's"` -> `"Whats"`).
pub fn ascii_letters(word: &str) -> String {
    word.chars().filter(|c| c.is_ascii_alphabetic()).collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offset of the first whole-word occurrence of `needle` in `haystack`.
///
/// Matching is exact; callers lowercase both sides for case-insensitive use.
/// Only the characters just outside the match are checked, so needles with
/// punctuation (`c++`) still work.
pub fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack.match_indices(needle).map(|(idx, _)| idx).find(|&idx| {
        let before_ok = haystack[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word_char(c));
        let after_ok = haystack[idx + needle.len()..]
            .chars()
            .next()
            .is_none_or(|c| !is_word_char(c));
        before_ok && after_ok
    })
}

/// Whole-word containment (see [`find_word`]).
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    find_word(haystack, needle).is_some()
}

/// Whether `text` begins with `phrase` followed by a word boundary.
pub fn starts_with_phrase(text: &str, phrase: &str) -> bool {
    text.strip_prefix(phrase)
        .is_some_and(|rest| rest.chars().next().is_none_or(|c| !is_word_char(c)))
}

/// Byte offset of `word` inside `text`, when `word` is a sub-slice of it.
pub(crate) fn offset_in(text: &str, word: &str) -> usize {
    (word.as_ptr() as usize).saturating_sub(text.as_ptr() as usize)
}
