//! Current-subject extraction.
//!
//! Four rules, first match wins:
//!
//! 1. `about <Capitalized Phrase>`
//! 2. a capitalized phrase opening the text, followed by whitespace
//! 3. a known technology, domain or lifestyle term
//! 4. the words after a leading "what is" / "what are"
//!
//! Rule 2 happily takes sentence-initial words ("What is React?" yields
//! "What"). That is a known limitation of the heuristic and is kept.

use crate::core::string::find_word;
use serde::{Deserialize, Serialize};

/// Known terms, checked group by group.
pub const SUBJECT_TERM_GROUPS: &[&[&str]] = &[
    &[
        "Python",
        "JavaScript",
        "React",
        "TypeScript",
        "Java",
        "C++",
        "Ruby",
        "Go",
        "Swift",
        "Kotlin",
    ],
    &[
        "machine learning",
        "artificial intelligence",
        "web development",
        "data science",
    ],
    &["climate", "weather", "health", "fitness", "nutrition"],
];

const WHAT_PREFIXES: &[&str] = &["what is ", "what are "];
const WHAT_MAX_WORDS: usize = 3;

/// Which extraction rule produced a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectRule {
    About,
    LeadingPhrase,
    KnownTerm,
    WhatIs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSubject {
    pub value: String,
    pub rule: SubjectRule,
}

impl ExtractedSubject {
    fn new(value: impl Into<String>, rule: SubjectRule) -> Self {
        Self {
            value: value.into(),
            rule,
        }
    }
}

/// Extract the subject `text` talks about, if any rule matches.
pub fn extract_subject(text: &str) -> Option<ExtractedSubject> {
    about_phrase(text)
        .map(|s| ExtractedSubject::new(s, SubjectRule::About))
        .or_else(|| leading_phrase(text).map(|s| ExtractedSubject::new(s, SubjectRule::LeadingPhrase)))
        .or_else(|| known_term(text).map(|s| ExtractedSubject::new(s, SubjectRule::KnownTerm)))
        .or_else(|| what_is_tail(text).map(|s| ExtractedSubject::new(s, SubjectRule::WhatIs)))
}

/// End offset of a capitalized word (`[A-Z][A-Za-z]+`) starting at `s[0]`.
fn capitalized_word_end(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if !bytes.first().is_some_and(u8::is_ascii_uppercase) {
        return None;
    }
    let len = 1 + bytes[1..]
        .iter()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    (len > 1).then_some(len)
}

/// End offsets of each word in the capitalized phrase at the start of `s`.
///
/// Words are separated by runs of whitespace. Empty when `s` does not open
/// with a capitalized word.
fn phrase_word_ends(s: &str) -> Vec<usize> {
    let mut ends = Vec::new();
    let mut pos = 0;
    while let Some(len) = capitalized_word_end(&s[pos..]) {
        ends.push(pos + len);
        let gap = s[pos + len..]
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum::<usize>();
        if gap == 0 {
            break;
        }
        pos += len + gap;
    }
    ends
}

fn about_phrase(text: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    lower
        .match_indices("about")
        .filter(|(idx, _)| {
            text[..*idx]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric())
        })
        .find_map(|(idx, word)| {
            let rest = &text[idx + word.len()..];
            let after_space = rest.trim_start();
            if after_space.len() == rest.len() {
                return None;
            }
            phrase_word_ends(after_space)
                .last()
                .map(|&end| after_space[..end].to_string())
        })
}

fn leading_phrase(text: &str) -> Option<String> {
    phrase_word_ends(text)
        .into_iter()
        .rev()
        .find(|&end| text[end..].starts_with(char::is_whitespace))
        .map(|end| text[..end].to_string())
}

fn known_term(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    SUBJECT_TERM_GROUPS.iter().find_map(|group| {
        group
            .iter()
            .filter_map(|term| find_word(&lower, &term.to_lowercase()).map(|idx| (idx, *term)))
            .min_by_key(|(idx, _)| *idx)
            .map(|(_, term)| term.to_string())
    })
}

fn what_is_tail(text: &str) -> Option<String> {
    let lower = text.trim_start().to_lowercase();
    if !WHAT_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
        return None;
    }
    let subject = text
        .split_whitespace()
        .skip(2)
        .take(WHAT_MAX_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
        .replace(['?', '.', ',', '!'], "");
    (subject.len() > 2).then_some(subject)
}
