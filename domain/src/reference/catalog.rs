//! Known-entity catalog.
//!
//! Recognizes programming languages, frameworks, technical fields and
//! two-word capitalized names so the entity context can carry a kind and a
//! short description for each mention.

use crate::core::string::{ascii_letters, find_word, offset_in};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a tracked entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Person,
    Thing,
    Concept,
    Place,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Person => "person",
            EntityKind::Thing => "thing",
            EntityKind::Concept => "concept",
            EntityKind::Place => "place",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub const LANGUAGES: &[&str] = &[
    "Python",
    "JavaScript",
    "TypeScript",
    "Java",
    "C++",
    "C#",
    "Ruby",
    "Go",
    "Rust",
    "Swift",
    "Kotlin",
    "PHP",
    "Scala",
];

pub const FRAMEWORKS: &[&str] = &[
    "React",
    "Angular",
    "Vue",
    "Django",
    "Flask",
    "Express",
    "Node",
    "Spring",
    "Rails",
    "Laravel",
    "TensorFlow",
    "PyTorch",
];

/// Matched case-insensitively
pub const CONCEPTS: &[&str] = &[
    "machine learning",
    "artificial intelligence",
    "data science",
    "web development",
    "mobile development",
    "cloud computing",
    "blockchain",
    "cybersecurity",
    "devops",
];

/// A catalog hit in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedEntity {
    pub name: String,
    pub kind: EntityKind,
    pub description: String,
    pub aliases: Vec<String>,
    /// Byte offset of the mention, used to order hits
    pub offset: usize,
}

/// Catalog entities mentioned in `text`, ordered by position.
pub fn recognize(text: &str) -> Vec<RecognizedEntity> {
    let mut found = Vec::new();

    for lang in LANGUAGES {
        if let Some(offset) = find_word(text, lang) {
            found.push(RecognizedEntity {
                name: lang.to_string(),
                kind: EntityKind::Thing,
                description: format!("{} programming language", lang),
                aliases: vec![
                    "it".to_string(),
                    "the language".to_string(),
                    lang.to_lowercase(),
                ],
                offset,
            });
        }
    }

    for framework in FRAMEWORKS {
        if let Some(offset) = find_word(text, framework) {
            found.push(RecognizedEntity {
                name: framework.to_string(),
                kind: EntityKind::Thing,
                description: format!("{} framework/library", framework),
                aliases: vec![
                    "it".to_string(),
                    "this".to_string(),
                    framework.to_lowercase(),
                ],
                offset,
            });
        }
    }

    let lower = text.to_ascii_lowercase();
    for concept in CONCEPTS {
        if let Some(offset) = find_word(&lower, concept) {
            found.push(RecognizedEntity {
                name: concept.to_string(),
                kind: EntityKind::Concept,
                description: format!("{} field/concept", concept),
                aliases: vec!["it".to_string(), "this field".to_string(), "that".to_string()],
                offset,
            });
        }
    }

    found.extend(recognize_people(text));

    // stable: equal offsets keep catalog order
    found.sort_by_key(|entity| entity.offset);
    found
}

/// Adjacent capitalized word pairs read as person names.
fn recognize_people(text: &str) -> Vec<RecognizedEntity> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut people: Vec<RecognizedEntity> = Vec::new();

    for pair in words.windows(2) {
        let (first, second) = (ascii_letters(pair[0]), ascii_letters(pair[1]));
        if is_name_part(&first) && is_name_part(&second) {
            let name = format!("{} {}", first, second);
            if people.iter().any(|p| p.name == name) {
                continue;
            }
            people.push(RecognizedEntity {
                description: format!("Person: {}", name),
                aliases: vec![
                    "he".to_string(),
                    "she".to_string(),
                    "they".to_string(),
                    first.clone(),
                ],
                name,
                kind: EntityKind::Person,
                offset: offset_in(text, pair[0]),
            });
        }
    }
    people
}

fn is_name_part(word: &str) -> bool {
    word.len() > 1 && word.starts_with(|c: char| c.is_ascii_uppercase())
}
