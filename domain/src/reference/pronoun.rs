//! Pronoun categories and bracket annotation.
//!
//! Pronouns are never substituted. A resolved referent is appended to the
//! original text as `[Referring to: <entity>]`, one per pronoun category.

use super::catalog::EntityKind;
use crate::core::string::contains_word;
use serde::{Deserialize, Serialize};

/// Pronouns surfaced in the digest's pronoun hint line.
pub const HINT_PRONOUNS: &[&str] = &["it", "its", "that", "this", "he", "she", "they", "them"];

/// What kind of referent a pronoun asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PronounCategory {
    Thing,
    Person,
    Plural,
}

impl PronounCategory {
    /// Categories in annotation order
    pub const ALL: [PronounCategory; 3] = [
        PronounCategory::Thing,
        PronounCategory::Person,
        PronounCategory::Plural,
    ];

    pub fn pronouns(&self) -> &'static [&'static str] {
        match self {
            PronounCategory::Thing => &["it", "its", "that", "this", "these", "those"],
            PronounCategory::Person => &["he", "his", "him", "she", "her", "hers"],
            PronounCategory::Plural => &["they", "them", "their"],
        }
    }

    /// Whether an entity of `kind` can stand in for this category.
    pub fn accepts(&self, kind: EntityKind) -> bool {
        match self {
            PronounCategory::Thing => matches!(
                kind,
                EntityKind::Thing | EntityKind::Concept | EntityKind::Place
            ),
            PronounCategory::Person => kind == EntityKind::Person,
            PronounCategory::Plural => true,
        }
    }
}

/// Categories with at least one whole-word pronoun in `text`.
pub fn categories_in(text: &str) -> Vec<PronounCategory> {
    let lower = text.to_lowercase();
    PronounCategory::ALL
        .into_iter()
        .filter(|category| category.pronouns().iter().any(|p| contains_word(&lower, p)))
        .collect()
}

/// Hint pronouns present in `text`, in list order.
pub fn hint_pronouns_in(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    HINT_PRONOUNS
        .iter()
        .copied()
        .filter(|p| contains_word(&lower, p))
        .collect()
}

/// Append one `[Referring to: ...]` note per category present in `text`.
///
/// `referent` is asked for each category in turn; a category with no
/// referent adds nothing, and an entity already named by an earlier
/// category is not repeated.
pub fn annotate<F>(text: &str, mut referent: F) -> String
where
    F: FnMut(PronounCategory) -> Option<String>,
{
    let mut named: Vec<String> = Vec::new();
    for category in categories_in(text) {
        if let Some(entity) = referent(category)
            && !named.contains(&entity)
        {
            named.push(entity);
        }
    }

    let mut resolved = text.to_string();
    for entity in named {
        resolved.push_str(&format!(" [Referring to: {}]", entity));
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_in_order() {
        assert_eq!(
            categories_in("They said he liked it"),
            vec![
                PronounCategory::Thing,
                PronounCategory::Person,
                PronounCategory::Plural
            ]
        );
        assert!(categories_in("items and hearts").is_empty());
    }

    #[test]
    fn test_accepts() {
        assert!(PronounCategory::Thing.accepts(EntityKind::Concept));
        assert!(PronounCategory::Thing.accepts(EntityKind::Place));
        assert!(!PronounCategory::Thing.accepts(EntityKind::Person));
        assert!(PronounCategory::Person.accepts(EntityKind::Person));
        assert!(!PronounCategory::Person.accepts(EntityKind::Thing));
        assert!(PronounCategory::Plural.accepts(EntityKind::Person));
    }

    #[test]
    fn test_annotate_appends_without_substitution() {
        let resolved = annotate("What's its history?", |_| Some("Python".to_string()));
        assert_eq!(resolved, "What's its history? [Referring to: Python]");
    }

    #[test]
    fn test_annotate_one_note_per_distinct_entity() {
        let resolved = annotate("Did he say they use it?", |category| match category {
            PronounCategory::Person => Some("Ada Lovelace".to_string()),
            _ => Some("Rust".to_string()),
        });
        assert_eq!(
            resolved,
            "Did he say they use it? [Referring to: Rust] [Referring to: Ada Lovelace]"
        );
    }

    #[test]
    fn test_annotate_without_referent_is_unchanged() {
        assert_eq!(annotate("Is it good?", |_| None), "Is it good?");
        assert_eq!(annotate("No pronouns here", |_| Some("X".into())), "No pronouns here");
    }

    #[test]
    fn test_hint_pronouns() {
        assert_eq!(hint_pronouns_in("Is this like it?"), vec!["it", "this"]);
        assert!(hint_pronouns_in("hello").is_empty());
    }
}
