//! Lexical classifier: pure text -> (topics, entities, sentiment).
//!
//! Every function here is total and deterministic. Empty or garbage input
//! yields empty topics, empty entities and [`Sentiment::Neutral`].
//!
//! # Example
//!
//! ```
//! use parley_domain::lexical::{classify, Sentiment};
//!
//! let c = classify("I love coding in Python");
//! assert_eq!(c.topics, vec!["programming"]);
//! assert_eq!(c.entities, vec!["Python"]);
//! assert_eq!(c.sentiment, Sentiment::Positive);
//! ```

pub mod entities;
pub mod sentiment;
pub mod topics;

pub use entities::extract_entities;
pub use sentiment::{Sentiment, detect_sentiment};
pub use topics::extract_topics;

use serde::{Deserialize, Serialize};

/// Result of classifying one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Topic tags in table order
    pub topics: Vec<String>,
    /// Entity names in first-occurrence order
    pub entities: Vec<String>,
    pub sentiment: Sentiment,
}

/// Classify `text`.
pub fn classify(text: &str) -> Classification {
    Classification {
        topics: extract_topics(text),
        entities: extract_entities(text),
        sentiment: detect_sentiment(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_deterministic() {
        let text = "Thanks! Could Docker help me deploy my React app to AWS?";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn test_classify_empty() {
        let c = classify("");
        assert!(c.topics.is_empty());
        assert!(c.entities.is_empty());
        assert_eq!(c.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_classify_combines_all_three() {
        let c = classify("Docker deployment is a terrible problem");
        assert!(c.topics.is_empty());
        assert_eq!(c.entities, vec!["Docker"]);
        assert_eq!(c.sentiment, Sentiment::Negative);
    }
}
