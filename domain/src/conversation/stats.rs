//! Aggregate statistics over a conversation log.

use crate::lexical::Sentiment;
use serde::{Deserialize, Serialize};

/// Per-label sentiment counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// Snapshot of a session's conversation log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStats {
    pub total_turns: usize,
    pub user_turns: usize,
    pub assistant_turns: usize,
    pub sentiment_counts: SentimentCounts,
    pub current_topics: Vec<String>,
    pub active_entities: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_counts_add() {
        let mut counts = SentimentCounts::default();
        counts.add(Sentiment::Positive);
        counts.add(Sentiment::Positive);
        counts.add(Sentiment::Negative);
        assert_eq!(counts.positive, 2);
        assert_eq!(counts.neutral, 0);
        assert_eq!(counts.negative, 1);
        assert_eq!(counts.total(), 3);
    }
}
