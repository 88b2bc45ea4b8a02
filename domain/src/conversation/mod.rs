//! Conversation log: turns, active entities and current topics.

mod log;
mod stats;
mod turn;

pub use log::{CURRENT_TOPIC_COUNT, ConversationLog};
pub use stats::{ConversationStats, SentimentCounts};
pub use turn::{Role, Turn, TurnId};
