//! Persistent records: users and their conversations
//!
//! Conversations are stored as documents: the message list lives in a JSON
//! column and is read and written as a whole. Messages are never addressed
//! individually.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const TITLE_MAX_LEN: usize = 50;

/// Who authored a stored message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The human asking questions
    User,
    /// The analysis pipeline's report
    Ai,
}

/// One message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl StoredMessage {
    /// A user message stamped now
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// A pipeline response stamped now
    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Ai,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A registered user
///
/// The password hash never leaves the store crate's public API responses;
/// callers map this to a response type that omits it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A conversation document owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub messages: Vec<StoredMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing view of a conversation, without its messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub title: Option<String>,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Listing view of this conversation
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            message_count: self.messages.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Derive a conversation title from its opening query
///
/// Queries longer than 50 characters are truncated with an ellipsis.
pub fn generate_title(query: &str) -> String {
    if query.chars().count() <= TITLE_MAX_LEN {
        return query.to_string();
    }
    let truncated: String = query.chars().take(TITLE_MAX_LEN).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let msg = StoredMessage::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");

        let msg = StoredMessage::ai("report");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "ai");
    }

    #[test]
    fn test_generate_title_short_query_unchanged() {
        assert_eq!(generate_title("PFC news"), "PFC news");
    }

    #[test]
    fn test_generate_title_truncates_long_query() {
        let query = "a".repeat(80);
        let title = generate_title(&query);
        assert_eq!(title.len(), 53);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_generate_title_multibyte_safe() {
        let query = "\u{0915}".repeat(60);
        let title = generate_title(&query);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 53);
    }

    #[test]
    fn test_summary_counts_messages() {
        let conversation = Conversation {
            id: "c1".to_string(),
            user_id: "u1".to_string(),
            title: Some("PFC".to_string()),
            messages: vec![StoredMessage::user("q"), StoredMessage::ai("a")],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let summary = conversation.summary();
        assert_eq!(summary.message_count, 2);
        assert_eq!(summary.title.as_deref(), Some("PFC"));
    }
}
