//! SQLite-backed document store
//!
//! Users and conversations each get a table; conversation messages are one
//! JSON column read and written whole. All access goes through a single
//! mutex-guarded connection.

use crate::error::{Result, StoreError};
use crate::models::{generate_title, Conversation, ConversationSummary, StoredMessage, User};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;
use uuid::Uuid;

/// User and conversation persistence
#[derive(Clone)]
pub struct DocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl DocumentStore {
    /// Open or create the store at a file path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        info!(path = %path.as_ref().display(), "Opened document store");
        Ok(store)
    }

    /// In-memory store, used by tests and ephemeral runs
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::ConnectionPoisoned)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT,
                messages TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_conversations_user ON conversations(user_id)",
            [],
        )?;

        Ok(())
    }

    /// Register a new user
    ///
    /// The password is stored as a bcrypt hash. Username and email must both
    /// be unused.
    pub fn create_user(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let conn = self.conn()?;

        let taken: Option<String> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?1 OR username = ?2",
                params![email, username],
                |row| row.get(0),
            )
            .optional()?;
        if taken.is_some() {
            return Err(StoreError::Conflict(
                "User with this email or username already exists".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: bcrypt::hash(password, bcrypt::DEFAULT_COST)?,
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO users (id, username, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id,
                user.username,
                user.email,
                user.password_hash,
                user.created_at
            ],
        )?;

        Ok(user)
    }

    /// Authenticate by email and password
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<User> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, email, password_hash, created_at
                 FROM users WHERE email = ?1",
                params![email],
                user_from_row,
            )
            .optional()?
            .ok_or(StoreError::InvalidCredentials)?;

        if bcrypt::verify(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(StoreError::InvalidCredentials)
        }
    }

    /// Look up a user by id
    pub fn get_user(&self, user_id: &str) -> Result<User> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, username, email, password_hash, created_at
             FROM users WHERE id = ?1",
            params![user_id],
            user_from_row,
        )
        .optional()?
        .ok_or(StoreError::NotFound("User"))
    }

    /// Create an empty conversation for a user
    pub fn create_conversation(&self, user_id: &str, title: Option<String>) -> Result<Conversation> {
        self.get_user(user_id)?;

        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.insert_conversation(&conversation)?;
        Ok(conversation)
    }

    fn insert_conversation(&self, conversation: &Conversation) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO conversations (id, user_id, title, messages, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                conversation.id,
                conversation.user_id,
                conversation.title,
                serde_json::to_string(&conversation.messages)?,
                conversation.created_at,
                conversation.updated_at
            ],
        )?;
        Ok(())
    }

    /// Load a conversation with its full message history
    pub fn get_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, user_id, title, messages, created_at, updated_at
                 FROM conversations WHERE id = ?1",
                params![conversation_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, DateTime<Utc>>(4)?,
                        row.get::<_, DateTime<Utc>>(5)?,
                    ))
                },
            )
            .optional()?
            .ok_or(StoreError::NotFound("Conversation"))?;

        let (id, user_id, title, messages_json, created_at, updated_at) = row;
        Ok(Conversation {
            id,
            user_id,
            title,
            messages: serde_json::from_str(&messages_json)?,
            created_at,
            updated_at,
        })
    }

    /// List a user's conversations, newest activity first
    pub fn list_conversations(&self, user_id: &str) -> Result<Vec<ConversationSummary>> {
        self.get_user(user_id)?;

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, messages, created_at, updated_at
             FROM conversations WHERE user_id = ?1
             ORDER BY updated_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, DateTime<Utc>>(3)?,
                row.get::<_, DateTime<Utc>>(4)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, title, messages_json, created_at, updated_at) = row?;
            let messages: Vec<StoredMessage> = serde_json::from_str(&messages_json)?;
            summaries.push(ConversationSummary {
                id,
                title,
                message_count: messages.len(),
                created_at,
                updated_at,
            });
        }
        Ok(summaries)
    }

    /// Update a conversation's title
    ///
    /// A `None` title leaves the current title in place but still bumps the
    /// update timestamp.
    pub fn rename_conversation(&self, conversation_id: &str, title: Option<String>) -> Result<()> {
        let conn = self.conn()?;
        let changed = match title {
            Some(title) => conn.execute(
                "UPDATE conversations SET title = ?1, updated_at = ?2 WHERE id = ?3",
                params![title, Utc::now(), conversation_id],
            )?,
            None => conn.execute(
                "UPDATE conversations SET updated_at = ?1 WHERE id = ?2",
                params![Utc::now(), conversation_id],
            )?,
        };

        if changed == 0 {
            return Err(StoreError::NotFound("Conversation"));
        }
        Ok(())
    }

    /// Delete a conversation
    pub fn delete_conversation(&self, conversation_id: &str) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM conversations WHERE id = ?1",
            params![conversation_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound("Conversation"));
        }
        Ok(())
    }

    /// Append a query/report pair to a conversation
    ///
    /// When `conversation_id` is `None`, a new conversation is created for
    /// the user with a title derived from the query.
    pub fn record_exchange(
        &self,
        user_id: &str,
        conversation_id: Option<&str>,
        query: &str,
        report: &str,
    ) -> Result<Conversation> {
        let mut conversation = match conversation_id {
            Some(id) => self.get_conversation(id)?,
            None => self.create_conversation(user_id, Some(generate_title(query)))?,
        };

        conversation.messages.push(StoredMessage::user(query));
        conversation.messages.push(StoredMessage::ai(report));
        conversation.updated_at = Utc::now();

        let conn = self.conn()?;
        conn.execute(
            "UPDATE conversations SET messages = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                serde_json::to_string(&conversation.messages)?,
                conversation.updated_at,
                conversation.id
            ],
        )?;

        Ok(conversation)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    fn store_with_user() -> (DocumentStore, User) {
        let store = DocumentStore::open_in_memory().unwrap();
        let user = store
            .create_user("analyst", "analyst@example.com", "hunter22")
            .unwrap();
        (store, user)
    }

    #[test]
    fn test_create_user_hashes_password() {
        let (_, user) = store_with_user();
        assert_ne!(user.password_hash, "hunter22");
        assert!(bcrypt::verify("hunter22", &user.password_hash).unwrap());
    }

    #[test]
    fn test_duplicate_email_or_username_conflicts() {
        let (store, _) = store_with_user();

        let by_email = store.create_user("other", "analyst@example.com", "pw123456");
        assert!(matches!(by_email, Err(StoreError::Conflict(_))));

        let by_username = store.create_user("analyst", "other@example.com", "pw123456");
        assert!(matches!(by_username, Err(StoreError::Conflict(_))));
    }

    #[test]
    fn test_verify_credentials() {
        let (store, user) = store_with_user();

        let found = store
            .verify_credentials("analyst@example.com", "hunter22")
            .unwrap();
        assert_eq!(found.id, user.id);

        assert!(matches!(
            store.verify_credentials("analyst@example.com", "wrong"),
            Err(StoreError::InvalidCredentials)
        ));
        assert!(matches!(
            store.verify_credentials("nobody@example.com", "hunter22"),
            Err(StoreError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_get_user_not_found() {
        let (store, _) = store_with_user();
        assert!(matches!(
            store.get_user("missing"),
            Err(StoreError::NotFound("User"))
        ));
    }

    #[test]
    fn test_conversation_round_trip() {
        let (store, user) = store_with_user();

        let created = store
            .create_conversation(&user.id, Some("PFC research".to_string()))
            .unwrap();
        let loaded = store.get_conversation(&created.id).unwrap();
        assert_eq!(loaded.title.as_deref(), Some("PFC research"));
        assert!(loaded.messages.is_empty());
        assert_eq!(loaded.user_id, user.id);
    }

    #[test]
    fn test_conversation_for_unknown_user_rejected() {
        let (store, _) = store_with_user();
        assert!(matches!(
            store.create_conversation("missing", None),
            Err(StoreError::NotFound("User"))
        ));
    }

    #[test]
    fn test_record_exchange_creates_and_appends() {
        let (store, user) = store_with_user();
        let long_query = "Give me a very detailed comparison of PFC and RECLTD over five years";

        let conversation = store
            .record_exchange(&user.id, None, long_query, "the report")
            .unwrap();
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0].role, MessageRole::User);
        assert_eq!(conversation.messages[1].role, MessageRole::Ai);
        assert!(conversation.title.as_deref().unwrap().ends_with("..."));

        let again = store
            .record_exchange(&user.id, Some(&conversation.id), "follow-up", "more")
            .unwrap();
        assert_eq!(again.id, conversation.id);
        assert_eq!(again.messages.len(), 4);

        let persisted = store.get_conversation(&conversation.id).unwrap();
        assert_eq!(persisted.messages.len(), 4);
        assert_eq!(persisted.messages[2].content, "follow-up");
    }

    #[test]
    fn test_record_exchange_unknown_conversation() {
        let (store, user) = store_with_user();
        assert!(matches!(
            store.record_exchange(&user.id, Some("missing"), "q", "a"),
            Err(StoreError::NotFound("Conversation"))
        ));
    }

    #[test]
    fn test_list_orders_by_recent_activity() {
        let (store, user) = store_with_user();
        let first = store.create_conversation(&user.id, Some("first".to_string())).unwrap();
        let _second = store.create_conversation(&user.id, Some("second".to_string())).unwrap();

        // Touching the first conversation moves it to the top.
        store
            .record_exchange(&user.id, Some(&first.id), "q", "a")
            .unwrap();

        let summaries = store.list_conversations(&user.id).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].title.as_deref(), Some("first"));
        assert_eq!(summaries[0].message_count, 2);
    }

    #[test]
    fn test_rename_and_delete() {
        let (store, user) = store_with_user();
        let conversation = store.create_conversation(&user.id, None).unwrap();

        store
            .rename_conversation(&conversation.id, Some("renamed".to_string()))
            .unwrap();
        assert_eq!(
            store.get_conversation(&conversation.id).unwrap().title.as_deref(),
            Some("renamed")
        );

        // A None title keeps the existing one.
        store.rename_conversation(&conversation.id, None).unwrap();
        assert_eq!(
            store.get_conversation(&conversation.id).unwrap().title.as_deref(),
            Some("renamed")
        );

        store.delete_conversation(&conversation.id).unwrap();
        assert!(matches!(
            store.get_conversation(&conversation.id),
            Err(StoreError::NotFound("Conversation"))
        ));
        assert!(matches!(
            store.delete_conversation(&conversation.id),
            Err(StoreError::NotFound("Conversation"))
        ));
    }
}
