//! User and conversation persistence for finvest
//!
//! A small document store over SQLite: users are rows, conversations are
//! documents whose message history lives in a JSON column. The HTTP layer
//! and the CLI both sit on top of [`DocumentStore`].

pub mod error;
pub mod models;
pub mod store;

pub use error::{Result, StoreError};
pub use models::{
    generate_title, Conversation, ConversationSummary, MessageRole, StoredMessage, User,
};
pub use store::DocumentStore;
