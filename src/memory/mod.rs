//! Conversation history and its store.

pub mod conversation;
pub mod store;

pub use conversation::Conversation;
pub use store::{InMemoryStore, MemoryStore};
