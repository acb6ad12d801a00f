//! Thread-keyed conversation persistence.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use crate::error::Result;
use crate::types::ModelMessage;

use super::Conversation;

/// Storage for conversations keyed by thread id.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Load the conversation for `thread_id`; unknown ids yield an empty one.
    async fn load(&self, thread_id: &str) -> Result<Conversation>;

    /// Append one message to the thread, creating the thread if needed.
    async fn append(&self, thread_id: &str, message: ModelMessage) -> Result<()>;
}

/// Process-local store.
///
/// Writes are serialized by the lock. Concurrent writers on one thread are
/// last-writer-wins: each append lands after every append that took the lock
/// before it, so the last writer's message ends the thread and none is lost.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    threads: RwLock<HashMap<String, Vec<ModelMessage>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn load(&self, thread_id: &str) -> Result<Conversation> {
        let threads = self.threads.read().await;
        Ok(threads
            .get(thread_id)
            .cloned()
            .map(Conversation::from)
            .unwrap_or_default())
    }

    async fn append(&self, thread_id: &str, message: ModelMessage) -> Result<()> {
        let mut threads = self.threads.write().await;
        let messages = threads.entry(thread_id.to_string()).or_default();
        messages.push(message);
        trace!(thread_id, len = messages.len(), "Committed message");
        Ok(())
    }
}
