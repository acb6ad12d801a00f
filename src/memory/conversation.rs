//! Conversation message history.

use std::collections::HashSet;

use crate::types::{AgentToolCall, ModelMessage};

/// Ordered, append-only message history for one thread.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<ModelMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(&mut self, message: ModelMessage) {
        self.messages.push(message);
    }

    /// Get all messages.
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ModelMessage> {
        self.messages.last()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<ModelMessage> {
        self.messages
    }

    /// Tool calls that have no matching tool result yet, in request order.
    pub fn dangling_tool_calls(&self) -> Vec<AgentToolCall> {
        let answered: HashSet<&str> = self
            .messages
            .iter()
            .flat_map(|m| m.tool_results())
            .map(|r| r.tool_call_id.as_str())
            .collect();

        self.messages
            .iter()
            .flat_map(|m| m.tool_calls())
            .filter(|call| !answered.contains(call.id.as_str()))
            .cloned()
            .collect()
    }
}

impl From<Vec<ModelMessage>> for Conversation {
    fn from(messages: Vec<ModelMessage>) -> Self {
        Self { messages }
    }
}
