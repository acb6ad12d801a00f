//! Drives one thread's conversation through the assistant/tools loop.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::{AdvisorConfig, DEFAULT_RECURSION_LIMIT};
use crate::error::{Result, WayfinderError};
use crate::generation::ChatModel;
use crate::memory::{Conversation, MemoryStore};
use crate::provider::ToolDefinition;
use crate::tools::{ToolDispatcher, ToolKind};
use crate::types::{AgentToolCall, ModelMessage, Usage};

use super::state::{route, GraphState};

/// System instruction prepended to every assistant call. Never stored.
pub const ASSISTANT_SYSTEM_PROMPT: &str = "You are a helpful travel assistant that helps with travel recommendations. Use the provided tools to determine the weather and recommend activities.";

const INTERRUPTED_TOOL_CALL: &str = "Tool call was interrupted before it produced a result.";

/// The compiled travel graph: assistant node, tools node, and a store.
///
/// Built once per process and reused for every invocation.
pub struct TravelGraph {
    model: ChatModel,
    dispatcher: ToolDispatcher,
    store: Arc<dyn MemoryStore>,
    tools: Vec<ToolDefinition>,
    recursion_limit: usize,
}

impl std::fmt::Debug for TravelGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelGraph")
            .field("model", &self.model)
            .field("tools", &self.tools.iter().map(|t| &t.name).collect::<Vec<_>>())
            .field("recursion_limit", &self.recursion_limit)
            .finish()
    }
}

impl TravelGraph {
    pub fn new(model: ChatModel, store: Arc<dyn MemoryStore>) -> Self {
        Self {
            dispatcher: ToolDispatcher::new(model.clone()),
            model,
            store,
            tools: ToolKind::all_definitions(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Build the model from `config` and attach `store`.
    pub fn from_config(config: &AdvisorConfig, store: Arc<dyn MemoryStore>) -> Result<Self> {
        let model = ChatModel::from_config(config)?;
        Ok(Self::new(model, store).with_recursion_limit(config.recursion_limit))
    }

    /// Maximum node executions per invocation. Values below 1 are raised to 1.
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit.max(1);
        self
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    pub fn store(&self) -> &Arc<dyn MemoryStore> {
        &self.store
    }

    /// Append `user_text` to the thread, run until `END`, and return the
    /// full updated conversation.
    ///
    /// Every message is committed as soon as it is produced. On failure the
    /// messages committed so far stay in the store.
    pub async fn invoke(&self, thread_id: &str, user_text: &str) -> Result<Vec<ModelMessage>> {
        let mut conversation = self.store.load(thread_id).await?;
        info!(thread_id, history = conversation.len(), "Invocation started");

        // A failed earlier turn can leave a request without its result.
        for call in conversation.dangling_tool_calls() {
            warn!(thread_id, tool = %call.name, id = %call.id, "Closing interrupted tool call");
            let repair = ModelMessage::tool_result(&call.id, json!(INTERRUPTED_TOOL_CALL), true)
                .with_name(&call.name);
            self.commit(thread_id, &mut conversation, repair).await?;
        }

        self.commit(thread_id, &mut conversation, ModelMessage::user(user_text))
            .await?;

        let mut state = GraphState::Start;
        let mut steps = 0usize;
        let mut usage = Usage::default();

        loop {
            state = route(state, conversation.last())?;
            debug!(thread_id, %state, "Transition");

            match state {
                GraphState::End => break,
                GraphState::Start => {
                    return Err(WayfinderError::InvalidState("routed back to START".into()));
                }
                GraphState::Assistant | GraphState::Tools => {
                    steps += 1;
                    if steps > self.recursion_limit {
                        return Err(WayfinderError::RecursionLimit(self.recursion_limit));
                    }
                }
            }

            if state == GraphState::Assistant {
                let reply = self.assistant_step(&conversation, &mut usage).await?;
                self.commit(thread_id, &mut conversation, reply).await?;
            } else {
                let calls: Vec<AgentToolCall> = conversation
                    .last()
                    .map(|m| m.tool_calls().into_iter().cloned().collect())
                    .unwrap_or_default();
                for call in &calls {
                    let result = self.dispatcher.dispatch(call).await?;
                    self.commit(thread_id, &mut conversation, result).await?;
                }
            }
        }

        debug!(
            thread_id,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            total_tokens = usage.total_tokens,
            "Assistant usage for invocation"
        );
        info!(thread_id, steps, messages = conversation.len(), "Invocation finished");
        Ok(conversation.into_messages())
    }

    async fn assistant_step(
        &self,
        conversation: &Conversation,
        usage: &mut Usage,
    ) -> Result<ModelMessage> {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(ModelMessage::system(ASSISTANT_SYSTEM_PROMPT));
        messages.extend(conversation.messages().iter().cloned());

        let result = self.model.invoke_with_tools(messages, &self.tools).await?;
        usage.merge(&result.usage);
        Ok(result.into_message())
    }

    async fn commit(
        &self,
        thread_id: &str,
        conversation: &mut Conversation,
        message: ModelMessage,
    ) -> Result<()> {
        self.store.append(thread_id, message.clone()).await?;
        conversation.push(message);
        Ok(())
    }
}
