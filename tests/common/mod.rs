//! Shared test helpers and mock provider.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use wayfinder::error::WayfinderError;
use wayfinder::generation::ChatModel;
use wayfinder::models::ModelCapabilities;
use wayfinder::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use wayfinder::types::*;
use wayfinder::util::retry::RetryPolicy;

/// A mock provider that returns queued outcomes and records every request.
pub struct MockProvider {
    model_id: String,
    capabilities: ModelCapabilities,
    outcomes: Mutex<VecDeque<Result<ProviderResponse, WayfinderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self::with_capabilities(model_id, ModelCapabilities::full(1_048_576))
    }

    pub fn with_capabilities(model_id: &str, capabilities: ModelCapabilities) -> Self {
        Self {
            model_id: model_id.to_string(),
            capabilities,
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.outcomes.lock().unwrap().push_back(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a single tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.queue_tool_calls(vec![AgentToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments: args,
        }]);
    }

    /// Queue a response carrying several tool calls at once.
    pub fn queue_tool_calls(&self, calls: Vec<AgentToolCall>) {
        self.outcomes.lock().unwrap().push_back(Ok(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: calls,
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    /// Queue a failure.
    pub fn queue_error(&self, error: WayfinderError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, WayfinderError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(WayfinderError::InvalidState("mock provider exhausted".into())))
    }
}

/// Retry policy with tiny backoff so real-time tests stay fast.
pub fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts: max_retries + 1,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(2),
        multiplier: 2.0,
    }
}

/// A deterministic chat model over `provider`.
pub fn chat_model(provider: Arc<MockProvider>) -> ChatModel {
    ChatModel::new(provider, GenerationSettings::deterministic(), fast_retry(2))
}

pub const PARIS_WEATHER: &str =
    r#"{"precipitation":"none","temperature":77,"wind":"light breeze from the west","condition":"sunny"}"#;
