//! Model provider trait and the Gemini implementation.

pub mod google;
pub mod http;
pub mod sanitize;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AdvisorConfig;
use crate::error::WayfinderError;
use crate::models::ModelCapabilities;
use crate::types::{AgentToolCall, FinishReason, GenerationSettings, ModelMessage, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "google").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Capabilities of the model.
    fn capabilities(&self) -> &ModelCapabilities;

    /// Generate a single (non-streaming) reply.
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, WayfinderError>;
}

/// Create the hosted provider described by `config`.
///
/// Fails with a credential error when no API key was acquired.
pub fn create_provider(config: &AdvisorConfig) -> Result<Arc<dyn ModelProvider>, WayfinderError> {
    let api_key = config.api_key()?.to_string();
    Ok(Arc::new(google::GoogleProvider::new(
        config.model.clone(),
        api_key,
        config.base_url.clone(),
    )))
}
