//! A provider bundled with its generation settings and retry policy.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::AdvisorConfig;
use crate::error::Result;
use crate::provider::{self, ModelProvider, ToolDefinition};
use crate::types::{GenerateObjectResult, GenerateTextResult, GenerationSettings, ModelMessage};
use crate::util::retry::RetryPolicy;

/// Configured handle to the hosted model, shared by every node and tool.
#[derive(Clone)]
pub struct ChatModel {
    provider: Arc<dyn ModelProvider>,
    settings: GenerationSettings,
    retry: RetryPolicy,
}

impl std::fmt::Debug for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatModel")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_id())
            .field("settings", &self.settings)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ChatModel {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        settings: GenerationSettings,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            settings,
            retry,
        }
    }

    /// Build the hosted provider from `config`. Fails without an API key.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        let provider = provider::create_provider(config)?;
        Ok(Self::new(provider, config.settings.clone(), config.retry.clone()))
    }

    pub fn provider(&self) -> &dyn ModelProvider {
        self.provider.as_ref()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Plain reply with no tools offered.
    pub async fn invoke(&self, messages: Vec<ModelMessage>) -> Result<GenerateTextResult> {
        self.invoke_with_tools(messages, &[]).await
    }

    /// Reply that may request one of `tools`.
    pub async fn invoke_with_tools(
        &self,
        messages: Vec<ModelMessage>,
        tools: &[ToolDefinition],
    ) -> Result<GenerateTextResult> {
        super::text::generate_text(
            self.provider.as_ref(),
            messages,
            self.settings.clone(),
            tools,
            &self.retry,
        )
        .await
    }

    /// Reply constrained to `schema` and deserialized into `T`.
    pub async fn invoke_structured<T: DeserializeOwned>(
        &self,
        messages: Vec<ModelMessage>,
        schema: &serde_json::Value,
        type_name: &str,
    ) -> Result<GenerateObjectResult<T>> {
        super::object::generate_object(
            self.provider.as_ref(),
            messages,
            self.settings.clone(),
            schema,
            type_name,
            &self.retry,
        )
        .await
    }
}
