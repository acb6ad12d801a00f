//! Single-turn text generation with retry.

use tracing::{debug, warn};

use crate::error::WayfinderError;
use crate::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use crate::types::*;
use crate::util::retry::RetryPolicy;

/// Ask the model for one reply.
///
/// Transient failures are retried under `retry`. When tools are offered and
/// parallel calls are disabled, any calls beyond the first are discarded so a
/// turn never carries more than one outstanding request.
pub async fn generate_text(
    provider: &dyn ModelProvider,
    messages: Vec<ModelMessage>,
    settings: GenerationSettings,
    tools: &[ToolDefinition],
    retry: &RetryPolicy,
) -> Result<GenerateTextResult, WayfinderError> {
    let request = ProviderRequest {
        messages,
        tools: (!tools.is_empty()).then(|| tools.to_vec()),
        settings,
    };

    debug!(
        model = provider.model_id(),
        messages = request.messages.len(),
        tools = tools.len(),
        "generate_text: calling provider"
    );
    let response = retry.execute(|| provider.generate_text(&request)).await?;

    let mut tool_calls = response.tool_calls;
    if !request.settings.parallel_tool_calls && tool_calls.len() > 1 {
        warn!(
            requested = tool_calls.len(),
            kept = %tool_calls[0].name,
            "Model requested parallel tool calls; keeping the first"
        );
        tool_calls.truncate(1);
    }

    Ok(GenerateTextResult {
        text: response.text,
        tool_calls,
        usage: response.usage,
        finish_reason: response.finish_reason,
    })
}
