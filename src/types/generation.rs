//! Generation settings and related enums.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{AgentToolCall, ModelMessage, Usage};

/// Settings controlling text generation.
///
/// `max_tokens: None` leaves the output budget to the endpoint.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub response_format: Option<ResponseFormat>,
    /// Whether the model may request several tool calls in one turn.
    #[builder(default)]
    #[serde(default)]
    pub parallel_tool_calls: bool,
}

impl GenerationSettings {
    /// Deterministic-leaning defaults: temperature 0, unbounded output.
    pub fn deterministic() -> Self {
        Self::builder().temperature(0.0).build()
    }
}

/// Requested response format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonObject,
    JsonSchema {
        schema: serde_json::Value,
        name: String,
    },
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    Error,
}

/// Result of a single model call.
#[derive(Debug, Clone)]
pub struct GenerateTextResult {
    pub text: String,
    pub tool_calls: Vec<AgentToolCall>,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

impl GenerateTextResult {
    /// Convert the reply into the assistant message appended to a transcript.
    pub fn into_message(self) -> ModelMessage {
        if self.tool_calls.is_empty() {
            ModelMessage::assistant(self.text)
        } else {
            ModelMessage::assistant_with_tool_calls(self.text, self.tool_calls)
        }
    }
}

/// Result of a structured-output call.
#[derive(Debug, Clone)]
pub struct GenerateObjectResult<T> {
    pub object: T,
    pub raw_text: String,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}
