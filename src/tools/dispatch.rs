//! Decoding and execution of the assistant's tool requests.

use serde::de::DeserializeOwned;
use serde_json::json;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::{debug, warn};

use crate::error::{Result, WayfinderError};
use crate::generation::ChatModel;
use crate::provider::ToolDefinition;
use crate::types::{AgentToolCall, ModelMessage};

use super::activity::{activity_recommendation, ActivityArgs};
use super::types::AgentToolParameters;
use super::validation::validate_against_schema;
use super::weather::{determine_weather, WeatherArgs};

/// Names of the tools the assistant may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ToolKind {
    DetermineWeather,
    ActivityRecommendation,
}

impl ToolKind {
    pub fn description(self) -> &'static str {
        match self {
            Self::DetermineWeather => {
                "Determine the typical weather for a location on a given date."
            }
            Self::ActivityRecommendation => {
                "Recommend two to three activities for a location given its weather."
            }
        }
    }

    pub fn parameters(self) -> AgentToolParameters {
        match self {
            Self::DetermineWeather => WeatherArgs::parameters(),
            Self::ActivityRecommendation => ActivityArgs::parameters(),
        }
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.to_string(),
            description: self.description().to_string(),
            parameters: self.parameters().schema,
        }
    }

    /// Declarations for every tool, in a stable order.
    pub fn all_definitions() -> Vec<ToolDefinition> {
        Self::iter().map(Self::definition).collect()
    }
}

/// A decoded tool request with typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum TravelTool {
    DetermineWeather(WeatherArgs),
    ActivityRecommendation(ActivityArgs),
}

impl TravelTool {
    /// Decode a raw call. Unknown names and arguments that fail the tool's
    /// parameter schema are `ToolDispatch` errors.
    pub fn from_call(call: &AgentToolCall) -> Result<Self> {
        let kind: ToolKind = call
            .name
            .parse()
            .map_err(|_| WayfinderError::tool_dispatch(&call.name, "unknown tool"))?;

        validate_against_schema(&call.arguments, &kind.parameters().schema)
            .map_err(|e| WayfinderError::tool_dispatch(&call.name, e.to_string()))?;

        Ok(match kind {
            ToolKind::DetermineWeather => Self::DetermineWeather(decode_args(call)?),
            ToolKind::ActivityRecommendation => Self::ActivityRecommendation(decode_args(call)?),
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::DetermineWeather(_) => ToolKind::DetermineWeather,
            Self::ActivityRecommendation(_) => ToolKind::ActivityRecommendation,
        }
    }

    /// Run the tool, producing the JSON payload of its result.
    pub async fn run(&self, model: &ChatModel) -> Result<serde_json::Value> {
        match self {
            Self::DetermineWeather(args) => {
                let info = determine_weather(model, args).await?;
                Ok(serde_json::to_value(info)?)
            }
            Self::ActivityRecommendation(args) => {
                let text = activity_recommendation(model, args).await?;
                Ok(json!(text))
            }
        }
    }
}

fn decode_args<T: DeserializeOwned>(call: &AgentToolCall) -> Result<T> {
    serde_json::from_value(call.arguments.clone())
        .map_err(|e| WayfinderError::tool_dispatch(&call.name, e.to_string()))
}

/// Executes tool requests against the shared model handle.
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    model: ChatModel,
}

impl ToolDispatcher {
    pub fn new(model: ChatModel) -> Self {
        Self { model }
    }

    /// Run one tool call and wrap its outcome as a tool-result message.
    ///
    /// Dispatch errors become an error result in the conversation. Errors
    /// raised while the tool itself runs are returned to the caller.
    pub async fn dispatch(&self, call: &AgentToolCall) -> Result<ModelMessage> {
        let tool = match TravelTool::from_call(call) {
            Ok(tool) => tool,
            Err(err @ WayfinderError::ToolDispatch { .. }) => {
                warn!(tool = %call.name, id = %call.id, error = %err, "Rejected tool call");
                return Ok(
                    ModelMessage::tool_result(&call.id, json!(err.to_string()), true)
                        .with_name(&call.name),
                );
            }
            Err(other) => return Err(other),
        };

        debug!(tool = %tool.kind(), id = %call.id, "Dispatching tool call");
        let payload = tool.run(&self.model).await?;
        Ok(ModelMessage::tool_result(&call.id, payload, false).with_name(&call.name))
    }
}
