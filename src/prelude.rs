//! Convenience re-exports for common use.

pub use crate::config::AdvisorConfig;
pub use crate::error::{Result, WayfinderError};
pub use crate::generation::ChatModel;
pub use crate::graph::{GraphState, TravelGraph};
pub use crate::memory::{Conversation, InMemoryStore, MemoryStore};
pub use crate::models::GoogleModel;
pub use crate::provider::ModelProvider;
pub use crate::tools::{ToolDispatcher, ToolKind, TravelTool, WeatherInfo};
pub use crate::types::{
    AgentToolCall, ContentPart, FinishReason, GenerationSettings, ModelMessage, Role, Usage,
};
