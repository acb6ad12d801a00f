//! Graph states and the routing rule between them.

use strum::Display;

use crate::error::{Result, WayfinderError};
use crate::types::ModelMessage;

/// Node the graph is currently at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GraphState {
    Start,
    Assistant,
    Tools,
    End,
}

impl GraphState {
    pub fn is_terminal(self) -> bool {
        self == Self::End
    }
}

/// Next state given the current one and the latest message.
///
/// Pure: no I/O, same inputs always give the same output. Routing out of
/// `End` is an error.
pub fn route(state: GraphState, latest: Option<&ModelMessage>) -> Result<GraphState> {
    match state {
        GraphState::Start => Ok(GraphState::Assistant),
        GraphState::Assistant => match latest {
            Some(message) if message.has_tool_calls() => Ok(GraphState::Tools),
            _ => Ok(GraphState::End),
        },
        GraphState::Tools => Ok(GraphState::Assistant),
        GraphState::End => Err(WayfinderError::InvalidState(
            "no transition out of END".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgentToolCall;
    use serde_json::json;

    fn tool_request() -> ModelMessage {
        ModelMessage::assistant_with_tool_calls(
            "",
            vec![AgentToolCall {
                id: "call_1".into(),
                name: "determine_weather".into(),
                arguments: json!({}),
            }],
        )
    }

    #[test]
    fn start_always_goes_to_assistant() {
        assert_eq!(route(GraphState::Start, None).unwrap(), GraphState::Assistant);
        assert_eq!(
            route(GraphState::Start, Some(&tool_request())).unwrap(),
            GraphState::Assistant
        );
    }

    #[test]
    fn assistant_routes_on_tool_calls() {
        assert_eq!(
            route(GraphState::Assistant, Some(&tool_request())).unwrap(),
            GraphState::Tools
        );
        assert_eq!(
            route(GraphState::Assistant, Some(&ModelMessage::assistant("Enjoy!"))).unwrap(),
            GraphState::End
        );
    }

    #[test]
    fn tool_calls_on_a_non_assistant_message_do_not_route_to_tools() {
        let result = ModelMessage::tool_result("call_1", json!("ok"), false);
        assert_eq!(route(GraphState::Assistant, Some(&result)).unwrap(), GraphState::End);
    }

    #[test]
    fn tools_return_to_assistant() {
        let result = ModelMessage::tool_result("call_1", json!("ok"), false);
        assert_eq!(route(GraphState::Tools, Some(&result)).unwrap(), GraphState::Assistant);
    }

    #[test]
    fn end_is_terminal() {
        assert!(GraphState::End.is_terminal());
        assert!(route(GraphState::End, None).is_err());
        assert_eq!(GraphState::Assistant.to_string(), "ASSISTANT");
    }
}
