//! Human-readable transcript lines.

use serde_json::Value;

use crate::types::{ContentPart, ModelMessage};

/// Render one message as `role: content`.
///
/// Tool requests show the tool name, correlation id and arguments; tool
/// results show the tool name when known and flag errors.
pub fn render_message(message: &ModelMessage) -> String {
    let role = match (&message.name, message.role.as_str()) {
        (Some(name), "tool") => format!("tool ({name})"),
        (_, role) => role.to_string(),
    };

    let parts: Vec<String> = message
        .content
        .iter()
        .map(|part| match part {
            ContentPart::Text { text } => text.clone(),
            ContentPart::ToolCall(call) => {
                format!("[call {} ({})] {}", call.name, call.id, call.arguments)
            }
            ContentPart::ToolResult(result) => {
                let body = display_value(&result.result);
                if result.is_error {
                    format!("[error for {}] {body}", result.tool_call_id)
                } else {
                    format!("[result for {}] {body}", result.tool_call_id)
                }
            }
        })
        .collect();

    format!("{role}: {}", parts.join("\n"))
}

// Bare strings print without quotes.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
