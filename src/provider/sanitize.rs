//! Transcript sanitation before a request leaves the process.

use std::collections::{HashMap, HashSet};

use crate::types::{ContentPart, ModelMessage, Role};

/// Reorder and complete tool results so each assistant tool request is
/// immediately followed by exactly one result per call id.
///
/// Results with no preceding request, or duplicates, are dropped. Requests
/// with no result get a synthetic error result.
pub fn sanitize_tool_pairing(messages: &[ModelMessage]) -> Vec<ModelMessage> {
    let mut out: Vec<ModelMessage> = Vec::with_capacity(messages.len());
    let mut seen_results: HashSet<String> = HashSet::new();

    let mut i = 0usize;
    while i < messages.len() {
        let msg = &messages[i];
        if msg.role == Role::Tool {
            // Orphan: its request was not the preceding assistant turn.
            i += 1;
            continue;
        }
        if !msg.has_tool_calls() {
            out.push(msg.clone());
            i += 1;
            continue;
        }

        let call_ids: HashSet<String> = msg.tool_calls().iter().map(|tc| tc.id.clone()).collect();
        let mut span_results: HashMap<String, ModelMessage> = HashMap::new();

        let mut j = i + 1;
        while j < messages.len() && messages[j].role == Role::Tool {
            if let Some(id) = tool_result_id(&messages[j]) {
                if call_ids.contains(id) && seen_results.insert(id.to_string()) {
                    span_results.insert(id.to_string(), messages[j].clone());
                }
            }
            j += 1;
        }

        out.push(msg.clone());
        for call in msg.tool_calls() {
            match span_results.remove(&call.id) {
                Some(result) => out.push(result),
                None => out.push(ModelMessage::tool_result(
                    call.id.clone(),
                    serde_json::json!({
                        "error": "tool did not complete; no result was recorded",
                    }),
                    true,
                )),
            }
        }
        i = j;
    }

    out
}

/// Map each tool call id to the function name that was requested.
pub fn tool_names_by_call_id(messages: &[ModelMessage]) -> HashMap<String, String> {
    messages
        .iter()
        .flat_map(|m| m.tool_calls())
        .map(|tc| (tc.id.clone(), tc.name.clone()))
        .collect()
}

fn tool_result_id(message: &ModelMessage) -> Option<&str> {
    message.content.iter().find_map(|part| match part {
        ContentPart::ToolResult(result) => Some(result.tool_call_id.as_str()),
        _ => None,
    })
}
