//! Google Gemini API provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::WayfinderError;
use crate::models::{GoogleModel, ModelCapabilities};
use crate::types::*;

use super::http::{shared_client, status_to_error};
use super::sanitize::{sanitize_tool_pairing, tool_names_by_call_id};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

/// Default Gemini REST endpoint.
pub const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleProvider {
    model: GoogleModel,
    api_key: String,
    base_url: String,
    capabilities: ModelCapabilities,
}

impl GoogleProvider {
    pub fn new(model: GoogleModel, api_key: String, base_url: Option<String>) -> Self {
        let capabilities = model.capabilities();
        let base_url = base_url
            .unwrap_or_else(|| BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            model,
            api_key,
            base_url,
            capabilities,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model.as_str())
    }

    /// Build the `generateContent` request body.
    pub fn build_request_body(&self, request: &ProviderRequest) -> Value {
        let messages = sanitize_tool_pairing(&request.messages);
        let names = tool_names_by_call_id(&messages);

        let mut system_parts: Vec<String> = Vec::new();
        let mut contents = Vec::new();

        for msg in &messages {
            match msg.role {
                Role::System => system_parts.push(msg.text()),
                Role::User => {
                    contents.push(json!({
                        "role": "user",
                        "parts": [{"text": msg.text()}],
                    }));
                }
                Role::Assistant => {
                    let mut parts = Vec::new();
                    let text = msg.text();
                    if !text.is_empty() {
                        parts.push(json!({"text": text}));
                    }
                    for call in msg.tool_calls() {
                        parts.push(json!({
                            "functionCall": {
                                "name": call.name,
                                "args": call.arguments,
                            }
                        }));
                    }
                    if !parts.is_empty() {
                        contents.push(json!({"role": "model", "parts": parts}));
                    }
                }
                Role::Tool => {
                    for result in msg.tool_results() {
                        let name = names
                            .get(&result.tool_call_id)
                            .cloned()
                            .or_else(|| msg.name.clone())
                            .unwrap_or_else(|| result.tool_call_id.clone());
                        contents.push(json!({
                            "role": "user",
                            "parts": [{
                                "functionResponse": {
                                    "name": name,
                                    "response": function_response_payload(result),
                                }
                            }]
                        }));
                    }
                }
            }
        }

        let mut body = Map::new();
        body.insert("contents".into(), Value::Array(contents));

        if !system_parts.is_empty() {
            body.insert(
                "systemInstruction".into(),
                json!({"parts": [{"text": system_parts.join("\n\n")}]}),
            );
        }

        let settings = &request.settings;
        let mut gen_config = Map::new();
        if let Some(max) = settings.max_tokens {
            gen_config.insert("maxOutputTokens".into(), max.into());
        }
        if let Some(temp) = settings.temperature {
            gen_config.insert("temperature".into(), temp.into());
        }
        match &settings.response_format {
            Some(ResponseFormat::JsonSchema { schema, .. }) => {
                gen_config.insert("responseMimeType".into(), "application/json".into());
                gen_config.insert("responseSchema".into(), to_gemini_schema(schema));
            }
            Some(ResponseFormat::JsonObject) => {
                gen_config.insert("responseMimeType".into(), "application/json".into());
            }
            None => {}
        }
        if !gen_config.is_empty() {
            body.insert("generationConfig".into(), Value::Object(gen_config));
        }

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let fn_decls: Vec<Value> = tools
                    .iter()
                    .map(|t| {
                        json!({
                            "name": t.name,
                            "description": t.description,
                            "parameters": to_gemini_schema(&t.parameters),
                        })
                    })
                    .collect();
                body.insert("tools".into(), json!([{"functionDeclarations": fn_decls}]));
            }
        }

        Value::Object(body)
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, WayfinderError> {
        let body = self.build_request_body(request);

        debug!(
            model = self.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "Google generate_text"
        );

        let resp = shared_client()?
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: GeminiResponse = resp.json().await?;
        parse_response(data)
    }
}

fn parse_response(data: GeminiResponse) -> Result<ProviderResponse, WayfinderError> {
    let candidate = match data.candidates.into_iter().next() {
        Some(c) => c,
        None => {
            let reason = data
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(WayfinderError::api(200, format!("Gemini returned no reply: {reason}")));
        }
    };

    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if part.thought.unwrap_or(false) {
            continue;
        }
        if let Some(t) = part.text {
            text.push_str(&t);
        }
        if let Some(fc) = part.function_call {
            tool_calls.push(AgentToolCall {
                id: fc
                    .id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                name: fc.name,
                arguments: fc.args.unwrap_or_else(|| Value::Object(Map::new())),
            });
        }
    }

    let finish_reason = match candidate.finish_reason.as_deref() {
        Some("STOP") if !tool_calls.is_empty() => Some(FinishReason::ToolCalls),
        Some("STOP") => Some(FinishReason::Stop),
        Some("MAX_TOKENS") => Some(FinishReason::Length),
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII") => {
            Some(FinishReason::ContentFilter)
        }
        Some("MALFORMED_FUNCTION_CALL") => Some(FinishReason::Error),
        _ if !tool_calls.is_empty() => Some(FinishReason::ToolCalls),
        _ => None,
    };

    let usage = data
        .usage_metadata
        .map(|u| Usage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        })
        .unwrap_or_default();

    Ok(ProviderResponse {
        text,
        usage,
        tool_calls,
        finish_reason,
    })
}

/// `functionResponse.response` must be a JSON object.
fn function_response_payload(result: &AgentToolResult) -> Value {
    match (&result.result, result.is_error) {
        (Value::Object(_), _) => result.result.clone(),
        (other, true) => json!({"error": other}),
        (other, false) => json!({"result": other}),
    }
}

/// Convert a JSON Schema fragment to Gemini's OpenAPI subset (upper-case types).
pub fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(obj) => {
            let mut out = Map::new();
            for (key, value) in obj {
                match (key.as_str(), value) {
                    ("type", Value::String(t)) => {
                        out.insert(key.clone(), Value::String(t.to_uppercase()));
                    }
                    ("additionalProperties" | "$schema" | "title", _) => {}
                    ("properties", Value::Object(props)) => {
                        let converted = props
                            .iter()
                            .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                            .collect();
                        out.insert(key.clone(), Value::Object(converted));
                    }
                    ("items", item) => {
                        out.insert(key.clone(), to_gemini_schema(item));
                    }
                    _ => {
                        out.insert(key.clone(), value.clone());
                    }
                }
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

// Internal Gemini response types

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    thought: Option<bool>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    id: Option<String>,
    name: String,
    args: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}
