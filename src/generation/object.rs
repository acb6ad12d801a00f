//! Structured output: generate typed objects from model responses.
//!
//! The reply is parsed as JSON, validated against the declared schema, and
//! only then deserialized. Any mismatch is a
//! [`WayfinderError::StructuredOutput`]; nothing is defaulted.

use serde::de::DeserializeOwned;

use crate::error::WayfinderError;
use crate::provider::ModelProvider;
use crate::tools::validation::validate_against_schema;
use crate::types::*;
use crate::util::retry::RetryPolicy;

/// Generate a typed object by asking the model to produce JSON.
///
/// Uses JSON Schema response format if the model supports it,
/// otherwise uses system prompt instructions.
pub async fn generate_object<T: DeserializeOwned>(
    provider: &dyn ModelProvider,
    mut messages: Vec<ModelMessage>,
    mut settings: GenerationSettings,
    schema: &serde_json::Value,
    type_name: &str,
    retry: &RetryPolicy,
) -> Result<GenerateObjectResult<T>, WayfinderError> {
    let capabilities = provider.capabilities();

    if capabilities.supports_json_schema {
        settings.response_format = Some(ResponseFormat::JsonSchema {
            schema: schema.clone(),
            name: type_name.to_string(),
        });
    } else {
        if capabilities.supports_json_mode {
            settings.response_format = Some(ResponseFormat::JsonObject);
        }
        let schema_instruction = format!(
            "You must respond with ONLY valid JSON (no markdown, no explanation) matching this schema:\n```json\n{}\n```",
            serde_json::to_string_pretty(schema)?
        );
        messages.insert(0, ModelMessage::system(schema_instruction));
    }

    let result = super::text::generate_text(provider, messages, settings, &[], retry).await?;

    let raw_text = result.text.trim().to_string();
    let object = parse_structured::<T>(&raw_text, schema, type_name)?;

    Ok(GenerateObjectResult {
        object,
        raw_text,
        usage: result.usage,
        finish_reason: result.finish_reason,
    })
}

/// Parse, validate and deserialize a structured reply.
pub fn parse_structured<T: DeserializeOwned>(
    raw_text: &str,
    schema: &serde_json::Value,
    type_name: &str,
) -> Result<T, WayfinderError> {
    let json_text = strip_code_fences(raw_text);
    if json_text.is_empty() {
        return Err(WayfinderError::structured_output(type_name, "empty reply"));
    }

    let value: serde_json::Value = serde_json::from_str(&json_text)
        .map_err(|e| WayfinderError::structured_output(type_name, format!("invalid JSON: {e}")))?;

    validate_against_schema(&value, schema)
        .map_err(|violation| WayfinderError::structured_output(type_name, violation.to_string()))?;

    serde_json::from_value(value)
        .map_err(|e| WayfinderError::structured_output(type_name, e.to_string()))
}

/// Strip markdown code fences from JSON response.
fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        let without_opening = if let Some(rest) = trimmed.strip_prefix("```json") {
            rest
        } else if let Some(rest) = trimmed.strip_prefix("```") {
            rest
        } else {
            trimmed
        };
        if let Some(stripped) = without_opening.trim_end().strip_suffix("```") {
            return stripped.trim().to_string();
        }
        return without_opening.trim().to_string();
    }
    trimmed.to_string()
}
