//! Validate JSON values against the JSON Schema subset used by tool
//! declarations and structured replies.
//!
//! Supported keywords: `type`, `required`, `properties` (recursively),
//! `items`, and `enum`. Unknown keywords are ignored.

use serde_json::Value;
use thiserror::Error;

/// First violation found while validating a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("{path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: &'static str,
    },

    #[error("{path}: missing required field '{field}'")]
    MissingField { path: String, field: String },

    #[error("{path}: value {value} is not one of {allowed}")]
    NotInEnum {
        path: String,
        value: String,
        allowed: String,
    },
}

/// Validate `value` against `schema`, returning the first violation.
pub fn validate_against_schema(value: &Value, schema: &Value) -> Result<(), SchemaViolation> {
    validate_at("$", value, schema)
}

fn validate_at(path: &str, value: &Value, schema: &Value) -> Result<(), SchemaViolation> {
    if let Some(expected) = schema.get("type").and_then(|v| v.as_str()) {
        if !value_matches_type(value, expected) {
            return Err(SchemaViolation::TypeMismatch {
                path: path.to_string(),
                expected: expected.to_string(),
                actual: json_type_name(value),
            });
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(|v| v.as_array()) {
        if !allowed.contains(value) {
            return Err(SchemaViolation::NotInEnum {
                path: path.to_string(),
                value: value.to_string(),
                allowed: Value::Array(allowed.clone()).to_string(),
            });
        }
    }

    if let Some(obj) = value.as_object() {
        if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
            for name in required.iter().filter_map(|f| f.as_str()) {
                if !obj.contains_key(name) {
                    return Err(SchemaViolation::MissingField {
                        path: path.to_string(),
                        field: name.to_string(),
                    });
                }
            }
        }

        if let Some(properties) = schema.get("properties").and_then(|v| v.as_object()) {
            for (key, child) in obj {
                if let Some(prop_schema) = properties.get(key) {
                    validate_at(&format!("{path}.{key}"), child, prop_schema)?;
                }
            }
        }
    }

    if let (Some(items), Some(elements)) = (schema.get("items"), value.as_array()) {
        for (idx, element) in elements.iter().enumerate() {
            validate_at(&format!("{path}[{idx}]"), element, items)?;
        }
    }

    Ok(())
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected.to_ascii_lowercase().as_str() {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
