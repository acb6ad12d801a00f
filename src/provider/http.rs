//! Shared HTTP client and status mapping.

use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{Result, WayfinderError};

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// No request timeout is set here; the endpoint's own limits govern.
pub fn shared_client() -> Result<&'static reqwest::Client> {
    if let Some(client) = SHARED_CLIENT.get() {
        return Ok(client);
    }
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .build()?;
    Ok(SHARED_CLIENT.get_or_init(|| client))
}

/// Map a non-success HTTP status and body to an error.
pub fn status_to_error(status: u16, body: &str) -> WayfinderError {
    let message = extract_error_message(body).unwrap_or_else(|| body.to_string());
    match status {
        401 | 403 => WayfinderError::Authentication(message),
        400 if is_credential_rejection(body) => WayfinderError::Authentication(message),
        429 => WayfinderError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => WayfinderError::api(status, message),
    }
}

/// Gemini rejects a bad key with 400 `INVALID_ARGUMENT` and an
/// `API_KEY_INVALID` reason rather than 401.
fn is_credential_rejection(body: &str) -> bool {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return false;
    };
    let Some(error) = value.get("error") else {
        return false;
    };
    if error.get("status").and_then(|s| s.as_str()) == Some("UNAUTHENTICATED") {
        return true;
    }
    error
        .get("details")
        .and_then(|d| d.as_array())
        .is_some_and(|details| {
            details
                .iter()
                .any(|d| d.get("reason").and_then(|r| r.as_str()) == Some("API_KEY_INVALID"))
        })
}

/// Google error bodies look like `{"error": {"code": 400, "message": "..."}}`.
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// Read a `RetryInfo` detail (`"retryDelay": "12s"`) from a Google error body.
fn extract_retry_after(body: &str) -> Option<u64> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    value
        .get("error")?
        .get("details")?
        .as_array()?
        .iter()
        .find_map(|detail| detail.get("retryDelay").and_then(|d| d.as_str()))
        .and_then(|delay| delay.strip_suffix('s'))
        .and_then(|secs| secs.parse::<f64>().ok())
        .map(|secs| (secs * 1000.0) as u64)
}
