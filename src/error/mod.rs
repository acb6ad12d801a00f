//! Error types for Wayfinder.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all Wayfinder operations.
#[derive(Error, Debug)]
pub enum WayfinderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Structured output did not match {type_name}: {message}")]
    StructuredOutput { type_name: String, message: String },

    #[error("Tool dispatch error in {tool_name}: {message}")]
    ToolDispatch { tool_name: String, message: String },

    #[error("Recursion limit of {0} node executions reached without reaching END")]
    RecursionLimit(usize),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl WayfinderError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a structured-output error for the named type.
    pub fn structured_output(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StructuredOutput {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a dispatch error for the named tool.
    pub fn tool_dispatch(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolDispatch {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                408 => ErrorCategory::Timeout,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::StructuredOutput { .. } => ErrorCategory::StructuredOutput,
            Self::ToolDispatch { .. } => ErrorCategory::ToolDispatch,
            Self::RecursionLimit(_) | Self::InvalidState(_) => ErrorCategory::Graph,
            Self::Io(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether this error is a transient service failure worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
            ErrorCategory::RateLimit
            | ErrorCategory::Network
            | ErrorCategory::Server => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::StructuredOutput
            | ErrorCategory::ToolDispatch
            | ErrorCategory::Graph => RecoverySuggestion::RephraseRequest,
            _ => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, WayfinderError>;
