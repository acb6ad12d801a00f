//! Configuration system (layered: CLI > env > config file > defaults).
//!
//! There is no process-wide config. An [`AdvisorConfig`] is built once at
//! startup, completed with [`AdvisorConfig::acquire_api_key`], and handed to
//! the graph constructor.

pub mod credentials;

pub use credentials::CredentialPrompt;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, WayfinderError};
use crate::models::GoogleModel;
use crate::types::GenerationSettings;
use crate::util::retry::RetryPolicy;

/// Default thread identifier for the interactive session.
pub const DEFAULT_THREAD_ID: &str = "1";

/// Default cap on node executions per invocation.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Explicitly constructed configuration for the travel assistant.
#[derive(Clone)]
pub struct AdvisorConfig {
    api_key: Option<String>,
    pub model: GoogleModel,
    pub base_url: Option<String>,
    pub thread_id: String,
    pub settings: GenerationSettings,
    pub retry: RetryPolicy,
    pub recursion_limit: usize,
}

impl fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("thread_id", &self.thread_id)
            .field("settings", &self.settings)
            .field("retry", &self.retry)
            .field("recursion_limit", &self.recursion_limit)
            .finish()
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk TOML layer. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub thread_id: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub max_retries: Option<u32>,
    pub recursion_limit: Option<usize>,
}

impl ConfigFile {
    /// Parse a TOML document.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| WayfinderError::Configuration(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            WayfinderError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&text)
    }

    /// `<config dir>/wayfinder/config.toml` for the current platform.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "wayfinder")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

impl AdvisorConfig {
    /// Defaults: `gemini-2.5-flash`, temperature 0, unbounded output, two retries.
    pub fn new() -> Self {
        Self {
            api_key: None,
            model: GoogleModel::default(),
            base_url: None,
            thread_id: DEFAULT_THREAD_ID.to_string(),
            settings: GenerationSettings::deterministic(),
            retry: RetryPolicy::default(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Load from an optional config file, then the environment (`.env` honoured).
    ///
    /// An explicit `path` must exist; the default location is skipped when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();

        match path {
            Some(path) => config.apply_file(ConfigFile::read(path)?)?,
            None => {
                if let Some(default) = ConfigFile::default_path().filter(|p| p.exists()) {
                    tracing::debug!(path = %default.display(), "Loading config file");
                    config.apply_file(ConfigFile::read(&default)?)?;
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from environment variables only.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::new();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from a config file.
    pub fn apply_file(&mut self, file: ConfigFile) -> Result<()> {
        if let Some(model) = file.model {
            self.model = parse_model(&model)?;
        }
        if file.base_url.is_some() {
            self.base_url = file.base_url;
        }
        if let Some(thread_id) = file.thread_id {
            self.set_thread_id(thread_id)?;
        }
        if file.temperature.is_some() {
            self.settings.temperature = file.temperature;
        }
        if file.max_tokens.is_some() {
            self.settings.max_tokens = file.max_tokens;
        }
        if let Some(retries) = file.max_retries {
            self.retry = RetryPolicy::with_max_retries(retries);
        }
        if let Some(limit) = file.recursion_limit {
            self.set_recursion_limit(limit)?;
        }
        Ok(())
    }

    /// Overlay values from environment variables resolved through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = API_KEY_ENV_VARS.iter().find_map(|var| non_empty(*var)) {
            self.api_key = Some(key);
        }
        if let Some(url) = non_empty("GOOGLE_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(model) = non_empty("WAYFINDER_MODEL") {
            self.model = parse_model(&model)?;
        }
        if let Some(thread_id) = non_empty("WAYFINDER_THREAD_ID") {
            self.set_thread_id(thread_id)?;
        }
        if let Some(retries) = non_empty("WAYFINDER_MAX_RETRIES") {
            let retries = retries.trim().parse::<u32>().map_err(|e| {
                WayfinderError::Configuration(format!("WAYFINDER_MAX_RETRIES: {e}"))
            })?;
            self.retry = RetryPolicy::with_max_retries(retries);
        }
        Ok(())
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = Some(key.into());
    }

    /// The API key, or a credential error when none has been acquired.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            WayfinderError::Authentication(format!(
                "Missing API key: set {} or enter it when prompted",
                API_KEY_ENV_VARS[0]
            ))
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ensure an API key is present, prompting for it when the environment had none.
    ///
    /// The prompted key is kept on this config for the rest of the process.
    pub fn acquire_api_key(&mut self, prompt: &dyn CredentialPrompt) -> Result<()> {
        if self.api_key.is_some() {
            return Ok(());
        }
        let entered = prompt.prompt_secret("Enter your Google AI API key")?;
        let entered = entered.trim();
        if entered.is_empty() {
            return Err(WayfinderError::Authentication(
                "An API key is required to start".into(),
            ));
        }
        self.api_key = Some(entered.to_string());
        Ok(())
    }

    pub fn set_thread_id(&mut self, thread_id: impl Into<String>) -> Result<()> {
        let thread_id = thread_id.into();
        if thread_id.trim().is_empty() {
            return Err(WayfinderError::Configuration("thread id must not be empty".into()));
        }
        self.thread_id = thread_id;
        Ok(())
    }

    pub fn set_recursion_limit(&mut self, limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(WayfinderError::Configuration(
                "recursion limit must be at least 1".into(),
            ));
        }
        self.recursion_limit = limit;
        Ok(())
    }
}

pub(crate) fn parse_model(raw: &str) -> Result<GoogleModel> {
    raw.trim()
        .parse::<GoogleModel>()
        .map_err(|e| WayfinderError::Configuration(format!("invalid model '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_hosted_endpoint_contract() {
        let config = AdvisorConfig::new();
        assert_eq!(config.model, GoogleModel::Gemini25Flash);
        assert_eq!(config.settings.temperature, Some(0.0));
        assert_eq!(config.settings.max_tokens, None);
        assert_eq!(config.retry.max_retries(), 2);
        assert_eq!(config.thread_id, "1");
        assert_eq!(config.recursion_limit, 25);
        assert!(!config.has_api_key());
    }

    #[test]
    fn google_key_wins_over_gemini_key() {
        let mut config = AdvisorConfig::new();
        config
            .apply_env(env(&[("GOOGLE_API_KEY", "g-key"), ("GEMINI_API_KEY", "other")]))
            .unwrap();
        assert_eq!(config.api_key().unwrap(), "g-key");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = AdvisorConfig::new();
        config
            .apply_env(env(&[("GOOGLE_API_KEY", "  "), ("WAYFINDER_THREAD_ID", "")]))
            .unwrap();
        assert!(!config.has_api_key());
        assert_eq!(config.thread_id, "1");
    }

    #[test]
    fn env_overrides_thread_model_and_retries() {
        let mut config = AdvisorConfig::new();
        config
            .apply_env(env(&[
                ("WAYFINDER_THREAD_ID", "trip-42"),
                ("WAYFINDER_MODEL", "gemini-2.5-pro"),
                ("WAYFINDER_MAX_RETRIES", "5"),
                ("GOOGLE_BASE_URL", "http://localhost:9999"),
            ]))
            .unwrap();
        assert_eq!(config.thread_id, "trip-42");
        assert_eq!(config.model, GoogleModel::Gemini25Pro);
        assert_eq!(config.retry.max_attempts, 6);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9999"));
    }

    #[test]
    fn invalid_retry_count_is_a_configuration_error() {
        let mut config = AdvisorConfig::new();
        let err = config
            .apply_env(env(&[("WAYFINDER_MAX_RETRIES", "lots")]))
            .unwrap_err();
        assert!(matches!(err, WayfinderError::Configuration(_)));
    }

    #[test]
    fn missing_key_is_an_authentication_error() {
        let config = AdvisorConfig::new();
        assert!(matches!(config.api_key(), Err(WayfinderError::Authentication(_))));
    }

    #[test]
    fn acquire_uses_prompt_only_when_key_absent() {
        let mut config = AdvisorConfig::new();
        config.set_api_key("from-env");
        let prompt = |_: &str| -> Result<String> { panic!("prompt must not run") };
        config.acquire_api_key(&prompt).unwrap();
        assert_eq!(config.api_key().unwrap(), "from-env");

        let mut config = AdvisorConfig::new();
        let prompt = |_: &str| -> Result<String> { Ok("  typed-key\n".to_string()) };
        config.acquire_api_key(&prompt).unwrap();
        assert_eq!(config.api_key().unwrap(), "typed-key");
    }

    #[test]
    fn empty_prompted_key_refuses_to_start() {
        let mut config = AdvisorConfig::new();
        let prompt = |_: &str| -> Result<String> { Ok(String::new()) };
        let err = config.acquire_api_key(&prompt).unwrap_err();
        assert!(matches!(err, WayfinderError::Authentication(_)));
        assert!(!config.has_api_key());
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let mut config = AdvisorConfig::new();
        config.set_api_key("super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn file_layer_applies_every_field() {
        let file = ConfigFile::parse(
            r#"
            model = "gemini-2.0-flash"
            thread_id = "paris"
            temperature = 0.3
            max_tokens = 512
            max_retries = 0
            recursion_limit = 8
            "#,
        )
        .unwrap();
        let mut config = AdvisorConfig::new();
        config.apply_file(file).unwrap();

        assert_eq!(config.model, GoogleModel::Gemini20Flash);
        assert_eq!(config.thread_id, "paris");
        assert_eq!(config.settings.temperature, Some(0.3));
        assert_eq!(config.settings.max_tokens, Some(512));
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.recursion_limit, 8);
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let err = ConfigFile::parse("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, WayfinderError::Configuration(_)));
    }

    #[test]
    fn zero_recursion_limit_is_rejected() {
        let file = ConfigFile::parse("recursion_limit = 0").unwrap();
        let mut config = AdvisorConfig::new();
        assert!(config.apply_file(file).is_err());
    }
}
