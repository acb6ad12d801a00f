//! Tests for configuration loading across the file and environment layers.

use std::io::Write;
use std::sync::{Mutex, OnceLock};

use wayfinder::config::{AdvisorConfig, ConfigFile};
use wayfinder::error::WayfinderError;
use wayfinder::models::GoogleModel;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 6] = [
    "GOOGLE_API_KEY",
    "GEMINI_API_KEY",
    "GOOGLE_BASE_URL",
    "WAYFINDER_MODEL",
    "WAYFINDER_THREAD_ID",
    "WAYFINDER_MAX_RETRIES",
];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn clean_env() -> (std::sync::MutexGuard<'static, ()>, EnvGuard) {
    let lock = env_lock_guard();
    let guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
    (lock, guard)
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn load_reads_explicit_file() {
    let _env = clean_env();
    let file = write_config(
        r#"
model = "gemini-2.5-pro"
thread_id = "vacation"
temperature = 0.2
max_tokens = 512
max_retries = 5
recursion_limit = 12
"#,
    );

    let config = AdvisorConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.model, GoogleModel::Gemini25Pro);
    assert_eq!(config.thread_id, "vacation");
    assert_eq!(config.settings.temperature, Some(0.2));
    assert_eq!(config.settings.max_tokens, Some(512));
    assert_eq!(config.retry.max_retries(), 5);
    assert_eq!(config.recursion_limit, 12);
    assert!(!config.has_api_key());
}

#[test]
fn environment_overrides_file() {
    let _env = clean_env();
    let file = write_config("thread_id = \"from-file\"\nmax_retries = 5\n");
    std::env::set_var("WAYFINDER_THREAD_ID", "from-env");
    std::env::set_var("GEMINI_API_KEY", "gemini-key");

    let config = AdvisorConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.thread_id, "from-env");
    assert_eq!(config.retry.max_retries(), 5);
    assert_eq!(config.api_key().unwrap(), "gemini-key");
}

#[test]
fn missing_explicit_file_is_configuration_error() {
    let _env = clean_env();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = AdvisorConfig::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, WayfinderError::Configuration(_)));
}

#[test]
fn malformed_file_is_configuration_error() {
    let _env = clean_env();
    let file = write_config("max_retries = \"lots\"\n");

    let err = AdvisorConfig::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, WayfinderError::Configuration(_)));
}

#[test]
fn from_env_without_key_defers_the_credential_error() {
    let _env = clean_env();

    let config = AdvisorConfig::from_env().unwrap();

    assert!(!config.has_api_key());
    assert!(matches!(config.api_key(), Err(WayfinderError::Authentication(_))));
    assert!(matches!(
        wayfinder::generation::ChatModel::from_config(&config),
        Err(WayfinderError::Authentication(_))
    ));
}

#[test]
fn config_file_parse_accepts_empty_document() {
    assert_eq!(ConfigFile::parse("").unwrap(), ConfigFile::default());
}
