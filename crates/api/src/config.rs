use std::env;
use std::str::FromStr;

use social_lens_llm::LlmConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Minimum database connections in the pool.
    pub db_min_connections: u32,
    /// Shared string required on upload requests.
    pub upload_password: String,
    /// Key for the language-model API. Chat is disabled without one.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub llm_timeout_secs: u64,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", 3000)?,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 20)?,
            db_min_connections: parse_var("DB_MIN_CONNECTIONS", 5)?,
            upload_password: var_or("UPLOAD_PASSWORD", "admin123"),
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            openai_base_url: var_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_model: var_or("OPENAI_MODEL", "gpt-4"),
            llm_timeout_secs: parse_var("LLM_TIMEOUT_SECS", 60)?,
            event_bus_capacity: parse_var("EVENT_BUS_CAPACITY", 1024)?,
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            log_level: var_or("LOG_LEVEL", "info"),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Language-model settings, if an API key is configured.
    pub fn llm(&self) -> Option<LlmConfig> {
        let key = self.openai_api_key.as_ref()?;
        let mut llm = LlmConfig::new(key.clone());
        llm.base_url = self.openai_base_url.clone();
        llm.model = self.openai_model.clone();
        llm.timeout_secs = self.llm_timeout_secs;
        Some(llm)
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl AppConfig {
    /// Configuration for router tests; never read from the environment.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: "postgres://localhost/social_lens_test".into(),
            db_max_connections: 1,
            db_min_connections: 0,
            upload_password: "letmein".into(),
            openai_api_key: None,
            openai_base_url: "http://127.0.0.1:9".into(),
            openai_model: "gpt-4".into(),
            llm_timeout_secs: 1,
            event_bus_capacity: 16,
            max_upload_bytes: 1024 * 1024,
            log_level: "debug".into(),
        }
    }
}
