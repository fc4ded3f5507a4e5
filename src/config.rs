//! Configuration types.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::ConfigError;

/// Default chat-completions endpoint.
pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model for classification and general answers.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Default conversation log capacity.
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Business context used in canned text when the caller supplies none.
pub const DEFAULT_BUSINESS_CONTEXT: &str = "your business";

/// Credential values shipped in sample env files. Any of these means "not configured".
static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(your[_\-].*|.*placeholder.*|changeme|x{3,}|<.*>)$")
        .expect("placeholder pattern is valid")
});

/// Whether a credential value is empty or a known placeholder sentinel.
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || PLACEHOLDER_PATTERN.is_match(trimmed)
}

/// External services the router holds credentials for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Service {
    /// Text-generation service used for classification and general answers.
    OpenAi,
    Twilio,
    Google,
    LinkedIn,
}

impl Service {
    pub const ALL: [Service; 4] = [Self::OpenAi, Self::Twilio, Self::Google, Self::LinkedIn];

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Twilio => "twilio",
            Self::Google => "google",
            Self::LinkedIn => "linkedin",
        }
    }

    /// Environment variable (and env-file key) holding the credential.
    pub fn env_key(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Twilio => "TWILIO_AUTH_TOKEN",
            Self::Google => "GOOGLE_CLIENT_SECRET",
            Self::LinkedIn => "LINKEDIN_ACCESS_TOKEN",
        }
    }

    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        let lowered = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.name() == lowered)
            .ok_or(ConfigError::UnknownService(lowered))
    }
}

/// Router configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP surface binds to.
    pub bind_addr: SocketAddr,
    /// Chat-completions endpoint.
    pub llm_endpoint: String,
    pub llm_model: String,
    /// Upper bound on any single call to the text-generation service.
    pub llm_timeout: Duration,
    /// Maximum number of conversation records kept in memory.
    pub log_capacity: usize,
    /// Env file credentials are loaded from and persisted to.
    pub env_file: PathBuf,
    /// Directory for rolling log files. Console only when unset.
    pub log_dir: Option<PathBuf>,
    /// Business context applied when a request carries none.
    pub business_context: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            llm_endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_timeout: Duration::from_secs(15),
            log_capacity: DEFAULT_LOG_CAPACITY,
            env_file: PathBuf::from(".env"),
            log_dir: None,
            business_context: None,
        }
    }
}

impl AppConfig {
    /// Build from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = match get("ROUTER_BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                key: "ROUTER_BIND_ADDR".into(),
                message: format!("{e}"),
            })?,
            None => defaults.bind_addr,
        };

        let llm_timeout = match get("ROUTER_LLM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|e| ConfigError::InvalidValue {
                    key: "ROUTER_LLM_TIMEOUT_SECS".into(),
                    message: format!("{e}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "ROUTER_LLM_TIMEOUT_SECS".into(),
                        message: "must be at least 1 second".into(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.llm_timeout,
        };

        let log_capacity = match get("ROUTER_LOG_CAPACITY") {
            Some(raw) => {
                let capacity: usize = raw.parse().map_err(|e| ConfigError::InvalidValue {
                    key: "ROUTER_LOG_CAPACITY".into(),
                    message: format!("{e}"),
                })?;
                if capacity == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "ROUTER_LOG_CAPACITY".into(),
                        message: "must be greater than zero".into(),
                    });
                }
                capacity
            }
            None => defaults.log_capacity,
        };

        Ok(Self {
            bind_addr,
            llm_endpoint: get("ROUTER_LLM_ENDPOINT").unwrap_or(defaults.llm_endpoint),
            llm_model: get("ROUTER_LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_timeout,
            log_capacity,
            env_file: get("ROUTER_ENV_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.env_file),
            log_dir: get("ROUTER_LOG_DIR").map(PathBuf::from),
            business_context: get("ROUTER_BUSINESS_CONTEXT"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.llm_endpoint, DEFAULT_LLM_ENDPOINT);
        assert_eq!(config.log_capacity, 1000);
        assert_eq!(config.llm_timeout, Duration::from_secs(15));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ROUTER_BIND_ADDR", "127.0.0.1:8088"),
            ("ROUTER_LLM_MODEL", "gpt-test"),
            ("ROUTER_LLM_TIMEOUT_SECS", "3"),
            ("ROUTER_LOG_CAPACITY", "10"),
            ("ROUTER_BUSINESS_CONTEXT", "Acme Digital"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8088);
        assert_eq!(config.llm_model, "gpt-test");
        assert_eq!(config.llm_timeout, Duration::from_secs(3));
        assert_eq!(config.log_capacity, 10);
        assert_eq!(config.business_context.as_deref(), Some("Acme Digital"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("ROUTER_LLM_MODEL", "   ")])).unwrap();
        assert_eq!(config.llm_model, DEFAULT_LLM_MODEL);
    }

    #[test]
    fn rejects_invalid_numbers() {
        let err = AppConfig::from_lookup(lookup(&[("ROUTER_LOG_CAPACITY", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "ROUTER_LOG_CAPACITY"));

        let err = AppConfig::from_lookup(lookup(&[("ROUTER_LOG_CAPACITY", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = AppConfig::from_lookup(lookup(&[("ROUTER_LLM_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn placeholder_detection() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("   "));
        assert!(is_placeholder("your_openai_api_key_here"));
        assert!(is_placeholder("YOUR-API-KEY"));
        assert!(is_placeholder("sk-placeholder"));
        assert!(is_placeholder("changeme"));
        assert!(is_placeholder("xxxxxxxx"));
        assert!(is_placeholder("<insert key>"));
        assert!(!is_placeholder("sk-live-3f9a8b7c"));
    }

    #[test]
    fn service_parse() {
        assert_eq!(Service::parse("OpenAI").unwrap(), Service::OpenAi);
        assert_eq!(Service::parse("linkedin").unwrap(), Service::LinkedIn);
        assert!(matches!(
            Service::parse("myspace"),
            Err(ConfigError::UnknownService(_))
        ));
    }
}
