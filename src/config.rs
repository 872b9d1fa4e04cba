//! Relay configuration, loaded from environment variables at startup.

use std::time::Duration;

use thiserror::Error;

use crate::domain::models::{DEFAULT_MODEL, MAX_UPLOAD_SIZE};
use crate::infrastructure::provider::PollPolicy;
use crate::infrastructure::provider::gemini::DEFAULT_BASE_URL;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY must be set")]
    MissingApiKey,
}

/// Runtime configuration for the relay.
///
/// Only the API key is mandatory; everything else has a default.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Credential for the Gemini API (`GEMINI_API_KEY`)
    pub api_key: String,

    /// TCP port to listen on (`PORT`, default 3000)
    pub port: u16,

    /// Generation model (`GEMINI_MODEL`)
    pub model: String,

    /// Provider endpoint, overridable for proxies (`GEMINI_BASE_URL`)
    pub base_url: String,

    /// Delay between file status checks (`UPLOAD_POLL_INTERVAL_MS`)
    pub poll_interval_ms: u64,

    /// Status checks before an upload is declared stuck (`UPLOAD_POLL_MAX_ATTEMPTS`)
    pub poll_max_attempts: u32,

    /// Largest accepted attachment in bytes (`MAX_UPLOAD_BYTES`)
    pub max_upload_bytes: usize,

    /// Directory of static assets served by the standalone binary (`STATIC_DIR`)
    pub static_dir: String,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            port: parse_or(&lookup, "PORT", 3000),
            model: env_or(&lookup, "GEMINI_MODEL", DEFAULT_MODEL),
            base_url: env_or(&lookup, "GEMINI_BASE_URL", DEFAULT_BASE_URL),
            poll_interval_ms: parse_or(&lookup, "UPLOAD_POLL_INTERVAL_MS", 2000),
            poll_max_attempts: parse_or(&lookup, "UPLOAD_POLL_MAX_ATTEMPTS", 30),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", MAX_UPLOAD_SIZE),
            static_dir: env_or(&lookup, "STATIC_DIR", "public"),
        })
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.poll_max_attempts,
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn parse_or<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_api_key_is_required() {
        let result = RelayConfig::from_lookup(lookup(&[("PORT", "8080")]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingApiKey);

        let blank = RelayConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")]));
        assert!(blank.is_err());
    }

    #[test]
    fn test_defaults() {
        let config = RelayConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_upload_bytes, MAX_UPLOAD_SIZE);
        assert_eq!(config.static_dir, "public");
        assert_eq!(config.poll_policy(), PollPolicy::default());
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("PORT", "not-a-port"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("UPLOAD_POLL_INTERVAL_MS", "50"),
            ("UPLOAD_POLL_MAX_ATTEMPTS", "4"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.poll_policy().interval, Duration::from_millis(50));
        assert_eq!(config.poll_policy().max_attempts, 4);
    }
}
