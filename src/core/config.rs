use std::env;
use std::time::Duration;

use url::Url;

use crate::errors::RelayError;

pub const API_BASE_URL_VAR: &str = "LLM_API_BASE_URL";
pub const API_KEY_VAR: &str = "LLM_API_KEY";
pub const TIMEOUT_SECS_VAR: &str = "LLM_TIMEOUT_SECS";

/// Upper bound on a single upstream completion call when no override is set.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
}

impl RelayConfig {
    /// Reads the relay configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Configuration`] when a required variable is
    /// missing or empty, or when a value cannot be parsed.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, so callers can
    /// supply values without touching the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`RelayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| RelayError::Configuration(format!("{key} is not set")))
        };

        let api_base_url = required(API_BASE_URL_VAR)?;
        Url::parse(&api_base_url).map_err(|e| {
            RelayError::Configuration(format!("{API_BASE_URL_VAR} is not a valid URL: {e}"))
        })?;

        let api_key = required(API_KEY_VAR)?;

        let request_timeout = match lookup(TIMEOUT_SECS_VAR).filter(|v| !v.trim().is_empty()) {
            None => DEFAULT_REQUEST_TIMEOUT,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(RelayError::Configuration(format!(
                        "{TIMEOUT_SECS_VAR} must be a positive number of seconds, got {raw:?}"
                    )));
                }
            },
        };

        Ok(Self {
            api_base_url,
            api_key,
            request_timeout,
        })
    }

    /// The chat completions endpoint under the configured base URL.
    #[must_use]
    pub fn completions_endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn loads_required_values_with_default_timeout() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            (API_BASE_URL_VAR, "https://llm.example.com/v1/"),
            (API_KEY_VAR, "sk-test"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(
            config.completions_endpoint(),
            "https://llm.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = RelayConfig::from_lookup(lookup_from(&[(
            API_BASE_URL_VAR,
            "https://llm.example.com/v1",
        )]))
        .unwrap_err();

        assert!(matches!(err, RelayError::Configuration(ref m) if m.contains(API_KEY_VAR)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let err = RelayConfig::from_lookup(lookup_from(&[
            (API_BASE_URL_VAR, "   "),
            (API_KEY_VAR, "sk-test"),
        ]))
        .unwrap_err();

        assert!(matches!(err, RelayError::Configuration(ref m) if m.contains(API_BASE_URL_VAR)));
    }

    #[test]
    fn rejects_relative_base_url() {
        let err = RelayConfig::from_lookup(lookup_from(&[
            (API_BASE_URL_VAR, "/v1"),
            (API_KEY_VAR, "sk-test"),
        ]))
        .unwrap_err();

        assert!(matches!(err, RelayError::Configuration(_)));
    }

    #[test]
    fn timeout_override() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            (API_BASE_URL_VAR, "https://llm.example.com/v1"),
            (API_KEY_VAR, "sk-test"),
            (TIMEOUT_SECS_VAR, "12"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(12));

        let err = RelayConfig::from_lookup(lookup_from(&[
            (API_BASE_URL_VAR, "https://llm.example.com/v1"),
            (API_KEY_VAR, "sk-test"),
            (TIMEOUT_SECS_VAR, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, RelayError::Configuration(_)));
    }
}
